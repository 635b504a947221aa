//! Piano voice - additive, struck-string tone.
//!
//! # How It Works
//!
//! 1. Triangle at the fundamental carries the body (level 0.6)
//! 2. Sine at 2× adds the octave partial (0.25)
//! 3. Sine at 3× adds a little brightness (0.1)
//! 4. One ADSR over the sum, peaking at 0.8
//!
//! This is the only voice whose envelope comes from the engine settings, so
//! the attack/decay/sustain/release sliders reshape it directly. Sustain is
//! a fraction of the 0.8 peak.
//!
//! # Variations
//!
//! - Drop the 3× partial = rounder, more electric-piano
//! - Sustain near 0 with a long decay = closer to a real piano's fade

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, stack::Stack,
};
use crate::voices::{NoteSpec, VoiceDesign, VoicePatch};

pub(super) const PEAK: f32 = 0.8;

pub struct Piano;

impl VoiceDesign for Piano {
    fn name(&self) -> &'static str {
        "piano"
    }

    fn build(&self, spec: &NoteSpec) -> VoicePatch {
        let env = spec.envelope;
        let graph = Stack::new()
            .layer(OscNode::triangle().with_level(0.6))
            .layer(OscNode::sine().with_ratio(2.0).with_level(0.25))
            .layer(OscNode::sine().with_ratio(3.0).with_level(0.1))
            .amplify(EnvNode::adsr(env.attack, env.decay, env.sustain, env.release).with_peak(PEAK));

        VoicePatch {
            graph: graph.boxed(),
            release: env.release,
        }
    }
}
