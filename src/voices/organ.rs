//! Organ voice - drawbar additive stack with Leslie wobble.
//!
//! # How It Works
//!
//! 1. Six sine partials at 1×, 2×, 3×, 4×, 6× and 8× the note, the way a
//!    tonewheel organ's drawbars mix footages
//! 2. Each partial gets its own 5 Hz LFO pushing its pitch ±3 Hz, a cheap
//!    stand-in for the rotating Leslie speaker
//! 3. Near-instant attack and full sustain: an organ holds exactly as long
//!    as the key does
//!
//! # Variations
//!
//! - Faster LFO (6-7 Hz) = "tremolo" Leslie setting
//! - Drop the 6× and 8× partials = mellower, jazz registration

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    lfo::LfoNode,
    oscillator::{OscNode, OscParam},
    stack::Stack,
};
use crate::voices::{NoteSpec, VoiceDesign, VoicePatch};

pub(super) const DRAWBARS: [(f32, f32); 6] = [
    (1.0, 0.4),
    (2.0, 0.3),
    (3.0, 0.2),
    (4.0, 0.15),
    (6.0, 0.1),
    (8.0, 0.05),
];

const LESLIE_RATE: f32 = 5.0;
const LESLIE_DEPTH: f32 = 3.0;
const RELEASE: f32 = 0.05;

pub struct Organ;

impl VoiceDesign for Organ {
    fn name(&self) -> &'static str {
        "organ"
    }

    fn build(&self, _spec: &NoteSpec) -> VoicePatch {
        let partials: Stack = DRAWBARS
            .iter()
            .map(|&(ratio, level)| {
                OscNode::sine()
                    .with_ratio(ratio)
                    .with_level(level)
                    .modulate(LfoNode::sine(LESLIE_RATE), OscParam::Offset, LESLIE_DEPTH)
                    .boxed()
            })
            .collect();

        let graph = partials.amplify(EnvNode::adsr(0.01, 0.01, 1.0, RELEASE));

        VoicePatch {
            graph: graph.boxed(),
            release: RELEASE,
        }
    }
}
