//! Synth voice - detuned saw lead with a swept filter.
//!
//! # How It Works
//!
//! 1. Two sawtooths at ±5 cents beat slowly against each other (width)
//! 2. A sine an octave below adds weight under the saws
//! 3. Low-pass with Q 2, cutoff driven by its own envelope:
//!    500 Hz base, up to 2 kHz over the first 100 ms, then settling to
//!    800 Hz across the rest of the note
//! 4. Amplitude envelope: 50 ms up to 0.4, down to 0.2 by 200 ms
//!
//! The filter sweep is what makes the attack "bloom".

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::{FilterNode, FilterParam},
    oscillator::OscNode,
    stack::Stack,
};
use crate::voices::{NoteSpec, VoiceDesign, VoicePatch};

const BASE_CUTOFF: f32 = 500.0;
const SWEEP_DEPTH: f32 = 1_500.0;
const SWEEP_ATTACK: f32 = 0.1;
const RELEASE: f32 = 0.1;

pub struct Synth;

impl VoiceDesign for Synth {
    fn name(&self) -> &'static str {
        "synth"
    }

    fn build(&self, spec: &NoteSpec) -> VoicePatch {
        let oscillators = Stack::new()
            .layer(OscNode::sawtooth().with_detune(5.0).with_level(1.0 / 3.0))
            .layer(OscNode::sawtooth().with_detune(-5.0).with_level(1.0 / 3.0))
            .layer(OscNode::sine().with_ratio(0.5).with_level(1.0 / 3.0));

        let sweep = EnvNode::adsr(
            SWEEP_ATTACK,
            (spec.duration - SWEEP_ATTACK).max(SWEEP_ATTACK),
            0.2,
            RELEASE,
        );

        let graph = oscillators
            .through(
                FilterNode::lowpass(BASE_CUTOFF)
                    .with_q(2.0)
                    .modulate(sweep, FilterParam::Cutoff, SWEEP_DEPTH),
            )
            .amplify(EnvNode::adsr(0.05, 0.15, 0.5, RELEASE).with_peak(0.4));

        VoicePatch {
            graph: graph.boxed(),
            release: RELEASE,
        }
    }
}
