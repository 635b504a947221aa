//! Metronome click.
//!
//! A 50 ms sine blip: 1 kHz on the downbeat, 800 Hz on the others. Fixed
//! pitch, so it ignores the note it is played at.

use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};
use crate::voices::VoicePatch;

pub const CLICK_SECONDS: f32 = 0.05;
const RELEASE: f32 = 0.01;

pub fn click(accent: bool) -> VoicePatch {
    let pitch = if accent { 1_000.0 } else { 800.0 };
    let graph = OscNode::sine()
        .with_frequency(pitch)
        .amplify(
            EnvNode::adsr(0.001, CLICK_SECONDS, 0.0, RELEASE)
                .with_peak(0.3)
                .exponential(),
        );

    VoicePatch {
        graph: graph.boxed(),
        release: RELEASE,
    }
}
