//! Guitar voice - plucked string.
//!
//! # How It Works
//!
//! 1. Band-limited sawtooth: every harmonic, like a freshly plucked string
//! 2. Low-pass at 2 kHz with Q 1 takes the fizz off and rounds the corner
//! 3. 10 ms attack to 0.5, then an exponential decay that runs the whole
//!    length of the note down to 2% of the peak
//! 4. Short exponential release once the note ends
//!
//! The decay is stretched to the note, so a whole-note chord rings out and
//! a quarter-note chord is already mostly gone when the next one starts.

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
};
use crate::voices::{NoteSpec, VoiceDesign, VoicePatch};

const ATTACK: f32 = 0.01;
const RELEASE: f32 = 0.08;

pub struct Guitar;

impl VoiceDesign for Guitar {
    fn name(&self) -> &'static str {
        "guitar"
    }

    fn build(&self, spec: &NoteSpec) -> VoicePatch {
        let decay = (spec.duration - ATTACK).max(ATTACK);
        let graph = OscNode::sawtooth()
            .through(FilterNode::lowpass(2_000.0).with_q(1.0))
            .amplify(
                EnvNode::adsr(ATTACK, decay, 0.02, RELEASE)
                    .with_peak(0.5)
                    .exponential(),
            );

        VoicePatch {
            graph: graph.boxed(),
            release: RELEASE,
        }
    }
}
