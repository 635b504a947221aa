//! Strings voice - a small ensemble of slightly out-of-tune players.
//!
//! # How It Works
//!
//! 1. Four sawtooths, each detuned by a random amount within ±10 cents.
//!    No two players are ever exactly in tune, and the slow beating between
//!    them is what reads as "section" rather than "synth"
//! 2. Each saw through its own 3 kHz low-pass to soften the bow noise
//! 3. Slow 150 ms swell and a slow release
//!
//! The detune comes from the note's seed, so the same seed always builds
//! the same ensemble.

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
    stack::Stack,
};
use crate::voices::{NoteSpec, VoiceDesign, VoicePatch};

pub(super) const PLAYERS: usize = 4;
const MAX_DETUNE_CENTS: f32 = 10.0;
const RELEASE: f32 = 0.4;

pub struct Strings;

impl Strings {
    /// Detune in cents for each player.
    pub(super) fn detunes(seed: u64) -> [f32; PLAYERS] {
        let mut rng = fastrand::Rng::with_seed(seed);
        std::array::from_fn(|_| (rng.f32() * 2.0 - 1.0) * MAX_DETUNE_CENTS)
    }
}

impl VoiceDesign for Strings {
    fn name(&self) -> &'static str {
        "strings"
    }

    fn build(&self, spec: &NoteSpec) -> VoicePatch {
        let section: Stack = Self::detunes(spec.seed)
            .into_iter()
            .map(|cents| {
                OscNode::sawtooth()
                    .with_detune(cents)
                    .through(FilterNode::lowpass(3_000.0))
                    .boxed()
            })
            .collect();

        let graph = section.amplify(EnvNode::adsr(0.15, 0.2, 0.67, RELEASE).with_peak(0.15));

        VoicePatch {
            graph: graph.boxed(),
            release: RELEASE,
        }
    }
}
