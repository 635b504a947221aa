//! Instrument voices.
//!
//! Each instrument is a [`VoiceDesign`]: given a note, its length and the
//! engine's envelope settings it builds a fresh graph for exactly one note.
//! Instruments are a closed enum mapped onto designs through a lookup
//! table, so adding one means one variant, one file and one table entry.
//!
//! # Example
//!
//! ```ignore
//! use chordwise::voices::{Instrument, NoteSpec};
//!
//! let spec = NoteSpec::new(60, 1.0);
//! let patch = Instrument::Organ.build_voice(&spec);
//! // patch.graph renders the note, patch.release is its tail in seconds
//! ```

mod click;
mod guitar;
mod organ;
mod piano;
mod strings;
mod synth;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EnvelopeConfig;
use crate::graph::node::GraphNode;

pub use click::{click, CLICK_SECONDS};
pub use guitar::Guitar;
pub use organ::Organ;
pub use piano::Piano;
pub use strings::Strings;
pub use synth::Synth;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Instrument {
    #[default]
    Piano,
    Guitar,
    Synth,
    Organ,
    Strings,
}

static DESIGNS: [&dyn VoiceDesign; 5] = [&Piano, &Guitar, &Synth, &Organ, &Strings];

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::Piano,
        Instrument::Guitar,
        Instrument::Synth,
        Instrument::Organ,
        Instrument::Strings,
    ];

    pub fn id(self) -> &'static str {
        self.design().name()
    }

    /// Look up an instrument by id. Unknown ids fall back to piano.
    pub fn from_id(id: &str) -> Instrument {
        id.parse().unwrap_or_else(|_| {
            warn!(id, "unknown instrument, using piano");
            Instrument::Piano
        })
    }

    pub fn design(self) -> &'static dyn VoiceDesign {
        DESIGNS[self as usize]
    }

    pub fn build_voice(self, spec: &NoteSpec) -> VoicePatch {
        self.design().build(spec)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Instrument::ALL
            .into_iter()
            .find(|i| i.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown instrument `{s}`"))
    }
}

/// Everything a voice needs to know about the note it plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSpec {
    /// Note index, A4 = 69.
    pub note: i32,
    /// Gate length in seconds.
    pub duration: f32,
    pub envelope: EnvelopeConfig,
    /// Seed for voices with random detune.
    pub seed: u64,
}

impl NoteSpec {
    pub fn new(note: i32, duration: f32) -> Self {
        Self {
            note,
            duration: duration.max(0.0),
            envelope: EnvelopeConfig::default(),
            seed: 0,
        }
    }

    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A voice graph ready for the output bus.
pub struct VoicePatch {
    pub graph: Box<dyn GraphNode>,
    /// Seconds the graph keeps sounding after note_off.
    pub release: f32,
}

impl fmt::Debug for VoicePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoicePatch")
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

/// Builds one instrument's graph for a single note.
pub trait VoiceDesign: Sync {
    fn name(&self) -> &'static str;

    fn build(&self, spec: &NoteSpec) -> VoicePatch;
}
