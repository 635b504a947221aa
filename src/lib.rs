//! chordwise: the sound and theory core of an ear-training tool.
//!
//! The crate turns roman-numeral progressions into concrete chords
//! ([`theory`]), chords into per-instrument voice graphs ([`voices`],
//! [`graph`], [`dsp`]) and plays them on time through an [`Engine`].
//! [`quiz`] builds questions out of the same pieces.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod quiz;
pub mod sequencing; // Note durations
pub mod theory;
pub mod voices; // Instrument voice designs

pub use config::{EngineConfig, EnvelopeConfig};
pub use engine::{Engine, PlaybackOutcome};
pub use error::{EngineError, Result};
pub use voices::Instrument;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
