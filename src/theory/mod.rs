//! Music theory: note spelling, keys, chords, roman numerals and the
//! progression library.
//!
//! Everything here is pure data and pure functions over static tables. The
//! synthesis side only ever sees the note indices a [`Chord`] carries.

/// Chord qualities and chord construction.
pub mod chord;
/// Difficulty tiers and what each one unlocks.
pub mod difficulty;
/// The 24 major and natural-minor keys.
pub mod key;
/// Note names, note indices and tuning.
pub mod note;
/// Progression templates and their realisation in a key.
pub mod progression;
/// Roman numeral parsing, spelling and quality inference.
pub mod roman;

pub use chord::{build_chord, chord_by_name, Chord, ChordQuality};
pub use difficulty::{random_key, DifficultyLevel};
pub use key::{Key, Mode};
pub use note::{index_to_frequency, index_to_note, note_to_index, NoteName};
pub use progression::{
    build_progression, get_random_progression, BuiltProgression, ProgressionTemplate, Style,
};
pub use roman::{degree_to_roman, infer_quality, roman_to_degree, RomanNumeral};
