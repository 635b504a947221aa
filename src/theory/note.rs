use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Note Names and Note Indices
===========================

A note index is a MIDI-style integer: C4 = 60, A4 = 69, one step per
semitone. Indices are plain `i32` so octave -1 (indices 0..11) and octave 9
(past 127) are both representable.

A note NAME is a letter plus an accidental count. The accidental is signed:

    +1  sharp         C#
    -1  flat          Db
    +2  double sharp  F##
     0  natural       E

Two names can spell the same sound (C# and Db, E# and F). They are
"enharmonic" and share a pitch class (0..11).

Octave convention:
------------------
The octave number always belongs to the SOUNDING pitch class, not the letter.
B#4 is therefore index 60 (the C at octave 4), and Cb4 is index 71. This keeps
`index_to_note(note_to_index(name, octave))` at the same octave for every
spelling, including the E# and B# that the sharp keys need.

    name   octave   index
    C      4        60
    C#     4        61
    Db     4        61
    A      4        69
    B#     4        60
*/

/// Canonical sharp spellings, indexed by pitch class.
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Canonical flat spellings, indexed by pitch class.
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Index of A4, the 440 Hz tuning reference.
pub const A4_INDEX: i32 = 69;
pub const A4_FREQUENCY: f32 = 440.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitones above C for the natural letter.
    pub const fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// A spelled note name without octave.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: i8,
}

impl NoteName {
    pub const fn new(letter: Letter, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, 0)
    }

    pub const fn sharp(letter: Letter) -> Self {
        Self::new(letter, 1)
    }

    pub const fn flat(letter: Letter) -> Self {
        Self::new(letter, -1)
    }

    /// Parse a spelled name such as `C`, `F#`, `Bb`, `E#`, `Abb` or `C♯`.
    ///
    /// The whole string must be consumed; trailing text is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let (name, rest) = Self::parse_prefix(text)?;
        rest.is_empty().then_some(name)
    }

    /// Parse a name from the start of `text`, returning the remainder.
    ///
    /// Accidentals are consumed greedily, so `Bbm7` splits into `Bb` + `m7`.
    pub fn parse_prefix(text: &str) -> Option<(Self, &str)> {
        let mut chars = text.char_indices();
        let (_, first) = chars.next()?;
        let letter = Letter::from_char(first)?;

        let mut accidental: i8 = 0;
        let mut consumed = first.len_utf8();
        for (idx, c) in chars {
            let step = match c {
                '#' | '♯' => 1,
                'b' | '♭' => -1,
                _ => break,
            };
            accidental = accidental.checked_add(step)?;
            consumed = idx + c.len_utf8();
        }

        Some((Self::new(letter, accidental), &text[consumed..]))
    }

    /// Pitch class in 0..12.
    pub fn pitch_class(&self) -> u8 {
        (self.letter.semitone() + self.accidental as i32).rem_euclid(12) as u8
    }

    /// Same letter, accidental moved by `semitones`.
    pub fn alter(self, semitones: i8) -> Self {
        Self::new(self.letter, self.accidental.saturating_add(semitones))
    }

    /// Canonical name for a pitch class from the sharp or flat table.
    pub fn from_pitch_class(pitch_class: i32, prefer_flats: bool) -> Self {
        let pc = pitch_class.rem_euclid(12) as usize;
        let table = if prefer_flats { &FLAT_NAMES } else { &SHARP_NAMES };
        // table entries are always valid spellings
        Self::parse(table[pc]).unwrap_or(Self::natural(Letter::C))
    }

    pub fn is_enharmonic(&self, other: &NoteName) -> bool {
        self.pitch_class() == other.pitch_class()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        let symbol = if self.accidental > 0 { '#' } else { 'b' };
        for _ in 0..self.accidental.unsigned_abs() {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNoteError(pub String);

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note name: {:?}", self.0)
    }
}

impl std::error::Error for ParseNoteError {}

impl FromStr for NoteName {
    type Err = ParseNoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteName::parse(s).ok_or_else(|| ParseNoteError(s.to_string()))
    }
}

/// Note index for a spelled name at `octave` (C4 = 60).
///
/// Returns `None` when `name` is not a note name.
pub fn note_to_index(name: &str, octave: i32) -> Option<i32> {
    NoteName::parse(name).map(|n| index_of(n, octave))
}

/// Note index for an already-parsed name.
pub fn index_of(name: NoteName, octave: i32) -> i32 {
    (octave + 1) * 12 + name.pitch_class() as i32
}

/// Spell a note index with the sharp or flat table, returning `(name, octave)`.
pub fn index_to_note(index: i32, prefer_flats: bool) -> (NoteName, i32) {
    let octave = index.div_euclid(12) - 1;
    (NoteName::from_pitch_class(index, prefer_flats), octave)
}

/// Equal-tempered frequency of a note index.
#[inline]
pub fn index_to_frequency(index: i32) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((index - A4_INDEX) as f32 / 12.0)
}

/// Nearest note index for a frequency in Hz.
pub fn frequency_to_index(frequency: f32) -> Option<i32> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }
    let semitones = 12.0 * (frequency / A4_FREQUENCY).log2();
    Some(A4_INDEX + semitones.round() as i32)
}
