use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::theory::chord::{diatonic_quality, ChordQuality};
use crate::theory::note::{Letter, NoteName};
use crate::theory::roman::degree_to_roman;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    /// Natural minor (aeolian).
    Minor,
}

impl Mode {
    /// Semitone offsets of the seven scale degrees above the tonic.
    pub const fn scale(self) -> [i32; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    pub const fn is_minor(self) -> bool {
        matches!(self, Mode::Minor)
    }
}

/// A major or natural-minor key with its diatonic spelling.
#[derive(Debug, PartialEq, Eq)]
pub struct Key {
    pub name: &'static str,
    pub mode: Mode,
    /// Scale spelling, tonic first, one entry per letter.
    pub notes: [NoteName; 7],
    /// Positive for sharps, negative for flats.
    pub signature: i8,
    /// Relative major key name, for minor keys.
    pub relative_major: Option<&'static str>,
}

const fn n(letter: Letter) -> NoteName {
    NoteName::natural(letter)
}

const fn s(letter: Letter) -> NoteName {
    NoteName::sharp(letter)
}

const fn f(letter: Letter) -> NoteName {
    NoteName::flat(letter)
}

const fn major(name: &'static str, notes: [NoteName; 7], signature: i8) -> Key {
    Key {
        name,
        mode: Mode::Major,
        notes,
        signature,
        relative_major: None,
    }
}

const fn minor(
    name: &'static str,
    notes: [NoteName; 7],
    signature: i8,
    relative_major: &'static str,
) -> Key {
    Key {
        name,
        mode: Mode::Minor,
        notes,
        signature,
        relative_major: Some(relative_major),
    }
}

use Letter::{A, B, C, D, E, F, G};

pub static MAJOR_KEYS: [Key; 12] = [
    major("C", [n(C), n(D), n(E), n(F), n(G), n(A), n(B)], 0),
    major("G", [n(G), n(A), n(B), n(C), n(D), n(E), s(F)], 1),
    major("D", [n(D), n(E), s(F), n(G), n(A), n(B), s(C)], 2),
    major("A", [n(A), n(B), s(C), n(D), n(E), s(F), s(G)], 3),
    major("E", [n(E), s(F), s(G), n(A), n(B), s(C), s(D)], 4),
    major("B", [n(B), s(C), s(D), n(E), s(F), s(G), s(A)], 5),
    major("F#", [s(F), s(G), s(A), n(B), s(C), s(D), s(E)], 6),
    major("F", [n(F), n(G), n(A), f(B), n(C), n(D), n(E)], -1),
    major("Bb", [f(B), n(C), n(D), f(E), n(F), n(G), n(A)], -2),
    major("Eb", [f(E), n(F), n(G), f(A), f(B), n(C), n(D)], -3),
    major("Ab", [f(A), f(B), n(C), f(D), f(E), n(F), n(G)], -4),
    major("Db", [f(D), f(E), n(F), f(G), f(A), f(B), n(C)], -5),
];

pub static MINOR_KEYS: [Key; 12] = [
    minor("Am", [n(A), n(B), n(C), n(D), n(E), n(F), n(G)], 0, "C"),
    minor("Em", [n(E), s(F), n(G), n(A), n(B), n(C), n(D)], 1, "G"),
    minor("Bm", [n(B), s(C), n(D), n(E), s(F), n(G), n(A)], 2, "D"),
    minor("F#m", [s(F), s(G), n(A), n(B), s(C), n(D), n(E)], 3, "A"),
    minor("C#m", [s(C), s(D), n(E), s(F), s(G), n(A), n(B)], 4, "E"),
    minor("G#m", [s(G), s(A), n(B), s(C), s(D), n(E), s(F)], 5, "B"),
    minor("D#m", [s(D), s(E), s(F), s(G), s(A), n(B), s(C)], 6, "F#"),
    minor("Dm", [n(D), n(E), n(F), n(G), n(A), f(B), n(C)], -1, "F"),
    minor("Gm", [n(G), n(A), f(B), n(C), n(D), f(E), n(F)], -2, "Bb"),
    minor("Cm", [n(C), n(D), f(E), n(F), n(G), f(A), f(B)], -3, "Eb"),
    minor("Fm", [n(F), n(G), f(A), f(B), n(C), f(D), f(E)], -4, "Ab"),
    minor("Bbm", [f(B), n(C), f(D), f(E), n(F), f(G), f(A)], -5, "Db"),
];

/// Where a chord symbol sits inside a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDegree {
    pub degree: usize,
    pub numeral: String,
}

impl Key {
    /// Find a key by name (`C`, `F#`, `Am`, `Bbm`).
    pub fn lookup(name: &str) -> Option<&'static Key> {
        Self::all().find(|k| k.name == name)
    }

    /// All 24 keys, majors first.
    pub fn all() -> impl Iterator<Item = &'static Key> {
        MAJOR_KEYS.iter().chain(MINOR_KEYS.iter())
    }

    pub fn tonic(&self) -> NoteName {
        self.notes[0]
    }

    pub fn is_minor(&self) -> bool {
        self.mode.is_minor()
    }

    /// Spelled root of `degree` (1-based, wraps past 7).
    pub fn degree_root(&self, degree: usize) -> NoteName {
        self.notes[(degree + 6) % 7]
    }

    pub fn diatonic_quality(&self, degree: usize) -> ChordQuality {
        diatonic_quality(self.mode, degree)
    }

    /// The relative key: the relative major of a minor key, or the relative
    /// minor of a major key.
    pub fn relative(&self) -> Option<&'static Key> {
        match self.relative_major {
            Some(major) => Key::lookup(major),
            None => MINOR_KEYS
                .iter()
                .find(|k| k.relative_major == Some(self.name)),
        }
    }

    /// Degree and diatonic numeral of a chord symbol's root in this key.
    ///
    /// Only the root spelling is matched; `None` when it is not a scale note.
    pub fn chord_degree(&self, chord_name: &str) -> Option<ChordDegree> {
        let (root, _) = NoteName::parse_prefix(chord_name)?;
        let index = self.notes.iter().position(|n| *n == root)?;
        let degree = index + 1;
        Some(ChordDegree {
            degree,
            numeral: degree_to_roman(degree, self.mode, None),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        write!(f, "{} {mode}", self.tonic())
    }
}
