use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::Duration;
use crate::theory::key::{Key, Mode};
use crate::theory::note::{index_of, NoteName};
use crate::theory::roman::degree_to_roman;

/// Octave that chord roots are placed in.
pub const DEFAULT_OCTAVE: i32 = 4;

/// Chord qualities, each a fixed interval set above the root.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    HalfDiminished,
    DiminishedSeventh,
    Suspended2,
    Suspended4,
    Add9,
    Sixth,
    MinorSixth,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 14] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::DominantSeventh,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::HalfDiminished,
        ChordQuality::DiminishedSeventh,
        ChordQuality::Suspended2,
        ChordQuality::Suspended4,
        ChordQuality::Add9,
        ChordQuality::Sixth,
        ChordQuality::MinorSixth,
    ];

    /// Semitone offsets from the root, ascending, starting at 0.
    pub const fn intervals(self) -> &'static [i32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::HalfDiminished => &[0, 3, 6, 10],
            ChordQuality::DiminishedSeventh => &[0, 3, 6, 9],
            ChordQuality::Suspended2 => &[0, 2, 7],
            ChordQuality::Suspended4 => &[0, 5, 7],
            ChordQuality::Add9 => &[0, 4, 7, 14],
            ChordQuality::Sixth => &[0, 4, 7, 9],
            ChordQuality::MinorSixth => &[0, 3, 7, 9],
        }
    }

    /// Suffix appended to the root in a chord symbol (`Am`, `G7`, `B°`).
    pub const fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "°",
            ChordQuality::Augmented => "+",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::HalfDiminished => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::Suspended2 => "sus2",
            ChordQuality::Suspended4 => "sus4",
            ChordQuality::Add9 => "add9",
            ChordQuality::Sixth => "6",
            ChordQuality::MinorSixth => "m6",
        }
    }

    /// Short identifier used in configuration and quiz answers.
    pub const fn id(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::DominantSeventh => "dom7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::HalfDiminished => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::Suspended2 => "sus2",
            ChordQuality::Suspended4 => "sus4",
            ChordQuality::Add9 => "add9",
            ChordQuality::Sixth => "6",
            ChordQuality::MinorSixth => "m6",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
            ChordQuality::DominantSeventh => "Dominant 7",
            ChordQuality::MajorSeventh => "Major 7",
            ChordQuality::MinorSeventh => "Minor 7",
            ChordQuality::HalfDiminished => "Half-diminished 7",
            ChordQuality::DiminishedSeventh => "Diminished 7",
            ChordQuality::Suspended2 => "Suspended 2",
            ChordQuality::Suspended4 => "Suspended 4",
            ChordQuality::Add9 => "Add 9",
            ChordQuality::Sixth => "Sixth",
            ChordQuality::MinorSixth => "Minor 6",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.id() == id)
    }

    /// Qualities whose third is minor. Written as lower-case roman numerals.
    pub const fn is_minor_family(self) -> bool {
        matches!(
            self,
            ChordQuality::Minor
                | ChordQuality::Diminished
                | ChordQuality::MinorSeventh
                | ChordQuality::HalfDiminished
                | ChordQuality::DiminishedSeventh
                | ChordQuality::MinorSixth
        )
    }

    /// Match a chord-symbol suffix, accepting common alternate spellings.
    fn from_symbol(symbol: &str) -> Option<Self> {
        let quality = match symbol {
            "" | "maj" | "M" => ChordQuality::Major,
            "m" | "min" | "-" => ChordQuality::Minor,
            "°" | "dim" | "o" => ChordQuality::Diminished,
            "+" | "aug" => ChordQuality::Augmented,
            "7" | "dom7" => ChordQuality::DominantSeventh,
            "maj7" | "M7" | "Δ7" => ChordQuality::MajorSeventh,
            "m7" | "min7" | "-7" => ChordQuality::MinorSeventh,
            "m7b5" | "ø" | "ø7" => ChordQuality::HalfDiminished,
            "dim7" | "°7" | "o7" => ChordQuality::DiminishedSeventh,
            "sus2" => ChordQuality::Suspended2,
            "sus4" | "sus" => ChordQuality::Suspended4,
            "add9" => ChordQuality::Add9,
            "6" => ChordQuality::Sixth,
            "m6" => ChordQuality::MinorSixth,
            _ => return None,
        };
        Some(quality)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChordQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordQuality::from_id(s).ok_or_else(|| format!("unknown chord quality: {s}"))
    }
}

/// A concrete chord: spelled root, quality, and sounding note indices.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pub name: String,
    pub root: NoteName,
    pub quality: ChordQuality,
    /// Note indices, lowest first.
    pub midi_notes: Vec<i32>,
    /// Roman numeral label within the key it was built from. Empty for
    /// chords built outside a key.
    pub roman_numeral: String,
    pub duration: Duration,
}

impl Chord {
    /// Root-position chord with the root in `octave`.
    pub fn from_root(root: NoteName, quality: ChordQuality, octave: i32) -> Self {
        let base = index_of(root, octave);
        Self {
            name: format!("{root}{}", quality.symbol()),
            root,
            quality,
            midi_notes: quality.intervals().iter().map(|i| base + i).collect(),
            roman_numeral: String::new(),
            duration: Duration::QUARTER,
        }
    }

    pub fn with_roman(mut self, label: impl Into<String>) -> Self {
        self.roman_numeral = label.into();
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Raise the lowest note by an octave, `inversion` times.
    pub fn inverted(mut self, inversion: usize) -> Self {
        for _ in 0..inversion.min(self.midi_notes.len().saturating_sub(1)) {
            if let Some(lowest) = self.midi_notes.first().copied() {
                self.midi_notes.remove(0);
                self.midi_notes.push(lowest + 12);
            }
        }
        self.midi_notes.sort_unstable();
        self
    }

    /// Length in beats (a quarter note is one beat).
    pub fn beats(&self) -> f64 {
        self.duration.beats()
    }

    pub fn pitch_classes(&self) -> Vec<u8> {
        self.midi_notes
            .iter()
            .map(|n| n.rem_euclid(12) as u8)
            .collect()
    }
}

/// Build the chord on `degree` (1-based) of `key_name`.
///
/// Degrees above 7 wrap around the scale. Without an override the quality is
/// the diatonic triad for that degree in the key's mode. Returns `None` for
/// an unknown key or degree 0.
pub fn build_chord(
    key_name: &str,
    degree: usize,
    quality_override: Option<ChordQuality>,
) -> Option<Chord> {
    let key = Key::lookup(key_name)?;
    build_chord_in(key, degree, quality_override)
}

/// Same as [`build_chord`] for an already resolved key.
pub fn build_chord_in(
    key: &Key,
    degree: usize,
    quality_override: Option<ChordQuality>,
) -> Option<Chord> {
    if degree == 0 {
        return None;
    }
    let quality = quality_override.unwrap_or_else(|| key.diatonic_quality(degree));
    let root = key.degree_root(degree);
    let label = degree_to_roman(degree, key.mode, Some(quality));

    Some(Chord::from_root(root, quality, DEFAULT_OCTAVE).with_roman(label))
}

/// Look up a chord by its symbol, e.g. `Am`, `F#m7`, `Bbmaj7`, `Gsus4`.
pub fn chord_by_name(name: &str, octave: i32) -> Option<Chord> {
    let (root, symbol) = NoteName::parse_prefix(name.trim())?;
    let quality = ChordQuality::from_symbol(symbol)?;
    Some(Chord::from_root(root, quality, octave))
}

/// Diatonic triad quality for `degree` in `mode`.
pub(crate) fn diatonic_quality(mode: Mode, degree: usize) -> ChordQuality {
    let degree = (degree + 6) % 7 + 1;
    match (mode, degree) {
        (Mode::Major, 2 | 3 | 6) => ChordQuality::Minor,
        (Mode::Major, 7) => ChordQuality::Diminished,
        (Mode::Minor, 1 | 4 | 5) => ChordQuality::Minor,
        (Mode::Minor, 2) => ChordQuality::Diminished,
        _ => ChordQuality::Major,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::note::Letter;

    #[test]
    fn interval_sets_are_sorted_and_rooted() {
        for quality in ChordQuality::ALL {
            let intervals = quality.intervals();
            assert_eq!(intervals[0], 0, "{quality}");
            assert!(intervals.windows(2).all(|w| w[0] < w[1]), "{quality}");
        }
    }

    #[test]
    fn ids_round_trip() {
        for quality in ChordQuality::ALL {
            assert_eq!(ChordQuality::from_id(quality.id()), Some(quality));
        }
        assert_eq!("dom7".parse::<ChordQuality>(), Ok(ChordQuality::DominantSeventh));
        assert!("power".parse::<ChordQuality>().is_err());
    }

    #[test]
    fn tonic_of_c_major() {
        let chord = build_chord("C", 1, None).unwrap();
        assert_eq!(chord.quality, ChordQuality::Major);
        assert_eq!(chord.midi_notes, vec![60, 64, 67]);
        assert_eq!(chord.name, "C");
        assert_eq!(chord.roman_numeral, "I");
    }

    #[test]
    fn tonic_of_a_minor() {
        let chord = build_chord("Am", 1, None).unwrap();
        assert_eq!(chord.quality, ChordQuality::Minor);
        let mut classes = chord.pitch_classes();
        classes.sort_unstable();
        assert_eq!(classes, vec![0, 4, 9]);
        assert_eq!(chord.name, "Am");
        assert_eq!(chord.roman_numeral, "i");
    }

    #[test]
    fn diatonic_defaults_follow_the_mode() {
        let major: Vec<_> = (1..=7)
            .map(|d| build_chord("G", d, None).unwrap().quality)
            .collect();
        assert_eq!(
            major,
            vec![
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Minor,
                ChordQuality::Major,
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Diminished,
            ]
        );

        let minor: Vec<_> = (1..=7)
            .map(|d| build_chord("Em", d, None).unwrap().quality)
            .collect();
        assert_eq!(
            minor,
            vec![
                ChordQuality::Minor,
                ChordQuality::Diminished,
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Minor,
                ChordQuality::Major,
                ChordQuality::Major,
            ]
        );
    }

    #[test]
    fn degrees_wrap_around_the_scale() {
        let ninth = build_chord("D", 9, None).unwrap();
        let second = build_chord("D", 2, None).unwrap();
        assert_eq!(ninth.root, second.root);
        assert_eq!(ninth.quality, second.quality);
    }

    #[test]
    fn override_replaces_default_quality() {
        let chord = build_chord("C", 5, Some(ChordQuality::DominantSeventh)).unwrap();
        assert_eq!(chord.name, "G7");
        assert_eq!(chord.midi_notes, vec![67, 71, 74, 77]);
    }

    #[test]
    fn unknown_key_or_degree_zero_has_no_chord() {
        assert!(build_chord("H", 1, None).is_none());
        assert!(build_chord("C", 0, None).is_none());
    }

    #[test]
    fn sharp_keys_keep_their_spelling() {
        let chord = build_chord("F#", 7, None).unwrap();
        assert_eq!(chord.root, NoteName::new(Letter::E, 1));
        assert_eq!(chord.name, "E#°");
        // E#4 sounds as F4
        assert_eq!(chord.midi_notes[0], 65);
    }

    #[test]
    fn chord_symbols_resolve() {
        let am = chord_by_name("Am", 4).unwrap();
        assert_eq!(am.midi_notes, vec![69, 72, 76]);

        let bb = chord_by_name("Bbmaj7", 3).unwrap();
        assert_eq!(bb.quality, ChordQuality::MajorSeventh);
        assert_eq!(bb.midi_notes[0], 58);

        assert_eq!(chord_by_name("F#m7", 4).unwrap().name, "F#m7");
        assert!(chord_by_name("Xm", 4).is_none());
        assert!(chord_by_name("C13#11", 4).is_none());
    }

    #[test]
    fn inversion_moves_bass_up() {
        let chord = chord_by_name("C", 4).unwrap().inverted(1);
        assert_eq!(chord.midi_notes, vec![64, 67, 72]);
        let chord = chord_by_name("C", 4).unwrap().inverted(2);
        assert_eq!(chord.midi_notes, vec![67, 72, 76]);
    }

    #[test]
    fn default_duration_is_one_beat() {
        let chord = build_chord("C", 4, None).unwrap();
        assert!((chord.beats() - 1.0).abs() < f64::EPSILON);
    }
}
