use crate::theory::chord::{diatonic_quality, ChordQuality};
use crate::theory::key::Mode;

/*
Roman Numeral Tokens
====================

Progressions are written key-independently as roman numerals. A token has
three parts:

    b  VII  maj7
    │   │    └── suffix: quality symbols, sevenths, figures
    │   └─────── numeral: degree 1..7, case hints the quality
    └─────────── accidental prefix: b / # (chromatic root)

The numeral letters alone decide the degree, so decoding a degree never
needs the key. Quality comes from `infer_quality`, which reads the token's
shape in a fixed order:

    1. diminished symbol    °  dim    -> Diminished
       half-diminished      ø         -> HalfDiminished
    2. augmented symbol     +  aug    -> Augmented
    3. any 7                          -> m7 if the token is all lower case,
                                         m7 if it contains "m7",
                                         maj7 if it contains "maj7",
                                         dominant 7 otherwise
    4. added tones          sus2 sus4 add9 add6
    5. case                 lower -> Minor, otherwise Major

This is a reading of the token's text, not harmonic analysis: `iimaj7`
comes out as a minor seventh and `V7alt` as a plain dominant seventh.

Figures: a trailing `6` is a first inversion and `64` a second inversion
(`ii6`, `I64`). They move the bass, not the quality.

Chromatic roots: a `b`/`#` prefix is measured against the parallel major
scale. In C major `bVII` is Bb. In A minor `bVI` is plain F, because the
minor scale already has the lowered sixth; an unprefixed `VI` is also F.
*/

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Diatonic triads of a major key.
pub const MAJOR_NUMERALS: [&str; 7] = ["I", "ii", "iii", "IV", "V", "vi", "vii°"];

/// Diatonic triads of a natural-minor key.
pub const MINOR_NUMERALS: [&str; 7] = ["i", "ii°", "III", "iv", "v", "VI", "VII"];

pub const fn diatonic_numerals(mode: Mode) -> [&'static str; 7] {
    match mode {
        Mode::Major => MAJOR_NUMERALS,
        Mode::Minor => MINOR_NUMERALS,
    }
}

/// A decoded roman numeral token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomanNumeral {
    /// Chromatic prefix, `-1` per flat and `+1` per sharp.
    pub accidental: i8,
    /// Scale degree, 1..=7.
    pub degree: usize,
    /// Whether the numeral letters are upper case.
    pub upper: bool,
    /// Everything after the numeral letters.
    pub suffix: String,
}

impl RomanNumeral {
    pub fn parse(token: &str) -> Option<Self> {
        let mut rest = token.trim();
        let mut accidental: i8 = 0;
        while let Some(c) = rest.chars().next() {
            let step = match c {
                'b' | '♭' => -1,
                '#' | '♯' => 1,
                _ => break,
            };
            accidental = accidental.checked_add(step)?;
            rest = &rest[c.len_utf8()..];
        }

        let split = rest
            .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
            .unwrap_or(rest.len());
        let (letters, suffix) = rest.split_at(split);
        let degree = NUMERALS
            .iter()
            .position(|n| n.eq_ignore_ascii_case(letters))?
            + 1;
        let upper = letters.starts_with(['I', 'V']);

        Some(Self {
            accidental,
            degree,
            upper,
            suffix: suffix.to_string(),
        })
    }

    /// Number of inversions written as a figure (`6` or `64`).
    pub fn inversion(&self) -> usize {
        let suffix = self.suffix.as_str();
        if suffix.ends_with("64") {
            2
        } else if suffix.ends_with('6') && !suffix.ends_with("add6") && !suffix.ends_with("m6") {
            1
        } else {
            0
        }
    }

    /// Semitones between the written root and the key's own scale degree.
    pub fn chromatic_offset(&self, mode: Mode) -> i32 {
        if self.accidental == 0 {
            return 0;
        }
        let i = self.degree - 1;
        let lowered = Mode::Major.scale()[i] - mode.scale()[i];
        let accidental = self.accidental as i32;
        if accidental < 0 {
            (accidental + lowered).min(0)
        } else {
            accidental
        }
    }
}

/// Degree (1..=7) named by a roman numeral token, ignoring quality marks.
///
/// Takes no key mode: the numeral letters alone fix the degree, so `III`
/// is 3 in C major and in A minor alike. `None` when the token has no
/// numeral.
pub fn roman_to_degree(token: &str) -> Option<usize> {
    RomanNumeral::parse(token).map(|r| r.degree)
}

/// Spell `degree` as a numeral whose case and suffix encode `quality`.
///
/// `None` uses the diatonic triad of that degree in `mode`.
pub fn degree_to_roman(degree: usize, mode: Mode, quality: Option<ChordQuality>) -> String {
    let degree = degree.max(1);
    let quality = quality.unwrap_or_else(|| diatonic_quality(mode, degree));
    let base = NUMERALS[(degree + 6) % 7];
    let numeral = if quality.is_minor_family() {
        base.to_ascii_lowercase()
    } else {
        base.to_string()
    };
    numeral + roman_suffix(quality)
}

fn roman_suffix(quality: ChordQuality) -> &'static str {
    match quality {
        ChordQuality::Major | ChordQuality::Minor => "",
        ChordQuality::Diminished => "°",
        ChordQuality::Augmented => "+",
        ChordQuality::DominantSeventh | ChordQuality::MinorSeventh => "7",
        ChordQuality::MajorSeventh => "maj7",
        ChordQuality::HalfDiminished => "ø7",
        ChordQuality::DiminishedSeventh => "°7",
        ChordQuality::Suspended2 => "sus2",
        ChordQuality::Suspended4 => "sus4",
        ChordQuality::Add9 => "add9",
        ChordQuality::Sixth | ChordQuality::MinorSixth => "add6",
    }
}

/// Chord quality read from the text of a roman numeral token.
pub fn infer_quality(token: &str) -> ChordQuality {
    if token.contains('°') || token.contains("dim") {
        return ChordQuality::Diminished;
    }
    if token.contains('ø') {
        return ChordQuality::HalfDiminished;
    }
    if token.contains('+') || token.contains("aug") {
        return ChordQuality::Augmented;
    }

    let lower = token.to_lowercase() == token;
    if token.contains('7') {
        return if lower || token.contains("m7") {
            ChordQuality::MinorSeventh
        } else if token.contains("maj7") {
            ChordQuality::MajorSeventh
        } else {
            ChordQuality::DominantSeventh
        };
    }

    if token.contains("sus2") {
        ChordQuality::Suspended2
    } else if token.contains("sus4") {
        ChordQuality::Suspended4
    } else if token.contains("add9") {
        ChordQuality::Add9
    } else if token.contains("add6") {
        if lower {
            ChordQuality::MinorSixth
        } else {
            ChordQuality::Sixth
        }
    } else if lower {
        ChordQuality::Minor
    } else {
        ChordQuality::Major
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_numeral_round_trip() {
        assert_eq!(degree_to_roman(5, Mode::Major, Some(ChordQuality::Major)), "V");
        assert_eq!(roman_to_degree("V"), Some(5));
    }

    #[test]
    fn degrees_survive_every_quality_and_mode() {
        for mode in [Mode::Major, Mode::Minor] {
            for degree in 1..=7 {
                for quality in ChordQuality::ALL {
                    let token = degree_to_roman(degree, mode, Some(quality));
                    assert_eq!(roman_to_degree(&token), Some(degree), "{token}");
                }
            }
        }
    }

    #[test]
    fn written_quality_reads_back() {
        for quality in ChordQuality::ALL {
            // the diminished symbol wins over the seventh
            if quality == ChordQuality::DiminishedSeventh {
                continue;
            }
            let token = degree_to_roman(2, Mode::Major, Some(quality));
            assert_eq!(infer_quality(&token), quality, "{token}");
        }
    }

    #[test]
    fn diatonic_tables_match_default_qualities() {
        for mode in [Mode::Major, Mode::Minor] {
            for (i, numeral) in diatonic_numerals(mode).iter().enumerate() {
                assert_eq!(degree_to_roman(i + 1, mode, None), *numeral);
            }
        }
    }

    #[test]
    fn parses_prefixes_and_suffixes() {
        let r = RomanNumeral::parse("bVIImaj7").unwrap();
        assert_eq!(r.accidental, -1);
        assert_eq!(r.degree, 7);
        assert!(r.upper);
        assert_eq!(r.suffix, "maj7");

        let r = RomanNumeral::parse("viidim").unwrap();
        assert_eq!(r.degree, 7);
        assert!(!r.upper);
        assert_eq!(r.suffix, "dim");

        assert_eq!(roman_to_degree("iv"), Some(4));
        assert_eq!(roman_to_degree("IV7"), Some(4));
        assert_eq!(roman_to_degree("iiim7"), Some(3));
    }

    #[test]
    fn rejects_tokens_without_a_numeral() {
        assert_eq!(roman_to_degree(""), None);
        assert_eq!(roman_to_degree("maj7"), None);
        assert_eq!(roman_to_degree("IIII"), None);
        assert_eq!(roman_to_degree("b"), None);
    }

    #[test]
    fn inference_precedence() {
        assert_eq!(infer_quality("vii°"), ChordQuality::Diminished);
        assert_eq!(infer_quality("viidim"), ChordQuality::Diminished);
        assert_eq!(infer_quality("bIIIdim7"), ChordQuality::Diminished);
        assert_eq!(infer_quality("III+"), ChordQuality::Augmented);
        assert_eq!(infer_quality("ii7"), ChordQuality::MinorSeventh);
        assert_eq!(infer_quality("iim7"), ChordQuality::MinorSeventh);
        assert_eq!(infer_quality("Imaj7"), ChordQuality::MajorSeventh);
        assert_eq!(infer_quality("V7"), ChordQuality::DominantSeventh);
        assert_eq!(infer_quality("V7alt"), ChordQuality::DominantSeventh);
        assert_eq!(infer_quality("vi"), ChordQuality::Minor);
        assert_eq!(infer_quality("IV"), ChordQuality::Major);
        assert_eq!(infer_quality("bVII"), ChordQuality::Major);
    }

    #[test]
    fn lower_case_seventh_wins_over_maj7() {
        assert_eq!(infer_quality("iimaj7"), ChordQuality::MinorSeventh);
    }

    #[test]
    fn figures_mark_inversions() {
        assert_eq!(RomanNumeral::parse("ii6").unwrap().inversion(), 1);
        assert_eq!(RomanNumeral::parse("I64").unwrap().inversion(), 2);
        assert_eq!(RomanNumeral::parse("Iadd6").unwrap().inversion(), 0);
        assert_eq!(RomanNumeral::parse("V").unwrap().inversion(), 0);
        assert_eq!(infer_quality("V6"), ChordQuality::Major);
        assert_eq!(infer_quality("ii6"), ChordQuality::Minor);
    }

    #[test]
    fn chromatic_offsets_follow_the_parallel_major() {
        let flat_seven = RomanNumeral::parse("bVII").unwrap();
        assert_eq!(flat_seven.chromatic_offset(Mode::Major), -1);
        assert_eq!(flat_seven.chromatic_offset(Mode::Minor), 0);

        let flat_two = RomanNumeral::parse("bII").unwrap();
        assert_eq!(flat_two.chromatic_offset(Mode::Minor), -1);

        let sharp_four = RomanNumeral::parse("#iv").unwrap();
        assert_eq!(sharp_four.chromatic_offset(Mode::Major), 1);
    }

    #[test]
    fn degree_is_the_same_in_either_mode() {
        for mode in [Mode::Major, Mode::Minor] {
            for (i, numeral) in diatonic_numerals(mode).iter().enumerate() {
                assert_eq!(roman_to_degree(numeral), Some(i + 1), "{numeral} in {mode:?}");
            }
        }
        assert_eq!(roman_to_degree("III"), roman_to_degree("iii"));
        assert_eq!(roman_to_degree("bVII"), Some(7));
    }
}
