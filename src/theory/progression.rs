use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::theory::chord::{build_chord_in, Chord, DEFAULT_OCTAVE};
use crate::theory::key::Key;
use crate::theory::roman::{infer_quality, RomanNumeral};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Pop,
    Jazz,
    Blues,
    Classical,
    Rock,
    Minor,
}

/// Style used when no template matches a request.
pub const DEFAULT_STYLE: Style = Style::Pop;

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Pop,
        Style::Jazz,
        Style::Blues,
        Style::Classical,
        Style::Rock,
        Style::Minor,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Style::Pop => "pop",
            Style::Jazz => "jazz",
            Style::Blues => "blues",
            Style::Classical => "classical",
            Style::Rock => "rock",
            Style::Minor => "minor",
        }
    }

    pub fn templates(self) -> &'static [ProgressionTemplate] {
        match self {
            Style::Pop => &POP,
            Style::Jazz => &JAZZ,
            Style::Blues => &BLUES,
            Style::Classical => &CLASSICAL,
            Style::Rock => &ROCK,
            Style::Minor => &MINOR,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown progression style: {s}"))
    }
}

/// A named progression written in roman numerals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionTemplate {
    pub numerals: &'static [&'static str],
    pub name: &'static str,
    pub description: &'static str,
    pub style: Style,
    /// Lowest difficulty tier (1..=5) the template is offered at.
    pub difficulty: u8,
    pub reference_tracks: &'static [&'static str],
}

impl ProgressionTemplate {
    pub const fn new(
        numerals: &'static [&'static str],
        name: &'static str,
        style: Style,
        difficulty: u8,
    ) -> Self {
        Self {
            numerals,
            name,
            description: "",
            style,
            difficulty,
            reference_tracks: &[],
        }
    }

    const fn described(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    const fn heard_in(mut self, tracks: &'static [&'static str]) -> Self {
        self.reference_tracks = tracks;
        self
    }

    /// Numerals joined the way answers are written: `I - V - vi - IV`.
    pub fn answer(&self) -> String {
        self.numerals.join(" - ")
    }
}

use Style::{Blues, Classical, Jazz, Minor, Pop, Rock};

pub static POP: [ProgressionTemplate; 10] = [
    ProgressionTemplate::new(&["I", "V", "vi", "IV"], "Canon Progression", Pop, 1)
        .described("The most common pop progression, after Pachelbel's Canon")
        .heard_in(&["Let It Be", "Don't Stop Believin'", "We Are Young"]),
    ProgressionTemplate::new(&["I", "vi", "IV", "V"], "50s Progression", Pop, 1)
        .described("Doo-wop staple of classic oldies")
        .heard_in(&["Stand By Me", "Every Breath You Take"]),
    ProgressionTemplate::new(&["vi", "IV", "I", "V"], "Sad Progression", Pop, 2)
        .described("Starts on the relative minor for a wistful colour")
        .heard_in(&["Someone Like You", "Apologize"]),
    ProgressionTemplate::new(&["I", "IV", "V", "I"], "Basic Three Chords", Pop, 1)
        .described("The simplest complete progression")
        .heard_in(&["La Bamba", "Twist and Shout"]),
    ProgressionTemplate::new(&["I", "V", "IV", "I"], "Blues Rock", Pop, 1)
        .described("Blues-rock turnaround")
        .heard_in(&["Johnny B. Goode", "Rock Around the Clock"]),
    ProgressionTemplate::new(&["vi", "I", "V", "IV"], "Axis Progression", Pop, 2)
        .described("Rotation of the Canon progression common in modern pop")
        .heard_in(&["With or Without You", "Be the One"]),
    ProgressionTemplate::new(&["I", "iii", "vi", "IV"], "Sensitive Progression", Pop, 3)
        .described("Blurs the line between major and minor")
        .heard_in(&["No Woman No Cry"]),
    ProgressionTemplate::new(&["IV", "I", "V", "vi"], "Inverted Canon", Pop, 2)
        .described("Canon variant starting on the subdominant"),
    ProgressionTemplate::new(&["I", "IV", "vi", "V"], "Pop Variant 1", Pop, 2)
        .described("Common pop variant")
        .heard_in(&["Complicated", "Back to December"]),
    ProgressionTemplate::new(&["I", "I", "IV", "V"], "Amen Cadence", Pop, 1)
        .described("Hymn-style approach to the dominant"),
];

pub static JAZZ: [ProgressionTemplate; 10] = [
    ProgressionTemplate::new(&["ii", "V", "I"], "ii-V-I", Jazz, 2)
        .described("The core cadence of jazz harmony")
        .heard_in(&["Autumn Leaves", "All The Things You Are"]),
    ProgressionTemplate::new(&["vi", "ii", "V", "I"], "Extended ii-V-I", Jazz, 3)
        .described("Four-bar extension of the ii-V-I")
        .heard_in(&["Fly Me to the Moon"]),
    ProgressionTemplate::new(&["I", "vi", "ii", "V"], "Turnaround", Jazz, 3)
        .described("Cycling turnaround back to the tonic")
        .heard_in(&["I Got Rhythm"]),
    ProgressionTemplate::new(&["iii", "vi", "ii", "V", "I"], "All The Things", Jazz, 4)
        .described("Long chain of descending fifths")
        .heard_in(&["All The Things You Are"]),
    ProgressionTemplate::new(&["I", "IV", "viidim", "iii"], "Satie Progression", Jazz, 4)
        .described("Impressionist colour"),
    ProgressionTemplate::new(&["ii7", "V7", "Imaj7"], "Seventh ii-V-I", Jazz, 3)
        .described("The ii-V-I with sevenths added"),
    ProgressionTemplate::new(&["iiim7", "vim7", "iim7", "V7"], "Jazz Turnaround", Jazz, 4)
        .described("Turnaround built entirely from seventh chords"),
    ProgressionTemplate::new(&["I", "bIIIdim7", "ii7", "V7"], "Coltrane Variant", Jazz, 5)
        .described("Diminished passing-chord substitution"),
    ProgressionTemplate::new(&["ii7", "V7alt", "Imaj7"], "Altered Dominant", Jazz, 5)
        .described("ii-V-I with an altered dominant"),
    ProgressionTemplate::new(&["iiim7", "VI7", "iim7", "V7"], "Backdoor Progression", Jazz, 4)
        .described("Secondary dominant on the sixth degree"),
];

pub static BLUES: [ProgressionTemplate; 5] = [
    ProgressionTemplate::new(
        &["I", "I", "I", "I", "IV", "IV", "I", "I", "V", "IV", "I", "V"],
        "12-Bar Blues",
        Blues,
        2,
    )
    .described("The foundational blues form")
    .heard_in(&["Sweet Home Chicago", "Crossroads"]),
    ProgressionTemplate::new(&["I", "IV", "I", "V"], "8-Bar Blues", Blues, 2)
        .described("Condensed blues form"),
    ProgressionTemplate::new(&["I7", "IV7", "V7"], "Three Chord Blues", Blues, 1)
        .described("The smallest blues vocabulary"),
    ProgressionTemplate::new(
        &["I7", "I7", "I7", "I7", "IV7", "IV7", "I7", "I7", "V7", "IV7", "I7", "I7"],
        "Quick Change",
        Blues,
        2,
    )
    .described("Dominant-seventh twelve-bar form"),
    ProgressionTemplate::new(
        &["I7", "IV7", "I7", "V7", "IV7", "I7", "iiim7", "V7"],
        "Jazz Blues",
        Blues,
        4,
    )
    .described("Blues with a jazz turnaround"),
];

pub static CLASSICAL: [ProgressionTemplate; 6] = [
    ProgressionTemplate::new(&["I", "IV", "V", "I"], "Authentic Cadence", Classical, 1)
        .described("Tonic, subdominant, dominant, home"),
    ProgressionTemplate::new(&["I", "vi", "IV", "V"], "Plagal Motion", Classical, 2)
        .described("Church-style motion through the submediant"),
    ProgressionTemplate::new(&["I", "V", "vi", "IV"], "Deceptive Cadence", Classical, 3)
        .described("The dominant resolves to vi instead of I"),
    ProgressionTemplate::new(&["I", "ii6", "V", "I"], "Second Chord Progression", Classical, 3)
        .described("Predominant ii in first inversion"),
    ProgressionTemplate::new(&["I", "V6", "vi", "IV6"], "First Inversion", Classical, 4)
        .described("Smooth bass line through inversions"),
    ProgressionTemplate::new(&["I", "I6", "IV", "V6", "I"], "Classical Sequence", Classical, 4)
        .described("Stepwise bass under a classical phrase"),
];

pub static ROCK: [ProgressionTemplate; 4] = [
    ProgressionTemplate::new(&["I", "bVII", "bVI", "V"], "Andalusian Cadence", Rock, 3)
        .described("Descending rock and metal staple")
        .heard_in(&["Hit the Road Jack", "Sultans of Swing"]),
    ProgressionTemplate::new(&["I", "bVII", "IV", "I"], "Mixolydian Rock", Rock, 2)
        .described("Modal rock with a flat seventh")
        .heard_in(&["Sweet Child O' Mine"]),
    ProgressionTemplate::new(&["i", "bVI", "bIII", "bVII"], "Minor Rock", Rock, 3)
        .described("Dark minor-key rock")
        .heard_in(&["All Along the Watchtower"]),
    ProgressionTemplate::new(
        &["I", "V", "vi", "iii", "IV", "I", "IV", "V"],
        "Epic Progression",
        Rock,
        3,
    )
    .described("Long-form anthem progression")
    .heard_in(&["Earth Song"]),
];

pub static MINOR: [ProgressionTemplate; 5] = [
    ProgressionTemplate::new(&["i", "VI", "III", "VII"], "Minor Progression 1", Minor, 2)
        .described("Classic minor-key loop")
        .heard_in(&["Zombie", "Shadow of the Day"]),
    ProgressionTemplate::new(&["i", "iv", "VII", "III"], "Minor Progression 2", Minor, 2)
        .described("Common minor-key loop"),
    ProgressionTemplate::new(&["i", "bVI", "bIII", "bVII"], "Natural Minor", Minor, 2)
        .described("Natural minor sequence"),
    ProgressionTemplate::new(&["i", "iv", "V", "i"], "Harmonic Minor", Minor, 3)
        .described("Major dominant borrowed from harmonic minor"),
    ProgressionTemplate::new(&["i", "VI", "v", "iv"], "Andalusian Minor", Minor, 4)
        .described("Flamenco colour"),
];

/// Every template in the library.
pub fn all_templates() -> impl Iterator<Item = &'static ProgressionTemplate> {
    Style::ALL.into_iter().flat_map(|s| s.templates().iter())
}

/// Pick a template uniformly among `styles` at or below `difficulty`.
///
/// Falls back to the whole default-style list when nothing matches.
pub fn get_random_progression(difficulty: u8, styles: &[Style]) -> &'static ProgressionTemplate {
    get_random_progression_with(&mut fastrand::Rng::new(), difficulty, styles)
}

/// Seeded variant of [`get_random_progression`].
pub fn get_random_progression_with(
    rng: &mut fastrand::Rng,
    difficulty: u8,
    styles: &[Style],
) -> &'static ProgressionTemplate {
    let candidates: Vec<&'static ProgressionTemplate> = styles
        .iter()
        .flat_map(|s| s.templates().iter())
        .filter(|t| t.difficulty <= difficulty)
        .collect();

    if candidates.is_empty() {
        let fallback = DEFAULT_STYLE.templates();
        return &fallback[rng.usize(..fallback.len())];
    }
    candidates[rng.usize(..candidates.len())]
}

/// A template realised in a key.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltProgression {
    pub key: &'static Key,
    pub name: &'static str,
    pub numerals: Vec<&'static str>,
    pub chords: Vec<Chord>,
    pub difficulty: u8,
}

impl BuiltProgression {
    pub fn answer(&self) -> String {
        self.numerals.join(" - ")
    }
}

/// Realise every numeral of `template` in `key_name`, in order.
///
/// `None` for an unknown key or a token without a numeral.
pub fn build_progression(
    key_name: &str,
    template: &ProgressionTemplate,
) -> Option<BuiltProgression> {
    let key = Key::lookup(key_name)?;
    let chords = template
        .numerals
        .iter()
        .map(|token| chord_for_token(key, token))
        .collect::<Option<Vec<_>>>()?;

    Some(BuiltProgression {
        key,
        name: template.name,
        numerals: template.numerals.to_vec(),
        chords,
        difficulty: template.difficulty,
    })
}

fn chord_for_token(key: &Key, token: &str) -> Option<Chord> {
    let numeral = RomanNumeral::parse(token)?;
    let quality = infer_quality(token);
    let offset = numeral.chromatic_offset(key.mode);

    let chord = if offset == 0 {
        build_chord_in(key, numeral.degree, Some(quality))?
    } else {
        let root = key.degree_root(numeral.degree).alter(offset as i8);
        Chord::from_root(root, quality, DEFAULT_OCTAVE)
    };

    Some(chord.inverted(numeral.inversion()).with_roman(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::chord::ChordQuality;

    #[test]
    fn canon_in_c() {
        let template = ProgressionTemplate::new(&["I", "V", "vi", "IV"], "test", Style::Pop, 1);
        let built = build_progression("C", &template).unwrap();

        let roots: Vec<_> = built.chords.iter().map(|c| c.root.to_string()).collect();
        assert_eq!(roots, vec!["C", "G", "A", "F"]);
        assert_eq!(built.chords[2].quality, ChordQuality::Minor);
        assert_eq!(built.chords[2].name, "Am");
        assert_eq!(built.answer(), "I - V - vi - IV");
    }

    #[test]
    fn tokens_keep_their_order_and_labels() {
        let built = build_progression("G", &JAZZ[5]).unwrap();
        let labels: Vec<_> = built.chords.iter().map(|c| c.roman_numeral.as_str()).collect();
        assert_eq!(labels, vec!["ii7", "V7", "Imaj7"]);
        let names: Vec<_> = built.chords.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Am7", "D7", "Gmaj7"]);
    }

    #[test]
    fn every_template_builds_in_every_key() {
        for template in all_templates() {
            for key in Key::all() {
                let built = build_progression(key.name, template)
                    .unwrap_or_else(|| panic!("{} in {}", template.name, key.name));
                assert_eq!(built.chords.len(), template.numerals.len());
            }
        }
    }

    #[test]
    fn unknown_key_has_no_progression() {
        assert!(build_progression("H#", &POP[0]).is_none());
    }

    #[test]
    fn borrowed_chords_in_major_and_minor() {
        let rock = build_progression("C", &ROCK[0]).unwrap();
        let names: Vec<_> = rock.chords.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "Bb", "Ab", "G"]);

        let minor = build_progression("Am", &MINOR[2]).unwrap();
        let names: Vec<_> = minor.chords.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Am", "F", "C", "G"]);
    }

    #[test]
    fn dominant_in_minor_is_major() {
        let built = build_progression("Am", &MINOR[3]).unwrap();
        assert_eq!(built.chords[2].name, "E");
        assert_eq!(built.chords[2].quality, ChordQuality::Major);
    }

    #[test]
    fn figures_invert_the_chord() {
        let built = build_progression("C", &CLASSICAL[3]).unwrap();
        let ii6 = &built.chords[1];
        assert_eq!(ii6.name, "Dm");
        // D F A with D moved up: F A D
        assert_eq!(ii6.midi_notes, vec![65, 69, 74]);
    }

    #[test]
    fn selection_respects_style_and_tier() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let t = get_random_progression_with(&mut rng, 1, &[Style::Pop]);
            assert_eq!(t.style, Style::Pop);
            assert!(t.difficulty <= 1);
        }
        for _ in 0..200 {
            let t = get_random_progression_with(&mut rng, 3, &[Style::Jazz, Style::Rock]);
            assert!(matches!(t.style, Style::Jazz | Style::Rock));
            assert!(t.difficulty <= 3);
        }
    }

    #[test]
    fn empty_candidates_fall_back_to_pop() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..50 {
            let t = get_random_progression_with(&mut rng, 1, &[Style::Jazz]);
            assert_eq!(t.style, DEFAULT_STYLE);
        }
        let t = get_random_progression(5, &[]);
        assert_eq!(t.style, DEFAULT_STYLE);
    }

    #[test]
    fn styles_parse_case_insensitively() {
        assert_eq!("Jazz".parse::<Style>(), Ok(Style::Jazz));
        assert!("polka".parse::<Style>().is_err());
    }
}
