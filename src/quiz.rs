//! Question generators for ear-training drills.
//!
//! Everything here is pure: a generator takes a difficulty tier and an rng
//! and returns the chords to play together with the expected answer and the
//! choices to offer. Playing the chords and keeping score is up to the
//! caller.

use crate::theory::chord::{chord_by_name, Chord, ChordQuality, DEFAULT_OCTAVE};
use crate::theory::difficulty::random_key;
use crate::theory::key::{Key, Mode};
use crate::theory::progression::{
    build_progression, get_random_progression_with, BuiltProgression, Style,
};
use crate::theory::roman::{diatonic_numerals, MAJOR_NUMERALS, MINOR_NUMERALS};

/// Number of choices offered for progression and key questions.
pub const OPTION_COUNT: usize = 6;

/// Chord qualities drilled by [`chord_question`], easiest first.
pub const DRILL_QUALITIES: [ChordQuality; 6] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
    ChordQuality::DominantSeventh,
    ChordQuality::MajorSeventh,
];

const MAX_FILL_ATTEMPTS: usize = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionQuestion {
    pub progression: BuiltProgression,
    /// Numerals joined as `I - V - vi - IV`.
    pub answer: String,
    /// Shuffled; contains `answer` exactly once.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChordQuestion {
    pub key: &'static Key,
    pub chord: Chord,
    pub answer: ChordQuality,
    pub options: Vec<ChordQuality>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyQuestion {
    pub progression: BuiltProgression,
    pub answer: &'static str,
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictationQuestion {
    pub progression: BuiltProgression,
    pub answer: Vec<&'static str>,
    /// Numerals the listener can pick from, in display order.
    pub candidates: Vec<&'static str>,
}

impl DictationQuestion {
    /// Same length and the same numeral in every slot.
    pub fn check(&self, given: &[&str]) -> bool {
        given.len() == self.answer.len() && given.iter().zip(&self.answer).all(|(g, a)| g == a)
    }
}

/// A fixed set of named chords to tell apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: u8,
    pub names: &'static [&'static str],
    pub chords: Vec<Chord>,
}

impl Lesson {
    pub fn random_chord(&self, rng: &mut fastrand::Rng) -> Option<&Chord> {
        if self.chords.is_empty() {
            return None;
        }
        self.chords.get(rng.usize(..self.chords.len()))
    }
}

static LESSONS: [&[&str]; 3] = [
    &["C", "F", "G"],
    &["Am", "Dm", "Em"],
    &["C", "F", "G", "Am", "Dm", "Em"],
];

/// Lesson `id` (1-based). `None` past the last lesson.
pub fn lesson(id: u8) -> Option<Lesson> {
    let names = *LESSONS.get(usize::from(id).checked_sub(1)?)?;
    let chords = names
        .iter()
        .map(|name| chord_by_name(name, DEFAULT_OCTAVE))
        .collect::<Option<Vec<_>>>()?;
    Some(Lesson { id, names, chords })
}

/// Name the progression: a template of `styles` at `tier`, in a key of the
/// tier, with five distractors.
///
/// `None` only if the chosen template fails to build.
pub fn progression_question(
    tier: u8,
    styles: &[Style],
    rng: &mut fastrand::Rng,
) -> Option<ProgressionQuestion> {
    let key = random_key(tier, rng);
    let template = get_random_progression_with(rng, tier, styles);
    let progression = build_progression(key.name, template)?;
    let answer = progression.answer();

    let mut options = vec![answer.clone()];
    let mut pool: Vec<String> = styles
        .iter()
        .flat_map(|s| s.templates().iter())
        .map(|t| t.answer())
        .collect();
    rng.shuffle(&mut pool);
    for candidate in pool {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }

    let len = progression.numerals.len();
    for _ in 0..MAX_FILL_ATTEMPTS {
        if options.len() == OPTION_COUNT {
            break;
        }
        let candidate = random_numerals(len, rng).join(" - ");
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }

    rng.shuffle(&mut options);
    Some(ProgressionQuestion {
        progression,
        answer,
        options,
    })
}

/// Name the quality of a chord rooted on a scale note of a key of the tier.
///
/// Higher tiers unlock more qualities, two more than the tier number.
pub fn chord_question(tier: u8, rng: &mut fastrand::Rng) -> ChordQuestion {
    let key = random_key(tier, rng);
    let available = (usize::from(tier) + 2).min(DRILL_QUALITIES.len());
    let options = DRILL_QUALITIES[..available].to_vec();
    let answer = options[rng.usize(..options.len())];
    let root = key.notes[rng.usize(..key.notes.len())];

    ChordQuestion {
        key,
        chord: Chord::from_root(root, answer, DEFAULT_OCTAVE),
        answer,
        options,
    }
}

/// Name the key a pop progression is played in.
pub fn key_question(tier: u8, rng: &mut fastrand::Rng) -> Option<KeyQuestion> {
    let key = random_key(tier, rng);
    let template = get_random_progression_with(rng, tier, &[Style::Pop]);
    let progression = build_progression(key.name, template)?;

    let mut others: Vec<&'static str> = Key::all()
        .map(|k| k.name)
        .filter(|name| *name != key.name)
        .collect();
    rng.shuffle(&mut others);

    let mut options = vec![key.name];
    options.extend(others.into_iter().take(OPTION_COUNT - 1));
    rng.shuffle(&mut options);

    Some(KeyQuestion {
        progression,
        answer: key.name,
        options,
    })
}

/// Write down a progression numeral by numeral.
pub fn dictation_question(
    tier: u8,
    styles: &[Style],
    rng: &mut fastrand::Rng,
) -> Option<DictationQuestion> {
    let key = random_key(tier, rng);
    let template = get_random_progression_with(rng, tier, styles);
    let progression = build_progression(key.name, template)?;

    let mut candidates: Vec<&'static str> = Vec::with_capacity(14);
    for numeral in MAJOR_NUMERALS.into_iter().chain(MINOR_NUMERALS) {
        if !candidates.contains(&numeral) {
            candidates.push(numeral);
        }
    }

    Some(DictationQuestion {
        answer: progression.numerals.clone(),
        progression,
        candidates,
    })
}

/// Compare two answers ignoring whitespace, so `I-V-vi-IV` matches
/// `I - V - vi - IV`.
pub fn check_answer(expected: &str, given: &str) -> bool {
    let squeeze = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    !given.trim().is_empty() && squeeze(expected) == squeeze(given)
}

/// `len` diatonic numerals of a randomly chosen mode.
fn random_numerals(len: usize, rng: &mut fastrand::Rng) -> Vec<&'static str> {
    let mode = if rng.bool() { Mode::Minor } else { Mode::Major };
    let numerals = diatonic_numerals(mode);
    (0..len).map(|_| numerals[rng.usize(..numerals.len())]).collect()
}
