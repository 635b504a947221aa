use crate::theory::chord::ChordQuality;
use crate::theory::key::Key;
use crate::theory::progression::Style;

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 5;

/// What a difficulty tier unlocks.
#[derive(Debug, PartialEq, Eq)]
pub struct DifficultyLevel {
    pub tier: u8,
    pub name: &'static str,
    pub description: &'static str,
    /// Chord qualities heard at this tier. `None` means all of them.
    pub qualities: Option<&'static [ChordQuality]>,
    pub progression_lengths: &'static [usize],
    /// Keys offered at this tier. `None` means all 24.
    pub keys: Option<&'static [&'static str]>,
    pub styles: &'static [Style],
}

pub static LEVELS: [DifficultyLevel; 5] = [
    DifficultyLevel {
        tier: 1,
        name: "Beginner",
        description: "Major and minor triads, I-IV-V",
        qualities: Some(&[ChordQuality::Major, ChordQuality::Minor]),
        progression_lengths: &[2, 4],
        keys: Some(&["C", "G", "F", "Am", "Em"]),
        styles: &[Style::Pop],
    },
    DifficultyLevel {
        tier: 2,
        name: "Intermediate",
        description: "Common pop progressions",
        qualities: Some(&[
            ChordQuality::Major,
            ChordQuality::Minor,
            ChordQuality::DominantSeventh,
        ]),
        progression_lengths: &[4],
        keys: Some(&["C", "G", "D", "A", "F", "Am", "Em", "Dm"]),
        styles: &[Style::Pop, Style::Blues],
    },
    DifficultyLevel {
        tier: 3,
        name: "Advanced",
        description: "Seventh chords and jazz basics",
        qualities: Some(&[
            ChordQuality::Major,
            ChordQuality::Minor,
            ChordQuality::DominantSeventh,
            ChordQuality::MajorSeventh,
            ChordQuality::MinorSeventh,
        ]),
        progression_lengths: &[4, 8],
        keys: None,
        styles: &[Style::Pop, Style::Jazz, Style::Blues],
    },
    DifficultyLevel {
        tier: 4,
        name: "Expert",
        description: "Extended chords and borrowed harmony",
        qualities: None,
        progression_lengths: &[4, 8, 12],
        keys: None,
        styles: &[
            Style::Pop,
            Style::Jazz,
            Style::Blues,
            Style::Classical,
            Style::Rock,
        ],
    },
    DifficultyLevel {
        tier: 5,
        name: "Master",
        description: "Everything, in long sequences",
        qualities: None,
        progression_lengths: &[8, 12, 16],
        keys: None,
        styles: &Style::ALL,
    },
];

/// Level for `tier`, clamped to 1..=5.
pub fn level(tier: u8) -> &'static DifficultyLevel {
    &LEVELS[(tier.clamp(MIN_TIER, MAX_TIER) - 1) as usize]
}

impl DifficultyLevel {
    pub fn allows_quality(&self, quality: ChordQuality) -> bool {
        self.qualities.map_or(true, |q| q.contains(&quality))
    }

    /// Keys offered at this tier.
    pub fn keys(&self) -> Vec<&'static Key> {
        match self.keys {
            Some(names) => names.iter().filter_map(|n| Key::lookup(n)).collect(),
            None => Key::all().collect(),
        }
    }
}

/// Uniformly pick a key offered at `tier`.
pub fn random_key(tier: u8, rng: &mut fastrand::Rng) -> &'static Key {
    let keys = level(tier).keys();
    match rng.choice(keys) {
        Some(key) => key,
        None => &crate::theory::key::MAJOR_KEYS[0],
    }
}
