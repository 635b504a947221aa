#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Musical note duration represented as a rational fraction of a whole note.
/// All operations preserve exact ratios; a quarter note is one beat.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Numerator: how many parts
    pub numerator: u32,
    /// Denominator: of what size (4 = quarter, 8 = eighth, etc.)
    pub denominator: u32,
}

impl Duration {
    pub const WHOLE: Duration = Duration {
        numerator: 1,
        denominator: 1,
    };
    pub const HALF: Duration = Duration {
        numerator: 1,
        denominator: 2,
    };
    pub const QUARTER: Duration = Duration {
        numerator: 1,
        denominator: 4,
    };
    pub const EIGHTH: Duration = Duration {
        numerator: 1,
        denominator: 8,
    };

    pub const DOTTED_HALF: Duration = Duration::HALF.dotted();
    pub const DOTTED_QUARTER: Duration = Duration::QUARTER.dotted();

    /// Whole number of beats (quarter notes).
    pub const fn beats_of(beats: u32) -> Self {
        Duration {
            numerator: beats,
            denominator: 4,
        }
        .reduce()
    }

    /// Apply a dot: multiply duration by 3/2
    pub const fn dotted(self) -> Self {
        Duration {
            numerator: self.numerator * 3,
            denominator: self.denominator * 2,
        }
    }

    /// Double the duration
    pub const fn double(self) -> Self {
        Duration {
            numerator: self.numerator * 2,
            denominator: self.denominator,
        }
    }

    /// Reduce the fraction to lowest terms using GCD
    pub const fn reduce(self) -> Self {
        let gcd = const_gcd(self.numerator, self.denominator);
        if gcd == 0 {
            return self;
        }
        Duration {
            numerator: self.numerator / gcd,
            denominator: self.denominator / gcd,
        }
    }

    /// Add two durations (finds common denominator)
    pub const fn add(self, other: Self) -> Self {
        Duration {
            numerator: self.numerator * other.denominator + other.numerator * self.denominator,
            denominator: self.denominator * other.denominator,
        }
        .reduce()
    }

    /// Length in beats, where a quarter note is one beat.
    pub fn beats(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.numerator as f64 * 4.0 / self.denominator as f64
    }

    /// Wall-clock length at `bpm`, scaled by a playback-rate multiplier.
    ///
    /// seconds = beats * 60 / bpm / rate
    pub fn seconds(&self, bpm: f32, rate: f32) -> f64 {
        if bpm <= 0.0 || rate <= 0.0 {
            return 0.0;
        }
        self.beats() * 60.0 / bpm as f64 / rate as f64
    }
}

/// Compute greatest common divisor (Euclidean algorithm)
const fn const_gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}
