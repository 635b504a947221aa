//! Engine settings.
//!
//! Every numeric setting has a documented range and is clamped into it on
//! the way in, so an `EngineConfig` held by the engine is always playable.

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::voices::Instrument;

pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const EFFECT_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const BPM_RANGE: RangeInclusive<f32> = 40.0..=200.0;
pub const RATE_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// Longest attack, decay or release accepted, in seconds.
pub const MAX_STAGE_SECONDS: f32 = 10.0;

/// Amplitude envelope applied to the piano voice.
///
/// `sustain` is a fraction of the voice's peak level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.02,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
        }
    }
}

impl EnvelopeConfig {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        let stage = 0.0..=MAX_STAGE_SECONDS;
        Self {
            attack: clamp_to(self.attack, &stage),
            decay: clamp_to(self.decay, &stage),
            sustain: clamp_to(self.sustain, &(0.0..=1.0)),
            release: clamp_to(self.release, &stage),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub instrument: Instrument,
    /// Output gain applied to every voice, 0.0 to 1.0.
    pub master_volume: f32,
    /// Reverb send, 0.0 (dry) to 1.0 (fully wet).
    pub effect_amount: f32,
    /// Beats per minute, 40 to 200.
    pub bpm: f32,
    /// Tempo multiplier, 0.5 to 2.0.
    pub playback_rate: f32,
    pub envelope: EnvelopeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instrument: Instrument::Piano,
            master_volume: 0.7,
            effect_amount: 0.3,
            bpm: 90.0,
            playback_rate: 1.0,
            envelope: EnvelopeConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instrument(mut self, instrument: Instrument) -> Self {
        self.instrument = instrument;
        self
    }

    pub fn master_volume(mut self, volume: f32) -> Self {
        self.master_volume = clamp_to(volume, &VOLUME_RANGE);
        self
    }

    pub fn effect_amount(mut self, amount: f32) -> Self {
        self.effect_amount = clamp_to(amount, &EFFECT_RANGE);
        self
    }

    pub fn bpm(mut self, bpm: f32) -> Self {
        self.bpm = clamp_to(bpm, &BPM_RANGE);
        self
    }

    pub fn playback_rate(mut self, rate: f32) -> Self {
        self.playback_rate = clamp_to(rate, &RATE_RANGE);
        self
    }

    pub fn envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope.clamped();
        self
    }

    /// Pull every field back into its range. Useful after deserializing.
    pub fn clamped(self) -> Self {
        Self {
            instrument: self.instrument,
            master_volume: clamp_to(self.master_volume, &VOLUME_RANGE),
            effect_amount: clamp_to(self.effect_amount, &EFFECT_RANGE),
            bpm: clamp_to(self.bpm, &BPM_RANGE),
            playback_rate: clamp_to(self.playback_rate, &RATE_RANGE),
            envelope: self.envelope.clamped(),
        }
    }
}

/// Clamp into `range`; NaN falls to the lower bound.
pub(crate) fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.instrument, Instrument::Piano);
        assert_eq!(config.master_volume, 0.7);
        assert_eq!(config.effect_amount, 0.3);
        assert_eq!(config.bpm, 90.0);
        assert_eq!(config.playback_rate, 1.0);
        assert_eq!(config.envelope, EnvelopeConfig::new(0.02, 0.1, 0.7, 0.3));
    }

    #[test]
    fn builders_clamp() {
        let config = EngineConfig::new()
            .master_volume(1.5)
            .effect_amount(-0.2)
            .bpm(400.0)
            .playback_rate(0.1);

        assert_eq!(config.master_volume, 1.0);
        assert_eq!(config.effect_amount, 0.0);
        assert_eq!(config.bpm, 200.0);
        assert_eq!(config.playback_rate, 0.5);
    }

    #[test]
    fn clamped_repairs_raw_fields() {
        let raw = EngineConfig {
            bpm: 10.0,
            master_volume: f32::NAN,
            envelope: EnvelopeConfig {
                attack: -1.0,
                decay: 0.1,
                sustain: 3.0,
                release: 99.0,
            },
            ..EngineConfig::default()
        };

        let fixed = raw.clamped();
        assert_eq!(fixed.bpm, 40.0);
        assert_eq!(fixed.master_volume, 0.0);
        assert_eq!(fixed.envelope.attack, 0.0);
        assert_eq!(fixed.envelope.sustain, 1.0);
        assert_eq!(fixed.envelope.release, MAX_STAGE_SECONDS);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"instrument":"organ","bpm":120.0}"#).unwrap();
        assert_eq!(config.instrument, Instrument::Organ);
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.master_volume, 0.7);
    }
}
