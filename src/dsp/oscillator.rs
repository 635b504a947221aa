use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Oscillator Core
===============

Phase runs from 0.0 to 1.0 and wraps once per cycle:

    phase += frequency / sample_rate

Each waveform is a function of phase:

    sine      sin(2π · phase)
    saw       2 · phase - 1               (rises, then drops at the wrap)
    square    +1 for phase < 0.5, else -1
    triangle  rises 0 → 1 → 0 → -1 → 0 across one cycle
    noise     uniform random in [-1, 1], phase ignored

Aliasing and PolyBLEP
---------------------
The saw and square jump instantly. A jump contains energy at every frequency,
and everything above Nyquist folds back down as inharmonic noise. PolyBLEP
("polynomial band-limited step") smooths the two samples around each jump with
a small quadratic correction:

    t < dt:        t/dt = x      correction = 2x - x² - 1
    t > 1 - dt:    (t-1)/dt = x  correction = x² + 2x + 1

where dt = frequency / sample_rate. The saw subtracts the correction at its
wrap; the square adds it at the rising edge and subtracts it at the falling
edge (phase 0.5). Sine and triangle have no jumps and need nothing.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    rng: fastrand::Rng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: fastrand::Rng::with_seed(0x5EED),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    /// Reseed the noise source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Produce one sample at `frequency` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let dt = (frequency / sample_rate).clamp(0.0, 0.5);
        let t = self.phase;

        let sample = match self.waveform {
            OscillatorWaveform::Sine => (TAU * t).sin(),
            OscillatorWaveform::Saw => 2.0 * t - 1.0 - poly_blep(t, dt),
            OscillatorWaveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, dt) - poly_blep((t + 0.5).fract(), dt)
            }
            OscillatorWaveform::Triangle => 4.0 * ((t + 0.75).fract() - 0.5).abs() - 1.0,
            OscillatorWaveform::Noise => self.rng.f32() * 2.0 - 1.0,
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Fill `out` with the waveform at `ctx.frequency`.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(ctx.frequency, ctx.sample_rate);
        }
    }
}

/// Two-sample polynomial residual of a unit step at phase 0.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn render(mut osc: OscillatorBlock, frequency: f32, len: usize) -> Vec<f32> {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, frequency, 1.0);
        let mut buffer = vec![0.0; len];
        osc.render(&mut buffer, &ctx);
        buffer
    }

    #[test]
    fn sine_matches_closed_form() {
        let buffer = render(OscillatorBlock::sine(), 440.0, 64);
        for (n, sample) in buffer.iter().enumerate() {
            let expected = (TAU * 440.0 * n as f32 / SAMPLE_RATE).sin();
            assert!((sample - expected).abs() < 1e-4, "sample {n}");
        }
    }

    #[test]
    fn waveforms_stay_in_range() {
        for osc in [
            OscillatorBlock::sawtooth(),
            OscillatorBlock::square(),
            OscillatorBlock::triangle(),
            OscillatorBlock::noise(),
        ] {
            let kind = osc.waveform();
            let buffer = render(osc, 1_234.5, 4_800);
            assert!(
                buffer.iter().all(|s| s.abs() <= 1.0 + 1e-4),
                "{kind:?} out of range"
            );
            assert!(buffer.iter().any(|s| s.abs() > 0.5), "{kind:?} silent");
        }
    }

    #[test]
    fn saw_has_no_dc_offset() {
        // 480 Hz at 48 kHz is exactly 100 samples per cycle
        let buffer = render(OscillatorBlock::sawtooth(), 480.0, 4_800);
        let mean = buffer.iter().sum::<f32>() / buffer.len() as f32;
        assert!(mean.abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn polyblep_softens_the_saw_reset() {
        let dt = 1_000.0 / SAMPLE_RATE;
        // right after the wrap the naive saw sits at -1; blep pulls it up
        let corrected = 2.0 * (dt * 0.5) - 1.0 - poly_blep(dt * 0.5, dt);
        assert!(corrected > -0.9);
        assert_eq!(poly_blep(0.5, dt), 0.0);
    }

    #[test]
    fn triangle_starts_at_zero_and_peaks_at_quarter() {
        // 12 kHz at 48 kHz: four samples per cycle
        let buffer = render(OscillatorBlock::triangle(), 12_000.0, 4);
        assert!(buffer[0].abs() < 1e-6);
        assert!((buffer[1] - 1.0).abs() < 1e-6);
        assert!((buffer[3] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn seeded_noise_is_repeatable() {
        let a = render(OscillatorBlock::noise().with_seed(9), 0.0, 32);
        let b = render(OscillatorBlock::noise().with_seed(9), 0.0, 32);
        assert_eq!(a, b);
    }
}
