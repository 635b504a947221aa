use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Oscillator Node
===============

The sound source of every voice. By default it follows the voice's pitch
(`ctx.frequency`); the builders reshape that pitch and its loudness:

  with_ratio(r)       play r × the voice pitch. Additive voices stack a few
                      of these: ratio 2 is the octave, 3 the twelfth.

  with_frequency(hz)  ignore the voice pitch entirely (metronome clicks).

  with_detune(c)      shift by c cents (100 cents = 1 semitone). Two saws at
                      ±5 cents beat against each other and sound "wide".

  with_level(l)       scale the output. Partials use this for their weights.

The final pitch of each block is

    frequency = base × ratio × 2^(detune / 1200) + offset

where `offset` is an extra shift in Hz that only modulation touches. An LFO
on `OscParam::Offset` is how the organ gets its vibrato:

    OscNode::sine()
        .with_ratio(2.0)
        .modulate(LfoNode::sine(5.0), OscParam::Offset, 3.0)

Waveforms:

  sine       fundamental only. Pure, flute-like.
  sawtooth   every harmonic at 1/n. Bright, the basis of strings and leads.
  square     odd harmonics at 1/n. Hollow.
  triangle   odd harmonics at 1/n². Soft, close to a sine with a little edge.
  noise      no pitch at all.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency in Hz. When set, the voice pitch is ignored.
    base_frequency: Option<f32>,
    current_frequency: f32,
    ratio: f32,
    detune_cents: f32,
    offset_hz: f32,
    level: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscParam {
    /// Fixed frequency in Hz (only meaningful with `with_frequency`)
    Frequency,
    /// Detune in cents
    Detune,
    /// Additive pitch shift in Hz
    Offset,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            current_frequency: 440.0,
            ratio: 1.0,
            detune_cents: 0.0,
            offset_hz: 0.0,
            level: 1.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self.current_frequency = freq;
        self
    }

    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio.max(0.0);
        self
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    /// Frequency this node would play for `ctx`.
    pub fn frequency_for(&self, ctx: &RenderCtx) -> f32 {
        let base = match self.base_frequency {
            Some(_) => self.current_frequency,
            None => ctx.frequency,
        };

        let mut freq = base * self.ratio;
        if self.detune_cents != 0.0 {
            freq *= 2.0_f32.powf(self.detune_cents / 1200.0);
        }
        (freq + self.offset_hz).max(0.0)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let shifted = RenderCtx {
            frequency: self.frequency_for(ctx),
            ..*ctx
        };
        self.osc.render(out, &shifted);

        if self.level != 1.0 {
            for sample in out.iter_mut() {
                *sample *= self.level;
            }
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        if let Some(base) = self.base_frequency {
            self.current_frequency = base;
        }
        self.osc.reset();
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(440.0),
            OscParam::Detune => self.detune_cents,
            OscParam::Offset => 0.0,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                self.current_frequency = (base + modulation).clamp(20.0, 20_000.0);
            }
            OscParam::Detune => {
                self.detune_cents = (base + modulation).clamp(-200.0, 200.0);
            }
            OscParam::Offset => {
                self.offset_hz = base + modulation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn sine_tracks_the_note() {
        let ctx = RenderCtx::from_note(SAMPLE_RATE, 69, 1.0);
        let mut osc = OscNode::sine();

        let mut buffer = vec![0.0f32; 128];
        osc.render_block(&mut buffer, &ctx);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / SAMPLE_RATE).sin();
        assert!((buffer[n] - expected).abs() < 1e-4);
    }

    #[test]
    fn ratio_detune_and_fixed_frequency() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 220.0, 1.0);

        assert!((OscNode::sine().with_ratio(3.0).frequency_for(&ctx) - 660.0).abs() < 1e-3);
        assert!((OscNode::sine().with_detune(1200.0).frequency_for(&ctx) - 440.0).abs() < 1e-2);
        assert!((OscNode::sine().with_frequency(1_000.0).frequency_for(&ctx) - 1_000.0).abs() < 1e-3);
    }

    #[test]
    fn offset_modulation_shifts_in_hertz() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0);
        let mut osc = OscNode::sine().with_ratio(2.0);
        osc.apply_modulation(OscParam::Offset, 0.0, 3.0);
        assert!((osc.frequency_for(&ctx) - 883.0).abs() < 1e-3);

        osc.apply_modulation(OscParam::Offset, 0.0, -3.0);
        assert!((osc.frequency_for(&ctx) - 877.0).abs() < 1e-3);
    }

    #[test]
    fn level_scales_output() {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, 1_000.0, 1.0);
        let mut quiet = OscNode::sine().with_level(0.25);
        let mut buffer = vec![0.0f32; 480];
        quiet.render_block(&mut buffer, &ctx);

        let peak = buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 0.25).abs() < 0.01);
    }
}
