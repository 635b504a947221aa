use crate::{graph::node::RenderCtx, MIN_TIME};

/*
ADSR Envelope
=============

An envelope turns a gate (note held / note released) into a gain curve that
shapes a voice over time.

  level     Current output, 0.0 up to `peak`.
  peak      Level reached at the end of attack. Voices use it to set their
            loudness (a piano peaks at 0.8, a pad at 0.15).
  sustain   Fraction of `peak` held while the gate stays high.
  stage     Idle, Attack, Decay, Sustain or Release.


The Shape
---------

  Level
   peak ┐     ╱╲
        │    ╱  ╲___________
  S·peak│   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
         A    D      S         R

Attack is always a straight ramp. Decay and release follow the chosen curve:

  Linear        level moves by a fixed step each sample and lands exactly
                on the target after the stage time.

  Exponential   level closes a fixed FRACTION of the remaining distance each
                sample. The fraction is chosen so that the distance shrinks
                by 60 dB (a factor of 1000) over the stage time:

                    coef = 0.001 ^ (1 / (time · sample_rate))
                    level = target + (level - target) · coef

                Plucked and struck strings die away like this. The curve
                never lands exactly, so decay hands over to sustain once it
                is within 0.1% of peak, and release stops after its time.


State Machine
-------------

    Idle ──note_on──→ Attack ──level=peak──→ Decay ──level≈S──→ Sustain
      ↑                  │                     │                   │
      │                  └──────note_off───────┴──────note_off─────┘
      │                                        ↓
      └────────────elapsed ≥ release──────── Release

note_off releases from the CURRENT level, whatever the stage. A note shorter
than its attack never clicks because release starts from wherever the ramp
had reached.
*/

/// Decay and release curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeCurve {
    #[default]
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Distance an exponential segment covers over its stage time (-60 dB).
const EXP_FLOOR: f32 = 0.001;

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    peak: f32,
    curve: EnvelopeCurve,

    stage: EnvelopeState,
    level: f32,

    decay_start_level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::adsr(0.02, 0.1, 0.7, 0.3)
    }
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            peak: 1.0,
            curve: EnvelopeCurve::Linear,

            stage: EnvelopeState::Idle,
            level: 0.0,
            decay_start_level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Level reached at the top of the attack.
    pub fn with_peak(mut self, peak: f32) -> Self {
        self.peak = peak.clamp(0.0, 1.0);
        self
    }

    pub fn with_curve(mut self, curve: EnvelopeCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self, ctx: &RenderCtx) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += self.peak / (self.attack_time * ctx.sample_rate);

                if self.level >= self.peak {
                    self.level = self.peak;
                    self.decay_start_level = self.peak;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_target();
                match self.curve {
                    EnvelopeCurve::Linear => {
                        let total_drop = self.decay_start_level - target;
                        self.level -= total_drop / (self.decay_time * ctx.sample_rate);
                        if self.level <= target {
                            self.level = target;
                            self.stage = EnvelopeState::Sustain;
                        }
                    }
                    EnvelopeCurve::Exponential => {
                        let coef = exp_coefficient(self.decay_time, ctx.sample_rate);
                        self.level = target + (self.level - target) * coef;
                        if self.level - target <= self.peak * EXP_FLOOR {
                            self.level = target;
                            self.stage = EnvelopeState::Sustain;
                        }
                    }
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_target();
            }

            EnvelopeState::Release => {
                self.level = match self.curve {
                    EnvelopeCurve::Linear => {
                        let progress = self.release_elapsed_samples as f32
                            / self.release_total_samples as f32;
                        (self.release_start_level * (1.0 - progress)).max(0.0)
                    }
                    EnvelopeCurve::Exponential => {
                        self.level * exp_coefficient(self.release_time, ctx.sample_rate)
                    }
                };

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            self.next_sample(ctx);
            *sample = self.level;
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.decay_start_level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    /// Release length in seconds.
    pub fn release_time(&self) -> f32 {
        self.release_time
    }

    #[inline]
    fn sustain_target(&self) -> f32 {
        self.sustain_level * self.peak
    }
}

#[inline]
fn exp_coefficient(time: f32, sample_rate: f32) -> f32 {
    EXP_FLOOR.powf(1.0 / (time * sample_rate).max(1.0))
}
