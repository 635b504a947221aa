use crate::dsp::envelope::{Envelope, EnvelopeCurve};
use crate::graph::node::{GraphNode, RenderCtx};

/// ADSR envelope as a graph node. Renders the gain curve itself, so it is
/// normally the modulator side of `.amplify()` or `.modulate()`.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release),
        }
    }

    pub fn with_peak(mut self, peak: f32) -> Self {
        self.env = self.env.with_peak(peak);
        self
    }

    /// Exponential decay and release.
    pub fn exponential(mut self) -> Self {
        self.env = self.env.with_curve(EnvelopeCurve::Exponential);
        self
    }

    pub fn release_time(&self) -> f32 {
        self.env.release_time()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
