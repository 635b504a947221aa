use crate::{
    dsp::filter::{SVFilter, DEFAULT_Q},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
Filter Node
===========

Subtractive voices start from a bright waveform and take harmonics away:

    OscNode::sawtooth().through(FilterNode::lowpass(2_000.0).with_q(1.0))

Cutoff (Hz) sets where the filter starts cutting:

    500 Hz     dark, muffled
    2000 Hz    warm, a plucked string
    3000 Hz    a string section with the fizz taken off

Q sets the emphasis at the cutoff. 0.707 is flat, 1.0 rounds the corner a
little, 2.0 gives a noticeable peak that moves audibly when the cutoff is
swept by an envelope:

    FilterNode::lowpass(500.0)
        .with_q(2.0)
        .modulate(EnvNode::adsr(0.1, 0.4, 0.2, 0.1), FilterParam::Cutoff, 1_500.0)

sweeps from 500 Hz up to 2000 Hz during the attack and settles at 800 Hz.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterParam {
    Cutoff,
    Q,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
    base_q: f32,
}

impl FilterNode {
    fn new(filter: SVFilter) -> Self {
        Self {
            base_cutoff: filter.cutoff_hz,
            base_q: filter.q,
            filter,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::lowpass(cutoff_hz))
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::highpass(cutoff_hz))
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::bandpass(cutoff_hz))
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self.base_q = self.filter.q;
        self
    }

    /// Cutoff currently applied, after modulation.
    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::lowpass(1_000.0).with_q(DEFAULT_Q)
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Q => self.base_q,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let value = base + modulation;
        match param {
            FilterParam::Cutoff => self.filter.set_cutoff(value.clamp(20.0, 20_000.0)),
            FilterParam::Q => self.filter.set_q(value.clamp(0.1, 20.0)),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}
