use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a modulator, sample by sample.
///
/// With an envelope as the modulator this is the voice's amplifier: the
/// output is silent whenever either side is, so the node stays active only
/// while both are.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    gain: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            gain: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let gain = &mut self.gain[..chunk.len()];
            self.modulator.render_block(gain, ctx);
            for (o, g) in chunk.iter_mut().zip(gain.iter()) {
                *o *= *g;
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator
            .get_envelope_level()
            .or_else(|| self.signal.get_envelope_level())
    }

    fn is_active(&self) -> bool {
        self.signal.is_active() && self.modulator.is_active()
    }
}
