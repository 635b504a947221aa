use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Chain (Through)
======================

    [Source] ──→ [Effect] ──→ output

The source renders into the output buffer, then the effect processes that
same buffer in place. Every subtractive voice is built this way:

    OscNode::sawtooth()
        .through(FilterNode::lowpass(2_000.0))   // shape the tone
        .amplify(EnvNode::adsr(..))              // shape the loudness

Compare with the other combinators:

    Through   source → effect          (serial)
    Amplify   signal × modulator       (gain)
    Stack     a + b + c ...            (parallel sum)

The chain is silent once its source is, so `is_active` follows the source.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.effect.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.effect.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }
}
