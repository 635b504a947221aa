use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Sum of any number of layers rendered in parallel.
///
/// Additive voices are a stack of partials; detuned voices are a stack of
/// near-unison oscillators. Gate events reach every layer.
///
/// ```ignore
/// Stack::new()
///     .layer(OscNode::triangle().with_level(0.6))
///     .layer(OscNode::sine().with_ratio(2.0).with_level(0.25))
/// ```
pub struct Stack {
    layers: Vec<Box<dyn GraphNode>>,
    scratch: Vec<f32>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn layer<N: GraphNode + 'static>(mut self, node: N) -> Self {
        self.layers.push(Box::new(node));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl FromIterator<Box<dyn GraphNode>> for Stack {
    fn from_iter<I: IntoIterator<Item = Box<dyn GraphNode>>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl GraphNode for Stack {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let scratch = &mut self.scratch[..chunk.len()];
            for layer in &mut self.layers {
                layer.render_block(scratch, ctx);
                for (o, s) in chunk.iter_mut().zip(scratch.iter()) {
                    *o += *s;
                }
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        for layer in &mut self.layers {
            layer.note_on(ctx);
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        for layer in &mut self.layers {
            layer.note_off(ctx);
        }
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get_envelope_level())
            .reduce(f32::max)
    }

    fn is_active(&self) -> bool {
        self.layers.iter().any(|layer| layer.is_active())
    }
}
