use crate::graph::{
    amplify::Amplify,
    modulate::Modulate,
    node::{GraphNode, Modulatable},
    through::Through,
};

/// Fluent combinators available on every node.
pub trait NodeExt: GraphNode + Sized {
    /// Multiply by `modulator` (usually an envelope).
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    /// Feed this node's output into `effect`.
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    /// Drive `param` from `modulator`, scaled by `depth`.
    fn modulate<M: GraphNode>(
        self,
        modulator: M,
        param: Self::Param,
        depth: f32,
    ) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, modulator, param, depth)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}
