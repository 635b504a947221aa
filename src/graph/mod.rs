//! Composable building blocks for voice graphs.
//!
//! Graph nodes wrap the DSP primitives with what an instrument needs: gate
//! events, parameter modulation and block rendering. Voices are assembled
//! with the fluent helpers in `extensions`:
//!
//! ```ignore
//! OscNode::sawtooth()
//!     .through(FilterNode::lowpass(2_000.0).with_q(1.0))
//!     .amplify(EnvNode::adsr(0.01, 1.0, 0.02, 0.08).exponential())
//! ```

/// Multiply a signal by a modulator.
pub mod amplify;
/// Envelope generator node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.modulate()`).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-rate oscillators.
pub mod oscillator;
/// Parallel sum of layers.
pub mod stack;
/// Serial chaining of two nodes.
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, Modulatable, RenderCtx};
