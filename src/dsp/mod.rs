//! Low-level DSP primitives used by the graph nodes and the output bus.
//!
//! Everything here except the convolver setup is allocation-free once built,
//! so these structs can live inside voices and run on the audio thread.

/// Uniformly partitioned FFT convolution.
pub mod convolution;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter.
pub mod filter;
/// Synthetic room impulse responses.
pub mod impulse;
/// Band-limited oscillator waveforms and noise.
pub mod oscillator;

pub use envelope::{EnvelopeCurve, EnvelopeState};
