//! Playback scenario benchmarks.
//!
//! Single instrument voices as the engine builds them, and the output bus
//! rendering a chord progression's worth of voices through the reverb.

mod bus;
mod voices;

pub use bus::bench_bus;
pub use voices::bench_voices;
