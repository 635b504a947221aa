//! Musical timing: rational note lengths and their conversion to beats and
//! seconds.

pub mod duration;

pub use duration::Duration;
