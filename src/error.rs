//! Error types for the audio side of the engine.
//!
//! Theory lookups never fail loudly: they return `Option` or fall back to a
//! default. Only acquiring the output device can fail, and those failures
//! surface from `Engine::init`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("failed to get output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
    #[error("audio output thread exited before reporting")]
    OutputThread,
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
