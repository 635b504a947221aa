use std::fmt;

use crate::graph::node::GraphNode;

/// A fully built voice on its way to the audio thread.
///
/// Frame counts are in output samples. The voice gates on at `start`, gates
/// off `gate_frames` later and is dropped `tail_frames` after that even if
/// its envelope has not finished.
pub struct VoiceRequest {
    pub graph: Box<dyn GraphNode>,
    pub note: i32,
    /// Absolute start frame; `None` starts at the next render quantum.
    pub start: Option<u64>,
    pub gate_frames: u64,
    pub tail_frames: u64,
    /// Master level captured at trigger time.
    pub level: f32,
    /// Reverb send captured at trigger time.
    pub send: f32,
}

impl fmt::Debug for VoiceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceRequest")
            .field("note", &self.note)
            .field("start", &self.start)
            .field("gate_frames", &self.gate_frames)
            .field("tail_frames", &self.tail_frames)
            .field("level", &self.level)
            .field("send", &self.send)
            .finish_non_exhaustive()
    }
}

/// Control messages for the output bus.
#[derive(Debug)]
pub enum BusMessage {
    Start(Box<VoiceRequest>),
    /// Silence and drop every voice at once.
    HaltAll,
}
