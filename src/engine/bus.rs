use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::Consumer;

use crate::{
    dsp::{
        convolution::{Convolver, DEFAULT_PARTITION},
        impulse::{room_impulse, ROOM_SECONDS},
    },
    engine::message::{BusMessage, VoiceRequest},
    graph::node::{GraphNode, RenderCtx},
};

/*
Output Bus
==========

Lives on the audio thread and owns every sounding voice.

    control thread                      audio thread
    ──────────────                      ────────────
    build voice graph
    push BusMessage::Start ──rtrb──→   drain messages
                                        for each 128-frame quantum:
                                          render voices
                                          split dry / wet by send
                                          wet → convolution reverb
                                          out = soft_clip(dry + wet)
    read frame / voice count ←atomics── publish status

Each voice carries three absolute frame numbers:

    start ─────────── gate ──────────── release ── tail ── stop
      note_on                           note_off            dropped

The bus renders a voice piecewise inside a quantum so note_on and note_off
land on the exact frame. A voice leaves the registry at its stop frame, or
earlier once it has been released and its graph reports inactive. The
registry is capped; when full, the oldest voice is stolen.
*/

pub const RENDER_QUANTUM: usize = 128;
pub const MAX_VOICES: usize = 256;

const REVERB_SEED: u64 = 0x00C0_FFEE;
const CLIP_KNEE: f32 = 0.8;

/// What the audio thread publishes back to the control side.
#[derive(Debug, Default)]
pub struct BusStatus {
    frame: AtomicU64,
    active: AtomicUsize,
    stolen: AtomicU64,
}

impl BusStatus {
    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }

    pub fn active_voices(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Voices dropped early because the registry was full.
    pub fn stolen_voices(&self) -> u64 {
        self.stolen.load(Ordering::Relaxed)
    }
}

struct ActiveVoice {
    graph: Box<dyn GraphNode>,
    ctx: RenderCtx,
    start: u64,
    release: u64,
    stop: u64,
    started: bool,
    released: bool,
    level: f32,
    send: f32,
}

impl ActiveVoice {
    /// Render this voice's share of the quantum starting at `q_start` into
    /// `buf`. Returns false once the voice is finished.
    fn render(&mut self, q_start: u64, buf: &mut [f32]) -> bool {
        buf.fill(0.0);
        let q_end = q_start + buf.len() as u64;
        if self.start >= q_end {
            return true;
        }

        let mut pos = self.start.saturating_sub(q_start) as usize;
        if !self.started {
            self.graph.note_on(&self.ctx);
            self.started = true;
        }

        if !self.released && self.release < q_end {
            let cut = (self.release.saturating_sub(q_start) as usize).max(pos);
            if cut > pos {
                self.graph.render_block(&mut buf[pos..cut], &self.ctx);
            }
            self.graph.note_off(&self.ctx);
            self.released = true;
            pos = cut;
        }

        let end = (self.stop.saturating_sub(q_start) as usize).min(buf.len());
        if end > pos {
            self.graph.render_block(&mut buf[pos..end], &self.ctx);
        }

        self.stop > q_end && !(self.released && !self.graph.is_active())
    }
}

pub struct OutputBus {
    sample_rate: f32,
    rx: Consumer<BusMessage>,
    status: Arc<BusStatus>,
    voices: Vec<ActiveVoice>,
    reverb: Convolver,
    frame: u64,
    voice_buf: Vec<f32>,
    dry: Vec<f32>,
    wet: Vec<f32>,
}

impl OutputBus {
    /// Bus with a freshly generated 2 second room as its reverb.
    pub fn new(sample_rate: f32, rx: Consumer<BusMessage>, status: Arc<BusStatus>) -> Self {
        let mut rng = fastrand::Rng::with_seed(REVERB_SEED);
        let impulse = room_impulse(sample_rate, ROOM_SECONDS, &mut rng);
        Self::with_impulse(sample_rate, rx, status, &impulse)
    }

    pub fn with_impulse(
        sample_rate: f32,
        rx: Consumer<BusMessage>,
        status: Arc<BusStatus>,
        impulse: &[f32],
    ) -> Self {
        Self {
            sample_rate,
            rx,
            status,
            voices: Vec::with_capacity(MAX_VOICES),
            reverb: Convolver::new(impulse, DEFAULT_PARTITION),
            frame: 0,
            voice_buf: vec![0.0; RENDER_QUANTUM],
            dry: vec![0.0; RENDER_QUANTUM],
            wet: vec![0.0; RENDER_QUANTUM],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fill `out` with the next `out.len()` mono frames.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain_messages();

        for chunk in out.chunks_mut(RENDER_QUANTUM) {
            self.render_quantum(chunk);
        }

        self.status.active.store(self.voices.len(), Ordering::Release);
        self.status.frame.store(self.frame, Ordering::Release);
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.pop() {
            match message {
                BusMessage::Start(request) => self.start_voice(*request),
                BusMessage::HaltAll => self.voices.clear(),
            }
        }
    }

    fn start_voice(&mut self, request: VoiceRequest) {
        if self.voices.len() >= MAX_VOICES {
            let oldest = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, voice)| voice.start)
                .map(|(idx, _)| idx);
            if let Some(idx) = oldest {
                self.voices.swap_remove(idx);
                self.status.stolen.fetch_add(1, Ordering::Relaxed);
            }
        }

        let start = request.start.unwrap_or(self.frame).max(self.frame);
        let release = start + request.gate_frames;
        self.voices.push(ActiveVoice {
            graph: request.graph,
            ctx: RenderCtx::from_note(self.sample_rate, request.note, 1.0),
            start,
            release,
            stop: release + request.tail_frames,
            started: false,
            released: false,
            level: request.level,
            send: request.send,
        });
    }

    fn render_quantum(&mut self, out: &mut [f32]) {
        let len = out.len();
        let q_start = self.frame;

        let dry = &mut self.dry[..len];
        let wet = &mut self.wet[..len];
        let voice_buf = &mut self.voice_buf[..len];
        dry.fill(0.0);
        wet.fill(0.0);

        self.voices.retain_mut(|voice| {
            let alive = voice.render(q_start, voice_buf);
            let dry_gain = voice.level * (1.0 - voice.send);
            let wet_gain = voice.level * voice.send;
            for ((d, w), s) in dry.iter_mut().zip(wet.iter_mut()).zip(voice_buf.iter()) {
                *d += s * dry_gain;
                *w += s * wet_gain;
            }
            alive
        });

        self.reverb.process(wet);

        for ((o, d), w) in out.iter_mut().zip(dry.iter()).zip(wet.iter()) {
            *o = soft_clip(d + w);
        }

        self.frame += len as u64;
    }
}

/// Linear up to the knee, then bends smoothly towards ±1.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= CLIP_KNEE {
        return x;
    }
    let over = (magnitude - CLIP_KNEE) / (1.0 - CLIP_KNEE);
    x.signum() * (CLIP_KNEE + (1.0 - CLIP_KNEE) * over.tanh())
}
