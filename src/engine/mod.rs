//! The playback engine.
//!
//! [`Engine`] ties the pieces together: settings, an [`AudioBackend`] that
//! pulls audio from the [`OutputBus`], and the progression [`Scheduler`].
//! It is built explicitly and shared by reference or `Arc`; every method
//! takes `&self`.
//!
//! Nothing sounds until [`Engine::init`] has succeeded. Before that, note
//! and chord calls are quiet no-ops and the scheduler still walks through
//! its steps.
//!
//! # Example
//!
//! ```ignore
//! use chordwise::{Engine, EngineConfig};
//! use chordwise::theory::{build_progression, get_random_progression, Style};
//!
//! let engine = Engine::with_default_output(EngineConfig::default().bpm(100.0));
//! engine.init()?;
//!
//! let template = get_random_progression(1, &[Style::Pop]);
//! let built = build_progression("C", template).unwrap();
//! engine.play_progression(&built.chords, |i, chord| println!("{i}: {}", chord.name));
//! ```

pub mod backend;
pub mod bus;
pub mod clock;
pub mod message;
pub mod scheduler;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use rtrb::{Producer, RingBuffer};
use tracing::{debug, info, warn};

use crate::config::{
    clamp_to, EngineConfig, EnvelopeConfig, BPM_RANGE, EFFECT_RANGE, RATE_RANGE, VOLUME_RANGE,
};
use crate::error::{EngineError, Result};
use crate::theory::chord::Chord;
use crate::voices::{click, Instrument, NoteSpec, VoicePatch, CLICK_SECONDS};

pub use backend::{AudioBackend, BusFactory, CpalBackend, OfflineBackend};
pub use bus::{BusStatus, OutputBus};
pub use clock::{CancelToken, Clock, ManualClock, SystemClock};
pub use message::{BusMessage, VoiceRequest};
pub use scheduler::{PlaybackOutcome, PlaybackTarget, Scheduler, Session};

/// Pending messages the control side may queue ahead of the audio thread.
const BUS_QUEUE_SIZE: usize = 1024;

/// Extra time a voice may ring after its release stage before it is cut.
const TAIL_PADDING: f32 = 0.1;

struct OutputLink {
    tx: Producer<BusMessage>,
    status: Arc<BusStatus>,
    sample_rate: f32,
}

pub struct Engine {
    config: Mutex<EngineConfig>,
    backend: Mutex<Box<dyn AudioBackend>>,
    output: Mutex<Option<OutputLink>>,
    scheduler: Scheduler,
    voice_seed: AtomicU64,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        backend: impl AudioBackend + 'static,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Mutex::new(config.clamped()),
            backend: Mutex::new(Box::new(backend)),
            output: Mutex::new(None),
            scheduler: Scheduler::new(clock),
            voice_seed: AtomicU64::new(0),
        }
    }

    /// Engine on the system's default output device and wall-clock time.
    pub fn with_default_output(config: EngineConfig) -> Self {
        Self::new(config, CpalBackend::new(), Arc::new(SystemClock::new()))
    }

    /// Open the audio output. Safe to call repeatedly; only the first
    /// successful call opens anything.
    pub fn init(&self) -> Result<()> {
        let mut output = lock(&self.output);
        if output.is_some() {
            return Ok(());
        }

        let (tx, rx) = RingBuffer::new(BUS_QUEUE_SIZE);
        let status = Arc::new(BusStatus::default());
        let bus_status = Arc::clone(&status);
        let make_bus: BusFactory = Box::new(move |sample_rate| {
            OutputBus::new(sample_rate, rx, bus_status)
        });

        let sample_rate = lock(&self.backend).start(make_bus)?;

        info!(sample_rate, "audio engine ready");
        *output = Some(OutputLink {
            tx,
            status,
            sample_rate,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        lock(&self.output).is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        lock(&self.output).as_ref().map(|link| link.sample_rate)
    }

    /// Seconds of audio rendered since the output opened.
    pub fn current_time(&self) -> f64 {
        lock(&self.output)
            .as_ref()
            .map_or(0.0, |link| link.status.frame() as f64 / link.sample_rate as f64)
    }

    /// Voices currently held by the output bus.
    pub fn active_voices(&self) -> usize {
        lock(&self.output)
            .as_ref()
            .map_or(0, |link| link.status.active_voices())
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn config(&self) -> EngineConfig {
        *lock(&self.config)
    }

    /// Play one note for `duration` seconds with the current instrument.
    ///
    /// `start` is an absolute time on the [`Engine::current_time`] timeline;
    /// `None` (or a time already past) starts right away.
    pub fn play_note(&self, note: i32, duration: f64, start: Option<f64>) {
        self.play_chord_at(&[note], duration, start);
    }

    /// Play every note of a chord, starting now.
    pub fn play_chord(&self, notes: &[i32], duration: f64) {
        self.play_chord_at(notes, duration, None);
    }

    /// Play every note of a chord at `start` (see [`Engine::play_note`]).
    ///
    /// Settings are read once, so all notes share instrument and levels.
    pub fn play_chord_at(&self, notes: &[i32], duration: f64, start: Option<f64>) {
        let config = self.config();
        for &note in notes {
            let spec = self.note_spec(note, duration, &config);
            let patch = config.instrument.build_voice(&spec);
            self.send_voice(patch, note, duration, start, &config, config.effect_amount);
        }
    }

    /// Metronome click; beat 0 is accented.
    pub fn play_metronome(&self, beat: u32) {
        let config = self.config();
        let patch = click(beat == 0);
        self.send_voice(patch, 0, CLICK_SECONDS as f64, None, &config, 0.0);
    }

    /// Play `chords` one step each, blocking until done or stopped.
    ///
    /// `on_step(index, chord)` runs before each chord sounds. Returns
    /// [`PlaybackOutcome::Rejected`] without playing if a progression is
    /// already running.
    pub fn play_progression<F>(&self, chords: &[Chord], on_step: F) -> PlaybackOutcome
    where
        F: FnMut(usize, &Chord),
    {
        self.scheduler.run(chords, self, on_step)
    }

    /// [`Engine::play_progression`] on a background thread.
    ///
    /// The session is claimed before this returns, so a
    /// [`Engine::stop_playback`] right after it cancels this progression.
    /// The thread's outcome is [`PlaybackOutcome::Rejected`] if another
    /// one was already playing.
    pub fn spawn_progression<F>(
        self: &Arc<Self>,
        chords: Vec<Chord>,
        on_step: F,
    ) -> Result<JoinHandle<PlaybackOutcome>>
    where
        F: FnMut(usize, &Chord) + Send + 'static,
    {
        let engine = Arc::clone(self);
        let session = self.scheduler.try_begin();
        thread::Builder::new()
            .name("chordwise-playback".into())
            .spawn(move || match session {
                Some(session) => session.play(&chords, &*engine, on_step),
                None => PlaybackOutcome::Rejected,
            })
            .map_err(|e| EngineError::Unavailable(e.to_string()))
    }

    /// Stop the running progression and silence every voice.
    pub fn stop_playback(&self) {
        self.scheduler.stop();
        self.push(BusMessage::HaltAll);
    }

    pub fn set_instrument(&self, instrument: Instrument) {
        lock(&self.config).instrument = instrument;
    }

    /// Select an instrument by id; unknown ids select piano.
    pub fn set_instrument_id(&self, id: &str) {
        self.set_instrument(Instrument::from_id(id));
    }

    pub fn set_master_volume(&self, volume: f32) {
        lock(&self.config).master_volume = clamp_to(volume, &VOLUME_RANGE);
    }

    pub fn set_effect_amount(&self, amount: f32) {
        lock(&self.config).effect_amount = clamp_to(amount, &EFFECT_RANGE);
    }

    pub fn set_bpm(&self, bpm: f32) {
        lock(&self.config).bpm = clamp_to(bpm, &BPM_RANGE);
    }

    pub fn set_playback_rate(&self, rate: f32) {
        lock(&self.config).playback_rate = clamp_to(rate, &RATE_RANGE);
    }

    pub fn set_envelope(&self, envelope: EnvelopeConfig) {
        lock(&self.config).envelope = envelope.clamped();
    }

    fn note_spec(&self, note: i32, duration: f64, config: &EngineConfig) -> NoteSpec {
        NoteSpec::new(note, duration as f32)
            .with_envelope(config.envelope)
            .with_seed(self.voice_seed.fetch_add(1, Ordering::Relaxed))
    }

    fn send_voice(
        &self,
        patch: VoicePatch,
        note: i32,
        duration: f64,
        start: Option<f64>,
        config: &EngineConfig,
        send: f32,
    ) {
        let mut output = lock(&self.output);
        let Some(link) = output.as_mut() else {
            debug!(note, "audio output not initialized, dropping note");
            return;
        };

        let sr = link.sample_rate;
        let request = VoiceRequest {
            graph: patch.graph,
            note,
            start: start.map(|t| (t.max(0.0) * sr as f64).round() as u64),
            gate_frames: (duration.max(0.0) * sr as f64).round() as u64,
            tail_frames: ((patch.release + TAIL_PADDING) * sr).round() as u64,
            level: config.master_volume,
            send,
        };

        if link.tx.push(BusMessage::Start(Box::new(request))).is_err() {
            warn!(note, "output queue full, dropping note");
        }
    }

    fn push(&self, message: BusMessage) {
        let mut output = lock(&self.output);
        let Some(link) = output.as_mut() else {
            debug!("audio output not initialized, ignoring {message:?}");
            return;
        };
        if link.tx.push(message).is_err() {
            warn!("output queue full, dropping control message");
        }
    }
}

impl PlaybackTarget for Engine {
    fn step_seconds(&self, chord: &Chord) -> f64 {
        let config = self.config();
        chord.duration.seconds(config.bpm, config.playback_rate)
    }

    fn trigger(&self, chord: &Chord, seconds: f64) {
        self.play_chord(&chord.midi_notes, seconds);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
