//! Progression playback: one chord per step, one session at a time.
//!
//! ```text
//!        try_begin()                   last step / stop()
//!   Idle ──────────► Playing ─────────────────────────────► Idle
//!    ▲                  │
//!    └──── None ◄───────┘ try_begin() while playing
//! ```
//!
//! A [`Session`] is claimed on the caller's thread and can then be played
//! anywhere. A `stop` issued any time after the claim reaches that session,
//! even before its first step.
//!
//! Each step checks for cancellation, reports the chord, triggers it and
//! then waits the step length on the injected [`Clock`]. The step length is
//! asked for at the start of every step, so tempo changes apply to steps
//! that have not begun yet.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::engine::clock::{CancelToken, Clock};
use crate::theory::chord::Chord;

/// How a playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every step was played.
    Completed,
    /// `stop` was called before the last step finished.
    Cancelled,
    /// Another session was already playing; nothing was started.
    Rejected,
}

/// What the scheduler drives.
pub trait PlaybackTarget {
    /// Length of the step for `chord`, read right before it is triggered.
    fn step_seconds(&self, chord: &Chord) -> f64;

    /// Sound `chord` for `seconds`.
    fn trigger(&self, chord: &Chord, seconds: f64);
}

/// `playing` is only changed with its lock held, and `stop` cancels under
/// the same lock, so a claim and its reset are one step for `stop`.
#[derive(Debug, Default)]
struct SessionState {
    playing: Mutex<bool>,
    cancel: CancelToken,
}

impl SessionState {
    fn playing(&self) -> MutexGuard<'_, bool> {
        self.playing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Scheduler {
    state: Arc<SessionState>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(SessionState::default()),
            clock,
        }
    }

    pub fn is_playing(&self) -> bool {
        *self.state.playing()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Claim the scheduler for a new session. `None` while another one
    /// holds it.
    pub fn try_begin(&self) -> Option<Session> {
        let mut playing = self.state.playing();
        if *playing {
            debug!("playback already running, rejecting new session");
            return None;
        }
        *playing = true;
        self.state.cancel.reset();

        Some(Session {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        })
    }

    /// Play `chords` in order on the calling thread.
    ///
    /// `on_step(index, chord)` runs before each chord is triggered. Calling
    /// [`Scheduler::stop`] from inside it skips that chord.
    pub fn run<F>(
        &self,
        chords: &[Chord],
        target: &dyn PlaybackTarget,
        on_step: F,
    ) -> PlaybackOutcome
    where
        F: FnMut(usize, &Chord),
    {
        match self.try_begin() {
            Some(session) => session.play(chords, target, on_step),
            None => PlaybackOutcome::Rejected,
        }
    }

    /// Cancel the claimed session, waking it if it is waiting.
    pub fn stop(&self) {
        let _playing = self.state.playing();
        self.state.cancel.cancel();
    }
}

/// A claimed playback slot. The scheduler goes back to idle when it is
/// dropped, whether it was played or not, even by unwinding.
pub struct Session {
    state: Arc<SessionState>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn play<F>(
        self,
        chords: &[Chord],
        target: &dyn PlaybackTarget,
        mut on_step: F,
    ) -> PlaybackOutcome
    where
        F: FnMut(usize, &Chord),
    {
        let cancel = &self.state.cancel;

        for (index, chord) in chords.iter().enumerate() {
            if cancel.is_cancelled() {
                return PlaybackOutcome::Cancelled;
            }
            on_step(index, chord);
            if cancel.is_cancelled() {
                return PlaybackOutcome::Cancelled;
            }

            let seconds = target.step_seconds(chord).max(0.0);
            debug!(index, chord = %chord.name, seconds, "playback step");
            target.trigger(chord, seconds);

            if self.clock.sleep(Duration::from_secs_f64(seconds), cancel) {
                return PlaybackOutcome::Cancelled;
            }
        }

        PlaybackOutcome::Completed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        *self.state.playing() = false;
    }
}
