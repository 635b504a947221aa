use std::sync::{Arc, Mutex};
use std::time::Duration;

use chordwise::engine::{ManualClock, OfflineBackend};
use chordwise::theory::{build_progression, progression::POP, Chord};
use chordwise::{Engine, EngineConfig, Instrument, PlaybackOutcome};

const SAMPLE_RATE: f32 = 8_000.0;

fn engine(config: EngineConfig) -> (Arc<Engine>, OfflineBackend, Arc<ManualClock>) {
    let backend = OfflineBackend::new(SAMPLE_RATE);
    let clock = Arc::new(ManualClock::new());
    let engine = Arc::new(Engine::new(config, backend.clone(), clock.clone()));
    (engine, backend, clock)
}

fn axis_in_c() -> Vec<Chord> {
    build_progression("C", &POP[0]).unwrap().chords
}

#[test]
fn progression_reports_every_step() {
    let (engine, _, clock) = engine(EngineConfig::default().bpm(120.0));
    engine.init().unwrap();
    let chords = axis_in_c();

    let mut steps = Vec::new();
    let outcome = engine.play_progression(&chords, |i, chord| {
        steps.push((i, chord.name.clone(), chord.roman_numeral.clone()));
    });

    assert_eq!(outcome, PlaybackOutcome::Completed);
    assert_eq!(steps.len(), chords.len());
    for (i, (index, name, roman)) in steps.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(name, &chords[i].name);
        assert_eq!(roman, &chords[i].roman_numeral);
    }
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(500); chords.len()]);
    assert!(!engine.is_playing());
}

#[test]
fn second_session_is_rejected() {
    let (engine, _, _) = engine(EngineConfig::default());
    let chords = axis_in_c();

    let mut nested = Vec::new();
    let outcome = engine.play_progression(&chords, |_, _| {
        assert!(engine.is_playing());
        nested.push(engine.play_progression(&chords, |_, _| panic!("must not run")));
    });

    assert_eq!(outcome, PlaybackOutcome::Completed);
    assert!(nested.iter().all(|o| *o == PlaybackOutcome::Rejected));
}

#[test]
fn stop_inside_a_step_ends_the_session() {
    let (engine, backend, _) = engine(EngineConfig::default());
    engine.init().unwrap();
    let chords = axis_in_c();

    let mut seen = Vec::new();
    let outcome = engine.play_progression(&chords, |i, _| {
        seen.push(i);
        if i == 1 {
            engine.stop_playback();
        }
    });

    assert_eq!(outcome, PlaybackOutcome::Cancelled);
    assert_eq!(seen, [0, 1]);

    // the halt arrives after the first chord was queued, so nothing is left
    backend.render(256);
    assert_eq!(engine.active_voices(), 0);
}

#[test]
fn tempo_change_applies_to_later_steps() {
    let (engine, _, clock) = engine(EngineConfig::default().bpm(60.0));
    let chords = axis_in_c();

    engine.play_progression(&chords, |i, _| {
        if i == 2 {
            engine.set_bpm(120.0);
        }
    });

    let expected = [1000, 1000, 500, 500].map(Duration::from_millis);
    assert_eq!(clock.sleeps(), expected);
}

#[test]
fn spawned_progression_runs_in_the_background() {
    let (engine, _, clock) = engine(EngineConfig::default());
    engine.init().unwrap();

    let steps = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&steps);
    let handle = engine
        .spawn_progression(axis_in_c(), move |i, chord| {
            recorded.lock().unwrap().push((i, chord.name.clone()));
        })
        .unwrap();

    assert_eq!(handle.join().unwrap(), PlaybackOutcome::Completed);
    let names: Vec<String> = steps.lock().unwrap().iter().map(|(_, n)| n.clone()).collect();
    assert_eq!(names, ["C", "G", "Am", "F"]);
    assert_eq!(clock.sleeps().len(), 4);
}

#[test]
fn instrument_is_read_when_a_chord_is_triggered() {
    let (engine, backend, _) = engine(EngineConfig::default().effect_amount(0.0));
    engine.init().unwrap();

    engine.set_instrument(Instrument::Organ);
    engine.play_chord(&[60, 64, 67], 0.3);
    engine.set_instrument(Instrument::Guitar);

    let audio = backend.render_seconds(0.3);
    assert!(audio.iter().any(|s| s.abs() > 0.05));
    assert_eq!(engine.config().instrument, Instrument::Guitar);
    assert_eq!(engine.active_voices(), 3);
}

#[test]
fn init_twice_keeps_one_bus() {
    let (engine, backend, _) = engine(EngineConfig::default());
    engine.init().unwrap();
    engine.play_note(69, 1.0, None);
    engine.init().unwrap();

    backend.render(128);
    assert_eq!(backend.start_count(), 1);
    assert_eq!(engine.active_voices(), 1);
}

#[test]
fn stop_right_after_spawn_cancels_the_progression() {
    let (engine, backend, clock) = engine(EngineConfig::default());
    engine.init().unwrap();

    let steps = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&steps);
    let handle = engine
        .spawn_progression(axis_in_c(), move |i, _| recorded.lock().unwrap().push(i))
        .unwrap();
    engine.stop_playback();

    assert_eq!(handle.join().unwrap(), PlaybackOutcome::Cancelled);
    assert!(steps.lock().unwrap().is_empty());
    assert!(clock.sleeps().is_empty());
    assert!(!engine.is_playing());

    backend.render(256);
    assert_eq!(engine.active_voices(), 0);
}

#[test]
fn spawn_while_playing_is_rejected() {
    let (engine, _, _) = engine(EngineConfig::default());
    let chords = axis_in_c();

    let mut spawned = None;
    engine.play_progression(&chords, |i, _| {
        if i == 0 {
            spawned = Some(engine.spawn_progression(chords.clone(), |_, _| {}).unwrap());
        }
    });

    let outcome = spawned.unwrap().join().unwrap();
    assert_eq!(outcome, PlaybackOutcome::Rejected);
}
