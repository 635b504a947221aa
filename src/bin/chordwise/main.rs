//! chordwise - play a progression from the library
//!
//! Run with: cargo run -- --difficulty 2 --instrument organ

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result, WrapErr};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chordwise::{
    theory::{
        build_progression,
        difficulty::{level, random_key},
        progression::get_random_progression_with,
        Key, Style,
    },
    Engine, EngineConfig, Instrument, PlaybackOutcome,
};

/// Time left for the last chord to ring out before exiting.
const RING_OUT: Duration = Duration::from_millis(1500);

#[derive(Debug, StructOpt)]
#[structopt(name = "chordwise", about = "Ear training: hear a chord progression")]
struct Opt {
    /// Key to play in (C, F#, Am, Bbm, ...). Random for the tier if omitted.
    #[structopt(short, long)]
    key: Option<String>,

    /// Progression styles to pick from. Defaults to the tier's styles.
    #[structopt(short, long)]
    styles: Vec<Style>,

    /// Difficulty tier, 1 to 5.
    #[structopt(short, long, default_value = "1")]
    difficulty: u8,

    #[structopt(short, long, default_value = "piano")]
    instrument: Instrument,

    #[structopt(long, default_value = "90")]
    bpm: f32,

    /// Tempo multiplier, 0.5 to 2.
    #[structopt(long, default_value = "1.0")]
    rate: f32,

    #[structopt(long, default_value = "0.7")]
    volume: f32,

    /// Reverb amount, 0 (dry) to 1.
    #[structopt(long, default_value = "0.3")]
    reverb: f32,

    /// Seed for repeatable picks.
    #[structopt(long)]
    seed: Option<u64>,

    /// Play a one-bar metronome count-in first.
    #[structopt(long)]
    count_in: bool,

    /// Keep the progression secret until it has played.
    #[structopt(short, long)]
    quiz: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opt = Opt::from_args();
    let mut rng = match opt.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let tier = level(opt.difficulty);
    let key = match &opt.key {
        Some(name) => Key::lookup(name).ok_or_else(|| eyre!("unknown key `{name}`"))?,
        None => random_key(tier.tier, &mut rng),
    };
    let styles: &[Style] = if opt.styles.is_empty() {
        tier.styles
    } else {
        &opt.styles
    };

    let template = get_random_progression_with(&mut rng, tier.tier, styles);
    let progression = build_progression(key.name, template)
        .ok_or_else(|| eyre!("progression `{}` does not build in {key}", template.name))?;

    println!("=== chordwise ===");
    println!("Level: {} ({})", tier.name, tier.description);
    println!("Key:   {key}");
    if !opt.quiz {
        println!("Progression: {} ({})", progression.name, progression.answer());
    }
    println!();

    let config = EngineConfig::new()
        .instrument(opt.instrument)
        .bpm(opt.bpm)
        .playback_rate(opt.rate)
        .master_volume(opt.volume)
        .effect_amount(opt.reverb);
    let engine = Arc::new(Engine::with_default_output(config));
    engine.init().wrap_err("failed to open audio output")?;

    if opt.count_in {
        let config = engine.config();
        let beat =
            Duration::from_secs_f64(60.0 / config.bpm as f64 / config.playback_rate as f64);
        for i in 0..4 {
            engine.play_metronome(i);
            thread::sleep(beat);
        }
    }

    let quiz = opt.quiz;
    let playback = engine.spawn_progression(progression.chords.clone(), move |i, chord| {
        if quiz {
            println!("  {}. ?", i + 1);
        } else {
            println!(
                "  {}. {:<8} {:<6} {:?}",
                i + 1,
                chord.roman_numeral,
                chord.name,
                chord.midi_notes
            );
        }
    })?;

    let outcome = playback
        .join()
        .map_err(|_| eyre!("playback thread panicked"))?;
    thread::sleep(RING_OUT);
    info!(?outcome, "playback finished");

    if outcome == PlaybackOutcome::Completed && opt.quiz {
        println!();
        println!("Answer: {} ({})", progression.answer(), progression.name);
    }

    Ok(())
}
