//! Envelope cost for the shapes the instruments actually play.

use std::hint::black_box;

use chordwise::config::EnvelopeConfig;
use chordwise::dsp::envelope::Envelope;
use chordwise::dsp::EnvelopeCurve;
use chordwise::graph::node::RenderCtx;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

/// Run `env` for `seconds` so the bench starts inside a later stage.
fn advance(env: &mut Envelope, seconds: f32, ctx: &RenderCtx) {
    for _ in 0..(seconds * SAMPLE_RATE) as usize {
        env.next_sample(ctx);
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(SAMPLE_RATE, 220.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // the engine's default settings, held on the sustain plateau
        let piano = EnvelopeConfig::default();
        let mut env = Envelope::adsr(piano.attack, piano.decay, piano.sustain, piano.release)
            .with_peak(0.8);
        env.note_on(&ctx);
        advance(&mut env, piano.attack + piano.decay, &ctx);
        group.bench_with_input(BenchmarkId::new("piano_sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // a whole-note pluck at 90 bpm: the decay spans the note
        let mut env = Envelope::adsr(0.01, 2.66, 0.02, 0.08)
            .with_peak(0.5)
            .with_curve(EnvelopeCurve::Exponential);
        env.note_on(&ctx);
        advance(&mut env, 0.02, &ctx);
        group.bench_with_input(BenchmarkId::new("guitar_decay", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });

        // filter sweep of the synth while it is still rising
        let mut env = Envelope::adsr(0.1, 0.9, 0.2, 0.1);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("synth_sweep", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });

        let mut env = Envelope::adsr(0.15, 0.2, 0.67, 0.4).with_peak(0.15);
        env.note_on(&ctx);
        advance(&mut env, 0.5, &ctx);
        env.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("strings_release", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
