//! Oscillator cost for the partial layouts the instruments use.
//!
//! Each case renders every oscillator of one voice into its own buffer and
//! sums them, the same work a `Stack` does per block.

use std::hint::black_box;

use chordwise::dsp::oscillator::OscillatorBlock;
use chordwise::graph::node::RenderCtx;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;
const A3: f32 = 220.0;

struct Partial {
    osc: OscillatorBlock,
    ctx: RenderCtx,
    level: f32,
}

fn partial(osc: OscillatorBlock, frequency: f32, level: f32) -> Partial {
    Partial {
        osc,
        ctx: RenderCtx::from_freq(SAMPLE_RATE, frequency, 1.0),
        level,
    }
}

fn cents(c: f32) -> f32 {
    2.0_f32.powf(c / 1200.0)
}

fn render_sum(partials: &mut [Partial], scratch: &mut [f32], out: &mut [f32]) {
    out.fill(0.0);
    for p in partials.iter_mut() {
        p.osc.render(scratch, &p.ctx);
        for (o, s) in out.iter_mut().zip(scratch.iter()) {
            *o += s * p.level;
        }
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut scratch = vec![0.0f32; size];
        let mut buffer = vec![0.0f32; size];

        // triangle body with octave and twelfth sines
        let mut piano = [
            partial(OscillatorBlock::triangle(), A3, 0.6),
            partial(OscillatorBlock::sine(), A3 * 2.0, 0.25),
            partial(OscillatorBlock::sine(), A3 * 3.0, 0.1),
        ];
        group.bench_with_input(BenchmarkId::new("piano_partials", size), &size, |b, _| {
            b.iter(|| render_sum(black_box(&mut piano), &mut scratch, &mut buffer))
        });

        // two polyBLEP saws at ±5 cents over a sub-octave sine
        let mut synth = [
            partial(OscillatorBlock::sawtooth(), A3 * cents(5.0), 1.0 / 3.0),
            partial(OscillatorBlock::sawtooth(), A3 * cents(-5.0), 1.0 / 3.0),
            partial(OscillatorBlock::sine(), A3 * 0.5, 1.0 / 3.0),
        ];
        group.bench_with_input(BenchmarkId::new("synth_detuned", size), &size, |b, _| {
            b.iter(|| render_sum(black_box(&mut synth), &mut scratch, &mut buffer))
        });

        let mut strings: Vec<Partial> = [-8.0, -3.0, 2.5, 9.0]
            .into_iter()
            .map(|c| partial(OscillatorBlock::sawtooth(), A3 * cents(c), 0.25))
            .collect();
        group.bench_with_input(BenchmarkId::new("string_section", size), &size, |b, _| {
            b.iter(|| render_sum(black_box(&mut strings), &mut scratch, &mut buffer))
        });

        let drawbars = [
            (1.0, 0.4),
            (2.0, 0.3),
            (3.0, 0.2),
            (4.0, 0.15),
            (6.0, 0.1),
            (8.0, 0.05),
        ];
        let mut organ: Vec<Partial> = drawbars
            .into_iter()
            .map(|(ratio, level)| partial(OscillatorBlock::sine(), A3 * ratio, level))
            .collect();
        group.bench_with_input(BenchmarkId::new("organ_drawbars", size), &size, |b, _| {
            b.iter(|| render_sum(black_box(&mut organ), &mut scratch, &mut buffer))
        });

        // reverb impulse source
        let mut noise = OscillatorBlock::noise().with_seed(1);
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, A3, 1.0);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| noise.render(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
