//! Filter cost for the guitar's fixed tone and the synth's swept cutoff.

use std::hint::black_box;

use chordwise::dsp::envelope::Envelope;
use chordwise::dsp::filter::SVFilter;
use chordwise::dsp::oscillator::OscillatorBlock;
use chordwise::graph::node::RenderCtx;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn saw_block(size: usize, ctx: &RenderCtx) -> Vec<f32> {
    let mut input = vec![0.0f32; size];
    OscillatorBlock::sawtooth().render(&mut input, ctx);
    input
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(SAMPLE_RATE, 220.0, 1.0);

    for &size in BLOCK_SIZES {
        let input = saw_block(size, &ctx);
        let mut buffer = input.clone();

        let mut guitar = SVFilter::lowpass(2_000.0).with_q(1.0);
        group.bench_with_input(BenchmarkId::new("guitar_tone", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                guitar.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // cutoff follows its envelope once per block, coefficients included
        let mut synth = SVFilter::lowpass(500.0).with_q(2.0);
        let mut sweep = Envelope::adsr(0.1, 0.9, 0.2, 0.1);
        let mut levels = vec![0.0f32; size];
        sweep.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("synth_sweep", size), &size, |b, _| {
            b.iter(|| {
                sweep.render(&mut levels, &ctx);
                let level = levels.last().copied().unwrap_or(0.0);
                synth.set_cutoff(500.0 + 1_500.0 * level);
                buffer.copy_from_slice(&input);
                synth.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        let mut strings = SVFilter::lowpass(3_000.0);
        group.bench_with_input(BenchmarkId::new("strings_warmth", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                strings.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
