//! Benchmarks for the partitioned convolution reverb.
//!
//! The impulse is the same 2 second room the output bus uses, so this is
//! the fixed cost of the wet path per block.

use std::hint::black_box;

use chordwise::dsp::convolution::{Convolver, DEFAULT_PARTITION};
use chordwise::dsp::impulse::{room_impulse, ROOM_SECONDS};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");
    let mut rng = fastrand::Rng::with_seed(7);
    let impulse = room_impulse(48_000.0, ROOM_SECONDS, &mut rng);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|_| rng.f32() * 2.0 - 1.0).collect();

        let mut reverb = Convolver::new(&impulse, DEFAULT_PARTITION);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("room_2s", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                reverb.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
