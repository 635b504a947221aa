//! Benchmarks for the instrument voices.
//!
//! Each instrument's graph is built exactly as the engine builds it for a
//! held middle C, so these numbers are the per-note cost of a chord.

use std::hint::black_box;

use chordwise::graph::node::RenderCtx;
use chordwise::voices::{Instrument, NoteSpec};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::from_note(48_000.0, 60, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for instrument in Instrument::ALL {
            let spec = NoteSpec::new(60, 60.0).with_seed(3);
            let mut voice = instrument.build_voice(&spec).graph;
            voice.note_on(&ctx);

            group.bench_with_input(BenchmarkId::new(instrument.id(), size), &size, |b, _| {
                b.iter(|| {
                    voice.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
