//! Benchmarks for the output bus.
//!
//! A four-note chord on each instrument, rendered through the bus with
//! level, dry/wet split, reverb and soft clipping.

use std::hint::black_box;
use std::sync::Arc;

use chordwise::engine::{BusMessage, BusStatus, OutputBus, VoiceRequest};
use chordwise::voices::{Instrument, NoteSpec};
use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;
const CHORD: [i32; 4] = [48, 55, 64, 67];

pub fn bench_bus(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bus");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for instrument in Instrument::ALL {
            let (mut tx, rx) = RingBuffer::new(16);
            let mut bus = OutputBus::new(SAMPLE_RATE, rx, Arc::new(BusStatus::default()));

            for (i, &note) in CHORD.iter().enumerate() {
                let spec = NoteSpec::new(note, 600.0).with_seed(i as u64);
                let patch = instrument.build_voice(&spec);
                let request = VoiceRequest {
                    graph: patch.graph,
                    note,
                    start: None,
                    gate_frames: (600.0 * SAMPLE_RATE) as u64,
                    tail_frames: (SAMPLE_RATE * 0.5) as u64,
                    level: 0.7,
                    send: 0.3,
                };
                let _ = tx.push(BusMessage::Start(Box::new(request)));
            }

            let name = format!("chord_{}", instrument.id());
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    bus.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
