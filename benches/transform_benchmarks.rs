//! Criterion benchmarks for the transform engine.
//!
//! Compares the three execution strategies on reversal and a channel
//! operation, and the direct versus lookup-table kernel variants.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use reframe::kernels::{self, LookupTable};
use reframe::{SequenceFile, Strategy, TransformOptions};

const FRAMES: usize = 256;
const CHANNELS: u8 = 3;
const HEIGHT: u8 = 32;
const WIDTH: u8 = 32;

/// Build a synthetic sequence file and return its tempdir handle and path.
fn fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("bench.seq");

    let frame_size = usize::from(CHANNELS) * usize::from(HEIGHT) * usize::from(WIDTH);
    let mut bytes = Vec::with_capacity(11 + FRAMES * frame_size);
    bytes.extend_from_slice(&(FRAMES as i64).to_le_bytes());
    bytes.push(CHANNELS);
    bytes.push(HEIGHT);
    bytes.push(WIDTH);
    for frame in 0..FRAMES {
        bytes.extend((0..frame_size).map(|byte| ((frame * 31 + byte * 7) % 256) as u8));
    }
    std::fs::write(&path, bytes).expect("failed to write fixture");

    (dir, path)
}

fn bench_reverse_strategies(c: &mut Criterion) {
    let (_dir, path) = fixture();
    let mut group = c.benchmark_group("reverse");

    for (name, strategy) in [
        ("balanced", Strategy::Balanced),
        ("fast", Strategy::Fast),
        ("small", Strategy::Small),
    ] {
        let options = TransformOptions::new().with_strategy(strategy);
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let mut sequence = SequenceFile::open(&path).expect("open failed");
                let mut output = Vec::with_capacity(sequence.header().payload_size());
                sequence
                    .timeline()
                    .reverse(&mut output, &options)
                    .expect("reverse failed");
                black_box(output);
            });
        });
    }
    group.finish();
}

fn bench_scale_strategies(c: &mut Criterion) {
    let (_dir, path) = fixture();
    let mut group = c.benchmark_group("scale_channel");

    for (name, strategy) in [
        ("balanced", Strategy::Balanced),
        ("fast", Strategy::Fast),
        ("small", Strategy::Small),
    ] {
        let options = TransformOptions::new().with_strategy(strategy);
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let mut sequence = SequenceFile::open(&path).expect("open failed");
                let mut output = Vec::with_capacity(sequence.header().payload_size());
                sequence
                    .channels()
                    .scale(&mut output, 1, 1.5, &options)
                    .expect("scale failed");
                black_box(output);
            });
        });
    }
    group.finish();
}

fn bench_kernel_variants(c: &mut Criterion) {
    let plane: Vec<u8> = (0..65_536_usize).map(|byte| (byte % 256) as u8).collect();
    let mut group = c.benchmark_group("scale_kernel");

    group.bench_function("direct", |bencher| {
        bencher.iter(|| {
            let mut work = plane.clone();
            kernels::scale_plane(&mut work, 1.5);
            black_box(work);
        });
    });

    group.bench_function("lookup_table", |bencher| {
        bencher.iter(|| {
            let mut work = plane.clone();
            let mut table = LookupTable::new();
            kernels::scale_plane_lut(&mut work, &mut table, 1.5);
            black_box(work);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reverse_strategies,
    bench_scale_strategies,
    bench_kernel_variants
);
criterion_main!(benches);
