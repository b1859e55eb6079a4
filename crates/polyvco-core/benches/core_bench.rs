//! Criterion benchmarks for polyvco-core primitives
//!
//! Run with: cargo bench -p polyvco-core
#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polyvco_core::{DiscontinuityCorrector, MinBlepGenerator, MinBlepKernel, one_hot};

const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_kernel_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("MinBlepKernel");

    for &(z, o) in &[(8usize, 8usize), (16, 16), (32, 16)] {
        group.bench_function(BenchmarkId::new("build", format!("{z}x{o}")), |b| {
            b.iter(|| black_box(MinBlepKernel::new(black_box(z), black_box(o))))
        });
    }

    group.finish();
}

fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("MinBlepGenerator");
    let kernel = Arc::new(MinBlepKernel::standard().unwrap());

    for &block_size in BLOCK_SIZES {
        // One edge every 64 samples, roughly a 750 Hz square at 48 kHz
        group.bench_with_input(
            BenchmarkId::new("insert_process", block_size),
            &block_size,
            |b, &size| {
                let mut blep: MinBlepGenerator<4> = MinBlepGenerator::new(Arc::clone(&kernel));
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for i in 0..size {
                        if i % 64 == 0 {
                            blep.insert_discontinuity(-0.37, one_hot(i % 4, -2.0));
                        }
                        sum += blep.process()[0];
                    }
                    black_box(sum)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("idle_process", block_size),
            &block_size,
            |b, &size| {
                let mut blep: MinBlepGenerator<4> = MinBlepGenerator::new(Arc::clone(&kernel));
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += blep.process()[0];
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_kernel_build, bench_generator);

criterion_main!(benches);
