//! Benchmarks for filter topologies and real-world voice scenarios.
//!
//! Run with: cargo bench
//!
//! Every call processes four voices at once, so a block of N samples is N
//! calls regardless of how many lanes are active.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Raw topology calls and coefficient computation
//!   - scenarios/*  Prepared filters driven block by block

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Per-sample and control-rate primitives
    dsp::bench_filter,
    dsp::bench_coefficients,
    // Host-style scenarios
    scenarios::bench_voices,
);
criterion_main!(benches);
