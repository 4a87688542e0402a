//! Real-world scenario benchmarks.
//!
//! These model how a host drives the engine: four voices per instance,
//! coefficients recomputed every block, control messages between blocks.

mod voices;

pub use voices::bench_voices;
