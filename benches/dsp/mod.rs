//! Benchmarks for the per-sample topologies and the control-rate maker.

mod coefficients;
mod filter;

pub use coefficients::bench_coefficients;
pub use filter::bench_filter;
