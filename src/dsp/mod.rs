//! Low-level numeric primitives shared by the filter topologies.
//!
//! These components are allocation-free and realtime-safe once initialised.
//! They stay focused on lane math so the topologies in [`crate::filters`] read
//! as plain update rules.

/// Caller-owned delay memory for comb lanes.
pub mod delay;
/// `f32x4` helpers: denormal flushing, lane access, per-lane maps.
pub mod lanes;
/// Bounded waveshapers for nonlinear feedback.
pub mod saturators;
/// Windowed-sinc kernels for fractional delay reads.
pub mod sinc;

pub use delay::CombBuffer;
pub use saturators::Saturator;
