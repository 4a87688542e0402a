//! Quad-voice analog-modeled filters with block-smoothed coefficients.
//!
//! Control rate: a [`CoefficientMaker`] per voice computes and smooths a
//! coefficient vector once per block. Audio rate: a function resolved by
//! [`get_qf_ptr`] advances four voices at a time over a
//! [`QuadFilterUnitState`]. [`FilterInstance`] ties the two together behind a
//! prepare / begin-block lifecycle.

pub mod coefficients; // Control-rate computation and smoothing
pub mod config; // Host-facing model and tuple tables
pub mod control;
pub mod dispatch;
pub mod dsp;
pub mod filters; // Topologies
pub mod instance;
pub mod state;
pub mod types; // Legacy (type, subtype) encoding

pub use coefficients::{CoefficientExtras, CoefficientMaker};
pub use config::{DriveMode, FilterModel, FilterSubModel, ModelConfig, Passband, Slope};
pub use control::{FilterMessage, MessageReceiver};
pub use dispatch::{get_compensated_qf_ptr, get_qf_ptr, CompensatedFilter};
pub use dsp::CombBuffer;
pub use filters::FilterUnitQFPtr;
pub use instance::{BlockProcessor, FilterInstance, PrepareError, PreparedFilter, VoiceParams};
pub use state::QuadFilterUnitState;
pub use types::{FilterSubType, FilterType, LegacyPair};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Coefficient slots per voice.
pub const N_COEFFS: usize = 8;
/// Register slots per voice.
pub const N_REGISTERS: usize = 16;
/// Voices processed together.
pub const N_LANES: usize = 4;
