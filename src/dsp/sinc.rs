//! Windowed-sinc table for fractional delay reads.
//!
//! Built once on the control path; [`sinc_table`] is cheap after the first call
//! and the audio thread only ever sees the initialised table.

use std::f32::consts::PI;
use std::sync::OnceLock;

/// Interpolation taps per read.
pub const SINC_TAPS: usize = 8;
/// Half-width of the kernel; also the minimum integral delay of a read.
pub const SINC_HALF: usize = SINC_TAPS / 2;
/// Fractional resolution of the table.
pub const SINC_PHASES: usize = 256;

pub struct SincTable {
    rows: Vec<[f32; SINC_TAPS]>,
}

impl SincTable {
    fn build() -> Self {
        let rows = (0..=SINC_PHASES)
            .map(|phase| {
                let frac = phase as f32 / SINC_PHASES as f32;
                let mut row = [0.0f32; SINC_TAPS];
                for (tap, h) in row.iter_mut().enumerate() {
                    let x = tap as f32 - (SINC_HALF as f32 - 1.0) - frac;
                    *h = sinc(x) * blackman(x / SINC_HALF as f32);
                }
                let sum: f32 = row.iter().sum();
                for h in &mut row {
                    *h /= sum;
                }
                row
            })
            .collect();

        Self { rows }
    }

    /// Kernel for a fractional offset in `[0, 1]`.
    #[inline(always)]
    pub fn kernel(&self, frac: f32) -> &[f32; SINC_TAPS] {
        let phase = (frac * SINC_PHASES as f32 + 0.5) as usize;
        &self.rows[phase.min(SINC_PHASES)]
    }
}

fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-6 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Blackman window over `[-1, 1]`.
fn blackman(x: f32) -> f32 {
    if x.abs() >= 1.0 {
        0.0
    } else {
        0.42 + 0.5 * (PI * x).cos() + 0.08 * (2.0 * PI * x).cos()
    }
}

static SINC_TABLE: OnceLock<SincTable> = OnceLock::new();

pub fn sinc_table() -> &'static SincTable {
    SINC_TABLE.get_or_init(SincTable::build)
}
