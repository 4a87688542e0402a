//! Cutoff warp: one to four SVF stages in series whose first integrator is
//! pushed through a bounded waveshaper.
//!
//! Saturating the bandpass integrator squeezes the resonance loop at high
//! levels, which bends the effective cutoff with the signal. The second
//! integrator is a contraction driven by bounded inputs, so the whole stage is
//! stable for any resonance.

use wide::f32x4;

use crate::dsp::saturators::{ojd, softclip, tanh_approx};
use crate::filters::svf::{self, SVF_COEFFS};
use crate::state::QuadFilterUnitState;
use crate::types::SvfMode;
use crate::N_COEFFS;

/// Warp filters share the SVF slot layout; `mode` picks the stage response.
pub fn coefficients(mode: SvfMode, freq: f32, resonance: f32, sample_rate_inv: f32) -> [f32; N_COEFFS] {
    svf::coefficients(mode, freq, resonance, 0.0, sample_rate_inv)
}

#[inline(always)]
fn saturate<const SAT: u8>(x: f32x4) -> f32x4 {
    match SAT {
        0 => tanh_approx(x),
        1 => softclip(x),
        _ => ojd(x),
    }
}

/// `STAGES` cascaded warp stages using saturator index `SAT`.
pub fn cutoff_warp<const STAGES: usize, const SAT: u8>(
    s: &mut QuadFilterUnitState<'_>,
    input: f32x4,
) -> f32x4 {
    s.advance_coefficients(SVF_COEFFS);

    let mut x = input;
    for stage in 0..STAGES {
        let (v1, v2) = svf::stage(s, x, 2 * stage, 2 * stage + 1, saturate::<SAT>);
        x = svf::mix(s, x, v1, v2);
    }
    x
}
