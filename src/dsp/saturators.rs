//! Waveshapers used inside nonlinear feedback paths.
//!
//! All shapers are bounded to `[-1, 1]` so a saturated integrator state can
//! never run away, whatever the resonance.

use wide::f32x4;

use crate::dsp::lanes::{clamp_x4, map_lanes, splat};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Saturator {
    Tanh = 0,
    SoftClip = 1,
    Ojd = 2,
}

impl Saturator {
    pub const ALL: [Saturator; 3] = [Saturator::Tanh, Saturator::SoftClip, Saturator::Ojd];

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Saturator::Tanh),
            1 => Some(Saturator::SoftClip),
            2 => Some(Saturator::Ojd),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn apply(self, x: f32x4) -> f32x4 {
        match self {
            Saturator::Tanh => tanh_approx(x),
            Saturator::SoftClip => softclip(x),
            Saturator::Ojd => ojd(x),
        }
    }
}

/// Rational tanh approximation, exact at the clamp points `±3`.
#[inline(always)]
pub fn tanh_approx(x: f32x4) -> f32x4 {
    let x = clamp_x4(x, -3.0, 3.0);
    let x2 = x * x;
    x * (splat(27.0) + x2) / (splat(27.0) + splat(9.0) * x2)
}

/// Cubic soft clipper: `x - 4/27 x^3` on `[-1.5, 1.5]`.
#[inline(always)]
pub fn softclip(x: f32x4) -> f32x4 {
    let x = clamp_x4(x, -1.5, 1.5);
    x - splat(4.0 / 27.0) * x * x * x
}

/// Asymmetric overdrive curve: linear core, quadratic knees, hard rails.
#[inline(always)]
pub fn ojd_scalar(x: f32) -> f32 {
    const NEG_KNEE: f32 = -0.3;
    const POS_KNEE: f32 = 0.9;

    if x <= -1.7 {
        -1.0
    } else if x < NEG_KNEE {
        let y = x - NEG_KNEE;
        x + y * y / (4.0 * (1.0 + NEG_KNEE))
    } else if x < POS_KNEE {
        x
    } else if x < 1.1 {
        let y = x - POS_KNEE;
        x - y * y / (4.0 * (1.0 - POS_KNEE))
    } else {
        1.0
    }
}

#[inline(always)]
pub fn ojd(x: f32x4) -> f32x4 {
    map_lanes(x, ojd_scalar)
}
