//! Lane-wise helpers over `wide::f32x4`.
//!
//! Everything here is `#[inline(always)]` and allocation-free. Per-lane maps go
//! through a stack array, which the optimiser keeps in registers.

use wide::f32x4;

use crate::N_LANES;

const DENORM_THRESH: f32 = 1.0e-20;

/// Flush denormals and non-finite values to zero.
#[inline(always)]
pub fn flush_denorm(x: f32) -> f32 {
    if !x.is_finite() || x.abs() < DENORM_THRESH {
        0.0
    } else {
        x
    }
}

/// Lane-wise [`flush_denorm`].
#[inline(always)]
pub fn flush_denorm_x4(v: f32x4) -> f32x4 {
    f32x4::from(v.to_array().map(flush_denorm))
}

#[inline(always)]
pub fn splat(x: f32) -> f32x4 {
    f32x4::splat(x)
}

#[inline(always)]
pub fn zero() -> f32x4 {
    f32x4::splat(0.0)
}

#[inline(always)]
pub fn lane(v: f32x4, index: usize) -> f32 {
    v.to_array()[index]
}

/// Return `v` with lane `index` replaced by `x`.
#[inline(always)]
pub fn with_lane(v: f32x4, index: usize, x: f32) -> f32x4 {
    let mut arr = v.to_array();
    arr[index] = x;
    f32x4::from(arr)
}

/// Apply a scalar function to every lane.
#[inline(always)]
pub fn map_lanes(v: f32x4, f: impl Fn(f32) -> f32) -> f32x4 {
    f32x4::from(v.to_array().map(f))
}

/// Keep lanes where `mask` is set, zero the rest.
#[inline(always)]
pub fn select_active(v: f32x4, mask: &[bool; N_LANES]) -> f32x4 {
    let mut arr = v.to_array();
    for (x, &on) in arr.iter_mut().zip(mask) {
        if !on {
            *x = 0.0;
        }
    }
    f32x4::from(arr)
}

#[inline(always)]
pub fn clamp_x4(v: f32x4, lo: f32, hi: f32) -> f32x4 {
    v.max(f32x4::splat(lo)).min(f32x4::splat(hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_zeroes_tiny_and_non_finite_values() {
        assert_eq!(flush_denorm(1.0e-30), 0.0);
        assert_eq!(flush_denorm(f32::NAN), 0.0);
        assert_eq!(flush_denorm(f32::INFINITY), 0.0);
        assert_eq!(flush_denorm(0.25), 0.25);

        let v = flush_denorm_x4(f32x4::from([1.0e-25, -0.5, f32::NAN, 3.0]));
        assert_eq!(v.to_array(), [0.0, -0.5, 0.0, 3.0]);
    }

    #[test]
    fn lane_replacement_leaves_other_lanes_alone() {
        let v = f32x4::from([1.0, 2.0, 3.0, 4.0]);
        let w = with_lane(v, 2, 9.0);
        assert_eq!(w.to_array(), [1.0, 2.0, 9.0, 4.0]);
        assert_eq!(lane(w, 3), 4.0);
    }

    #[test]
    fn select_active_zeroes_masked_lanes() {
        let v = f32x4::from([1.0, 2.0, 3.0, 4.0]);
        let masked = select_active(v, &[true, false, true, false]);
        assert_eq!(masked.to_array(), [1.0, 0.0, 3.0, 0.0]);
    }
}
