use wide::f32x4;

use crate::dsp::lanes::{flush_denorm_x4, splat};
use crate::filters::{clamp_resonance, prewarped_gain};
use crate::state::QuadFilterUnitState;
use crate::types::SvfMode;
use crate::N_COEFFS;

/*
Trapezoidal state-variable filter
=================================

Two trapezoidal integrators (ic1eq, ic2eq) solved without unit delays. One
update shape produces every response; the mode only changes the output mix
m0 * in + m1 * v1 + m2 * v2 loaded at control rate:

| mode       | m0   | m1          | m2       | notes                   |
| ---------- | ---- | ----------- | -------- | ----------------------- |
| lowpass    | 0    | 0           | 1        |                         |
| highpass   | 1    | -k          | -1       |                         |
| bandpass   | 0    | 1           | 0        | unity peak at k = 1     |
| notch      | 1    | -k          | 0        |                         |
| peak       | 1    | -k          | -2       |                         |
| allpass    | 1    | -2k         | 0        |                         |
| bell       | 1    | k(A^2 - 1)  | 0        | k = k / A               |
| low shelf  | 1    | k(A - 1)    | A^2 - 1  | g = g / sqrt(A)         |
| high shelf | A^2  | k(1 - A)A   | 1 - A^2  | g = g * sqrt(A)         |

with g = tan(pi * fc / fs), k = 2 - 2 * resonance, A = 10^(gain_db / 40).
*/

#[derive(Clone, Copy)]
pub(crate) enum Coeff {
    A1 = 0,
    A2,
    A3,
    M0,
    M1,
    M2,
}

pub(crate) const SVF_COEFFS: usize = 6;

#[derive(Clone, Copy)]
pub(crate) enum Reg {
    Ic1eq = 0,
    Ic2eq,
    Ic1eqB,
    Ic2eqB,
}

/// Damping term for a normalised resonance.
#[inline]
pub(crate) fn damping(resonance: f32) -> f32 {
    2.0 - 2.0 * clamp_resonance(resonance)
}

/// Raw coefficients for one SVF mode.
pub fn coefficients(
    mode: SvfMode,
    freq: f32,
    resonance: f32,
    gain_db: f32,
    sample_rate_inv: f32,
) -> [f32; N_COEFFS] {
    let mut g = prewarped_gain(freq, sample_rate_inv);
    let mut k = damping(resonance);
    let amp = 10.0_f32.powf(gain_db.clamp(-48.0, 48.0) / 40.0);

    let (m0, m1, m2) = match mode {
        SvfMode::Lowpass => (0.0, 0.0, 1.0),
        SvfMode::Highpass => (1.0, -k, -1.0),
        SvfMode::Bandpass => (0.0, 1.0, 0.0),
        SvfMode::Notch => (1.0, -k, 0.0),
        SvfMode::Peak => (1.0, -k, -2.0),
        SvfMode::Allpass => (1.0, -2.0 * k, 0.0),
        SvfMode::Bell => {
            k /= amp;
            (1.0, k * (amp * amp - 1.0), 0.0)
        }
        SvfMode::LowShelf => {
            g /= amp.sqrt();
            (1.0, k * (amp - 1.0), amp * amp - 1.0)
        }
        SvfMode::HighShelf => {
            g *= amp.sqrt();
            (amp * amp, k * (1.0 - amp) * amp, 1.0 - amp * amp)
        }
    };

    let a1 = 1.0 / (1.0 + g * (g + k));
    let a2 = g * a1;
    let a3 = g * a2;

    let mut c = [0.0; N_COEFFS];
    c[Coeff::A1 as usize] = a1;
    c[Coeff::A2 as usize] = a2;
    c[Coeff::A3 as usize] = a3;
    c[Coeff::M0 as usize] = m0;
    c[Coeff::M1 as usize] = m1;
    c[Coeff::M2 as usize] = m2;
    c
}

/// Integrator outputs `(v1, v2)` of one stage, states updated in place.
///
/// `shape` is applied to the first integrator's next state; pass the identity
/// for the linear filter.
#[inline(always)]
pub(crate) fn stage(
    s: &mut QuadFilterUnitState<'_>,
    input: f32x4,
    ic1: usize,
    ic2: usize,
    shape: impl Fn(f32x4) -> f32x4,
) -> (f32x4, f32x4) {
    let a1 = s.c[Coeff::A1 as usize];
    let a2 = s.c[Coeff::A2 as usize];
    let a3 = s.c[Coeff::A3 as usize];
    let two = splat(2.0);

    let v3 = input - s.r[ic2];
    let v1 = a1 * s.r[ic1] + a2 * v3;
    let v2 = s.r[ic2] + a2 * s.r[ic1] + a3 * v3;

    s.r[ic1] = flush_denorm_x4(shape(two * v1 - s.r[ic1]));
    s.r[ic2] = flush_denorm_x4(two * v2 - s.r[ic2]);

    (v1, v2)
}

#[inline(always)]
pub(crate) fn mix(s: &QuadFilterUnitState<'_>, input: f32x4, v1: f32x4, v2: f32x4) -> f32x4 {
    s.c[Coeff::M0 as usize] * input + s.c[Coeff::M1 as usize] * v1 + s.c[Coeff::M2 as usize] * v2
}

/// Single 12 dB stage.
pub fn svf(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(SVF_COEFFS);
    let (v1, v2) = stage(s, input, Reg::Ic1eq as usize, Reg::Ic2eq as usize, |x| x);
    mix(s, input, v1, v2)
}

/// Two identical stages in series, 24 dB.
pub fn svf_cascade(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(SVF_COEFFS);
    let (v1, v2) = stage(s, input, Reg::Ic1eq as usize, Reg::Ic2eq as usize, |x| x);
    let mid = mix(s, input, v1, v2);
    let (v1, v2) = stage(s, mid, Reg::Ic1eqB as usize, Reg::Ic2eqB as usize, |x| x);
    mix(s, mid, v1, v2)
}
