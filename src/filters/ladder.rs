//! Four one-pole stages with global resonance feedback.
//!
//! The zero-delay feedback loop is solved in closed form: every trapezoidal
//! one-pole has output `y = G x + (1 - G) s`, so the last stage's output is an
//! affine function `Γ u + S` of the loop input `u`, and
//! `u = (x - k S) / (1 + k Γ)` follows without iteration. The 6/12/18/24 dB
//! variants read different taps of the same cascade.

use wide::f32x4;

use crate::dsp::lanes::{flush_denorm_x4, splat};
use crate::dsp::saturators::tanh_approx;
use crate::filters::{clamp_resonance, prewarped_gain};
use crate::state::QuadFilterUnitState;
use crate::N_COEFFS;

/// Feedback gain at full resonance, below the self-oscillation bound of 4.
const MAX_FEEDBACK: f32 = 3.95;
/// Fraction of the resonance-induced passband loss made up at the input.
const BASS_COMPENSATION: f32 = 0.5;
/// Per-stage cutoff scaling of the diode ladder.
const DIODE_STAGE_SCALE: [f32; 4] = [0.5, 1.0, 1.0, 1.0];

#[derive(Clone, Copy)]
enum MoogCoeff {
    G = 0,
    K,
    Comp,
}

const MOOG_COEFFS: usize = 3;

#[derive(Clone, Copy)]
enum DiodeCoeff {
    G1 = 0,
    G2,
    G3,
    G4,
    K,
    Comp,
}

const DIODE_COEFFS: usize = 6;

#[derive(Clone, Copy)]
enum Reg {
    S1 = 0,
    S2,
    S3,
    S4,
}

#[inline]
fn feedback(resonance: f32) -> f32 {
    MAX_FEEDBACK * clamp_resonance(resonance)
}

pub fn moog_coefficients(freq: f32, resonance: f32, sample_rate_inv: f32) -> [f32; N_COEFFS] {
    let g = prewarped_gain(freq, sample_rate_inv);
    let k = feedback(resonance);

    let mut c = [0.0; N_COEFFS];
    c[MoogCoeff::G as usize] = g / (1.0 + g);
    c[MoogCoeff::K as usize] = k;
    c[MoogCoeff::Comp as usize] = 1.0 + BASS_COMPENSATION * k;
    c
}

pub fn diode_coefficients(freq: f32, resonance: f32, sample_rate_inv: f32) -> [f32; N_COEFFS] {
    let g = prewarped_gain(freq, sample_rate_inv);
    let k = feedback(resonance);

    let mut c = [0.0; N_COEFFS];
    for (slot, scale) in DIODE_STAGE_SCALE.iter().enumerate() {
        let gs = g * scale;
        c[DiodeCoeff::G1 as usize + slot] = gs / (1.0 + gs);
    }
    c[DiodeCoeff::K as usize] = k;
    c[DiodeCoeff::Comp as usize] = 1.0 + BASS_COMPENSATION * k;
    c
}

/// One trapezoidal one-pole: returns the output and updates the state.
#[inline(always)]
fn one_pole(s: &mut QuadFilterUnitState<'_>, reg: Reg, input: f32x4, g: f32x4) -> f32x4 {
    let state = s.r[reg as usize];
    let v = (input - state) * g;
    let y = v + state;
    s.r[reg as usize] = flush_denorm_x4(y + v);
    y
}

#[inline(always)]
fn select_tap<const TAP: usize>(taps: [f32x4; 4]) -> f32x4 {
    taps[TAP]
}

/// Moog-style ladder, all four stages at the same cutoff.
pub fn moog<const TAP: usize>(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(MOOG_COEFFS);

    let g = s.c[MoogCoeff::G as usize];
    let k = s.c[MoogCoeff::K as usize];
    let comp = s.c[MoogCoeff::Comp as usize];
    let one = splat(1.0);
    let b = one - g;

    let s1 = s.r[Reg::S1 as usize];
    let s2 = s.r[Reg::S2 as usize];
    let s3 = s.r[Reg::S3 as usize];
    let s4 = s.r[Reg::S4 as usize];

    let sum = b * (g * (g * (g * s1 + s2) + s3) + s4);
    let g2 = g * g;
    let u = (comp * input - k * sum) / (one + k * g2 * g2);

    let y1 = one_pole(s, Reg::S1, u, g);
    let y2 = one_pole(s, Reg::S2, y1, g);
    let y3 = one_pole(s, Reg::S3, y2, g);
    let y4 = one_pole(s, Reg::S4, y3, g);

    select_tap::<TAP>([y1, y2, y3, y4])
}

/// Diode ladder: staggered stage cutoffs and a clipped loop input.
pub fn diode<const TAP: usize>(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(DIODE_COEFFS);

    let g1 = s.c[DiodeCoeff::G1 as usize];
    let g2 = s.c[DiodeCoeff::G2 as usize];
    let g3 = s.c[DiodeCoeff::G3 as usize];
    let g4 = s.c[DiodeCoeff::G4 as usize];
    let k = s.c[DiodeCoeff::K as usize];
    let comp = s.c[DiodeCoeff::Comp as usize];
    let one = splat(1.0);

    let s1 = s.r[Reg::S1 as usize];
    let s2 = s.r[Reg::S2 as usize];
    let s3 = s.r[Reg::S3 as usize];
    let s4 = s.r[Reg::S4 as usize];

    let sum = (one - g4) * s4
        + g4 * ((one - g3) * s3 + g3 * ((one - g2) * s2 + g2 * (one - g1) * s1));
    let gamma = g1 * g2 * g3 * g4;
    let u = tanh_approx((comp * input - k * sum) / (one + k * gamma));

    let y1 = one_pole(s, Reg::S1, u, g1);
    let y2 = one_pole(s, Reg::S2, y1, g2);
    let y3 = one_pole(s, Reg::S3, y2, g3);
    let y4 = one_pole(s, Reg::S4, y3, g4);

    select_tap::<TAP>([y1, y2, y3, y4])
}
