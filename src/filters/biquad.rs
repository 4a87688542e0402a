use std::f32::consts::TAU;

use wide::f32x4;

use crate::dsp::lanes::flush_denorm_x4;
use crate::dsp::saturators::tanh_approx;
use crate::filters::{clamp_cutoff, clamp_resonance, note_to_hz};
use crate::state::QuadFilterUnitState;
use crate::N_COEFFS;

/// Responses available from the bilinear biquad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
    Allpass,
}

#[derive(Clone, Copy)]
enum Coeff {
    B0 = 0,
    B1,
    B2,
    A1,
    A2,
}

const BIQUAD_COEFFS: usize = 5;

#[derive(Clone, Copy)]
enum Reg {
    Z1 = 0,
    Z2,
    Z1B,
    Z2B,
}

/// Quality factor for a normalised resonance; `0.5` at zero, peaking at 25.
#[inline]
pub(crate) fn resonance_to_q(resonance: f32) -> f32 {
    0.5 / (1.0 - clamp_resonance(resonance))
}

/// Normalised cookbook biquad for `response` at `freq` (semitones from A440).
pub fn coefficients(
    response: Response,
    freq: f32,
    resonance: f32,
    sample_rate_inv: f32,
) -> [f32; N_COEFFS] {
    let hz = clamp_cutoff(note_to_hz(freq), sample_rate_inv);
    let w0 = TAU * hz * sample_rate_inv;
    let (sin, cos) = w0.sin_cos();
    let alpha = sin / (2.0 * resonance_to_q(resonance));

    let (b0, b1, b2) = match response {
        Response::Lowpass => ((1.0 - cos) * 0.5, 1.0 - cos, (1.0 - cos) * 0.5),
        Response::Highpass => ((1.0 + cos) * 0.5, -(1.0 + cos), (1.0 + cos) * 0.5),
        Response::Bandpass => (alpha, 0.0, -alpha),
        Response::Notch => (1.0, -2.0 * cos, 1.0),
        Response::Allpass => (1.0 - alpha, -2.0 * cos, 1.0 + alpha),
    };
    let a0_inv = 1.0 / (1.0 + alpha);

    let mut c = [0.0; N_COEFFS];
    c[Coeff::B0 as usize] = b0 * a0_inv;
    c[Coeff::B1 as usize] = b1 * a0_inv;
    c[Coeff::B2 as usize] = b2 * a0_inv;
    c[Coeff::A1 as usize] = -2.0 * cos * a0_inv;
    c[Coeff::A2 as usize] = (1.0 - alpha) * a0_inv;
    c
}

// Transposed direct form II. The driven variant feeds a saturated copy of the
// output back into both state updates, so the states stay bounded.
#[inline(always)]
fn stage<const DRIVEN: bool>(
    s: &mut QuadFilterUnitState<'_>,
    input: f32x4,
    z1: usize,
    z2: usize,
) -> f32x4 {
    let b0 = s.c[Coeff::B0 as usize];
    let b1 = s.c[Coeff::B1 as usize];
    let b2 = s.c[Coeff::B2 as usize];
    let a1 = s.c[Coeff::A1 as usize];
    let a2 = s.c[Coeff::A2 as usize];

    let y = b0 * input + s.r[z1];
    let fb = if DRIVEN { tanh_approx(y) } else { y };

    s.r[z1] = flush_denorm_x4(b1 * input - a1 * fb + s.r[z2]);
    s.r[z2] = flush_denorm_x4(b2 * input - a2 * fb);
    y
}

pub fn iir12<const DRIVEN: bool>(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(BIQUAD_COEFFS);
    stage::<DRIVEN>(s, input, Reg::Z1 as usize, Reg::Z2 as usize)
}

pub fn iir24<const DRIVEN: bool>(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(BIQUAD_COEFFS);
    let mid = stage::<DRIVEN>(s, input, Reg::Z1 as usize, Reg::Z2 as usize);
    stage::<DRIVEN>(s, mid, Reg::Z1B as usize, Reg::Z2B as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::hz_to_note;
    use crate::filters::test_support::{peak_after_transient, render, sine, state_with, SAMPLE_RATE};

    fn make(response: Response, cutoff_hz: f32, resonance: f32) -> [f32; N_COEFFS] {
        coefficients(response, hz_to_note(cutoff_hz), resonance, 1.0 / SAMPLE_RATE)
    }

    #[test]
    fn lowpass_passes_dc_highpass_blocks_it() {
        let out = render(iir12::<false>, &mut state_with(make(Response::Lowpass, 800.0, 0.2)), &[1.0; 1024]);
        assert!((out[1023] - 1.0).abs() < 1e-3, "lp dc = {}", out[1023]);

        let out = render(iir12::<false>, &mut state_with(make(Response::Highpass, 800.0, 0.2)), &[1.0; 1024]);
        assert!(out[1023].abs() < 1e-3, "hp dc = {}", out[1023]);
    }

    #[test]
    fn twenty_four_db_attenuates_more_than_twelve() {
        let coeffs = make(Response::Lowpass, 500.0, 0.0);
        let input = sine(6_000.0, 2048);
        let p12 = peak_after_transient(&render(iir12::<false>, &mut state_with(coeffs), &input));
        let p24 = peak_after_transient(&render(iir24::<false>, &mut state_with(coeffs), &input));
        assert!(p24 < p12 * 0.1, "12dB={p12}, 24dB={p24}");
    }

    #[test]
    fn notch_and_allpass_behave() {
        let notch = make(Response::Notch, 1_000.0, 0.5);
        let center = peak_after_transient(&render(iir12::<false>, &mut state_with(notch), &sine(1_000.0, 2048)));
        assert!(center < 0.01, "notch center = {center}");

        let allpass = make(Response::Allpass, 1_000.0, 0.5);
        let peak = peak_after_transient(&render(iir12::<false>, &mut state_with(allpass), &sine(3_000.0, 2048)));
        assert!((peak - 1.0).abs() < 0.05, "allpass = {peak}");
    }

    #[test]
    fn bandpass_peaks_at_unity() {
        let coeffs = make(Response::Bandpass, 2_000.0, 0.7);
        let peak = peak_after_transient(&render(iir12::<false>, &mut state_with(coeffs), &sine(2_000.0, 2048)));
        assert!((peak - 1.0).abs() < 0.05, "bandpass peak = {peak}");
    }

    #[test]
    fn driven_matches_standard_at_low_level() {
        let coeffs = make(Response::Lowpass, 1_000.0, 0.5);
        let input: Vec<f32> = sine(300.0, 1024).iter().map(|x| x * 0.01).collect();
        let clean = render(iir24::<false>, &mut state_with(coeffs), &input);
        let driven = render(iir24::<true>, &mut state_with(coeffs), &input);
        for (a, b) in clean.iter().zip(&driven) {
            assert!((a - b).abs() < 1e-4, "{a} vs {b}");
        }
    }

    #[test]
    fn driven_stays_bounded_under_hot_input() {
        let coeffs = make(Response::Lowpass, 1_000.0, 0.98);
        let input: Vec<f32> = sine(1_000.0, 4096).iter().map(|x| x * 100.0).collect();
        let out = render(iir12::<true>, &mut state_with(coeffs), &input);
        assert!(out.iter().all(|y| y.is_finite() && y.abs() < 200.0));
    }
}
