//! Filter topologies.
//!
//! Every topology is a pair of pure functions: a control-rate routine that
//! turns `(freq, resonance, subtype, ...)` into a raw coefficient vector, and
//! one or more audio-rate update rules with the [`FilterUnitQFPtr`] shape.
//!
//! Update rules obey one contract:
//! - add `dC` to each coefficient slot they use, once, before anything else;
//! - touch only their own register slots (slots overlap between topologies);
//! - never allocate, flush denormals inline;
//! - skip inactive lanes wherever external memory is touched.

use std::f32::consts::PI;

use wide::f32x4;

use crate::state::QuadFilterUnitState;

/// Classic 12/24 dB bilinear biquads, plain and driven.
pub mod biquad;
/// Feedback comb with sinc-interpolated delay reads.
pub mod comb;
/// Closed-form ladder cascades (Moog-style and diode).
pub mod ladder;
/// Trapezoidal state-variable filter in every Cytomic mode.
pub mod svf;
/// Cascaded SVF stages with saturated resonance feedback.
pub mod warp;

/// One sample of one topology across four lanes.
pub type FilterUnitQFPtr = fn(&mut QuadFilterUnitState<'_>, f32x4) -> f32x4;

/// Lowest cutoff any topology will tune to.
pub(crate) const MIN_CUTOFF_HZ: f32 = 5.0;
/// Highest cutoff as a fraction of the sample rate.
pub(crate) const MAX_CUTOFF_RATIO: f32 = 0.48;
/// Upper bound on normalised resonance before a topology applies its own map.
pub(crate) const MAX_RESONANCE: f32 = 0.98;

/// Semitones relative to A440 to Hz.
#[inline]
pub fn note_to_hz(note: f32) -> f32 {
    440.0 * 2.0_f32.powf(note / 12.0)
}

/// Hz to semitones relative to A440.
#[inline]
pub fn hz_to_note(hz: f32) -> f32 {
    12.0 * (hz / 440.0).log2()
}

#[inline]
pub(crate) fn clamp_cutoff(hz: f32, sample_rate_inv: f32) -> f32 {
    let max = MAX_CUTOFF_RATIO / sample_rate_inv;
    hz.clamp(MIN_CUTOFF_HZ, max)
}

/// Prewarped integrator gain `tan(pi * fc / fs)` for a cutoff note.
#[inline]
pub(crate) fn prewarped_gain(note: f32, sample_rate_inv: f32) -> f32 {
    let hz = clamp_cutoff(note_to_hz(note), sample_rate_inv);
    (PI * hz * sample_rate_inv).tan()
}

#[inline]
pub(crate) fn clamp_resonance(resonance: f32) -> f32 {
    if resonance.is_finite() {
        resonance.clamp(0.0, MAX_RESONANCE)
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::f32::consts::TAU;

    use super::FilterUnitQFPtr;
    use crate::dsp::lanes::splat;
    use crate::state::QuadFilterUnitState;
    use crate::N_COEFFS;

    pub const SAMPLE_RATE: f32 = 48_000.0;

    pub fn state_with(coeffs: [f32; N_COEFFS]) -> QuadFilterUnitState<'static> {
        let mut state = QuadFilterUnitState::new(SAMPLE_RATE);
        for (c, &value) in state.c.iter_mut().zip(&coeffs) {
            *c = splat(value);
        }
        state
    }

    pub fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    /// Run `input` through lane 0 of `process`.
    pub fn render(
        process: FilterUnitQFPtr,
        state: &mut QuadFilterUnitState<'_>,
        input: &[f32],
    ) -> Vec<f32> {
        input
            .iter()
            .map(|&x| process(state, splat(x)).to_array()[0])
            .collect()
    }

    pub fn rms(buffer: &[f32]) -> f32 {
        (buffer.iter().map(|x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
    }

    pub fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(512);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }
}
