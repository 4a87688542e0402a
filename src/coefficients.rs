//! Control-rate coefficient computation and smoothing.
//!
//! A [`CoefficientMaker`] turns `(freq, resonance, type, subtype, extras)` into
//! a raw coefficient vector through the topology's own routine, then smooths
//! it against the previous target:
//!
//! ```text
//! first call after reset:  C = tC = N,             dC = 0
//! every later call:        tC = (1 - a) tC + a N,  dC = (tC - C) / blockSize
//! ```
//!
//! Audio-rate code adds `dC` to `C` once per sample, so `C` lands on `tC` at
//! the end of the block without the algorithms knowing about smoothing.
//!
//! The smoothing constant is per call, not per second: a larger block glides
//! over more wall-clock time.

use crate::dsp::lanes::{lane, splat, with_lane};
use crate::filters::{biquad, comb, ladder, svf, warp};
use crate::state::QuadFilterUnitState;
use crate::types::{
    ClassicSubType, CombMix, FilterSubType, FilterType, LadderSlope, SvfMode, WarpSubType,
};
use crate::{MAX_BLOCK_SIZE, N_COEFFS, N_LANES};

/// One-pole smoothing weight given to each new raw vector.
pub const SMOOTHING: f32 = 0.2;

/// Topology parameters beyond frequency and resonance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoefficientExtras {
    /// Bell and shelf gain of the state-variable filter, in dB.
    pub gain_db: f32,
}

#[derive(Debug, Clone)]
pub struct CoefficientMaker {
    /// Live coefficients, advanced by the audio-rate code.
    pub c: [f32; N_COEFFS],
    /// Per-sample increments.
    pub dc: [f32; N_COEFFS],
    /// Smoothed target.
    pub tc: [f32; N_COEFFS],
    last_raw: [f32; N_COEFFS],
    first_run: bool,
    sample_rate: f32,
    sample_rate_inv: f32,
    block_size: usize,
    block_size_inv: f32,
}

impl CoefficientMaker {
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        debug_assert!(sample_rate.is_finite() && sample_rate > 0.0);
        debug_assert!(block_size > 0 && block_size <= MAX_BLOCK_SIZE);
        Self {
            c: [0.0; N_COEFFS],
            dc: [0.0; N_COEFFS],
            tc: [0.0; N_COEFFS],
            last_raw: [0.0; N_COEFFS],
            first_run: true,
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
            block_size,
            block_size_inv: 1.0 / block_size as f32,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Back to the first-run state: the next computation snapshots verbatim.
    pub fn reset(&mut self) {
        self.c = [0.0; N_COEFFS];
        self.dc = [0.0; N_COEFFS];
        self.tc = [0.0; N_COEFFS];
        self.last_raw = [0.0; N_COEFFS];
        self.first_run = true;
    }

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Compute and smooth coefficients for one block. Unknown pairs leave the
    /// maker untouched.
    pub fn make_coefficients(
        &mut self,
        freq: f32,
        resonance: f32,
        filter_type: FilterType,
        sub_type: FilterSubType,
        extras: &CoefficientExtras,
    ) {
        if let Some(raw) = self.raw_coefficients(freq, resonance, filter_type, sub_type, extras) {
            self.from_direct(&raw);
        }
    }

    /// The unsmoothed vector for a pair, or `None` for pairs without a
    /// coefficient routine.
    pub fn raw_coefficients(
        &self,
        freq: f32,
        resonance: f32,
        filter_type: FilterType,
        sub_type: FilterSubType,
        extras: &CoefficientExtras,
    ) -> Option<[f32; N_COEFFS]> {
        if sub_type.0 >= filter_type.sub_type_count() {
            return None;
        }
        let inv = self.sample_rate_inv;
        let raw = match filter_type {
            FilterType::None => return None,
            FilterType::Lp12
            | FilterType::Lp24
            | FilterType::Hp12
            | FilterType::Hp24
            | FilterType::Bp12
            | FilterType::Bp24
            | FilterType::Notch12
            | FilterType::Notch24
            | FilterType::Allpass => {
                let (response, mode) = classic_response(filter_type)?;
                match ClassicSubType::from_sub_type(sub_type)? {
                    ClassicSubType::Standard | ClassicSubType::Driven => {
                        biquad::coefficients(response, freq, resonance, inv)
                    }
                    ClassicSubType::Clean => svf::coefficients(mode, freq, resonance, 0.0, inv),
                }
            }
            FilterType::LpMoog => {
                LadderSlope::from_sub_type(sub_type)?;
                ladder::moog_coefficients(freq, resonance, inv)
            }
            FilterType::DiodeLadder => {
                LadderSlope::from_sub_type(sub_type)?;
                ladder::diode_coefficients(freq, resonance, inv)
            }
            FilterType::CombPos | FilterType::CombNeg => {
                let mix = CombMix::from_sub_type(sub_type)?;
                let negative = filter_type == FilterType::CombNeg;
                comb::coefficients(freq, resonance, negative, mix, self.sample_rate)
            }
            FilterType::CytomicSvf => {
                let mode = SvfMode::from_sub_type(sub_type)?;
                svf::coefficients(mode, freq, resonance, extras.gain_db, inv)
            }
            FilterType::CutoffWarpLp
            | FilterType::CutoffWarpHp
            | FilterType::CutoffWarpN
            | FilterType::CutoffWarpBp
            | FilterType::CutoffWarpAp => {
                WarpSubType::from_sub_type(sub_type)?;
                warp::coefficients(warp_mode(filter_type)?, freq, resonance, inv)
            }
        };
        Some(raw)
    }

    /// The smoothing primitive, fed a raw coefficient vector directly.
    pub fn from_direct(&mut self, raw: &[f32; N_COEFFS]) {
        self.last_raw = *raw;
        if self.first_run {
            self.c = *raw;
            self.tc = *raw;
            self.dc = [0.0; N_COEFFS];
            self.first_run = false;
            return;
        }
        for i in 0..N_COEFFS {
            self.tc[i] = (1.0 - SMOOTHING) * self.tc[i] + SMOOTHING * raw[i];
            self.dc[i] = (self.tc[i] - self.c[i]) * self.block_size_inv;
        }
    }

    /// Smooth toward the last raw vector again, e.g. while parameters are
    /// frozen.
    pub fn reapply_last(&mut self) {
        let raw = self.last_raw;
        self.from_direct(&raw);
    }

    pub fn last_raw(&self) -> &[f32; N_COEFFS] {
        &self.last_raw
    }

    /// Broadcast these coefficients to every lane.
    pub fn to_state(&self, state: &mut QuadFilterUnitState<'_>) {
        for i in 0..N_COEFFS {
            state.c[i] = splat(self.c[i]);
            state.dc[i] = splat(self.dc[i]);
        }
    }

    /// Write these coefficients into one lane, leaving the others alone.
    pub fn to_state_lane(&self, state: &mut QuadFilterUnitState<'_>, lane_index: usize) {
        debug_assert!(lane_index < N_LANES);
        for i in 0..N_COEFFS {
            state.c[i] = with_lane(state.c[i], lane_index, self.c[i]);
            state.dc[i] = with_lane(state.dc[i], lane_index, self.dc[i]);
        }
    }

    /// Pull lane 0's interpolated coefficients back after a block.
    pub fn update_from_state(&mut self, state: &QuadFilterUnitState<'_>) {
        self.update_from_state_lane(state, 0);
    }

    pub fn update_from_state_lane(&mut self, state: &QuadFilterUnitState<'_>, lane_index: usize) {
        debug_assert!(lane_index < N_LANES);
        for i in 0..N_COEFFS {
            self.c[i] = lane(state.c[i], lane_index);
        }
    }

    /// Advance `C` by `n` samples locally, as an algorithm would.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            for i in 0..N_COEFFS {
                self.c[i] += self.dc[i];
            }
        }
    }
}

fn classic_response(filter_type: FilterType) -> Option<(biquad::Response, SvfMode)> {
    use biquad::Response;
    let pair = match filter_type {
        FilterType::Lp12 | FilterType::Lp24 => (Response::Lowpass, SvfMode::Lowpass),
        FilterType::Hp12 | FilterType::Hp24 => (Response::Highpass, SvfMode::Highpass),
        FilterType::Bp12 | FilterType::Bp24 => (Response::Bandpass, SvfMode::Bandpass),
        FilterType::Notch12 | FilterType::Notch24 => (Response::Notch, SvfMode::Notch),
        FilterType::Allpass => (Response::Allpass, SvfMode::Allpass),
        _ => return None,
    };
    Some(pair)
}

fn warp_mode(filter_type: FilterType) -> Option<SvfMode> {
    let mode = match filter_type {
        FilterType::CutoffWarpLp => SvfMode::Lowpass,
        FilterType::CutoffWarpHp => SvfMode::Highpass,
        FilterType::CutoffWarpN => SvfMode::Notch,
        FilterType::CutoffWarpBp => SvfMode::Bandpass,
        FilterType::CutoffWarpAp => SvfMode::Allpass,
        _ => return None,
    };
    Some(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 32;

    fn maker() -> CoefficientMaker {
        CoefficientMaker::new(48_000.0, BLOCK)
    }

    fn ramp(base: f32) -> [f32; N_COEFFS] {
        std::array::from_fn(|i| base + i as f32 * 0.1)
    }

    #[test]
    fn first_call_snapshots_verbatim() {
        let mut m = maker();
        let raw = ramp(0.3);
        m.from_direct(&raw);
        assert_eq!(m.c, raw);
        assert_eq!(m.tc, raw);
        assert_eq!(m.dc, [0.0; N_COEFFS]);
        assert!(!m.is_first_run());
    }

    #[test]
    fn later_calls_smooth_toward_input() {
        let mut m = maker();
        m.from_direct(&[0.0; N_COEFFS]);
        m.from_direct(&[1.0; N_COEFFS]);
        for i in 0..N_COEFFS {
            assert!((m.tc[i] - SMOOTHING).abs() < 1e-7);
            assert!((m.dc[i] - SMOOTHING / BLOCK as f32).abs() < 1e-7);
        }
    }

    #[test]
    fn one_block_of_deltas_lands_on_target() {
        let mut m = maker();
        m.from_direct(&ramp(0.0));
        m.from_direct(&ramp(2.0));
        m.advance(BLOCK);
        for i in 0..N_COEFFS {
            assert!((m.c[i] - m.tc[i]).abs() < 1e-5, "slot {i}: {} vs {}", m.c[i], m.tc[i]);
        }
    }

    #[test]
    fn reset_restores_first_run() {
        let mut m = maker();
        m.from_direct(&ramp(1.0));
        m.from_direct(&ramp(3.0));
        m.reset();
        assert!(m.is_first_run());
        let raw = ramp(5.0);
        m.from_direct(&raw);
        assert_eq!(m.c, raw);
    }

    #[test]
    fn reapply_last_repeats_the_same_smoothing_step() {
        let mut a = maker();
        let mut b = maker();
        for m in [&mut a, &mut b] {
            m.from_direct(&ramp(0.0));
            m.from_direct(&ramp(1.0));
        }
        a.reapply_last();
        b.from_direct(&ramp(1.0));
        assert_eq!(a.tc, b.tc);
        assert_eq!(a.dc, b.dc);
    }

    #[test]
    fn glide_time_depends_on_block_size() {
        // the same number of calls converges equally far regardless of block
        // size, so bigger blocks take longer in samples
        let mut small = CoefficientMaker::new(48_000.0, 16);
        let mut large = CoefficientMaker::new(48_000.0, 256);
        for m in [&mut small, &mut large] {
            m.from_direct(&[0.0; N_COEFFS]);
            for _ in 0..10 {
                m.from_direct(&[1.0; N_COEFFS]);
                let n = m.block_size();
                m.advance(n);
            }
        }
        assert!((small.c[0] - large.c[0]).abs() < 1e-4);
        let expected = 1.0 - (1.0 - SMOOTHING).powi(10);
        assert!((small.c[0] - expected).abs() < 1e-4);
    }

    #[test]
    fn unknown_pairs_are_a_no_op() {
        let mut m = maker();
        let extras = CoefficientExtras::default();
        m.make_coefficients(0.0, 0.5, FilterType::None, FilterSubType(0), &extras);
        assert!(m.is_first_run());
        m.make_coefficients(0.0, 0.5, FilterType::LpMoog, FilterSubType(9), &extras);
        assert!(m.is_first_run());
        m.make_coefficients(0.0, 0.5, FilterType::Allpass, FilterSubType(2), &extras);
        assert!(m.is_first_run());
        m.make_coefficients(0.0, 0.5, FilterType::CombPos, FilterSubType(2), &extras);
        assert!(m.is_first_run());
        m.make_coefficients(0.0, 0.5, FilterType::Allpass, FilterSubType(0), &extras);
        assert!(!m.is_first_run());
    }

    #[test]
    fn lane_exchange_round_trips() {
        let mut state = QuadFilterUnitState::new(48_000.0);
        let mut m = maker();
        m.from_direct(&ramp(1.0));
        m.to_state_lane(&mut state, 2);
        assert_eq!(lane(state.c[3], 2), m.c[3]);
        assert_eq!(lane(state.c[3], 1), 0.0);

        let mut other = maker();
        other.update_from_state_lane(&state, 2);
        assert_eq!(other.c, m.c);
    }

    #[test]
    fn broadcast_fills_every_lane() {
        let mut state = QuadFilterUnitState::new(48_000.0);
        let mut m = maker();
        m.from_direct(&ramp(0.5));
        m.to_state(&mut state);
        for i in 0..N_COEFFS {
            assert_eq!(state.c[i].to_array(), [m.c[i]; 4]);
        }
    }
}
