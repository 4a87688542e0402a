//! The quad-lane filter state threaded through every algorithm call.

use wide::f32x4;

use crate::dsp::delay::{CombBuffer, COMB_BUFFER_SIZE};
use crate::dsp::lanes::{with_lane, zero};
use crate::{N_COEFFS, N_LANES, N_REGISTERS};

/// Register file, live coefficients and per-lane metadata for up to four
/// independent voices processed in SIMD lockstep.
///
/// `'a` is the lifetime of the caller-owned comb buffers. The state never
/// allocates and never frees them.
pub struct QuadFilterUnitState<'a> {
    /// Live coefficients, one lane per voice.
    pub c: [f32x4; N_COEFFS],
    /// Per-sample coefficient increments.
    pub dc: [f32x4; N_COEFFS],
    /// Integrator and feedback memory; slot meaning is per topology.
    pub r: [f32x4; N_REGISTERS],
    pub delay_buffers: [Option<&'a mut CombBuffer>; N_LANES],
    pub active: [bool; N_LANES],
    pub write_pos: [usize; N_LANES],
    pub sample_rate: f32,
    pub sample_rate_inv: f32,
}

impl<'a> QuadFilterUnitState<'a> {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            c: [zero(); N_COEFFS],
            dc: [zero(); N_COEFFS],
            r: [zero(); N_REGISTERS],
            delay_buffers: [None, None, None, None],
            active: [true; N_LANES],
            write_pos: [0; N_LANES],
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
        }
    }

    pub fn with_delay_buffers(
        sample_rate: f32,
        delay_buffers: [Option<&'a mut CombBuffer>; N_LANES],
    ) -> Self {
        Self {
            delay_buffers,
            ..Self::new(sample_rate)
        }
    }

    /// `C += dC` over the first `slots` coefficients.
    #[inline(always)]
    pub fn advance_coefficients(&mut self, slots: usize) {
        for (c, dc) in self.c.iter_mut().zip(&self.dc).take(slots) {
            *c = *c + *dc;
        }
    }

    /// Zero every register and rewind the delay cursors. Required whenever a
    /// lane changes topology, since register subsets overlap.
    pub fn reset_registers(&mut self) {
        self.r = [zero(); N_REGISTERS];
        self.write_pos = [0; N_LANES];
        for buffer in self.delay_buffers.iter_mut().flatten() {
            buffer.reset();
        }
    }

    /// Stop one lane's coefficients from gliding. Its live values are kept.
    pub fn hold_lane(&mut self, lane: usize) {
        debug_assert!(lane < N_LANES);
        for dc in &mut self.dc {
            *dc = with_lane(*dc, lane, 0.0);
        }
    }

    /// Zero one lane's registers and delay memory.
    pub fn reset_lane(&mut self, lane: usize) {
        debug_assert!(lane < N_LANES);
        for r in &mut self.r {
            *r = with_lane(*r, lane, 0.0);
        }
        self.write_pos[lane] = 0;
        if let Some(buffer) = self.delay_buffers[lane].as_deref_mut() {
            buffer.reset();
        }
    }

    #[inline(always)]
    pub fn advance_write_pos(&mut self, lane: usize) {
        self.write_pos[lane] = (self.write_pos[lane] + 1) & (COMB_BUFFER_SIZE - 1);
    }

    pub fn active_lanes(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}
