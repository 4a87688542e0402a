use crate::dsp::sinc::{sinc_table, SINC_HALF, SINC_TAPS};

/// Ring size of a comb delay line. A power of two so cursors wrap with a mask.
pub const COMB_BUFFER_SIZE: usize = 8192;
const COMB_MASK: usize = COMB_BUFFER_SIZE - 1;

/// Shortest delay (in samples) a windowed-sinc read can serve.
pub const MIN_COMB_DELAY: f32 = (SINC_HALF + 1) as f32;
/// Longest delay (in samples) that keeps every sinc tap inside the ring.
pub const MAX_COMB_DELAY: f32 = (COMB_BUFFER_SIZE - SINC_TAPS - 1) as f32;

/// Caller-owned delay memory for one comb lane.
///
/// The buffer does not track its own write position: the cursor lives in the
/// filter state so four lanes can advance in lockstep. Allocate these on the
/// control path and lend them to a prepared filter for as long as it runs.
pub struct CombBuffer {
    buffer: Box<[f32]>,
}

impl CombBuffer {
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0; COMB_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn write(&mut self, write_pos: usize, sample: f32) {
        self.buffer[write_pos & COMB_MASK] = sample;
    }

    /// Read the signal `delay_samples` behind `write_pos` with sinc interpolation.
    ///
    /// `delay_samples` is clamped to [`MIN_COMB_DELAY`, `MAX_COMB_DELAY`].
    #[inline(always)]
    pub fn read_fractional(&self, write_pos: usize, delay_samples: f32) -> f32 {
        let delay = delay_samples.clamp(MIN_COMB_DELAY, MAX_COMB_DELAY);
        let whole = delay as usize;
        let frac = delay - whole as f32;
        let kernel = sinc_table().kernel(frac);

        // tap t reads the sample (whole - SINC_HALF + 1 + t) behind the cursor
        let newest = whole + 1 - SINC_HALF;
        let mut acc = 0.0;
        for (tap, &h) in kernel.iter().enumerate() {
            let back = newest + tap;
            acc += h * self.buffer[(write_pos + COMB_BUFFER_SIZE - back) & COMB_MASK];
        }
        acc
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
    }
}

impl Default for CombBuffer {
    fn default() -> Self {
        Self::new()
    }
}
