//! Feedback comb over caller-owned delay memory.
//!
//! `w[n] = x[n] + fb * w[n - D]`, `y[n] = (1 - wet) * x[n] + wet * w[n - D]`
//! with `D = fs / f` read through a windowed sinc. Lanes are serviced one at a
//! time because each has its own buffer and cursor; inactive lanes are skipped
//! entirely and output silence.

use wide::f32x4;

use crate::dsp::delay::{MAX_COMB_DELAY, MIN_COMB_DELAY};
use crate::dsp::lanes::flush_denorm;
use crate::filters::{clamp_resonance, note_to_hz};
use crate::state::QuadFilterUnitState;
use crate::types::CombMix;
use crate::{N_COEFFS, N_LANES};

const MAX_FEEDBACK: f32 = 0.95;

#[derive(Clone, Copy)]
enum Coeff {
    Delay = 0,
    Feedback,
    Wet,
}

const COMB_COEFFS: usize = 3;

pub fn coefficients(
    freq: f32,
    resonance: f32,
    negative: bool,
    mix: CombMix,
    sample_rate: f32,
) -> [f32; N_COEFFS] {
    let delay = (sample_rate / note_to_hz(freq)).clamp(MIN_COMB_DELAY, MAX_COMB_DELAY);
    let feedback = MAX_FEEDBACK * clamp_resonance(resonance);

    let mut c = [0.0; N_COEFFS];
    c[Coeff::Delay as usize] = delay;
    c[Coeff::Feedback as usize] = if negative { -feedback } else { feedback };
    c[Coeff::Wet as usize] = mix.wet();
    c
}

pub fn comb(s: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
    s.advance_coefficients(COMB_COEFFS);

    let delay = s.c[Coeff::Delay as usize].to_array();
    let feedback = s.c[Coeff::Feedback as usize].to_array();
    let wet = s.c[Coeff::Wet as usize].to_array();
    let x = input.to_array();
    let mut out = [0.0f32; N_LANES];

    for lane in 0..N_LANES {
        if !s.active[lane] {
            continue;
        }
        let pos = s.write_pos[lane];
        let Some(buffer) = s.delay_buffers[lane].as_deref_mut() else {
            debug_assert!(false, "active comb lane {lane} has no delay buffer");
            continue;
        };

        let delayed = buffer.read_fractional(pos, delay[lane]);
        buffer.write(pos, flush_denorm(x[lane] + feedback[lane] * delayed));
        out[lane] = (1.0 - wet[lane]) * x[lane] + wet[lane] * delayed;

        s.advance_write_pos(lane);
    }

    f32x4::from(out)
}
