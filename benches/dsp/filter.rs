//! Benchmarks for the raw topology functions over a quad state.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_filters::types::{ClassicSubType, CombMix, LadderSlope, SvfMode, WarpSubType};
use saavy_filters::dsp::Saturator;
use saavy_filters::{
    get_qf_ptr, CoefficientExtras, CoefficientMaker, CombBuffer, FilterSubType, FilterType,
    QuadFilterUnitState,
};
use wide::f32x4;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    let cases: [(&str, FilterType, FilterSubType); 8] = [
        ("biquad_lp12", FilterType::Lp12, ClassicSubType::Standard.into()),
        ("biquad_lp24_driven", FilterType::Lp24, ClassicSubType::Driven.into()),
        ("svf_lp24_clean", FilterType::Lp24, ClassicSubType::Clean.into()),
        ("cytomic_bell", FilterType::CytomicSvf, SvfMode::Bell.into()),
        ("moog_24", FilterType::LpMoog, LadderSlope::Db24.into()),
        ("diode_24", FilterType::DiodeLadder, LadderSlope::Db24.into()),
        ("comb_pos", FilterType::CombPos, CombMix::Mix100.into()),
        ("warp_4_ojd", FilterType::CutoffWarpLp, WarpSubType::new(4, Saturator::Ojd).into()),
    ];

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp), different per lane
        let input: Vec<f32x4> = (0..size)
            .map(|i| {
                let x = (i as f32 / size as f32) * 2.0 - 1.0;
                f32x4::from([x, -x, 0.5 * x, x * x])
            })
            .collect();

        for (name, filter_type, sub_type) in cases {
            let Some(process) = get_qf_ptr(filter_type, sub_type) else {
                continue;
            };
            let mut buffers: [CombBuffer; 4] = Default::default();
            let [b0, b1, b2, b3] = &mut buffers;
            let mut state =
                QuadFilterUnitState::with_delay_buffers(SAMPLE_RATE, [Some(b0), Some(b1), Some(b2), Some(b3)]);
            let mut maker = CoefficientMaker::new(SAMPLE_RATE, size);
            maker.make_coefficients(-5.0, 0.5, filter_type, sub_type, &CoefficientExtras { gain_db: 6.0 });

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    maker.to_state(&mut state);
                    for &x in &input {
                        black_box(process(&mut state, black_box(x)));
                    }
                })
            });
        }
    }

    group.finish();
}
