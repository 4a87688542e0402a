//! Benchmarks for control-rate coefficient computation.

use std::hint::black_box;

use criterion::Criterion;
use saavy_filters::{CoefficientExtras, CoefficientMaker, FilterSubType, FilterType};

pub fn bench_coefficients(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/coefficients");
    let extras = CoefficientExtras::default();

    // One maker per voice, so four calls per block
    for (name, filter_type, sub_type) in [
        ("biquad", FilterType::Lp24, FilterSubType(0)),
        ("cytomic", FilterType::CytomicSvf, FilterSubType(7)),
        ("diode", FilterType::DiodeLadder, FilterSubType(3)),
        ("comb", FilterType::CombNeg, FilterSubType(1)),
    ] {
        let mut makers: [CoefficientMaker; 4] =
            std::array::from_fn(|_| CoefficientMaker::new(48_000.0, 64));
        let mut note = 0.0f32;
        group.bench_function(name, |b| {
            b.iter(|| {
                note = if note > 24.0 { -24.0 } else { note + 0.5 };
                for maker in &mut makers {
                    maker.make_coefficients(black_box(note), 0.7, filter_type, sub_type, &extras);
                }
            })
        });
    }

    group.finish();
}
