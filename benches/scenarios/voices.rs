//! Benchmarks for prepared filters driven the way a synth host would.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_filters::{
    CombBuffer, DriveMode, FilterInstance, FilterMessage, FilterModel, FilterSubModel, ModelConfig,
    Passband, Slope, VoiceParams,
};
use wide::f32x4;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    let patches = [
        (
            "classic_lp24",
            FilterModel::VemberClassic,
            ModelConfig::new(Passband::Lowpass, Slope::Db24, DriveMode::Driven, FilterSubModel::Unsupported),
        ),
        (
            "ladder",
            FilterModel::VintageLadder,
            ModelConfig::new(Passband::Lowpass, Slope::Db24, DriveMode::Unsupported, FilterSubModel::Unsupported),
        ),
        ("comb", FilterModel::Comb, ModelConfig::with_submodel(FilterSubModel::Negative50)),
        (
            "warp",
            FilterModel::CutoffWarp,
            ModelConfig::new(Passband::Bandpass, Slope::Stage3, DriveMode::Tanh, FilterSubModel::Unsupported),
        ),
    ];

    for &size in BLOCK_SIZES {
        let saw: Vec<f32x4> = (0..size)
            .map(|i| {
                let x = (i as f32 * 110.0 / SAMPLE_RATE).fract() * 2.0 - 1.0;
                f32x4::splat(x)
            })
            .collect();

        for (name, model, config) in patches {
            let mut buffers: [CombBuffer; 4] = Default::default();
            let [b0, b1, b2, b3] = &mut buffers;
            let Ok(mut filter) = FilterInstance::new(SAMPLE_RATE, size)
                .with_model(model)
                .with_config(config)
                .prepare([Some(b0), Some(b1), Some(b2), Some(b3)])
            else {
                continue;
            };
            for lane in 0..4 {
                let _ = filter.set_voice(lane, VoiceParams::new(lane as f32 * 5.0, 0.6));
            }

            let mut block = saw.clone();
            let mut queue = VecDeque::with_capacity(4);
            let mut sweep = 0.0f32;
            // Filter sweep: one cutoff message per voice per block
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    sweep = if sweep > 36.0 { -36.0 } else { sweep + 1.0 };
                    for lane in 0..4 {
                        queue.push_back(FilterMessage::SetCutoff { lane, freq: sweep + lane as f32 });
                    }
                    filter.apply_messages(&mut queue);
                    block.copy_from_slice(&saw);
                    filter.process_block(black_box(&mut block));
                })
            });
        }
    }

    group.finish();
}
