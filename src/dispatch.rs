//! `(FilterType, FilterSubType)` → processing function.
//!
//! A pure static switch. Families with many subtypes resolve through dense
//! tables of monomorphized instantiations so the hot path stays a single
//! indirect call.

use wide::f32x4;

use crate::filters::biquad::{iir12, iir24};
use crate::filters::comb::comb;
use crate::filters::ladder::{diode, moog};
use crate::filters::svf::{svf, svf_cascade};
use crate::filters::warp::cutoff_warp;
use crate::filters::FilterUnitQFPtr;
use crate::state::QuadFilterUnitState;
use crate::types::{
    ClassicSubType, CombMix, FilterSubType, FilterType, LadderSlope, SvfMode, WarpSubType,
};

const MOOG_TAPS: [FilterUnitQFPtr; 4] = [moog::<0>, moog::<1>, moog::<2>, moog::<3>];
const DIODE_TAPS: [FilterUnitQFPtr; 4] = [diode::<0>, diode::<1>, diode::<2>, diode::<3>];

/// Indexed by [`WarpSubType::index`].
const WARP_TABLE: [FilterUnitQFPtr; WarpSubType::COUNT as usize] = [
    cutoff_warp::<1, 0>,
    cutoff_warp::<2, 0>,
    cutoff_warp::<3, 0>,
    cutoff_warp::<4, 0>,
    cutoff_warp::<1, 1>,
    cutoff_warp::<2, 1>,
    cutoff_warp::<3, 1>,
    cutoff_warp::<4, 1>,
    cutoff_warp::<1, 2>,
    cutoff_warp::<2, 2>,
    cutoff_warp::<3, 2>,
    cutoff_warp::<4, 2>,
];

/// Resolve the processing function for a legacy pair. `None` means bypass.
pub fn get_qf_ptr(filter_type: FilterType, sub_type: FilterSubType) -> Option<FilterUnitQFPtr> {
    let ptr: FilterUnitQFPtr = match filter_type {
        FilterType::None => return None,
        FilterType::Lp12 | FilterType::Hp12 | FilterType::Bp12 | FilterType::Notch12 => {
            match ClassicSubType::from_sub_type(sub_type)? {
                ClassicSubType::Standard => iir12::<false>,
                ClassicSubType::Driven => iir12::<true>,
                ClassicSubType::Clean => svf,
            }
        }
        FilterType::Lp24 | FilterType::Hp24 | FilterType::Bp24 | FilterType::Notch24 => {
            match ClassicSubType::from_sub_type(sub_type)? {
                ClassicSubType::Standard => iir24::<false>,
                ClassicSubType::Driven => iir24::<true>,
                ClassicSubType::Clean => svf_cascade,
            }
        }
        FilterType::Allpass => match ClassicSubType::from_sub_type(sub_type)? {
            ClassicSubType::Standard => iir12::<false>,
            _ => return None,
        },
        FilterType::LpMoog => MOOG_TAPS[LadderSlope::from_sub_type(sub_type)? as usize],
        FilterType::DiodeLadder => DIODE_TAPS[LadderSlope::from_sub_type(sub_type)? as usize],
        FilterType::CombPos | FilterType::CombNeg => {
            CombMix::from_sub_type(sub_type)?;
            comb
        }
        FilterType::CytomicSvf => {
            SvfMode::from_sub_type(sub_type)?;
            svf
        }
        FilterType::CutoffWarpLp
        | FilterType::CutoffWarpHp
        | FilterType::CutoffWarpN
        | FilterType::CutoffWarpBp
        | FilterType::CutoffWarpAp => {
            WARP_TABLE[WarpSubType::from_sub_type(sub_type)?.index() as usize]
        }
    };
    Some(ptr)
}

/// Fixed output trim for pairs whose level differs noticeably from the
/// input. Unity for everything else.
pub fn gain_compensation(filter_type: FilterType, sub_type: FilterSubType) -> f32 {
    match filter_type {
        FilterType::CombPos | FilterType::CombNeg => 0.5,
        FilterType::Lp12
        | FilterType::Lp24
        | FilterType::Hp12
        | FilterType::Hp24
        | FilterType::Bp12
        | FilterType::Bp24
        | FilterType::Notch12
        | FilterType::Notch24 => match ClassicSubType::from_sub_type(sub_type) {
            Some(ClassicSubType::Driven) => 0.7,
            _ => 1.0,
        },
        FilterType::CutoffWarpLp
        | FilterType::CutoffWarpHp
        | FilterType::CutoffWarpN
        | FilterType::CutoffWarpBp
        | FilterType::CutoffWarpAp => match WarpSubType::from_sub_type(sub_type) {
            Some(warp) => 1.0 / (1.0 + 0.1 * (warp.stages - 1) as f32),
            None => 1.0,
        },
        _ => 1.0,
    }
}

/// A resolved function with a post-multiply applied to its output.
#[derive(Clone, Copy)]
pub struct CompensatedFilter {
    pub process: FilterUnitQFPtr,
    pub gain: f32,
}

impl CompensatedFilter {
    pub fn uncompensated(process: FilterUnitQFPtr) -> Self {
        Self { process, gain: 1.0 }
    }

    #[inline]
    pub fn run(&self, state: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
        (self.process)(state, input) * f32x4::splat(self.gain)
    }
}

impl std::fmt::Debug for CompensatedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompensatedFilter").field("gain", &self.gain).finish_non_exhaustive()
    }
}

pub fn get_compensated_qf_ptr(
    filter_type: FilterType,
    sub_type: FilterSubType,
) -> Option<CompensatedFilter> {
    get_qf_ptr(filter_type, sub_type).map(|process| CompensatedFilter {
        process,
        gain: gain_compensation(filter_type, sub_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::lanes::splat;
    use crate::dsp::Saturator;

    #[test]
    fn every_counted_subtype_dispatches() {
        for t in FilterType::ALL {
            for st in 0..t.sub_type_count() {
                assert!(
                    get_qf_ptr(t, FilterSubType(st)).is_some(),
                    "{t:?}/{st} has no processor"
                );
            }
        }
    }

    #[test]
    fn out_of_range_subtypes_bypass() {
        for t in FilterType::ALL {
            assert!(get_qf_ptr(t, FilterSubType(t.sub_type_count())).is_none(), "{t:?}");
            assert!(get_qf_ptr(t, FilterSubType(u8::MAX)).is_none(), "{t:?}");
        }
        assert!(get_qf_ptr(FilterType::None, FilterSubType(0)).is_none());
    }

    #[test]
    fn allpass_only_resolves_standard() {
        assert!(get_qf_ptr(FilterType::Allpass, ClassicSubType::Standard.into()).is_some());
        assert!(get_qf_ptr(FilterType::Allpass, ClassicSubType::Driven.into()).is_none());
        assert!(get_qf_ptr(FilterType::Allpass, ClassicSubType::Clean.into()).is_none());
    }

    #[test]
    fn warp_table_is_laid_out_by_index() {
        for saturator in Saturator::ALL {
            for stages in 1..=WarpSubType::MAX_STAGES {
                let sub = WarpSubType::new(stages, saturator);
                let resolved = get_qf_ptr(FilterType::CutoffWarpLp, sub.into());
                assert_eq!(
                    resolved.map(|p| p as usize),
                    Some(WARP_TABLE[sub.index() as usize] as usize)
                );
            }
        }
    }

    #[test]
    fn compensation_scales_the_output() {
        let filter = get_compensated_qf_ptr(FilterType::CombPos, CombMix::Mix50.into())
            .expect("comb resolves");
        assert_eq!(filter.gain, 0.5);

        fn identity(_: &mut QuadFilterUnitState<'_>, input: f32x4) -> f32x4 {
            input
        }
        let trimmed = CompensatedFilter { process: identity, gain: 0.25 };
        let mut state = QuadFilterUnitState::new(48_000.0);
        assert_eq!(trimmed.run(&mut state, splat(2.0)).to_array(), [0.5; 4]);
        assert_eq!(
            CompensatedFilter::uncompensated(identity).run(&mut state, splat(2.0)).to_array(),
            [2.0; 4]
        );
    }

    #[test]
    fn compensation_is_unity_by_default() {
        assert_eq!(gain_compensation(FilterType::Lp12, FilterSubType(0)), 1.0);
        assert_eq!(gain_compensation(FilterType::CytomicSvf, FilterSubType(6)), 1.0);
        assert!(gain_compensation(FilterType::CutoffWarpLp, FilterSubType(3)) < 1.0);
    }
}
