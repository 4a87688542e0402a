//! The legacy `(FilterType, FilterSubType)` encoding consumed by dispatch and
//! the coefficient maker.
//!
//! Subtypes are small integers whose meaning depends on the family. The
//! per-family enums below give them names and convert in both directions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::Saturator;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterType {
    None,
    Lp12,
    Lp24,
    Hp12,
    Hp24,
    Bp12,
    Bp24,
    Notch12,
    Notch24,
    Allpass,
    LpMoog,
    DiodeLadder,
    CombPos,
    CombNeg,
    CytomicSvf,
    CutoffWarpLp,
    CutoffWarpHp,
    CutoffWarpN,
    CutoffWarpBp,
    CutoffWarpAp,
}

impl FilterType {
    pub const ALL: [FilterType; 20] = [
        FilterType::None,
        FilterType::Lp12,
        FilterType::Lp24,
        FilterType::Hp12,
        FilterType::Hp24,
        FilterType::Bp12,
        FilterType::Bp24,
        FilterType::Notch12,
        FilterType::Notch24,
        FilterType::Allpass,
        FilterType::LpMoog,
        FilterType::DiodeLadder,
        FilterType::CombPos,
        FilterType::CombNeg,
        FilterType::CytomicSvf,
        FilterType::CutoffWarpLp,
        FilterType::CutoffWarpHp,
        FilterType::CutoffWarpN,
        FilterType::CutoffWarpBp,
        FilterType::CutoffWarpAp,
    ];

    /// Whether the topology reads and writes external delay memory.
    pub const fn needs_delay_buffer(self) -> bool {
        matches!(self, FilterType::CombPos | FilterType::CombNeg)
    }

    /// Number of valid subtypes; `0` for [`FilterType::None`].
    pub const fn sub_type_count(self) -> u8 {
        match self {
            FilterType::None => 0,
            FilterType::Lp12
            | FilterType::Lp24
            | FilterType::Hp12
            | FilterType::Hp24
            | FilterType::Bp12
            | FilterType::Bp24
            | FilterType::Notch12
            | FilterType::Notch24 => 3,
            FilterType::Allpass => 1,
            FilterType::LpMoog | FilterType::DiodeLadder => 4,
            FilterType::CombPos | FilterType::CombNeg => 2,
            FilterType::CytomicSvf => 9,
            FilterType::CutoffWarpLp
            | FilterType::CutoffWarpHp
            | FilterType::CutoffWarpN
            | FilterType::CutoffWarpBp
            | FilterType::CutoffWarpAp => WarpSubType::COUNT,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FilterSubType(pub u8);

impl fmt::Display for FilterSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved `(type, subtype)` pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegacyPair {
    pub filter_type: FilterType,
    pub sub_type: FilterSubType,
}

impl LegacyPair {
    pub const fn new(filter_type: FilterType, sub_type: u8) -> Self {
        Self {
            filter_type,
            sub_type: FilterSubType(sub_type),
        }
    }
}

/// Subtypes of the classic 12/24 dB family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassicSubType {
    /// Bilinear-transform biquad.
    Standard = 0,
    /// Biquad with a saturated feedback path.
    Driven = 1,
    /// Trapezoidal state-variable filter.
    Clean = 2,
}

impl ClassicSubType {
    pub const fn from_sub_type(st: FilterSubType) -> Option<Self> {
        match st.0 {
            0 => Some(ClassicSubType::Standard),
            1 => Some(ClassicSubType::Driven),
            2 => Some(ClassicSubType::Clean),
            _ => None,
        }
    }
}

/// Output tap of the ladder cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderSlope {
    Db6 = 0,
    Db12 = 1,
    Db18 = 2,
    Db24 = 3,
}

impl LadderSlope {
    pub const fn from_sub_type(st: FilterSubType) -> Option<Self> {
        match st.0 {
            0 => Some(LadderSlope::Db6),
            1 => Some(LadderSlope::Db12),
            2 => Some(LadderSlope::Db18),
            3 => Some(LadderSlope::Db24),
            _ => None,
        }
    }
}

/// Wet proportion of the comb filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombMix {
    Mix50 = 0,
    Mix100 = 1,
}

impl CombMix {
    pub const fn from_sub_type(st: FilterSubType) -> Option<Self> {
        match st.0 {
            0 => Some(CombMix::Mix50),
            1 => Some(CombMix::Mix100),
            _ => None,
        }
    }

    pub const fn wet(self) -> f32 {
        match self {
            CombMix::Mix50 => 0.5,
            CombMix::Mix100 => 1.0,
        }
    }
}

/// Response of the trapezoidal state-variable filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvfMode {
    Lowpass = 0,
    Highpass = 1,
    Bandpass = 2,
    Notch = 3,
    Peak = 4,
    Allpass = 5,
    Bell = 6,
    LowShelf = 7,
    HighShelf = 8,
}

impl SvfMode {
    pub const fn from_sub_type(st: FilterSubType) -> Option<Self> {
        match st.0 {
            0 => Some(SvfMode::Lowpass),
            1 => Some(SvfMode::Highpass),
            2 => Some(SvfMode::Bandpass),
            3 => Some(SvfMode::Notch),
            4 => Some(SvfMode::Peak),
            5 => Some(SvfMode::Allpass),
            6 => Some(SvfMode::Bell),
            7 => Some(SvfMode::LowShelf),
            8 => Some(SvfMode::HighShelf),
            _ => None,
        }
    }
}

/// Stage count and saturator of a warp filter, packed as
/// `(stages - 1) + 4 * saturator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpSubType {
    pub stages: u8,
    pub saturator: Saturator,
}

impl WarpSubType {
    pub const MAX_STAGES: u8 = 4;
    pub const COUNT: u8 = Self::MAX_STAGES * 3;

    pub const fn new(stages: u8, saturator: Saturator) -> Self {
        Self { stages, saturator }
    }

    pub const fn index(self) -> u8 {
        (self.stages - 1) + Self::MAX_STAGES * self.saturator as u8
    }

    pub const fn from_sub_type(st: FilterSubType) -> Option<Self> {
        if st.0 >= Self::COUNT {
            return None;
        }
        let stages = st.0 % Self::MAX_STAGES + 1;
        match Saturator::from_index(st.0 / Self::MAX_STAGES) {
            Some(saturator) => Some(Self { stages, saturator }),
            None => None,
        }
    }
}

impl From<WarpSubType> for FilterSubType {
    fn from(value: WarpSubType) -> Self {
        FilterSubType(value.index())
    }
}

macro_rules! sub_type_from_enum {
    ($($family:ty),*) => {
        $(impl From<$family> for FilterSubType {
            fn from(value: $family) -> Self {
                FilterSubType(value as u8)
            }
        })*
    };
}

sub_type_from_enum!(ClassicSubType, LadderSlope, CombMix, SvfMode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warp_sub_types_round_trip_through_their_index() {
        for index in 0..WarpSubType::COUNT {
            let decoded = WarpSubType::from_sub_type(FilterSubType(index)).expect("in range");
            assert_eq!(decoded.index(), index);
            assert!((1..=4).contains(&decoded.stages));
        }
        assert!(WarpSubType::from_sub_type(FilterSubType(WarpSubType::COUNT)).is_none());
    }

    #[test]
    fn sub_type_counts_match_decoders() {
        for t in FilterType::ALL {
            let count = t.sub_type_count();
            for st in 0..count {
                let st = FilterSubType(st);
                let known = match t {
                    FilterType::None => false,
                    FilterType::Allpass => ClassicSubType::from_sub_type(st).is_some(),
                    FilterType::LpMoog | FilterType::DiodeLadder => {
                        LadderSlope::from_sub_type(st).is_some()
                    }
                    FilterType::CombPos | FilterType::CombNeg => CombMix::from_sub_type(st).is_some(),
                    FilterType::CytomicSvf => SvfMode::from_sub_type(st).is_some(),
                    FilterType::CutoffWarpLp
                    | FilterType::CutoffWarpHp
                    | FilterType::CutoffWarpN
                    | FilterType::CutoffWarpBp
                    | FilterType::CutoffWarpAp => WarpSubType::from_sub_type(st).is_some(),
                    _ => ClassicSubType::from_sub_type(st).is_some(),
                };
                assert!(known, "{t:?} subtype {st} does not decode");
            }
        }
    }

    #[test]
    fn only_combs_need_delay_memory() {
        let needing: Vec<_> = FilterType::ALL
            .into_iter()
            .filter(|t| t.needs_delay_buffer())
            .collect();
        assert_eq!(needing, vec![FilterType::CombPos, FilterType::CombNeg]);
    }
}
