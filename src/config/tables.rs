use crate::types::{FilterType, LegacyPair};

use super::{DriveMode, FilterModel, FilterSubModel, ModelConfig, Passband, Slope};

/// One valid tuple of a model and the legacy pair it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEntry {
    pub config: ModelConfig,
    pub legacy: LegacyPair,
}

impl ConfigEntry {
    const EMPTY: Self = Self::new(ModelConfig::with_passband(Passband::Unsupported), FilterType::None, 0);

    const fn new(config: ModelConfig, filter_type: FilterType, sub_type: u8) -> Self {
        Self {
            config,
            legacy: LegacyPair::new(filter_type, sub_type),
        }
    }
}

const fn cfg(passband: Passband, slope: Slope, drive: DriveMode) -> ModelConfig {
    ModelConfig::new(passband, slope, drive, FilterSubModel::Unsupported)
}

// Every table is built in ascending `ModelConfig` order.

const CLASSIC_PASSBANDS: [Passband; 4] =
    [Passband::Lowpass, Passband::Highpass, Passband::Bandpass, Passband::Notch];
const CLASSIC_TYPES: [[FilterType; 2]; 4] = [
    [FilterType::Lp12, FilterType::Lp24],
    [FilterType::Hp12, FilterType::Hp24],
    [FilterType::Bp12, FilterType::Bp24],
    [FilterType::Notch12, FilterType::Notch24],
];
const CLASSIC_DRIVES: [DriveMode; 3] = [DriveMode::Standard, DriveMode::Driven, DriveMode::Clean];

const fn classic() -> [ConfigEntry; 25] {
    let mut out = [ConfigEntry::EMPTY; 25];
    let mut n = 0;
    let mut p = 0;
    while p < CLASSIC_PASSBANDS.len() {
        let mut s = 0;
        while s < 2 {
            let slope = if s == 0 { Slope::Db12 } else { Slope::Db24 };
            let mut d = 0;
            while d < CLASSIC_DRIVES.len() {
                out[n] = ConfigEntry::new(
                    cfg(CLASSIC_PASSBANDS[p], slope, CLASSIC_DRIVES[d]),
                    CLASSIC_TYPES[p][s],
                    d as u8,
                );
                n += 1;
                d += 1;
            }
            s += 1;
        }
        p += 1;
    }
    // allpass sorts after notch
    out[n] = ConfigEntry::new(
        cfg(Passband::Allpass, Slope::Db12, DriveMode::Standard),
        FilterType::Allpass,
        0,
    );
    out
}

const LADDER_SLOPES: [Slope; 4] = [Slope::Db6, Slope::Db12, Slope::Db18, Slope::Db24];

const fn ladder(filter_type: FilterType) -> [ConfigEntry; 4] {
    let mut out = [ConfigEntry::EMPTY; 4];
    let mut i = 0;
    while i < LADDER_SLOPES.len() {
        out[i] = ConfigEntry::new(
            cfg(Passband::Lowpass, LADDER_SLOPES[i], DriveMode::Unsupported),
            filter_type,
            i as u8,
        );
        i += 1;
    }
    out
}

static COMB_TABLE: [ConfigEntry; 4] = [
    ConfigEntry::new(ModelConfig::with_submodel(FilterSubModel::Positive50), FilterType::CombPos, 0),
    ConfigEntry::new(ModelConfig::with_submodel(FilterSubModel::Positive100), FilterType::CombPos, 1),
    ConfigEntry::new(ModelConfig::with_submodel(FilterSubModel::Negative50), FilterType::CombNeg, 0),
    ConfigEntry::new(ModelConfig::with_submodel(FilterSubModel::Negative100), FilterType::CombNeg, 1),
];

const SVF_PASSBANDS: [Passband; 9] = [
    Passband::Lowpass,
    Passband::Highpass,
    Passband::Bandpass,
    Passband::Notch,
    Passband::Peak,
    Passband::Allpass,
    Passband::Bell,
    Passband::LowShelf,
    Passband::HighShelf,
];

const fn cytomic() -> [ConfigEntry; 9] {
    let mut out = [ConfigEntry::EMPTY; 9];
    let mut i = 0;
    while i < SVF_PASSBANDS.len() {
        // subtype numbering follows SvfMode, which lists modes in this order
        out[i] = ConfigEntry::new(ModelConfig::with_passband(SVF_PASSBANDS[i]), FilterType::CytomicSvf, i as u8);
        i += 1;
    }
    out
}

const WARP_PASSBANDS: [(Passband, FilterType); 5] = [
    (Passband::Lowpass, FilterType::CutoffWarpLp),
    (Passband::Highpass, FilterType::CutoffWarpHp),
    (Passband::Bandpass, FilterType::CutoffWarpBp),
    (Passband::Notch, FilterType::CutoffWarpN),
    (Passband::Allpass, FilterType::CutoffWarpAp),
];
const WARP_STAGES: [Slope; 4] = [Slope::Stage1, Slope::Stage2, Slope::Stage3, Slope::Stage4];
const WARP_SATURATORS: [DriveMode; 3] = [DriveMode::Tanh, DriveMode::SoftClip, DriveMode::Ojd];

const fn warp() -> [ConfigEntry; 60] {
    let mut out = [ConfigEntry::EMPTY; 60];
    let mut n = 0;
    let mut p = 0;
    while p < WARP_PASSBANDS.len() {
        let (passband, filter_type) = WARP_PASSBANDS[p];
        let mut stage = 0;
        while stage < WARP_STAGES.len() {
            let mut sat = 0;
            while sat < WARP_SATURATORS.len() {
                out[n] = ConfigEntry::new(
                    cfg(passband, WARP_STAGES[stage], WARP_SATURATORS[sat]),
                    filter_type,
                    (stage + WARP_STAGES.len() * sat) as u8,
                );
                n += 1;
                sat += 1;
            }
            stage += 1;
        }
        p += 1;
    }
    out
}

static CLASSIC_TABLE: [ConfigEntry; 25] = classic();
static VINTAGE_LADDER_TABLE: [ConfigEntry; 4] = ladder(FilterType::LpMoog);
static DIODE_LADDER_TABLE: [ConfigEntry; 4] = ladder(FilterType::DiodeLadder);
static CYTOMIC_TABLE: [ConfigEntry; 9] = cytomic();
static WARP_TABLE: [ConfigEntry; 60] = warp();

/// The immutable table of a model; empty for models without processing code.
pub(crate) fn table(model: FilterModel) -> &'static [ConfigEntry] {
    match model {
        FilterModel::Off => &[],
        FilterModel::VemberClassic => &CLASSIC_TABLE,
        FilterModel::VintageLadder => &VINTAGE_LADDER_TABLE,
        FilterModel::DiodeLadder => &DIODE_LADDER_TABLE,
        FilterModel::Comb => &COMB_TABLE,
        FilterModel::CytomicSvf => &CYTOMIC_TABLE,
        FilterModel::CutoffWarp => &WARP_TABLE,
    }
}
