//! Model configuration: the four-axis tuple hosts select, and the per-model
//! tables that resolve it to a legacy pair.

mod resolve;
mod tables;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use resolve::{
    closest_valid_config, config_from_legacy, config_map, model_for_legacy, resolve,
    valid_configs,
};
pub use tables::ConfigEntry;

macro_rules! axis {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

axis!(
    /// Frequency response shape.
    Passband {
        Unsupported => "-",
        Lowpass => "Lowpass",
        Highpass => "Highpass",
        Bandpass => "Bandpass",
        Notch => "Notch",
        Peak => "Peak",
        Allpass => "Allpass",
        Bell => "Bell",
        LowShelf => "Low Shelf",
        HighShelf => "High Shelf",
    }
);

axis!(
    /// Roll-off steepness, or stage count for cascaded models.
    Slope {
        Unsupported => "-",
        Db6 => "6 dB",
        Db12 => "12 dB",
        Db18 => "18 dB",
        Db24 => "24 dB",
        Stage1 => "1 Stage",
        Stage2 => "2 Stage",
        Stage3 => "3 Stage",
        Stage4 => "4 Stage",
    }
);

axis!(
    /// Nonlinearity of the topology.
    DriveMode {
        Unsupported => "-",
        Standard => "Standard",
        Driven => "Driven",
        Clean => "Clean",
        Tanh => "Tanh",
        SoftClip => "Soft Clip",
        Ojd => "OJD",
    }
);

axis!(
    /// Model-specific variant that fits none of the other axes.
    FilterSubModel {
        Unsupported => "-",
        Positive50 => "+ 50%",
        Positive100 => "+ 100%",
        Negative50 => "- 50%",
        Negative100 => "- 100%",
    }
);

/// `(passband, slope, drive, submodel)`, ordered axis by axis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModelConfig {
    pub passband: Passband,
    pub slope: Slope,
    pub drive: DriveMode,
    pub submodel: FilterSubModel,
}

impl ModelConfig {
    pub const fn new(
        passband: Passband,
        slope: Slope,
        drive: DriveMode,
        submodel: FilterSubModel,
    ) -> Self {
        Self {
            passband,
            slope,
            drive,
            submodel,
        }
    }

    pub const fn with_passband(passband: Passband) -> Self {
        Self::new(passband, Slope::Unsupported, DriveMode::Unsupported, FilterSubModel::Unsupported)
    }

    pub const fn with_submodel(submodel: FilterSubModel) -> Self {
        Self::new(Passband::Unsupported, Slope::Unsupported, DriveMode::Unsupported, submodel)
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let axes = [
            (self.passband == Passband::Unsupported, self.passband.name()),
            (self.slope == Slope::Unsupported, self.slope.name()),
            (self.drive == DriveMode::Unsupported, self.drive.name()),
            (self.submodel == FilterSubModel::Unsupported, self.submodel.name()),
        ];
        for (_, name) in axes.iter().filter(|(unset, _)| !unset) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        if first {
            f.write_str("(default)")?;
        }
        Ok(())
    }
}

/// Host-facing filter model.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterModel {
    Off,
    VemberClassic,
    VintageLadder,
    DiodeLadder,
    Comb,
    CytomicSvf,
    CutoffWarp,
}

impl FilterModel {
    pub const ALL: [FilterModel; 7] = [
        FilterModel::Off,
        FilterModel::VemberClassic,
        FilterModel::VintageLadder,
        FilterModel::DiodeLadder,
        FilterModel::Comb,
        FilterModel::CytomicSvf,
        FilterModel::CutoffWarp,
    ];

    /// Models with a configuration table and processing code.
    pub fn is_implemented(self) -> bool {
        !tables::table(self).is_empty()
    }

    pub const fn name(self) -> &'static str {
        match self {
            FilterModel::Off => "Off",
            FilterModel::VemberClassic => "Vember Classic",
            FilterModel::VintageLadder => "Vintage Ladder",
            FilterModel::DiodeLadder => "Diode Ladder",
            FilterModel::Comb => "Comb",
            FilterModel::CytomicSvf => "Cytomic SVF",
            FilterModel::CutoffWarp => "Cutoff Warp",
        }
    }
}

impl fmt::Display for FilterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
