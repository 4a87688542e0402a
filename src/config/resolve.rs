use std::collections::BTreeMap;

use tracing::warn;

use crate::types::LegacyPair;

use super::tables::{table, ConfigEntry};
use super::{FilterModel, ModelConfig};

/// Every valid tuple of `model`, in ascending order. Empty for unimplemented
/// models.
pub fn valid_configs(model: FilterModel) -> impl Iterator<Item = ModelConfig> {
    table(model).iter().map(|entry| entry.config)
}

/// Tuple → legacy pair map for populating menus. Allocates.
pub fn config_map(model: FilterModel) -> BTreeMap<ModelConfig, LegacyPair> {
    table(model).iter().map(|entry| (entry.config, entry.legacy)).collect()
}

/// Exact lookup of a tuple in a model's table.
pub fn resolve(model: FilterModel, config: ModelConfig) -> Option<LegacyPair> {
    let entries = table(model);
    entries
        .binary_search_by(|entry| entry.config.cmp(&config))
        .ok()
        .map(|index| entries[index].legacy)
}

/// The tuple of `model` that selects `pair`, if any.
pub fn config_from_legacy(model: FilterModel, pair: LegacyPair) -> Option<ModelConfig> {
    table(model)
        .iter()
        .find(|entry| entry.legacy == pair)
        .map(|entry| entry.config)
}

/// The first model, and its tuple, owning `pair`.
pub fn model_for_legacy(pair: LegacyPair) -> Option<(FilterModel, ModelConfig)> {
    FilterModel::ALL
        .into_iter()
        .find_map(|model| config_from_legacy(model, pair).map(|config| (model, config)))
}

/// The nearest valid tuple of `model`: an exact match, then the first entry
/// agreeing on passband, slope and drive, then on passband and slope, then on
/// passband alone, then the first entry of the table. `None` only when the
/// model has no table.
pub fn closest_valid_config(model: FilterModel, config: ModelConfig) -> Option<ModelConfig> {
    let entries = table(model);
    if resolve(model, config).is_some() {
        return Some(config);
    }

    type Agrees = fn(&ModelConfig, &ModelConfig) -> bool;
    let stages: [Agrees; 3] = [
        |a, b| a.passband == b.passband && a.slope == b.slope && a.drive == b.drive,
        |a, b| a.passband == b.passband && a.slope == b.slope,
        |a, b| a.passband == b.passband,
    ];

    let closest = stages
        .iter()
        .find_map(|agrees| first_agreeing(entries, &config, *agrees))
        .or_else(|| entries.first().map(|entry| entry.config))?;

    warn!(
        %model,
        requested = %config,
        chosen = %closest,
        "configuration is not valid for this model, using the closest match"
    );
    Some(closest)
}

fn first_agreeing(
    entries: &[ConfigEntry],
    config: &ModelConfig,
    agrees: fn(&ModelConfig, &ModelConfig) -> bool,
) -> Option<ModelConfig> {
    entries
        .iter()
        .map(|entry| entry.config)
        .find(|candidate| agrees(candidate, config))
}
