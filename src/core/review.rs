//! Review metrics for kits and configs.
//!
//! Glue between stored click values and the pure normalizer/classifier:
//! missing adjuster values read as 0 clicks and missing maximums as
//! uncalibrated.

use crate::{
    core::{
        balance::{SuspensionBalance, calculate_balance},
        clicks::{Adjustment, calculate_adjustment, checked_percentage},
        settings::{Adjuster, ClickSettings},
    },
    entities::{suspension_kit, tuning_config},
};
use serde::Serialize;

/// Percentage of one adjuster, None when it cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjusterPercentage {
    /// Which adjuster
    pub adjuster: Adjuster,
    /// Normalized value, None when uncalibrated
    pub percentage: Option<i32>,
}

/// A recommended change for one adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjusterChange {
    /// Which adjuster
    pub adjuster: Adjuster,
    /// Change to apply
    pub adjustment: Adjustment,
}

fn balance_of(settings: &ClickSettings, max: &ClickSettings) -> SuspensionBalance {
    calculate_balance(
        settings.fork_compression.unwrap_or(0),
        settings.fork_rebound.unwrap_or(0),
        settings.shock_compression_low.unwrap_or(0),
        settings.shock_rebound.unwrap_or(0),
        max.fork_compression.unwrap_or(0),
        max.fork_rebound.unwrap_or(0),
        max.shock_compression_low.unwrap_or(0),
        max.shock_rebound.unwrap_or(0),
    )
}

/// Balance of a kit's current settings.
#[must_use]
pub fn kit_balance(kit: &suspension_kit::Model) -> SuspensionBalance {
    balance_of(&ClickSettings::current_of(kit), &ClickSettings::max_of(kit))
}

/// Balance of a config's snapshot, normalized against the kit's maximums.
#[must_use]
pub fn config_balance(
    config: &tuning_config::Model,
    kit: &suspension_kit::Model,
) -> SuspensionBalance {
    balance_of(&ClickSettings::snapshot_of(config), &ClickSettings::max_of(kit))
}

/// Normalized percentages of every adjuster in `settings`.
#[must_use]
pub fn percentages(settings: &ClickSettings, max: &ClickSettings) -> Vec<AdjusterPercentage> {
    Adjuster::ALL
        .iter()
        .map(|&adjuster| AdjusterPercentage {
            adjuster,
            percentage: checked_percentage(settings.get(adjuster), max.get(adjuster)),
        })
        .collect()
}

/// Changes needed to bring a kit's current settings to `target`.
///
/// Adjusters missing on either side, or without a calibrated maximum, are
/// skipped, as are adjusters already at the target.
#[must_use]
pub fn plan_adjustments(kit: &suspension_kit::Model, target: &ClickSettings) -> Vec<AdjusterChange> {
    let current = ClickSettings::current_of(kit);
    let max = ClickSettings::max_of(kit);

    Adjuster::ALL
        .iter()
        .filter_map(|&adjuster| {
            let from = current.get(adjuster)?;
            let to = target.get(adjuster)?;
            let max = max.get(adjuster).filter(|m| *m > 0)?;
            (from != to).then(|| AdjusterChange {
                adjuster,
                adjustment: calculate_adjustment(from, to, max),
            })
        })
        .collect()
}
