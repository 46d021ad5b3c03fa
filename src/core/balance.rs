//! Front/rear balance classification.
//!
//! Fork and shock adjusters are compared on their normalized percentages. A
//! difference of more than [`BALANCE_THRESHOLD`] percentage points tips the
//! classification towards the stiffer end.

use crate::core::clicks::clicks_to_percentage;
use serde::{Deserialize, Serialize};

/// Percentage-point difference above which one end counts as heavier.
pub const BALANCE_THRESHOLD: f64 = 10.0;

/// Balance classification for one pair of front/rear percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceClass {
    /// Front is more than the threshold above the rear
    FrontHeavy,
    /// Rear is more than the threshold above the front
    RearHeavy,
    /// Within the threshold
    Balanced,
}

impl BalanceClass {
    /// Classifies a front-minus-rear difference.
    #[must_use]
    pub fn from_diff(diff: f64) -> Self {
        if diff > BALANCE_THRESHOLD {
            Self::FrontHeavy
        } else if diff < -BALANCE_THRESHOLD {
            Self::RearHeavy
        } else {
            Self::Balanced
        }
    }

    /// Display name (`"front-heavy"`, `"rear-heavy"`, `"balanced"`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrontHeavy => "front-heavy",
            Self::RearHeavy => "rear-heavy",
            Self::Balanced => "balanced",
        }
    }
}

/// Normalized percentages and the resulting classifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspensionBalance {
    /// Fork compression as a percentage of its maximum
    pub front_compression_pct: i32,
    /// Fork rebound as a percentage of its maximum
    pub front_rebound_pct: i32,
    /// Shock low-speed compression as a percentage of its maximum
    pub rear_compression_pct: i32,
    /// Shock rebound as a percentage of its maximum
    pub rear_rebound_pct: i32,
    /// Front minus rear compression percentage
    pub compression_diff: i32,
    /// Front minus rear rebound percentage
    pub rebound_diff: i32,
    /// Classification of the compression diff
    pub compression: BalanceClass,
    /// Classification of the rebound diff
    pub rebound: BalanceClass,
    /// Classification of the mean of both diffs
    pub overall: BalanceClass,
}

/// Computes the front/rear balance from raw clicks and their maximums.
///
/// Rear compression uses the shock's low-speed compression adjuster.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn calculate_balance(
    fork_compression: i32,
    fork_rebound: i32,
    shock_compression_low: i32,
    shock_rebound: i32,
    max_fork_compression: i32,
    max_fork_rebound: i32,
    max_shock_compression_low: i32,
    max_shock_rebound: i32,
) -> SuspensionBalance {
    let front_compression_pct = clicks_to_percentage(fork_compression, max_fork_compression);
    let front_rebound_pct = clicks_to_percentage(fork_rebound, max_fork_rebound);
    let rear_compression_pct =
        clicks_to_percentage(shock_compression_low, max_shock_compression_low);
    let rear_rebound_pct = clicks_to_percentage(shock_rebound, max_shock_rebound);

    let compression_diff = front_compression_pct - rear_compression_pct;
    let rebound_diff = front_rebound_pct - rear_rebound_pct;
    let average_diff = f64::from(compression_diff + rebound_diff) / 2.0;

    SuspensionBalance {
        front_compression_pct,
        front_rebound_pct,
        rear_compression_pct,
        rear_rebound_pct,
        compression_diff,
        rebound_diff,
        compression: BalanceClass::from_diff(f64::from(compression_diff)),
        rebound: BalanceClass::from_diff(f64::from(rebound_diff)),
        overall: BalanceClass::from_diff(average_diff),
    }
}
