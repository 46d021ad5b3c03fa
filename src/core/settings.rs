//! Grouped adjuster values.
//!
//! Kits store three sets of the five adjusters (maximum, baseline, current) and
//! configs store a snapshot of them. [`ClickSettings`] carries one such set so
//! code can move them around without naming fifteen columns.

use crate::entities::{suspension_kit, tuning_config};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// One value per adjustable parameter; `None` means "not recorded".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickSettings {
    /// Fork compression clicks
    pub fork_compression: Option<i32>,
    /// Fork rebound clicks
    pub fork_rebound: Option<i32>,
    /// Shock low-speed compression clicks
    pub shock_compression_low: Option<i32>,
    /// Shock high-speed compression clicks
    pub shock_compression_high: Option<i32>,
    /// Shock rebound clicks
    pub shock_rebound: Option<i32>,
}

/// Identifies one adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjuster {
    /// Fork compression
    ForkCompression,
    /// Fork rebound
    ForkRebound,
    /// Shock low-speed compression
    ShockCompressionLow,
    /// Shock high-speed compression
    ShockCompressionHigh,
    /// Shock rebound
    ShockRebound,
}

impl Adjuster {
    /// All adjusters, fork first
    pub const ALL: [Self; 5] = [
        Self::ForkCompression,
        Self::ForkRebound,
        Self::ShockCompressionLow,
        Self::ShockCompressionHigh,
        Self::ShockRebound,
    ];
}

impl ClickSettings {
    /// Returns the value recorded for `adjuster`.
    #[must_use]
    pub const fn get(&self, adjuster: Adjuster) -> Option<i32> {
        match adjuster {
            Adjuster::ForkCompression => self.fork_compression,
            Adjuster::ForkRebound => self.fork_rebound,
            Adjuster::ShockCompressionLow => self.shock_compression_low,
            Adjuster::ShockCompressionHigh => self.shock_compression_high,
            Adjuster::ShockRebound => self.shock_rebound,
        }
    }

    /// True when no adjuster has a value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fork_compression.is_none()
            && self.fork_rebound.is_none()
            && self.shock_compression_low.is_none()
            && self.shock_compression_high.is_none()
            && self.shock_rebound.is_none()
    }

    /// Calibration ceilings of a kit.
    #[must_use]
    pub const fn max_of(kit: &suspension_kit::Model) -> Self {
        Self {
            fork_compression: kit.max_fork_compression,
            fork_rebound: kit.max_fork_rebound,
            shock_compression_low: kit.max_shock_compression_low,
            shock_compression_high: kit.max_shock_compression_high,
            shock_rebound: kit.max_shock_rebound,
        }
    }

    /// As-delivered settings of a kit.
    #[must_use]
    pub const fn baseline_of(kit: &suspension_kit::Model) -> Self {
        Self {
            fork_compression: kit.baseline_fork_compression,
            fork_rebound: kit.baseline_fork_rebound,
            shock_compression_low: kit.baseline_shock_compression_low,
            shock_compression_high: kit.baseline_shock_compression_high,
            shock_rebound: kit.baseline_shock_rebound,
        }
    }

    /// Live settings of a kit.
    #[must_use]
    pub const fn current_of(kit: &suspension_kit::Model) -> Self {
        Self {
            fork_compression: kit.fork_compression,
            fork_rebound: kit.fork_rebound,
            shock_compression_low: kit.shock_compression_low,
            shock_compression_high: kit.shock_compression_high,
            shock_rebound: kit.shock_rebound,
        }
    }

    /// Snapshot stored on a config.
    #[must_use]
    pub const fn snapshot_of(config: &tuning_config::Model) -> Self {
        Self {
            fork_compression: config.fork_compression,
            fork_rebound: config.fork_rebound,
            shock_compression_low: config.shock_compression_low,
            shock_compression_high: config.shock_compression_high,
            shock_rebound: config.shock_rebound,
        }
    }

    /// Writes every adjuster into the kit's current-setting columns.
    pub fn set_current(self, kit: &mut suspension_kit::ActiveModel) {
        kit.fork_compression = Set(self.fork_compression);
        kit.fork_rebound = Set(self.fork_rebound);
        kit.shock_compression_low = Set(self.shock_compression_low);
        kit.shock_compression_high = Set(self.shock_compression_high);
        kit.shock_rebound = Set(self.shock_rebound);
    }

    /// Writes only the adjusters that have a value into the kit's current
    /// settings, leaving the rest untouched.
    pub fn merge_into_current(self, kit: &mut suspension_kit::ActiveModel) {
        if let Some(v) = self.fork_compression {
            kit.fork_compression = Set(Some(v));
        }
        if let Some(v) = self.fork_rebound {
            kit.fork_rebound = Set(Some(v));
        }
        if let Some(v) = self.shock_compression_low {
            kit.shock_compression_low = Set(Some(v));
        }
        if let Some(v) = self.shock_compression_high {
            kit.shock_compression_high = Set(Some(v));
        }
        if let Some(v) = self.shock_rebound {
            kit.shock_rebound = Set(Some(v));
        }
    }

    /// Writes every adjuster into a config's snapshot columns.
    pub fn set_snapshot(self, config: &mut tuning_config::ActiveModel) {
        config.fork_compression = Set(self.fork_compression);
        config.fork_rebound = Set(self.fork_rebound);
        config.shock_compression_low = Set(self.shock_compression_low);
        config.shock_compression_high = Set(self.shock_compression_high);
        config.shock_rebound = Set(self.shock_rebound);
    }
}
