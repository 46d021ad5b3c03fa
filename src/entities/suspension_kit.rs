//! Suspension kit entity - One physical suspension build on a motorcycle.
//!
//! A kit records the fork/shock hardware, the maximum click count of every
//! adjuster (the calibration ceiling), the as-delivered baseline settings and
//! the live current settings. Exactly one kit per motorcycle carries
//! `is_default = true` whenever the motorcycle has any kits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Suspension kit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suspension_kits")]
pub struct Model {
    /// Unique identifier for the kit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Motorcycle this kit is mounted on
    pub motorcycle_id: i64,
    /// User who created the kit
    pub user_id: String,
    /// Display name (e.g., "Kit Standard", "Track setup")
    pub name: String,

    /// Fork manufacturer
    pub fork_brand: Option<String>,
    /// Fork model name
    pub fork_model: Option<String>,
    /// Shock manufacturer
    pub shock_brand: Option<String>,
    /// Shock model name
    pub shock_model: Option<String>,

    /// Maximum clicks of the fork compression adjuster
    pub max_fork_compression: Option<i32>,
    /// Maximum clicks of the fork rebound adjuster
    pub max_fork_rebound: Option<i32>,
    /// Maximum clicks of the shock low-speed compression adjuster
    pub max_shock_compression_low: Option<i32>,
    /// Maximum clicks of the shock high-speed compression adjuster
    pub max_shock_compression_high: Option<i32>,
    /// Maximum clicks of the shock rebound adjuster
    pub max_shock_rebound: Option<i32>,

    /// As-delivered fork compression clicks
    pub baseline_fork_compression: Option<i32>,
    /// As-delivered fork rebound clicks
    pub baseline_fork_rebound: Option<i32>,
    /// As-delivered shock low-speed compression clicks
    pub baseline_shock_compression_low: Option<i32>,
    /// As-delivered shock high-speed compression clicks
    pub baseline_shock_compression_high: Option<i32>,
    /// As-delivered shock rebound clicks
    pub baseline_shock_rebound: Option<i32>,

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

    /// Free-form notes about the build
    pub notes: Option<String>,
    /// Whether this is the motorcycle's default kit
    pub is_default: bool,
    /// When the kit was created
    pub created_at: DateTimeUtc,
    /// When the kit was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `SuspensionKit` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each kit belongs to one motorcycle
    #[sea_orm(
        belongs_to = "super::motorcycle::Entity",
        from = "Column::MotorcycleId",
        to = "super::motorcycle::Column::Id",
        on_delete = "Cascade"
    )]
    Motorcycle,
    /// One kit has many tuning configs
    #[sea_orm(has_many = "super::tuning_config::Entity")]
    TuningConfigs,
}

impl Related<super::motorcycle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motorcycle.def()
    }
}

impl Related<super::tuning_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TuningConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
