//! Tuning config entity - A point-in-time tuning recommendation or session.
//!
//! Each config is bound to a motorcycle and, for data recorded after kits were
//! introduced, to a suspension kit. `suspension_kit_id` stays optional so
//! legacy rows can be loaded and later repaired. The settings columns are a
//! snapshot, not live state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning config database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tuning_configs")]
pub struct Model {
    /// Unique identifier for the config
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Author's user id
    pub user_id: String,
    /// Motorcycle the config was recorded for
    pub motorcycle_id: i64,
    /// Kit the config applies to, None for legacy (orphan) configs
    pub suspension_kit_id: Option<i64>,
    /// Conversation that produced this config, if any
    pub conversation_id: Option<String>,
    /// Short title shown in lists and the feed
    pub title: String,

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

    /// Sharing state: `"private"`, `"link"` or `"public"`
    pub visibility: String,
    /// Legacy sharing flag, kept equal to `visibility == "public"`
    pub is_public: bool,
    /// Number of likes
    pub likes_count: i32,
    /// Number of comments
    pub comments_count: i32,
    /// When the config was created
    pub created_at: DateTimeUtc,
    /// When the config was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `TuningConfig` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each config belongs to one motorcycle
    #[sea_orm(
        belongs_to = "super::motorcycle::Entity",
        from = "Column::MotorcycleId",
        to = "super::motorcycle::Column::Id",
        on_delete = "Cascade"
    )]
    Motorcycle,
    /// Each config optionally belongs to one kit
    #[sea_orm(
        belongs_to = "super::suspension_kit::Entity",
        from = "Column::SuspensionKitId",
        to = "super::suspension_kit::Column::Id",
        on_delete = "SetNull"
    )]
    SuspensionKit,
}

impl Related<super::motorcycle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motorcycle.def()
    }
}

impl Related<super::suspension_kit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionKit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
