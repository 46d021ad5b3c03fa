//! Motorcycle entity - The bike a rider records suspension hardware for.
//!
//! A motorcycle owns its suspension kits and the tuning configs recorded
//! against it. Ownership never changes after registration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Motorcycle database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "motorcycles")]
pub struct Model {
    /// Unique identifier for the motorcycle
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner's user id
    pub user_id: String,
    /// Manufacturer (e.g., "KTM", "Yamaha")
    pub brand: String,
    /// Model name (e.g., "890 Duke R")
    pub model: String,
    /// Model year, if known
    pub year: Option<i32>,
    /// Rider's nickname for the bike
    pub nickname: Option<String>,
    /// When the motorcycle was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Motorcycle and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One motorcycle has many suspension kits
    #[sea_orm(has_many = "super::suspension_kit::Entity")]
    SuspensionKits,
    /// One motorcycle has many tuning configs
    #[sea_orm(has_many = "super::tuning_config::Entity")]
    TuningConfigs,
}

impl Related<super::suspension_kit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionKits.def()
    }
}

impl Related<super::tuning_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TuningConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
