//! Tuning config business logic - creating, sharing and applying configs.
//!
//! New configs are always bound to a kit through the resolver. Their settings
//! are a snapshot: editing the kit later does not change them.

use crate::{
    core::{
        kit::{get_kit_by_id, require_kit},
        motorcycle::get_motorcycle_by_id,
        resolver::{ResolvedKit, resolve_kit},
        settings::ClickSettings,
    },
    entities::{TuningConfig, suspension_kit, tuning_config},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::info;

/// Who can see a config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the author
    #[default]
    Private,
    /// Anyone holding the link
    Link,
    /// Listed in the public feed
    Public,
}

impl Visibility {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Link => "link",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "private" => Ok(Self::Private),
            "link" => Ok(Self::Link),
            "public" => Ok(Self::Public),
            other => Err(Error::InvalidVisibility {
                value: other.to_string(),
            }),
        }
    }
}

/// Arguments for creating a config.
#[derive(Debug, Clone, Default)]
pub struct NewConfig {
    /// Owning user id
    pub user_id: String,
    /// Motorcycle the record belongs to
    pub motorcycle_id: i64,
    /// Kit chosen by the caller; resolved automatically when None
    pub suspension_kit_id: Option<i64>,
    /// Conversation that produced the config
    pub conversation_id: Option<String>,
    /// Short title
    pub title: String,
    /// Snapshot to store; None copies the resolved kit's current settings
    pub settings: Option<ClickSettings>,
    /// Initial sharing state
    pub visibility: Visibility,
}

/// A newly created config and the kit it was bound to.
#[derive(Debug, Clone)]
pub struct CreatedConfig {
    /// The stored config
    pub config: tuning_config::Model,
    /// Kit resolution outcome
    pub resolved: ResolvedKit,
}

impl CreatedConfig {
    /// Id of the new config
    #[must_use]
    pub const fn config_id(&self) -> i64 {
        self.config.id
    }

    /// Kit the config was bound to
    #[must_use]
    pub const fn effective_kit_id(&self) -> i64 {
        self.resolved.effective_kit_id
    }
}

/// Creates a config, resolving (and if needed creating) its kit in the same
/// transaction.
pub async fn create_config(db: &DatabaseConnection, new_config: NewConfig) -> Result<CreatedConfig> {
    let txn = db.begin().await?;

    get_motorcycle_by_id(&txn, new_config.motorcycle_id)
        .await?
        .ok_or(Error::MotorcycleNotFound {
            id: new_config.motorcycle_id,
        })?;

    let resolved = resolve_kit(
        &txn,
        new_config.motorcycle_id,
        new_config.suspension_kit_id,
        &new_config.user_id,
    )
    .await?;

    let kit = get_kit_by_id(&txn, resolved.effective_kit_id)
        .await?
        .ok_or(Error::KitNotFound {
            id: resolved.effective_kit_id,
        })?;
    let snapshot = new_config
        .settings
        .unwrap_or_else(|| ClickSettings::current_of(&kit));

    let now = Utc::now();
    let mut config = tuning_config::ActiveModel {
        user_id: Set(new_config.user_id),
        motorcycle_id: Set(new_config.motorcycle_id),
        suspension_kit_id: Set(Some(resolved.effective_kit_id)),
        conversation_id: Set(new_config.conversation_id),
        title: Set(new_config.title),
        visibility: Set(new_config.visibility.as_str().to_string()),
        is_public: Set(new_config.visibility == Visibility::Public),
        likes_count: Set(0),
        comments_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    snapshot.set_snapshot(&mut config);
    let config = config.insert(&txn).await?;

    txn.commit().await?;
    info!(
        "Created config {} on motorcycle {} bound to kit {} ({:?})",
        config.id, config.motorcycle_id, resolved.effective_kit_id, resolved.source
    );
    Ok(CreatedConfig { config, resolved })
}

/// Finds a config by id.
pub async fn get_config_by_id(
    db: &DatabaseConnection,
    config_id: i64,
) -> Result<Option<tuning_config::Model>> {
    TuningConfig::find_by_id(config_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_config(db: &DatabaseConnection, config_id: i64) -> Result<tuning_config::Model> {
    get_config_by_id(db, config_id)
        .await?
        .ok_or(Error::ConfigNotFound { id: config_id })
}

/// Lists a motorcycle's configs, newest first.
pub async fn get_configs_for_motorcycle(
    db: &DatabaseConnection,
    motorcycle_id: i64,
) -> Result<Vec<tuning_config::Model>> {
    TuningConfig::find()
        .filter(tuning_config::Column::MotorcycleId.eq(motorcycle_id))
        .order_by_desc(tuning_config::Column::CreatedAt)
        .order_by_desc(tuning_config::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Changes who can see a config. The legacy `is_public` flag follows.
pub async fn update_config_visibility(
    db: &DatabaseConnection,
    config_id: i64,
    visibility: Visibility,
) -> Result<tuning_config::Model> {
    let config = require_config(db, config_id).await?;

    let mut active: tuning_config::ActiveModel = config.into();
    active.visibility = Set(visibility.as_str().to_string());
    active.is_public = Set(visibility == Visibility::Public);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a config.
pub async fn delete_config(db: &DatabaseConnection, config_id: i64) -> Result<()> {
    let config = require_config(db, config_id).await?;
    config.delete(db).await?;
    info!("Deleted config {}", config_id);
    Ok(())
}

/// Copies a config's snapshot onto a kit's current settings. Adjusters the
/// snapshot does not record are left as they are on the kit.
pub async fn apply_config_to_kit(
    db: &DatabaseConnection,
    config_id: i64,
    kit_id: i64,
) -> Result<suspension_kit::Model> {
    let config = require_config(db, config_id).await?;
    let kit = require_kit(db, kit_id).await?;

    let mut active: suspension_kit::ActiveModel = kit.into();
    ClickSettings::snapshot_of(&config).merge_into_current(&mut active);
    active.updated_at = Set(Utc::now());
    let kit = active.update(db).await?;

    info!("Applied config {} to kit {}", config_id, kit_id);
    Ok(kit)
}
