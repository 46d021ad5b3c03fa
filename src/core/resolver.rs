//! Kit resolution for new configs.
//!
//! A config being created is bound to a kit chosen by the first rule that
//! matches:
//!
//! 1. the kit id supplied by the caller, used as-is;
//! 2. the motorcycle's default kit;
//! 3. the motorcycle's newest kit;
//! 4. a freshly created, default "Kit Standard" owned by the requesting user.
//!
//! Only the last rule writes anything.

use crate::{
    core::{
        kit::{self, NewKit, insert_kit},
        motorcycle::get_motorcycle_by_id,
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info};

/// Which resolution rule produced the kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KitSource {
    /// Supplied by the caller
    Explicit,
    /// The motorcycle's default kit
    Default,
    /// Newest kit of a motorcycle without a default
    Fallback,
    /// Created because the motorcycle had no kits
    Created,
}

/// Kit a new config should be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedKit {
    /// Kit the config binds to
    pub effective_kit_id: i64,
    /// Rule that produced the kit
    pub source: KitSource,
}

/// Resolves the kit inside the caller's transaction.
pub(crate) async fn resolve_kit<C>(
    db: &C,
    motorcycle_id: i64,
    explicit_kit_id: Option<i64>,
    requesting_user_id: &str,
) -> Result<ResolvedKit>
where
    C: ConnectionTrait,
{
    if let Some(kit_id) = explicit_kit_id {
        return Ok(ResolvedKit {
            effective_kit_id: kit_id,
            source: KitSource::Explicit,
        });
    }

    if let Some(default_kit) = kit::get_default_kit(db, motorcycle_id).await? {
        return Ok(ResolvedKit {
            effective_kit_id: default_kit.id,
            source: KitSource::Default,
        });
    }

    let kits = kit::get_kits_for_motorcycle(db, motorcycle_id).await?;
    if let Some(newest) = kits.first() {
        debug!(
            "Motorcycle {} has no default kit, falling back to kit {}",
            motorcycle_id, newest.id
        );
        return Ok(ResolvedKit {
            effective_kit_id: newest.id,
            source: KitSource::Fallback,
        });
    }

    get_motorcycle_by_id(db, motorcycle_id)
        .await?
        .ok_or(Error::MotorcycleNotFound { id: motorcycle_id })?;

    let created = insert_kit(db, NewKit::standard(motorcycle_id, requesting_user_id)).await?;
    info!(
        "Motorcycle {} had no kits, created '{}' (ID: {})",
        motorcycle_id, created.name, created.id
    );
    Ok(ResolvedKit {
        effective_kit_id: created.id,
        source: KitSource::Created,
    })
}

/// Resolves the kit a new config for `motorcycle_id` should use, creating a
/// standard kit when the motorcycle has none.
pub async fn resolve_kit_for_config_creation(
    db: &DatabaseConnection,
    motorcycle_id: i64,
    explicit_kit_id: Option<i64>,
    requesting_user_id: &str,
) -> Result<ResolvedKit> {
    let txn = db.begin().await?;
    let resolved = resolve_kit(&txn, motorcycle_id, explicit_kit_id, requesting_user_id).await?;
    txn.commit().await?;
    Ok(resolved)
}
