//! Motorcycle business logic - registration and removal.
//!
//! Registering a motorcycle also creates its first suspension kit, which is the
//! default. Deleting a motorcycle removes its configs and kits with it.

use crate::{
    core::kit::{NewKit, insert_kit},
    entities::{Motorcycle, SuspensionKit, TuningConfig, motorcycle, suspension_kit, tuning_config},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Arguments for registering a motorcycle.
#[derive(Debug, Clone, Default)]
pub struct NewMotorcycle {
    /// Owning user id
    pub user_id: String,
    /// Manufacturer
    pub brand: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: Option<i32>,
    /// Rider's nickname for the bike
    pub nickname: Option<String>,
}

/// Finds a motorcycle by id.
pub async fn get_motorcycle_by_id<C>(db: &C, motorcycle_id: i64) -> Result<Option<motorcycle::Model>>
where
    C: ConnectionTrait,
{
    Motorcycle::find_by_id(motorcycle_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's motorcycles, oldest registration first.
pub async fn get_motorcycles_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<motorcycle::Model>> {
    Motorcycle::find()
        .filter(motorcycle::Column::UserId.eq(user_id))
        .order_by_asc(motorcycle::Column::CreatedAt)
        .order_by_asc(motorcycle::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Registers a motorcycle together with its default "Kit Standard".
///
/// Returns the motorcycle and its first kit.
pub async fn create_motorcycle(
    db: &DatabaseConnection,
    new_motorcycle: NewMotorcycle,
) -> Result<(motorcycle::Model, suspension_kit::Model)> {
    if new_motorcycle.brand.trim().is_empty() || new_motorcycle.model.trim().is_empty() {
        return Err(Error::Config {
            message: "Motorcycle brand and model are required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let moto = motorcycle::ActiveModel {
        user_id: Set(new_motorcycle.user_id),
        brand: Set(new_motorcycle.brand.trim().to_string()),
        model: Set(new_motorcycle.model.trim().to_string()),
        year: Set(new_motorcycle.year),
        nickname: Set(new_motorcycle.nickname),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let kit = insert_kit(&txn, NewKit::standard(moto.id, &moto.user_id)).await?;

    txn.commit().await?;
    info!(
        "Registered motorcycle {} {} (ID: {}) for user {}",
        moto.brand, moto.model, moto.id, moto.user_id
    );
    Ok((moto, kit))
}

/// Deletes a motorcycle along with all of its configs and kits.
pub async fn delete_motorcycle(db: &DatabaseConnection, motorcycle_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let moto = get_motorcycle_by_id(&txn, motorcycle_id)
        .await?
        .ok_or(Error::MotorcycleNotFound { id: motorcycle_id })?;

    let configs = TuningConfig::delete_many()
        .filter(tuning_config::Column::MotorcycleId.eq(motorcycle_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let kits = SuspensionKit::delete_many()
        .filter(suspension_kit::Column::MotorcycleId.eq(motorcycle_id))
        .exec(&txn)
        .await?
        .rows_affected;
    moto.delete(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted motorcycle {} with {} kit(s) and {} config(s)",
        motorcycle_id, kits, configs
    );
    Ok(())
}
