//! Orphan config repair.
//!
//! Configs recorded before kits existed, or whose kit was deleted, reference a
//! motorcycle but no kit. These procedures bind them to a kit of that
//! motorcycle. Both only touch configs whose kit id is unset, so re-running
//! them repairs nothing further.

use crate::{
    core::kit::{self, require_kit},
    entities::{TuningConfig, tuning_config},
    errors::Result,
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Outcome of [`repair_orphan_configs_for_kit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrphanRepair {
    /// Configs bound to the kit by this run
    pub repaired: u64,
}

/// Outcome of [`migrate_user_configs_to_default_kit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserMigration {
    /// Configs bound to a kit by this run
    pub migrated_count: u64,
    /// Configs of the user that had no kit before the run
    pub total_without_kit: u64,
}

/// Binds every kit-less config of the kit's motorcycle to this kit.
///
/// Only a default kit may claim orphans; for any other kit nothing changes.
#[instrument(skip(db))]
pub async fn repair_orphan_configs_for_kit(
    db: &DatabaseConnection,
    kit_id: i64,
) -> Result<OrphanRepair> {
    let kit = require_kit(db, kit_id).await?;
    if !kit.is_default {
        debug!("Kit {} is not the default, leaving orphans alone", kit_id);
        return Ok(OrphanRepair::default());
    }

    let repaired = TuningConfig::update_many()
        .col_expr(tuning_config::Column::SuspensionKitId, Expr::value(kit_id))
        .filter(tuning_config::Column::MotorcycleId.eq(kit.motorcycle_id))
        .filter(tuning_config::Column::SuspensionKitId.is_null())
        .exec(db)
        .await?
        .rows_affected;

    if repaired > 0 {
        info!(
            "Bound {} orphan config(s) of motorcycle {} to kit {}",
            repaired, kit.motorcycle_id, kit_id
        );
    }
    Ok(OrphanRepair { repaired })
}

/// Binds each of a user's kit-less configs to its motorcycle's default kit, or
/// to the newest kit when there is no default. Configs of motorcycles without
/// kits stay orphaned.
#[instrument(skip(db))]
pub async fn migrate_user_configs_to_default_kit(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<UserMigration> {
    let txn = db.begin().await?;

    let orphans = TuningConfig::find()
        .filter(tuning_config::Column::UserId.eq(user_id))
        .filter(tuning_config::Column::SuspensionKitId.is_null())
        .order_by_asc(tuning_config::Column::Id)
        .all(&txn)
        .await?;

    let mut by_motorcycle: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for config in &orphans {
        by_motorcycle
            .entry(config.motorcycle_id)
            .or_default()
            .push(config.id);
    }

    let mut migrated_count = 0;
    for (motorcycle_id, config_ids) in by_motorcycle {
        let kits = kit::get_kits_for_motorcycle(&txn, motorcycle_id).await?;
        let Some(target) = kits.iter().find(|k| k.is_default).or_else(|| kits.first()) else {
            debug!(
                "Motorcycle {} has no kits, {} config(s) stay orphaned",
                motorcycle_id,
                config_ids.len()
            );
            continue;
        };

        migrated_count += TuningConfig::update_many()
            .col_expr(tuning_config::Column::SuspensionKitId, Expr::value(target.id))
            .filter(tuning_config::Column::Id.is_in(config_ids))
            .filter(tuning_config::Column::SuspensionKitId.is_null())
            .exec(&txn)
            .await?
            .rows_affected;
    }

    txn.commit().await?;
    let summary = UserMigration {
        migrated_count,
        total_without_kit: orphans.len() as u64,
    };
    info!(
        "Migrated {} of {} kit-less config(s) for user {}",
        summary.migrated_count, summary.total_without_kit, user_id
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::tuning::get_config_by_id;
    use crate::errors::Error;
    use crate::test_utils::*;

    async fn kit_of(db: &DatabaseConnection, config_id: i64) -> Result<Option<i64>> {
        Ok(get_config_by_id(db, config_id)
            .await?
            .unwrap()
            .suspension_kit_id)
    }

    #[tokio::test]
    async fn test_default_kit_claims_orphans() -> Result<()> {
        let db = setup_test_db().await?;
        let (moto, standard) = create_test_motorcycle(&db).await?;
        let a = insert_orphan_config(&db, "test_user", moto.id).await?;
        let b = insert_orphan_config(&db, "other_user", moto.id).await?;

        let repair = repair_orphan_configs_for_kit(&db, standard.id).await?;
        assert_eq!(repair.repaired, 2);
        for id in [a.id, b.id] {
            let config = get_config_by_id(&db, id).await?.unwrap();
            assert_eq!(config.suspension_kit_id, Some(standard.id));
        }

        let again = repair_orphan_configs_for_kit(&db, standard.id).await?;
        assert_eq!(again.repaired, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_default_kit_does_not_claim_orphans() -> Result<()> {
        let db = setup_test_db().await?;
        let (moto, _) = create_test_motorcycle(&db).await?;
        let track = create_test_kit(&db, moto.id, "Track", false).await?;
        let orphan = insert_orphan_config(&db, "test_user", moto.id).await?;

        let repair = repair_orphan_configs_for_kit(&db, track.id).await?;
        assert_eq!(repair.repaired, 0);
        let config = get_config_by_id(&db, orphan.id).await?.unwrap();
        assert_eq!(config.suspension_kit_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_only_touches_own_motorcycle() -> Result<()> {
        let db = setup_test_db().await?;
        let (moto, standard) = create_test_motorcycle(&db).await?;
        let (other, _) = create_test_motorcycle(&db).await?;
        let foreign = insert_orphan_config(&db, "test_user", other.id).await?;
        insert_orphan_config(&db, "test_user", moto.id).await?;

        assert_eq!(repair_orphan_configs_for_kit(&db, standard.id).await?.repaired, 1);
        let untouched = get_config_by_id(&db, foreign.id).await?.unwrap();
        assert_eq!(untouched.suspension_kit_id, None);

        let missing = repair_orphan_configs_for_kit(&db, 999).await;
        assert!(matches!(missing, Err(Error::KitNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_migrate_user_configs() -> Result<()> {
        let db = setup_test_db().await?;

        // Motorcycle with a default kit
        let (with_default, standard) = create_test_motorcycle(&db).await?;
        create_test_kit(&db, with_default.id, "Track", false).await?;
        let a = insert_orphan_config(&db, "rider", with_default.id).await?;

        // Motorcycle with kits but no default
        let no_default = insert_bare_motorcycle(&db, "rider").await?;
        insert_raw_kit(&db, no_default.id, "Old", false, at_minute(1)).await?;
        let newest = insert_raw_kit(&db, no_default.id, "New", false, at_minute(2)).await?;
        let b = insert_orphan_config(&db, "rider", no_default.id).await?;

        // Motorcycle without kits
        let kitless = insert_bare_motorcycle(&db, "rider").await?;
        let c = insert_orphan_config(&db, "rider", kitless.id).await?;

        // Someone else's orphan is ignored
        let foreign = insert_orphan_config(&db, "someone_else", with_default.id).await?;

        let migration = migrate_user_configs_to_default_kit(&db, "rider").await?;
        assert_eq!(migration.total_without_kit, 3);
        assert_eq!(migration.migrated_count, 2);

        assert_eq!(kit_of(&db, a.id).await?, Some(standard.id));
        assert_eq!(kit_of(&db, b.id).await?, Some(newest.id));
        assert_eq!(kit_of(&db, c.id).await?, None);
        assert_eq!(kit_of(&db, foreign.id).await?, None);

        let again = migrate_user_configs_to_default_kit(&db, "rider").await?;
        assert_eq!(again.total_without_kit, 1);
        assert_eq!(again.migrated_count, 0);
        Ok(())
    }
}
