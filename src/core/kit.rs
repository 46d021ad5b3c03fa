//! Suspension kit business logic - kit CRUD and the single-default invariant.
//!
//! For every motorcycle with at least one kit, exactly one kit carries
//! `is_default = true`. Every mutation that can affect the flag runs inside one
//! database transaction, so demoting the other kits and promoting the chosen
//! one is atomic from the caller's point of view. Concurrent writers against
//! the same motorcycle can still leave two defaults behind; the reconciliation
//! functions at the bottom of this module heal that state and are safe to run
//! any number of times.
//!
//! Wherever a kit has to be picked without an explicit id, the most recently
//! created kit wins (`created_at` descending, `id` descending as tiebreak).

use crate::{
    core::settings::ClickSettings,
    entities::{Motorcycle, SuspensionKit, TuningConfig, suspension_kit, tuning_config},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Name given to kits the engine creates on its own.
pub const STANDARD_KIT_NAME: &str = "Kit Standard";

/// Suffix appended to the name of a duplicated kit.
pub const COPY_SUFFIX: &str = " (copy)";

/// Fork and shock identification of a kit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hardware {
    /// Fork manufacturer
    pub fork_brand: Option<String>,
    /// Fork model name
    pub fork_model: Option<String>,
    /// Shock manufacturer
    pub shock_brand: Option<String>,
    /// Shock model name
    pub shock_model: Option<String>,
}

/// Arguments for creating a kit.
#[derive(Debug, Clone, Default)]
pub struct NewKit {
    /// Motorcycle the record belongs to
    pub motorcycle_id: i64,
    /// Owning user id
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Fork and shock identification
    pub hardware: Hardware,
    /// Calibration ceilings
    pub max_clicks: ClickSettings,
    /// As-delivered settings
    pub baseline: ClickSettings,
    /// Live settings
    pub current: ClickSettings,
    /// Free-form notes
    pub notes: Option<String>,
    /// Requested default flag; forced to true for a motorcycle's first kit
    pub is_default: bool,
}

impl NewKit {
    /// A bare kit with no hardware details and no calibration.
    #[must_use]
    pub fn standard(motorcycle_id: i64, user_id: &str) -> Self {
        Self {
            motorcycle_id,
            user_id: user_id.to_string(),
            name: STANDARD_KIT_NAME.to_string(),
            is_default: true,
            ..Default::default()
        }
    }
}

/// Partial update of a kit.
///
/// Every field is three-state: `None` leaves the column as it is. For nullable
/// columns `Some(None)` clears the value and `Some(Some(v))` sets it. Setting
/// one of the click groups replaces all five adjusters of that group.
#[derive(Debug, Clone, Default)]
pub struct KitPatch {
    /// Display name
    pub name: Option<String>,
    /// Fork manufacturer
    pub fork_brand: Option<Option<String>>,
    /// Fork model name
    pub fork_model: Option<Option<String>>,
    /// Shock manufacturer
    pub shock_brand: Option<Option<String>>,
    /// Shock model name
    pub shock_model: Option<Option<String>>,
    /// Calibration ceilings
    pub max_clicks: Option<ClickSettings>,
    /// As-delivered settings
    pub baseline: Option<ClickSettings>,
    /// Live settings
    pub current: Option<ClickSettings>,
    /// Free-form notes
    pub notes: Option<Option<String>>,
    /// `Some(true)` promotes the kit and demotes its siblings; `Some(false)`
    /// clears only this kit's flag.
    pub is_default: Option<bool>,
}

/// Outcome of deleting a kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedKit {
    /// Id of the deleted kit
    pub kit_id: i64,
    /// Kit promoted to default because the deleted kit held the flag
    pub promoted_kit_id: Option<i64>,
    /// Configs that referenced the deleted kit and are now orphans
    pub detached_configs: u64,
}

/// Outcome of reconciling one motorcycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultRepair {
    /// Whether any flag had to change
    pub fixed: bool,
    /// The default kit after reconciliation, None when the motorcycle has no kits
    pub default_kit_id: Option<i64>,
}

/// Outcome of a fleet-wide sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Motorcycles whose kits were changed
    pub fixed_count: usize,
    /// Motorcycles owning at least one kit
    pub total_motos: usize,
}

/// Flag changes needed to restore a single default on one motorcycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultPlan {
    /// Kit that must end up as default
    pub keep: Option<i64>,
    /// Kit that must be promoted (not currently flagged)
    pub promote: Option<i64>,
    /// Kits that must lose the flag
    pub demote: Vec<i64>,
}

impl DefaultPlan {
    /// True when no flag needs to change.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.promote.is_none() && self.demote.is_empty()
    }
}

/// Sorts kits newest first: `created_at` descending, then `id` descending.
pub fn order_newest_first(kits: &mut [suspension_kit::Model]) {
    kits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Decides which flags to change so exactly one kit is default.
///
/// - no kits: nothing to do
/// - no default: promote the newest kit
/// - several defaults: keep the newest flagged kit, demote the rest
/// - one default: nothing to do
#[must_use]
pub fn plan_default_fix(kits: &[suspension_kit::Model]) -> DefaultPlan {
    let mut ordered = kits.to_vec();
    order_newest_first(&mut ordered);

    let mut flagged = ordered.iter().filter(|k| k.is_default);
    match flagged.next() {
        None => {
            let newest = ordered.first().map(|k| k.id);
            DefaultPlan {
                keep: newest,
                promote: newest,
                demote: Vec::new(),
            }
        }
        Some(kept) => DefaultPlan {
            keep: Some(kept.id),
            promote: None,
            demote: flagged.map(|k| k.id).collect(),
        },
    }
}

/// Finds a kit by id.
pub async fn get_kit_by_id<C>(db: &C, kit_id: i64) -> Result<Option<suspension_kit::Model>>
where
    C: ConnectionTrait,
{
    SuspensionKit::find_by_id(kit_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a kit by id or fails with `KitNotFound`.
pub async fn require_kit<C>(db: &C, kit_id: i64) -> Result<suspension_kit::Model>
where
    C: ConnectionTrait,
{
    get_kit_by_id(db, kit_id)
        .await?
        .ok_or(Error::KitNotFound { id: kit_id })
}

/// Lists the kits of a motorcycle, newest first.
pub async fn get_kits_for_motorcycle<C>(
    db: &C,
    motorcycle_id: i64,
) -> Result<Vec<suspension_kit::Model>>
where
    C: ConnectionTrait,
{
    SuspensionKit::find()
        .filter(suspension_kit::Column::MotorcycleId.eq(motorcycle_id))
        .order_by_desc(suspension_kit::Column::CreatedAt)
        .order_by_desc(suspension_kit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the motorcycle's default kit. If several kits carry the flag the
/// newest of them is returned.
pub async fn get_default_kit<C>(db: &C, motorcycle_id: i64) -> Result<Option<suspension_kit::Model>>
where
    C: ConnectionTrait,
{
    SuspensionKit::find()
        .filter(suspension_kit::Column::MotorcycleId.eq(motorcycle_id))
        .filter(suspension_kit::Column::IsDefault.eq(true))
        .order_by_desc(suspension_kit::Column::CreatedAt)
        .order_by_desc(suspension_kit::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Clears the default flag on every kit of `motorcycle_id` except `keep_kit_id`.
async fn demote_others<C>(db: &C, motorcycle_id: i64, keep_kit_id: Option<i64>) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut update = SuspensionKit::update_many()
        .col_expr(suspension_kit::Column::IsDefault, Expr::value(false))
        .col_expr(suspension_kit::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(suspension_kit::Column::MotorcycleId.eq(motorcycle_id))
        .filter(suspension_kit::Column::IsDefault.eq(true));
    if let Some(keep) = keep_kit_id {
        update = update.filter(suspension_kit::Column::Id.ne(keep));
    }
    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}

async fn set_default_flag<C>(db: &C, kit_id: i64, is_default: bool) -> Result<()>
where
    C: ConnectionTrait,
{
    SuspensionKit::update_many()
        .col_expr(suspension_kit::Column::IsDefault, Expr::value(is_default))
        .col_expr(suspension_kit::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(suspension_kit::Column::Id.eq(kit_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Inserts a kit, enforcing the default rules. Must run inside the caller's
/// transaction; the motorcycle is assumed to exist.
pub(crate) async fn insert_kit<C>(db: &C, new_kit: NewKit) -> Result<suspension_kit::Model>
where
    C: ConnectionTrait,
{
    let existing = SuspensionKit::find()
        .filter(suspension_kit::Column::MotorcycleId.eq(new_kit.motorcycle_id))
        .count(db)
        .await?;

    let is_default = existing == 0 || new_kit.is_default;
    if existing == 0 && !new_kit.is_default {
        debug!(
            "First kit of motorcycle {} is forced to default",
            new_kit.motorcycle_id
        );
    }
    if is_default && existing > 0 {
        demote_others(db, new_kit.motorcycle_id, None).await?;
    }

    let now = Utc::now();
    let mut kit = suspension_kit::ActiveModel {
        motorcycle_id: Set(new_kit.motorcycle_id),
        user_id: Set(new_kit.user_id),
        name: Set(new_kit.name.trim().to_string()),
        fork_brand: Set(new_kit.hardware.fork_brand),
        fork_model: Set(new_kit.hardware.fork_model),
        shock_brand: Set(new_kit.hardware.shock_brand),
        shock_model: Set(new_kit.hardware.shock_model),
        max_fork_compression: Set(new_kit.max_clicks.fork_compression),
        max_fork_rebound: Set(new_kit.max_clicks.fork_rebound),
        max_shock_compression_low: Set(new_kit.max_clicks.shock_compression_low),
        max_shock_compression_high: Set(new_kit.max_clicks.shock_compression_high),
        max_shock_rebound: Set(new_kit.max_clicks.shock_rebound),
        baseline_fork_compression: Set(new_kit.baseline.fork_compression),
        baseline_fork_rebound: Set(new_kit.baseline.fork_rebound),
        baseline_shock_compression_low: Set(new_kit.baseline.shock_compression_low),
        baseline_shock_compression_high: Set(new_kit.baseline.shock_compression_high),
        baseline_shock_rebound: Set(new_kit.baseline.shock_rebound),
        notes: Set(new_kit.notes),
        is_default: Set(is_default),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    new_kit.current.set_current(&mut kit);

    let kit = kit.insert(db).await?;
    info!(
        "Created kit '{}' (ID: {}) for motorcycle {} (default: {})",
        kit.name, kit.id, kit.motorcycle_id, kit.is_default
    );
    Ok(kit)
}

/// Creates a kit for an existing motorcycle.
///
/// The first kit of a motorcycle is always the default, whatever the caller
/// asked for. Requesting `is_default` on a later kit demotes the others in the
/// same transaction.
pub async fn create_kit(db: &DatabaseConnection, new_kit: NewKit) -> Result<suspension_kit::Model> {
    if new_kit.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Kit name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    Motorcycle::find_by_id(new_kit.motorcycle_id)
        .one(&txn)
        .await?
        .ok_or(Error::MotorcycleNotFound {
            id: new_kit.motorcycle_id,
        })?;

    let kit = insert_kit(&txn, new_kit).await?;
    txn.commit().await?;
    Ok(kit)
}

/// Applies a partial update to a kit.
///
/// Only `is_default: Some(true)` touches other kits: they are demoted before the
/// patch is written. Clearing the flag on the current default leaves the
/// motorcycle without one until it is reconciled.
pub async fn update_kit(
    db: &DatabaseConnection,
    kit_id: i64,
    patch: KitPatch,
) -> Result<suspension_kit::Model> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(Error::Config {
            message: "Kit name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let kit = require_kit(&txn, kit_id).await?;
    let motorcycle_id = kit.motorcycle_id;
    let was_default = kit.is_default;

    if patch.is_default == Some(true) {
        let demoted = demote_others(&txn, motorcycle_id, Some(kit_id)).await?;
        debug!(
            "Demoted {} sibling kit(s) of kit {} on motorcycle {}",
            demoted, kit_id, motorcycle_id
        );
    }

    let mut active: suspension_kit::ActiveModel = kit.into();
    if let Some(name) = patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(v) = patch.fork_brand {
        active.fork_brand = Set(v);
    }
    if let Some(v) = patch.fork_model {
        active.fork_model = Set(v);
    }
    if let Some(v) = patch.shock_brand {
        active.shock_brand = Set(v);
    }
    if let Some(v) = patch.shock_model {
        active.shock_model = Set(v);
    }
    if let Some(max) = patch.max_clicks {
        active.max_fork_compression = Set(max.fork_compression);
        active.max_fork_rebound = Set(max.fork_rebound);
        active.max_shock_compression_low = Set(max.shock_compression_low);
        active.max_shock_compression_high = Set(max.shock_compression_high);
        active.max_shock_rebound = Set(max.shock_rebound);
    }
    if let Some(baseline) = patch.baseline {
        active.baseline_fork_compression = Set(baseline.fork_compression);
        active.baseline_fork_rebound = Set(baseline.fork_rebound);
        active.baseline_shock_compression_low = Set(baseline.shock_compression_low);
        active.baseline_shock_compression_high = Set(baseline.shock_compression_high);
        active.baseline_shock_rebound = Set(baseline.shock_rebound);
    }
    if let Some(current) = patch.current {
        current.set_current(&mut active);
    }
    if let Some(v) = patch.notes {
        active.notes = Set(v);
    }
    if let Some(flag) = patch.is_default {
        active.is_default = Set(flag);
        if was_default && !flag {
            warn!(
                "Kit {} lost its default flag; motorcycle {} has no default until reconciled",
                kit_id, motorcycle_id
            );
        }
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Makes `kit_id` the default kit of its motorcycle.
pub async fn set_default_kit(db: &DatabaseConnection, kit_id: i64) -> Result<()> {
    update_kit(
        db,
        kit_id,
        KitPatch {
            is_default: Some(true),
            ..Default::default()
        },
    )
    .await?;
    info!("Kit {} is now the default", kit_id);
    Ok(())
}

/// Deletes a kit.
///
/// Configs bound to the kit are detached (their kit id is cleared) so the
/// orphan repair can re-home them. If the deleted kit was the default, the
/// newest remaining kit is promoted.
pub async fn delete_kit(db: &DatabaseConnection, kit_id: i64) -> Result<DeletedKit> {
    let txn = db.begin().await?;

    let kit = require_kit(&txn, kit_id).await?;
    let motorcycle_id = kit.motorcycle_id;
    let was_default = kit.is_default;

    let detached = TuningConfig::update_many()
        .col_expr(
            tuning_config::Column::SuspensionKitId,
            Expr::value(Option::<i64>::None),
        )
        .filter(tuning_config::Column::SuspensionKitId.eq(kit_id))
        .exec(&txn)
        .await?
        .rows_affected;

    kit.delete(&txn).await?;

    let mut promoted_kit_id = None;
    if was_default {
        let remaining = get_kits_for_motorcycle(&txn, motorcycle_id).await?;
        if let Some(next) = remaining.first() {
            set_default_flag(&txn, next.id, true).await?;
            promoted_kit_id = Some(next.id);
            info!(
                "Promoted kit {} to default after deleting kit {}",
                next.id, kit_id
            );
        } else {
            debug!("Motorcycle {} has no kits left", motorcycle_id);
        }
    }

    txn.commit().await?;
    info!(
        "Deleted kit {} (detached {} config(s))",
        kit_id, detached
    );
    Ok(DeletedKit {
        kit_id,
        promoted_kit_id,
        detached_configs: detached,
    })
}

/// Copies a kit under the name "<name> (copy)". The copy is never the default.
pub async fn duplicate_kit(db: &DatabaseConnection, kit_id: i64) -> Result<suspension_kit::Model> {
    let source = require_kit(db, kit_id).await?;
    let now = Utc::now();

    let mut copy = suspension_kit::ActiveModel {
        motorcycle_id: Set(source.motorcycle_id),
        user_id: Set(source.user_id.clone()),
        name: Set(format!("{}{COPY_SUFFIX}", source.name)),
        fork_brand: Set(source.fork_brand.clone()),
        fork_model: Set(source.fork_model.clone()),
        shock_brand: Set(source.shock_brand.clone()),
        shock_model: Set(source.shock_model.clone()),
        max_fork_compression: Set(source.max_fork_compression),
        max_fork_rebound: Set(source.max_fork_rebound),
        max_shock_compression_low: Set(source.max_shock_compression_low),
        max_shock_compression_high: Set(source.max_shock_compression_high),
        max_shock_rebound: Set(source.max_shock_rebound),
        baseline_fork_compression: Set(source.baseline_fork_compression),
        baseline_fork_rebound: Set(source.baseline_fork_rebound),
        baseline_shock_compression_low: Set(source.baseline_shock_compression_low),
        baseline_shock_compression_high: Set(source.baseline_shock_compression_high),
        baseline_shock_rebound: Set(source.baseline_shock_rebound),
        notes: Set(source.notes.clone()),
        is_default: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    ClickSettings::current_of(&source).set_current(&mut copy);

    let copy = copy.insert(db).await?;
    info!("Duplicated kit {} as kit {}", kit_id, copy.id);
    Ok(copy)
}

/// Restores a kit's current settings to its baseline.
pub async fn reset_kit_to_baseline(
    db: &DatabaseConnection,
    kit_id: i64,
) -> Result<suspension_kit::Model> {
    let kit = require_kit(db, kit_id).await?;
    let baseline = ClickSettings::baseline_of(&kit);

    let mut active: suspension_kit::ActiveModel = kit.into();
    baseline.set_current(&mut active);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Applies a plan to the database.
async fn apply_plan<C>(db: &C, plan: &DefaultPlan) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(kit_id) = plan.promote {
        set_default_flag(db, kit_id, true).await?;
    }
    for kit_id in &plan.demote {
        set_default_flag(db, *kit_id, false).await?;
    }
    Ok(())
}

/// Restores exactly one default kit on a motorcycle.
///
/// With no default the newest kit is promoted; with several, the newest
/// flagged kit is kept and the rest are demoted. Running it again right after
/// reports `fixed = false`.
#[instrument(skip(db))]
pub async fn ensure_single_default_for_moto(
    db: &DatabaseConnection,
    motorcycle_id: i64,
) -> Result<DefaultRepair> {
    let txn = db.begin().await?;

    Motorcycle::find_by_id(motorcycle_id)
        .one(&txn)
        .await?
        .ok_or(Error::MotorcycleNotFound { id: motorcycle_id })?;

    let kits = get_kits_for_motorcycle(&txn, motorcycle_id).await?;
    let plan = plan_default_fix(&kits);
    let fixed = !plan.is_noop();
    if fixed {
        apply_plan(&txn, &plan).await?;
        info!(
            "Reconciled default kit of motorcycle {}: keep {:?}, demoted {:?}",
            motorcycle_id, plan.keep, plan.demote
        );
    }

    txn.commit().await?;
    Ok(DefaultRepair {
        fixed,
        default_kit_id: plan.keep,
    })
}

/// Loads every kit grouped by motorcycle.
async fn kits_by_motorcycle<C>(db: &C) -> Result<BTreeMap<i64, Vec<suspension_kit::Model>>>
where
    C: ConnectionTrait,
{
    let mut grouped: BTreeMap<i64, Vec<suspension_kit::Model>> = BTreeMap::new();
    for kit in SuspensionKit::find().all(db).await? {
        grouped.entry(kit.motorcycle_id).or_default().push(kit);
    }
    Ok(grouped)
}

/// Sweeps all motorcycles owning kits and promotes a default where none is set.
///
/// Motorcycles with several defaults are left alone here; see
/// [`ensure_single_default_for_all_motos`].
#[instrument(skip(db))]
pub async fn ensure_all_motos_have_default(db: &DatabaseConnection) -> Result<SweepSummary> {
    let txn = db.begin().await?;
    let grouped = kits_by_motorcycle(&txn).await?;

    let mut summary = SweepSummary {
        total_motos: grouped.len(),
        ..Default::default()
    };
    for (motorcycle_id, kits) in &grouped {
        if kits.iter().any(|k| k.is_default) {
            continue;
        }
        let plan = plan_default_fix(kits);
        apply_plan(&txn, &plan).await?;
        summary.fixed_count += 1;
        info!(
            "Motorcycle {} had no default kit, promoted {:?}",
            motorcycle_id, plan.promote
        );
    }

    txn.commit().await?;
    info!(
        "Default sweep fixed {} of {} motorcycles",
        summary.fixed_count, summary.total_motos
    );
    Ok(summary)
}

/// Sweeps all motorcycles owning kits with the full single-default repair.
#[instrument(skip(db))]
pub async fn ensure_single_default_for_all_motos(db: &DatabaseConnection) -> Result<SweepSummary> {
    let txn = db.begin().await?;
    let grouped = kits_by_motorcycle(&txn).await?;

    let mut summary = SweepSummary {
        total_motos: grouped.len(),
        ..Default::default()
    };
    for (motorcycle_id, kits) in &grouped {
        let plan = plan_default_fix(kits);
        if plan.is_noop() {
            continue;
        }
        apply_plan(&txn, &plan).await?;
        summary.fixed_count += 1;
        info!(
            "Reconciled motorcycle {}: keep {:?}, demoted {:?}",
            motorcycle_id, plan.keep, plan.demote
        );
    }

    txn.commit().await?;
    Ok(summary)
}
