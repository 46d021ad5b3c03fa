//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database and creating fixtures with
//! sensible defaults.

use crate::{
    core::{
        kit::{self, NewKit},
        motorcycle::{self, NewMotorcycle},
        settings::ClickSettings,
    },
    entities::{motorcycle as motorcycle_entity, suspension_kit, tuning_config},
    errors::Result,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed timestamp `minutes` after an arbitrary epoch, for ordering tests.
#[must_use]
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(minutes)
}

/// Registers a motorcycle for `"test_user"`, which also creates its default
/// "Kit Standard".
pub async fn create_test_motorcycle(
    db: &DatabaseConnection,
) -> Result<(motorcycle_entity::Model, suspension_kit::Model)> {
    motorcycle::create_motorcycle(
        db,
        NewMotorcycle {
            user_id: "test_user".to_string(),
            brand: "Yamaha".to_string(),
            model: "MT-09".to_string(),
            year: Some(2021),
            nickname: None,
        },
    )
    .await
}

/// Inserts a motorcycle row without any kit.
pub async fn insert_bare_motorcycle(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<motorcycle_entity::Model> {
    motorcycle_entity::ActiveModel {
        user_id: Set(user_id.to_string()),
        brand: Set("Honda".to_string()),
        model: Set("CBR600RR".to_string()),
        year: Set(None),
        nickname: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a kit through the engine.
///
/// # Defaults
/// * max clicks: 20 on every adjuster
/// * current settings: 10 on every adjuster
pub async fn create_test_kit(
    db: &DatabaseConnection,
    motorcycle_id: i64,
    name: &str,
    is_default: bool,
) -> Result<suspension_kit::Model> {
    let all = |v| ClickSettings {
        fork_compression: Some(v),
        fork_rebound: Some(v),
        shock_compression_low: Some(v),
        shock_compression_high: Some(v),
        shock_rebound: Some(v),
    };
    kit::create_kit(
        db,
        NewKit {
            motorcycle_id,
            user_id: "test_user".to_string(),
            name: name.to_string(),
            max_clicks: all(20),
            baseline: all(12),
            current: all(10),
            is_default,
            ..Default::default()
        },
    )
    .await
}

/// Inserts a kit row directly, bypassing the default rules. Used to build
/// drifted states (zero or several defaults).
pub async fn insert_raw_kit(
    db: &DatabaseConnection,
    motorcycle_id: i64,
    name: &str,
    is_default: bool,
    created_at: DateTime<Utc>,
) -> Result<suspension_kit::Model> {
    suspension_kit::ActiveModel {
        motorcycle_id: Set(motorcycle_id),
        user_id: Set("test_user".to_string()),
        name: Set(name.to_string()),
        fork_brand: Set(None),
        fork_model: Set(None),
        shock_brand: Set(None),
        shock_model: Set(None),
        max_fork_compression: Set(None),
        max_fork_rebound: Set(None),
        max_shock_compression_low: Set(None),
        max_shock_compression_high: Set(None),
        max_shock_rebound: Set(None),
        baseline_fork_compression: Set(None),
        baseline_fork_rebound: Set(None),
        baseline_shock_compression_low: Set(None),
        baseline_shock_compression_high: Set(None),
        baseline_shock_rebound: Set(None),
        fork_compression: Set(None),
        fork_rebound: Set(None),
        shock_compression_low: Set(None),
        shock_compression_high: Set(None),
        shock_rebound: Set(None),
        notes: Set(None),
        is_default: Set(is_default),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a legacy config row with no kit.
pub async fn insert_orphan_config(
    db: &DatabaseConnection,
    user_id: &str,
    motorcycle_id: i64,
) -> Result<tuning_config::Model> {
    let now = Utc::now();
    tuning_config::ActiveModel {
        user_id: Set(user_id.to_string()),
        motorcycle_id: Set(motorcycle_id),
        suspension_kit_id: Set(None),
        conversation_id: Set(None),
        title: Set("Legacy session".to_string()),
        fork_compression: Set(Some(8)),
        fork_rebound: Set(Some(9)),
        shock_compression_low: Set(None),
        shock_compression_high: Set(None),
        shock_rebound: Set(Some(11)),
        visibility: Set("private".to_string()),
        is_public: Set(false),
        likes_count: Set(0),
        comments_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
