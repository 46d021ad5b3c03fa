use dotenvy::dotenv;
use suspension_buddy::{
    config::{database, maintenance},
    core::{kit, repair},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the maintenance configuration
    let config = maintenance::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))?;

    // 5. Default-kit reconciliation
    let sweep = kit::ensure_all_motos_have_default(&db).await?;
    info!(
        "Missing-default sweep: fixed {} of {} motorcycles",
        sweep.fixed_count, sweep.total_motos
    );
    if config.maintenance.sweep_multiple_defaults {
        let full = kit::ensure_single_default_for_all_motos(&db).await?;
        info!(
            "Single-default sweep: fixed {} of {} motorcycles",
            full.fixed_count, full.total_motos
        );
    }

    // 6. Legacy config migration
    for user_id in &config.maintenance.migrate_user_ids {
        let migration = repair::migrate_user_configs_to_default_kit(&db, user_id)
            .await
            .inspect_err(|e| error!("Migration failed for user {}: {}", user_id, e))?;
        info!(
            "User {}: migrated {} of {} kit-less configs",
            user_id, migration.migrated_count, migration.total_without_kit
        );
    }

    info!("Maintenance run complete.");
    Ok(())
}
