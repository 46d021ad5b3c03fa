//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs
//! without hand-written SQL.

use crate::entities::{Motorcycle, SuspensionKit, TuningConfig};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/suspension_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns
/// the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(&get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Statements are emitted with `IF NOT EXISTS`, so running this against an
/// existing database is harmless.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut motorcycle_table = schema.create_table_from_entity(Motorcycle);
    let mut kit_table = schema.create_table_from_entity(SuspensionKit);
    let mut config_table = schema.create_table_from_entity(TuningConfig);

    motorcycle_table.if_not_exists();
    kit_table.if_not_exists();
    config_table.if_not_exists();

    db.execute(builder.build(&motorcycle_table)).await?;
    db.execute(builder.build(&kit_table)).await?;
    db.execute(builder.build(&config_table)).await?;

    tracing::debug!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MotorcycleModel, SuspensionKitModel, TuningConfigModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<MotorcycleModel> = Motorcycle::find().limit(1).all(&db).await?;
        let _: Vec<SuspensionKitModel> = SuspensionKit::find().limit(1).all(&db).await?;
        let _: Vec<TuningConfigModel> = TuningConfig::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
