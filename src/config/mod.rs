/// Database configuration and connection management
pub mod database;

/// Maintenance job settings loaded from config.toml
pub mod maintenance;
