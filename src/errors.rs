//! Unified error type for the suspension engine.
//!
//! Only "not found" conditions are surfaced as business errors. Drift in the
//! default-kit invariant is healed by the reconciliation routines instead of
//! being reported here.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Referenced motorcycle does not exist
    #[error("Motorcycle not found: {id}")]
    MotorcycleNotFound {
        /// Requested motorcycle id
        id: i64,
    },

    /// Referenced suspension kit does not exist
    #[error("Suspension kit not found: {id}")]
    KitNotFound {
        /// Requested kit id
        id: i64,
    },

    /// Referenced tuning config does not exist
    #[error("Config not found: {id}")]
    ConfigNotFound {
        /// Requested config id
        id: i64,
    },

    /// Visibility string is not one of `private`, `link`, `public`
    #[error("Invalid visibility: {value}")]
    InvalidVisibility {
        /// Rejected value
        value: String,
    },

    /// Configuration or input validation problem
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Storage failure bubbled up from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
