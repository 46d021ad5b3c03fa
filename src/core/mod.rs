//! Core business logic - framework-agnostic suspension kit and config operations.

/// Front/rear balance classification
pub mod balance;
/// Click-count normalization
pub mod clicks;
/// Suspension kits and the single-default invariant
pub mod kit;
/// Motorcycle registration and removal
pub mod motorcycle;
/// Orphan config repair
pub mod repair;
/// Kit resolution for new configs
pub mod resolver;
/// Review metrics for kits and configs
pub mod review;
/// Grouped adjuster values
pub mod settings;
/// Tuning config lifecycle
pub mod tuning;
