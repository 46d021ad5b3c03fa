//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod motorcycle;
pub mod suspension_kit;
pub mod tuning_config;

// Re-export specific types to avoid conflicts
pub use motorcycle::{Column as MotorcycleColumn, Entity as Motorcycle, Model as MotorcycleModel};
pub use suspension_kit::{
    Column as SuspensionKitColumn, Entity as SuspensionKit, Model as SuspensionKitModel,
};
pub use tuning_config::{
    Column as TuningConfigColumn, Entity as TuningConfig, Model as TuningConfigModel,
};
