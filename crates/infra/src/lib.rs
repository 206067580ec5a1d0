//! Infrastructure layer: stores, repository orchestration, database bootstrap, config.

pub mod config;
pub mod db;
pub mod repository;
pub mod store;

pub use config::{AppConfig, AppEnvironment, ConfigError};
pub use repository::{InventoryRepository, RepositoryError};
pub use store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError};
