//! Database layer for AetherKit

mod connection;
mod migrations;
mod repository;
mod settings_repository;
mod store;
mod usage_repository;

pub use connection::Database;
pub use repository::{SqliteTemplateRepository, TemplateRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
pub use store::{TemplateStore, Transactional};
pub use usage_repository::{SqliteUsageRepository, UsageRepository};
