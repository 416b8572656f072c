//! Async service layer shared by AetherKit clients.

mod database;

pub use database::{DatabaseService, RenderedTemplate};
