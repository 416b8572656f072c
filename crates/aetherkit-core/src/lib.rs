//! aetherkit-core - Core library for AetherKit
//!
//! This crate contains the template models, the token engine, the SQLite
//! storage layer, and the import reconciler used by every AetherKit interface.

pub mod db;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod seed;
pub mod services;
pub mod sync;
pub mod util;

pub use engine::{extract_tokens, render_template, RenderMode};
pub use error::{Error, Result};
pub use models::{Template, TemplateCategory, TemplateId};
pub use sync::{ImportOptions, ImportSummary, ReconcilePolicy};
