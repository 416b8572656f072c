//! Storage contract consumed by the import reconciler.
//!
//! The reconciler only needs keyed access to templates plus an all-or-nothing
//! scope around a batch of writes. Anything that can provide those two things
//! can be reconciled against.

use crate::error::Result;
use crate::models::{Template, TemplateId};

/// Keyed template collection
pub trait TemplateStore {
    /// Fetch a template by id
    fn get(&self, id: &TemplateId) -> Result<Option<Template>>;

    /// Insert a new template; fails with `Error::AlreadyExists` when the id is taken
    fn add(&self, template: &Template) -> Result<()>;

    /// Insert or replace a template
    fn put(&self, template: &Template) -> Result<()>;
}

/// A store that can run a batch of template operations atomically
pub trait Transactional {
    /// Run `work` inside one transaction.
    ///
    /// Commits when `work` returns `Ok`; any error rolls back every write made
    /// through the store handed to `work`.
    fn transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn TemplateStore) -> Result<T>;
}
