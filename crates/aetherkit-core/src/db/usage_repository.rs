//! Template usage repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::Result;
use crate::models::{TemplateId, TemplateUsage};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for usage tracking operations
pub trait UsageRepository {
    /// Record that a template was used at `at` (Unix ms)
    fn touch(&self, id: &TemplateId, at: i64) -> Result<()>;

    /// Last time a template was used
    fn last_used(&self, id: &TemplateId) -> Result<Option<i64>>;

    /// Most recently used templates, newest first
    fn recent(&self, limit: usize) -> Result<Vec<TemplateUsage>>;
}

/// `SQLite` implementation of `UsageRepository`
pub struct SqliteUsageRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteUsageRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl UsageRepository for SqliteUsageRepository<'_> {
    fn touch(&self, id: &TemplateId, at: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO template_usage (template_id, last_used_at) VALUES (?1, ?2)
             ON CONFLICT(template_id) DO UPDATE SET last_used_at = MAX(last_used_at, excluded.last_used_at)",
            params![id.as_str(), at],
        )?;
        Ok(())
    }

    fn last_used(&self, id: &TemplateId) -> Result<Option<i64>> {
        let value = self
            .conn
            .query_row(
                "SELECT last_used_at FROM template_usage WHERE template_id = ?",
                params![id.as_str()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn recent(&self, limit: usize) -> Result<Vec<TemplateUsage>> {
        let mut stmt = self.conn.prepare(
            "SELECT template_id, last_used_at FROM template_usage
             ORDER BY last_used_at DESC
             LIMIT ?",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, last_used_at)| {
                TemplateId::parse(&id).map(|template_id| TemplateUsage {
                    template_id,
                    last_used_at,
                })
            })
            .collect())
    }
}
