//! Template repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use crate::error::{Error, Result};
use crate::models::{NewTemplate, Template, TemplateCategory, TemplateId, TemplatePatch};
use crate::util::now_millis;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::store::TemplateStore;

const SELECT_COLUMNS: &str =
    "SELECT id, name, category, content, favorite, created_at, updated_at FROM templates";

/// Trait for template CRUD operations on top of keyed storage
pub trait TemplateRepository: TemplateStore {
    /// List templates, favorites first, then most recently updated
    fn list(&self, category: Option<TemplateCategory>) -> Result<Vec<Template>>;

    /// Number of stored templates
    fn count(&self) -> Result<usize>;

    /// Create a new template from a draft
    fn create(&self, draft: &NewTemplate) -> Result<Template>;

    /// Apply a partial update, bumping `updated_at`
    fn update(&self, id: &TemplateId, patch: &TemplatePatch) -> Result<Template>;

    /// Delete a template and its usage record
    fn delete(&self, id: &TemplateId) -> Result<()>;

    /// Flip the favorite flag
    fn toggle_favorite(&self, id: &TemplateId) -> Result<Template>;

    /// Copy a template under a new id
    fn duplicate(&self, id: &TemplateId) -> Result<Template>;

    /// Ids starting with `prefix`, for short-id lookups
    fn ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<TemplateId>>;
}

/// `SQLite` implementation of `TemplateRepository`
pub struct SqliteTemplateRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteTemplateRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a template from a database row
    fn parse_template(row: &rusqlite::Row<'_>) -> rusqlite::Result<Template> {
        let id: String = row.get(0)?;
        let category: String = row.get(2)?;
        let category = category
            .parse::<TemplateCategory>()
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?;

        Ok(Template {
            id: TemplateId::parse(&id).ok_or(rusqlite::Error::InvalidColumnType(
                0,
                "id".to_string(),
                Type::Text,
            ))?,
            name: row.get(1)?,
            category,
            content: row.get(3)?,
            favorite: row.get::<_, i32>(4)? != 0,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn require(&self, id: &TemplateId) -> Result<Template> {
        self.get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn write(&self, verb: &str, template: &Template) -> rusqlite::Result<usize> {
        self.conn.execute(
            &format!(
                "{verb} INTO templates (id, name, category, content, favorite, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                template.id.as_str(),
                template.name,
                template.category.as_str(),
                template.content,
                i32::from(template.favorite),
                template.created_at,
                template.updated_at
            ],
        )
    }
}

impl TemplateStore for SqliteTemplateRepository<'_> {
    fn get(&self, id: &TemplateId) -> Result<Option<Template>> {
        let template = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?"),
                params![id.as_str()],
                Self::parse_template,
            )
            .optional()?;
        Ok(template)
    }

    fn add(&self, template: &Template) -> Result<()> {
        match self.write("INSERT", template) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists(template.id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, template: &Template) -> Result<()> {
        self.write("INSERT OR REPLACE", template)?;
        Ok(())
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn list(&self, category: Option<TemplateCategory>) -> Result<Vec<Template>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE (?1 IS NULL OR category = ?1)
             ORDER BY favorite DESC, updated_at DESC"
        ))?;

        let templates = stmt
            .query_map(
                params![category.map(TemplateCategory::as_str)],
                Self::parse_template,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(templates)
    }

    fn count(&self) -> Result<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM templates", [], |row| {
                row.get::<_, usize>(0)
            })?;
        Ok(count)
    }

    fn create(&self, draft: &NewTemplate) -> Result<Template> {
        let template = Template::from_draft(draft.clone(), now_millis());
        template.validate()?;
        self.add(&template)?;
        Ok(template)
    }

    fn update(&self, id: &TemplateId, patch: &TemplatePatch) -> Result<Template> {
        let mut template = self.require(id)?;
        template.apply_patch(patch, now_millis());
        template.validate()?;
        self.put(&template)?;
        Ok(template)
    }

    fn delete(&self, id: &TemplateId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM templates WHERE id = ?", params![id.as_str()])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.conn.execute(
            "DELETE FROM template_usage WHERE template_id = ?",
            params![id.as_str()],
        )?;

        Ok(())
    }

    fn toggle_favorite(&self, id: &TemplateId) -> Result<Template> {
        let template = self.require(id)?;
        self.update(
            id,
            &TemplatePatch {
                favorite: Some(!template.favorite),
                ..TemplatePatch::default()
            },
        )
    }

    fn duplicate(&self, id: &TemplateId) -> Result<Template> {
        let copy = self.require(id)?.duplicate(now_millis());
        self.add(&copy)?;
        Ok(copy)
    }

    fn ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<TemplateId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM templates
             WHERE substr(id, 1, length(?1)) = ?1
             ORDER BY id
             LIMIT ?2",
        )?;

        let ids = stmt
            .query_map(params![prefix, limit as i64], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .iter()
            .filter_map(|id| TemplateId::parse(id))
            .collect();

        Ok(ids)
    }
}
