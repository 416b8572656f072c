//! Shared database service wrapper used across clients.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::db::{
    Database, SettingsRepository, SqliteSettingsRepository, SqliteTemplateRepository,
    SqliteUsageRepository, TemplateRepository, TemplateStore, UsageRepository,
};
use crate::engine::{missing_tokens, render_template, RenderMode};
use crate::export::{build_export, ExportDocument};
use crate::models::{
    NewTemplate, Settings, Template, TemplateCategory, TemplateId, TemplatePatch, TemplateUsage,
};
use crate::sync::{reconcile, ImportOptions, ImportSummary};
use crate::util::now_millis;
use crate::{seed, Error, Result};

/// Output of rendering a stored template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub template: Template,
    pub text: String,
    /// Tokens left without a value
    pub missing: Vec<String>,
}

/// Thread-safe service for DB and repository operations.
///
/// Every call holds the lock for its whole duration, so an import is never
/// observed half-applied.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!("Opening template database at {}", db_path.display());
        let db = Database::open(&db_path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Backing file, if any.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// List templates, favorites first.
    pub async fn list_templates(&self, category: Option<TemplateCategory>) -> Result<Vec<Template>> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).list(category)
    }

    /// Fetch a template by id.
    pub async fn get_template(&self, id: &TemplateId) -> Result<Option<Template>> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).get(id)
    }

    /// List template ids that start with the given prefix.
    pub async fn list_template_ids_by_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<TemplateId>> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).ids_by_prefix(prefix, limit)
    }

    /// Create a new template.
    pub async fn create_template(&self, draft: &NewTemplate) -> Result<Template> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).create(draft)
    }

    /// Update a template.
    pub async fn update_template(&self, id: &TemplateId, patch: &TemplatePatch) -> Result<Template> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).update(id, patch)
    }

    /// Delete a template.
    pub async fn delete_template(&self, id: &TemplateId) -> Result<()> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).delete(id)
    }

    pub async fn toggle_favorite(&self, id: &TemplateId) -> Result<Template> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).toggle_favorite(id)
    }

    pub async fn duplicate_template(&self, id: &TemplateId) -> Result<Template> {
        let db = self.db.lock().await;
        SqliteTemplateRepository::new(db.connection()).duplicate(id)
    }

    /// Insert the starter templates when the store is empty.
    pub async fn ensure_seeded(&self) -> Result<usize> {
        let mut db = self.db.lock().await;
        seed::ensure_seeded(&mut db)
    }

    /// Snapshot every template into a v1 export document.
    pub async fn export_templates(&self) -> Result<ExportDocument> {
        let db = self.db.lock().await;
        let templates = SqliteTemplateRepository::new(db.connection()).list(None)?;
        Ok(build_export(templates, now_millis()))
    }

    /// Reconcile an export payload into the store.
    pub async fn import_templates(
        &self,
        payload: &Value,
        options: ImportOptions,
    ) -> Result<ImportSummary> {
        let mut db = self.db.lock().await;
        reconcile(&mut *db, payload, options)
    }

    /// Load settings.
    pub async fn load_settings(&self) -> Result<Settings> {
        let db = self.db.lock().await;
        SqliteSettingsRepository::new(db.connection()).load()
    }

    /// Save settings.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let db = self.db.lock().await;
        SqliteSettingsRepository::new(db.connection()).save(settings)
    }

    /// Render a stored template and record it as the last one used.
    ///
    /// Settings defaults fill `venue` and `pay_to`; explicit `values` win.
    pub async fn render_template(
        &self,
        id: &TemplateId,
        values: &HashMap<String, String>,
        mode: RenderMode,
    ) -> Result<RenderedTemplate> {
        let mut db = self.db.lock().await;
        let tx = db.connection_mut().transaction()?;

        let template = SqliteTemplateRepository::new(&tx)
            .get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let settings_repo = SqliteSettingsRepository::new(&tx);
        let mut settings = settings_repo.load()?;
        let mut merged: HashMap<String, String> = settings
            .default_token_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        merged.extend(values.iter().map(|(name, value)| (name.clone(), value.clone())));

        let rendered = RenderedTemplate {
            text: render_template(&template.content, &merged, mode),
            missing: missing_tokens(&template.content, &merged),
            template,
        };

        SqliteUsageRepository::new(&tx).touch(id, now_millis())?;
        settings.last_template_id = Some(id.clone());
        settings_repo.save(&settings)?;
        tx.commit()?;

        Ok(rendered)
    }

    /// Most recently rendered templates.
    pub async fn recent_usage(&self, limit: usize) -> Result<Vec<TemplateUsage>> {
        let db = self.db.lock().await;
        SqliteUsageRepository::new(db.connection()).recent(limit)
    }

    /// When a template was last rendered, if ever.
    pub async fn last_used(&self, id: &TemplateId) -> Result<Option<i64>> {
        let db = self.db.lock().await;
        SqliteUsageRepository::new(db.connection()).last_used(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render_json_export;
    use crate::sync::ReconcilePolicy;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_create_and_list_roundtrip() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        service
            .create_template(&NewTemplate {
                name: "Hello".to_string(),
                ..NewTemplate::default()
            })
            .await
            .unwrap();
        let templates = service.list_templates(None).await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Hello");
        assert_eq!(templates[0].content, "Hello {guest}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_path_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("aetherkit.db");

        let service = DatabaseService::open_path(&path).await.unwrap();
        service.ensure_seeded().await.unwrap();
        drop(service);

        let reopened = DatabaseService::open_path(&path).await.unwrap();
        assert_eq!(reopened.db_path(), Some(path.as_path()));
        assert_eq!(reopened.list_templates(None).await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn render_uses_settings_defaults_and_records_usage() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let template = service
            .create_template(&NewTemplate {
                content: "{venue}: hi {guest}, pay {pay_to}".to_string(),
                ..NewTemplate::default()
            })
            .await
            .unwrap();
        service
            .save_settings(&Settings {
                default_venue: "The Lounge".to_string(),
                default_pay_to: "Mira".to_string(),
                ..Settings::default()
            })
            .await
            .unwrap();

        let rendered = service
            .render_template(&template.id, &values(&[("pay_to", "Kai")]), RenderMode::Preview)
            .await
            .unwrap();

        assert_eq!(rendered.text, "The Lounge: hi [guest], pay Kai");
        assert_eq!(rendered.missing, vec!["guest"]);

        let settings = service.load_settings().await.unwrap();
        assert_eq!(settings.last_template_id, Some(template.id.clone()));
        let recent = service.recent_usage(5).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].template_id, template.id);
        assert_eq!(
            service.last_used(&template.id).await.unwrap(),
            Some(recent[0].last_used_at)
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn render_missing_template_is_not_found() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let id = TemplateId::parse("tpl-missing").unwrap();
        let err = service
            .render_template(&id, &HashMap::new(), RenderMode::Final)
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::NotFound(missing) if missing == "tpl-missing"));
        assert_eq!(service.last_used(&id).await.unwrap(), None);
        assert!(service.recent_usage(5).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn export_then_import_into_fresh_store() {
        let source = DatabaseService::open_in_memory().await.unwrap();
        source.ensure_seeded().await.unwrap();
        let document = source.export_templates().await.unwrap();
        let payload: Value = serde_json::from_str(&render_json_export(&document).unwrap()).unwrap();

        let target = DatabaseService::open_in_memory().await.unwrap();
        let summary = target
            .import_templates(&payload, ImportOptions::new(ReconcilePolicy::TimestampWins))
            .await
            .unwrap();
        assert_eq!(summary.inserted, 3);

        let again = target
            .import_templates(&payload, ImportOptions::new(ReconcilePolicy::TimestampWins))
            .await
            .unwrap();
        assert_eq!(again.skipped, 3);

        let by_id = |mut templates: Vec<Template>| {
            templates.sort_by(|a, b| a.id.cmp(&b.id));
            templates
        };
        assert_eq!(
            by_id(source.list_templates(None).await.unwrap()),
            by_id(target.list_templates(None).await.unwrap())
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_import_reports_payload_error() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let err = service
            .import_templates(
                &json!({ "schema": "nope" }),
                ImportOptions::new(ReconcilePolicy::MergeOverwrite),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn crud_operations_through_service() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let created = service.create_template(&NewTemplate::default()).await.unwrap();

        let favorite = service.toggle_favorite(&created.id).await.unwrap();
        assert!(favorite.favorite);

        let copy = service.duplicate_template(&created.id).await.unwrap();
        assert_eq!(copy.name, "New Template (copy)");

        let updated = service
            .update_template(
                &created.id,
                &TemplatePatch {
                    category: Some(TemplateCategory::Rp),
                    ..TemplatePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category, TemplateCategory::Rp);

        let prefix = &created.id.as_str()[..8];
        let matches = service.list_template_ids_by_prefix(prefix, 10).await.unwrap();
        assert!(matches.contains(&created.id));

        service.delete_template(&created.id).await.unwrap();
        assert!(service.get_template(&created.id).await.unwrap().is_none());
        assert!(matches!(
            service.delete_template(&created.id).await,
            Err(Error::NotFound(_))
        ));
    }
}
