//! Settings repository implementation

use crate::error::Result;
use crate::models::{Settings, TemplateId};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for settings storage operations
pub trait SettingsRepository {
    /// Load settings from the database
    fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", params![key])?;
        Ok(())
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(value) = self.get_setting("default_venue")? {
            settings.default_venue = value;
        }

        if let Some(value) = self.get_setting("default_pay_to")? {
            settings.default_pay_to = value;
        }

        if let Some(value) = self.get_setting("language")? {
            settings.language = value.parse().unwrap_or_default();
        }

        settings.last_template_id = self
            .get_setting("last_template_id")?
            .and_then(|value| TemplateId::parse(&value));

        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.set_setting("default_venue", &settings.default_venue)?;
        self.set_setting("default_pay_to", &settings.default_pay_to)?;
        self.set_setting("language", settings.language.as_str())?;
        match &settings.last_template_id {
            Some(id) => self.set_setting("last_template_id", id.as_str())?,
            None => self.delete_setting("last_template_id")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Language;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_default_settings() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = repo.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = Settings {
            default_venue: "Moonlit Lounge".to_string(),
            default_pay_to: "Aria Vale".to_string(),
            language: Language::CanadianFrench,
            last_template_id: TemplateId::parse("tpl-1"),
        };

        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), settings);
    }

    #[test]
    fn test_clearing_last_template_id() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.save(&Settings {
            last_template_id: TemplateId::parse("tpl-1"),
            ..Settings::default()
        })
        .unwrap();
        repo.save(&Settings::default()).unwrap();

        assert!(repo.load().unwrap().last_template_id.is_none());
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO settings (key, value) VALUES ('language', 'klingon')",
                [],
            )
            .unwrap();

        let repo = SqliteSettingsRepository::new(db.connection());
        assert_eq!(repo.load().unwrap().language, Language::English);
    }
}
