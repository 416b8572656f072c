//! Database connection management

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

use super::migrations;
use super::repository::SqliteTemplateRepository;
use super::store::{TemplateStore, Transactional};

/// Database wrapper for `SQLite` connections
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        let mut database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Configure `SQLite` for optimal performance
    fn configure(&self) -> Result<()> {
        // In-memory databases report "memory" instead of switching to WAL
        self.conn
            .query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))
            .ok();
        self.conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA cache_size = 10000;",
        )?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&mut self) -> Result<()> {
        migrations::run(&mut self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get a mutable reference to the underlying connection (for transactions)
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Transactional for Database {
    fn transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn TemplateStore) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let output = {
            let store = SqliteTemplateRepository::new(&tx);
            work(&store)?
        };
        tx.commit()?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TemplateRepository;
    use crate::error::Error;
    use crate::models::{NewTemplate, Template};
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let version = migrations::get_version(db.connection()).unwrap();
        assert_eq!(version, migrations::CURRENT_VERSION);
    }

    #[test]
    fn test_open_file_persists_between_handles() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("aetherkit.db");

        let created = {
            let db = Database::open(&path).unwrap();
            SqliteTemplateRepository::new(db.connection())
                .create(&NewTemplate::default())
                .unwrap()
        };

        let db = Database::open(&path).unwrap();
        let fetched = SqliteTemplateRepository::new(db.connection())
            .get(&created.id)
            .unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let mut db = Database::open_in_memory().unwrap();
        let template = Template::from_draft(NewTemplate::default(), 10);

        db.transaction(|store| store.add(&template)).unwrap();

        let repo = SqliteTemplateRepository::new(db.connection());
        assert!(repo.get(&template.id).unwrap().is_some());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut db = Database::open_in_memory().unwrap();
        let template = Template::from_draft(NewTemplate::default(), 10);

        let result: Result<()> = db.transaction(|store| {
            store.add(&template)?;
            Err(Error::Database("boom".into()))
        });
        assert!(result.is_err());

        let repo = SqliteTemplateRepository::new(db.connection());
        assert!(repo.get(&template.id).unwrap().is_none());
    }
}
