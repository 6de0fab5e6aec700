//! Data-access layer: plain parameterized statements over SQLite.
//!
//! The auth layer only consumes the lookups needed at login time; everything
//! here is a thin wrapper with no business logic.

mod admin;
mod student;
mod warden;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use admin::{Admin, AdminStore};
pub use student::{Student, StudentAuth, StudentStore};
pub use warden::{Warden, WardenStore};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    /// Use ":memory:" for an in-memory database.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the current schema version.
    async fn get_version(&self) -> Result<i32, sqlx::Error> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(result.map(|r| r.0).unwrap_or(0))
    }

    /// Set the schema version within a transaction.
    async fn set_version(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut **tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Run database migrations.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let version = self.get_version().await?;

        if version < 1 {
            self.migrate_v1().await?;
        }

        Ok(())
    }

    /// Execute a list of queries in a transaction, then set the version.
    async fn run_migration(
        &self,
        version: i32,
        queries: &[&'static str],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for query in queries {
            sqlx::query(*query).execute(&mut *tx).await?;
        }
        Self::set_version(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn migrate_v1(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            1,
            &[
                "CREATE TABLE hostels (
                    hid INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    location TEXT,
                    rooms INTEGER NOT NULL DEFAULT 0
                )",
                "CREATE TABLE admins (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    name TEXT NOT NULL,
                    password_hash TEXT NOT NULL
                )",
                "CREATE TABLE wardens (
                    wid INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    mail TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    phone TEXT,
                    password_hash TEXT NOT NULL,
                    hid INTEGER REFERENCES hostels(hid)
                )",
                "CREATE TABLE students (
                    sid INTEGER PRIMARY KEY AUTOINCREMENT,
                    shid TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    mail TEXT,
                    phone TEXT,
                    hid INTEGER REFERENCES hostels(hid)
                )",
                "CREATE TABLE student_auth (
                    uid INTEGER PRIMARY KEY AUTOINCREMENT,
                    shid TEXT UNIQUE NOT NULL REFERENCES students(shid),
                    password_hash TEXT NOT NULL
                )",
            ],
        )
        .await
    }

    pub fn admins(&self) -> AdminStore {
        AdminStore::new(self.pool.clone())
    }

    pub fn wardens(&self) -> WardenStore {
        WardenStore::new(self.pool.clone())
    }

    pub fn students(&self) -> StudentStore {
        StudentStore::new(self.pool.clone())
    }
}
