use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct WardenStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Warden {
    pub wid: i64,
    pub name: String,
    pub mail: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub hid: Option<i64>,
}

impl WardenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a warden. Returns the warden ID.
    pub async fn create(
        &self,
        name: &str,
        mail: &str,
        phone: Option<&str>,
        password_hash: &str,
        hid: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO wardens (name, mail, phone, password_hash, hid) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(mail)
        .bind(phone)
        .bind(password_hash)
        .bind(hid)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a warden by email.
    pub async fn get_by_mail(&self, mail: &str) -> Result<Option<Warden>, sqlx::Error> {
        sqlx::query_as(
            "SELECT wid, name, mail, phone, password_hash, hid FROM wardens WHERE mail = ?",
        )
        .bind(mail)
        .fetch_optional(&self.pool)
        .await
    }
}
