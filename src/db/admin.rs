use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct AdminStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl AdminStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an admin. Returns the admin ID.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO admins (email, name, password_hash) VALUES (?, ?, ?)")
            .bind(email)
            .bind(name)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get an admin by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, name, password_hash FROM admins WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }
}
