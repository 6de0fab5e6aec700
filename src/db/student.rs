use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct StudentStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Student {
    pub sid: i64,
    pub shid: String,
    pub name: String,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub hid: Option<i64>,
}

/// Login record for a student, keyed by the hostel-issued SHID.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudentAuth {
    pub uid: i64,
    pub shid: String,
    pub password_hash: String,
}

impl StudentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a student record. Returns the student ID.
    pub async fn create(
        &self,
        shid: &str,
        name: &str,
        mail: Option<&str>,
        phone: Option<&str>,
        hid: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO students (shid, name, mail, phone, hid) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(shid)
        .bind(name)
        .bind(mail)
        .bind(phone)
        .bind(hid)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a student by SHID.
    pub async fn get_by_shid(&self, shid: &str) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as("SELECT sid, shid, name, mail, phone, hid FROM students WHERE shid = ?")
            .bind(shid)
            .fetch_optional(&self.pool)
            .await
    }

    /// Create a login record for a student.
    pub async fn create_auth(&self, shid: &str, password_hash: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO student_auth (shid, password_hash) VALUES (?, ?)")
            .bind(shid)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a student's login record by SHID.
    pub async fn get_auth(&self, shid: &str) -> Result<Option<StudentAuth>, sqlx::Error> {
        sqlx::query_as("SELECT uid, shid, password_hash FROM student_auth WHERE shid = ?")
            .bind(shid)
            .fetch_optional(&self.pool)
            .await
    }
}
