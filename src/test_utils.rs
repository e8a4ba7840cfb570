pub mod test_helpers {
    use crate::{
        models::NewRegistration,
        repositories::{RegistrationRepository, SqliteRegistrationRepository},
    };
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        ensure_schema(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let pool = crate::db::create_sqlite_pool(temp_file.path()).await?;

        ensure_schema(&pool).await?;

        Ok((pool, temp_file))
    }

    async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        SqliteRegistrationRepository::new(pool.clone())
            .ensure_schema()
            .await
            .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))
    }

    /// Number of rows currently stored in the registrations table
    pub async fn count_rows(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(pool)
            .await
    }

    /// A valid, consented registration for the given name
    pub fn sample_registration(first_name: &str) -> NewRegistration {
        NewRegistration {
            first_name: first_name.to_string(),
            last_name: "Lee".to_string(),
            username: String::new(),
            gender: "F".to_string(),
            email: "a@b.com".to_string(),
            contact_number: "555-1234".to_string(),
            description: String::new(),
            consent: true,
        }
    }
}
