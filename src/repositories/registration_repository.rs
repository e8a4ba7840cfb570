use crate::models::registration::{BackendStatus, NewRegistration, Registration};
use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool, SqlitePool};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),
}

impl RepositoryError {
    fn classify(err: sqlx::Error) -> Self {
        let violates_constraint = err
            .as_database_error()
            .map(|db_err| !matches!(db_err.kind(), ErrorKind::Other))
            .unwrap_or(false);

        if violates_constraint {
            RepositoryError::ConstraintViolation(err)
        } else {
            RepositoryError::Database(err)
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for submitted registrations.
///
/// Rows are only ever inserted; there is no update or delete path.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RegistrationRepository: Send + Sync {
    /// Short backend identifier reported by the diagnostics endpoint.
    fn backend_name(&self) -> &'static str;
    /// Create the registrations table if it does not exist yet.
    async fn ensure_schema(&self) -> RepositoryResult<()>;
    /// Insert one row and return the id the database assigned to it.
    async fn insert_registration(&self, registration: &NewRegistration) -> RepositoryResult<i64>;
    async fn status(&self) -> RepositoryResult<BackendStatus>;
    async fn list_registrations(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<Registration>>;
    async fn count_registrations(&self) -> RepositoryResult<i64>;
}

const DEFAULT_LIST_LIMIT: i64 = 100;

const SQLITE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS registrations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        firstname TEXT NOT NULL,
        lastname TEXT NOT NULL,
        username TEXT,
        gender TEXT NOT NULL,
        email TEXT NOT NULL,
        contactnumber TEXT NOT NULL,
        description TEXT,
        consent BOOLEAN NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(SQLITE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_registration(&self, registration: &NewRegistration) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO registrations
                (firstname, lastname, username, gender, email, contactnumber, description, consent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.username)
        .bind(&registration.gender)
        .bind(&registration.email)
        .bind(&registration.contact_number)
        .bind(&registration.description)
        .bind(registration.consent)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(result.last_insert_rowid())
    }

    async fn status(&self) -> RepositoryResult<BackendStatus> {
        let time: String = sqlx::query_scalar("SELECT datetime('now')")
            .fetch_one(&self.pool)
            .await?;

        Ok(BackendStatus {
            db: self.backend_name().to_string(),
            time,
        })
    }

    async fn list_registrations(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(
            r#"
            SELECT
                id,
                firstname AS first_name,
                lastname AS last_name,
                username,
                gender,
                email,
                contactnumber AS contact_number,
                description,
                consent,
                CAST(created_at AS TEXT) AS created_at
            FROM registrations
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_registrations(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

const POSTGRES_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS registrations (
        id BIGSERIAL PRIMARY KEY,
        firstname TEXT NOT NULL,
        lastname TEXT NOT NULL,
        username TEXT,
        gender TEXT NOT NULL,
        email TEXT NOT NULL,
        contactnumber TEXT NOT NULL,
        description TEXT,
        consent BOOLEAN NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Ids are cast to BIGINT on the way out: tables created by earlier
// deployments use a 32-bit SERIAL id.
#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(POSTGRES_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_registration(&self, registration: &NewRegistration) -> RepositoryResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO registrations
                (firstname, lastname, username, gender, email, contactnumber, description, consent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING CAST(id AS BIGINT)
            "#,
        )
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.username)
        .bind(&registration.gender)
        .bind(&registration.email)
        .bind(&registration.contact_number)
        .bind(&registration.description)
        .bind(registration.consent)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(id)
    }

    async fn status(&self) -> RepositoryResult<BackendStatus> {
        let time: String = sqlx::query_scalar("SELECT CAST(NOW() AS TEXT)")
            .fetch_one(&self.pool)
            .await?;

        Ok(BackendStatus {
            db: self.backend_name().to_string(),
            time,
        })
    }

    async fn list_registrations(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(
            r#"
            SELECT
                CAST(id AS BIGINT) AS id,
                firstname AS first_name,
                lastname AS last_name,
                username,
                gender,
                email,
                contactnumber AS contact_number,
                description,
                consent,
                CAST(created_at AS TEXT) AS created_at
            FROM registrations
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_registrations(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
