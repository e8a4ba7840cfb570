use crate::config::StorageConfig;
use crate::repositories::{
    PostgresRegistrationRepository, RegistrationRepository, RepositoryError,
    SqliteRegistrationRepository,
};
use sqlx::{
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    PgPool, SqlitePool,
};
use std::{path::Path, str::FromStr, sync::Arc};

const SQLITE_MAX_CONNECTIONS: u32 = 5;
const POSTGRES_MAX_CONNECTIONS: u32 = 10;

pub async fn create_sqlite_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the data directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(SQLITE_MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

pub async fn create_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    let options = sqlx::postgres::PgConnectOptions::from_str(url)?;

    PgPoolOptions::new()
        .max_connections(POSTGRES_MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

/// Open the configured store and make sure the registrations table exists.
///
/// Called once at startup; the returned handle is shared by every request.
pub async fn connect(
    config: &StorageConfig,
) -> Result<Arc<dyn RegistrationRepository>, RepositoryError> {
    let repository: Arc<dyn RegistrationRepository> = match config {
        StorageConfig::Postgres { url } => {
            tracing::info!("Using PostgreSQL");
            Arc::new(PostgresRegistrationRepository::new(
                create_postgres_pool(url).await?,
            ))
        }
        StorageConfig::Sqlite { path } => {
            tracing::info!("Using SQLite at {}", path.display());
            Arc::new(SqliteRegistrationRepository::new(
                create_sqlite_pool(path).await?,
            ))
        }
    };

    repository.ensure_schema().await?;

    Ok(repository)
}
