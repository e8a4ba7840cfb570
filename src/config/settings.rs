use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use tracing::info;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SQLITE_PATH: &str = "database.sqlite";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),
    #[error("Invalid HOST value '{0}'")]
    InvalidHost(String),
}

/// Which relational store backs the registrations table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite { path: PathBuf },
    Postgres { url: String },
}

impl StorageConfig {
    /// `DATABASE_URL` selects PostgreSQL; otherwise SQLite at `SQLITE_PATH`.
    pub fn from_env() -> Self {
        match non_empty_var("DATABASE_URL") {
            Some(url) => StorageConfig::Postgres { url },
            None => {
                let path = non_empty_var("SQLITE_PATH")
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());
                StorageConfig::Sqlite {
                    path: PathBuf::from(path),
                }
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageConfig::Sqlite { .. } => "sqlite",
            StorageConfig::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host: IpAddr = match non_empty_var("HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port: u16 = match non_empty_var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => {
                info!("PORT not set, using default: {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let static_dir = PathBuf::from(
            non_empty_var("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );

        Ok(ServerConfig {
            host,
            port,
            static_dir,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            storage: StorageConfig::from_env(),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
