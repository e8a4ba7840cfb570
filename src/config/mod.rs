pub mod settings;

pub use settings::{AppConfig, ConfigError, ServerConfig, StorageConfig};
