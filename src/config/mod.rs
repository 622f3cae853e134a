pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, HashingConfig, LoggingConfig};
pub use envconfig::EnvConfig;
