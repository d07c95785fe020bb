//! Process-level plumbing shared by the contact service binaries:
//! layered configuration loading and logging initialization.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, ConfigError, DatabaseConfig, LoggingConfig,
    Section, ServerConfig,
};
