//! Infrastructure layer - configuration and logging.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigOverrides};
pub use logging::{LogConfig, LoggerImpl};
