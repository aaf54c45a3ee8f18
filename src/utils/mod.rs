//! Configuration loading and validation

pub mod config;

pub use config::{ConfigCheck, ConfigError, ConfigResult, ConfigurationManager, SystemConfig};
