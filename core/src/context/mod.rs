mod config;
mod error;

pub use config::{DEFAULT_SETTINGS_PATH, SettingsExt, SharedSettings};
pub use error::ConfigError;
