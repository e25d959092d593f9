//! Error types for settings persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings from {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save settings to {path}")]
    Save {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },
}
