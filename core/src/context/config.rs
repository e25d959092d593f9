//! Settings persistence and runtime sharing
//!
//! Settings live in a TOML file next to the host's other addon settings and
//! are shared at runtime behind a lock so the settings panel, the audio
//! player and the nag scheduler all see the same values.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use squad_ready_types::Settings;

use crate::notify::NagPolicySource;

use super::ConfigError;

/// Settings location relative to the host's working directory
pub const DEFAULT_SETTINGS_PATH: &str = "addons/arcdps/arcdps_squad_ready.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Persistence
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Settings persistence
pub trait SettingsExt: Sized {
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn load_or_default(path: &Path) -> Self;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
}

impl SettingsExt for Settings {
    /// Load settings, writing defaults first if the file does not exist
    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "settings loaded");
                settings
            }
            Err(err) => {
                tracing::warn!(error = %err, cause = ?std::error::Error::source(&err), "using default settings");
                Self::default()
            }
        }
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime Sharing
// ─────────────────────────────────────────────────────────────────────────────

/// Settings shared between the UI, audio and tracker.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Arc<RwLock<Settings>>);

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self(Arc::new(RwLock::new(settings)))
    }

    /// Copy of the current settings
    pub fn get(&self) -> Settings {
        self.read(Settings::clone)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Settings) -> R) -> R {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl NagPolicySource for SharedSettings {
    fn nag_enabled(&self) -> bool {
        self.read(|s| s.ready_check_nag)
    }

    fn nag_interval_seconds(&self) -> f32 {
        self.read(|s| s.ready_check_nag_interval_seconds)
    }
}
