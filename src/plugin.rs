//! Plugin context
//!
//! `SquadReady` owns everything the host callbacks touch. The host keeps one
//! instance for the lifetime of the loaded plugin and calls into it from its
//! squad callback thread and its render thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_appender::non_blocking::WorkerGuard;

use squad_ready_core::{
    ConfigError, Cue, DEFAULT_SETTINGS_PATH, DebugInfo, Notification, Notifiers,
    ReadyCheckTracker, Settings, SettingsExt, SharedSettings, UserUpdate,
};

use crate::audio::{AudioError, AudioPlayer};
use crate::logging;
use crate::platform::WindowFlash;

pub struct SquadReady {
    settings_path: PathBuf,
    settings: SharedSettings,
    tracker: ReadyCheckTracker,
    audio: Arc<AudioPlayer>,
    flasher: Arc<WindowFlash>,
    extras_loaded: AtomicBool,
    released: AtomicBool,
    _log_guard: Option<WorkerGuard>,
}

impl SquadReady {
    /// Plugin load: logging, settings and the audio thread
    pub fn load(settings_path: impl Into<PathBuf>) -> Result<Self, AudioError> {
        let settings_path = settings_path.into();
        let log_dir = settings_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let log_guard = logging::init(&log_dir);
        logging::install_panic_hook();

        let settings = Settings::load_or_default(&settings_path);
        let audio = AudioPlayer::with_default_output()?;

        let mut plugin = Self::with_audio(settings_path, settings, audio);
        plugin._log_guard = log_guard;
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "squad ready loaded");
        Ok(plugin)
    }

    /// Load with settings at the host's usual addon location
    pub fn load_default() -> Result<Self, AudioError> {
        Self::load(DEFAULT_SETTINGS_PATH)
    }

    /// Assemble a context around an already running audio player
    pub fn with_audio(settings_path: PathBuf, settings: Settings, audio: AudioPlayer) -> Self {
        audio.apply_settings(&settings);

        let settings = SharedSettings::new(settings);
        let audio = Arc::new(audio);
        let flasher = Arc::new(WindowFlash::new(settings.clone()));
        let notifiers = Notifiers::new(audio.clone(), flasher.clone());
        let tracker = ReadyCheckTracker::new(notifiers, Arc::new(settings.clone()));

        Self {
            settings_path,
            settings,
            tracker,
            audio,
            flasher,
            extras_loaded: AtomicBool::new(false),
            released: AtomicBool::new(false),
            _log_guard: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host Callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Extras addon came up. It may report the local account name.
    pub fn extras_init(&self, self_account: Option<&str>) {
        self.extras_loaded.store(true, Ordering::Release);
        match self_account {
            Some(name) if self.tracker.set_self_account(name) => {
                tracing::info!(account = %name, "self account set");
            }
            Some(_) => {}
            None => tracing::warn!("extras did not report an account name"),
        }
    }

    pub fn extras_loaded(&self) -> bool {
        self.extras_loaded.load(Ordering::Acquire)
    }

    pub fn squad_update(&self, users: &[UserUpdate]) -> Vec<Notification> {
        self.tracker.update_users(users)
    }

    /// Per-frame hook; drives the nag timer
    pub fn frame(&self) -> Option<Notification> {
        self.tracker.tick()
    }

    pub fn set_window(&self, handle: isize) {
        self.flasher.set_window(handle);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    /// Apply a settings edit and push whatever changed to the audio thread.
    ///
    /// The diff and the pushes happen under the settings lock, so concurrent
    /// edits reach the audio thread in the order they were applied.
    pub fn update_settings(&self, edit: impl FnOnce(&mut Settings)) {
        self.settings.update(|settings| {
            let before = settings.clone();
            edit(settings);
            self.push_audio_changes(&before, settings);
        });
    }

    fn push_audio_changes(&self, before: &Settings, after: &Settings) {
        if before.audio_output_device != after.audio_output_device {
            self.audio.set_device(after.audio_output_device.as_deref());
        }
        for cue in [Cue::ReadyCheck, Cue::SquadReady] {
            if before.cue_path(cue) != after.cue_path(cue) {
                self.audio
                    .load_cue(cue, after.cue_path(cue), after.cue_volume(cue));
            } else if before.cue_volume(cue) != after.cue_volume(cue) {
                self.audio.set_volume(cue, after.cue_volume(cue));
            }
        }
    }

    pub fn save_settings(&self) -> Result<(), ConfigError> {
        self.settings.get().save_to(&self.settings_path)
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cue_status(&self, cue: Cue) -> String {
        self.audio.status(cue)
    }

    pub fn debug_info(&self) -> DebugInfo {
        self.tracker.debug_info()
    }

    pub fn tracker(&self) -> &ReadyCheckTracker {
        &self.tracker
    }

    /// Plugin unload: persist settings and stop the audio thread
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = self.save_settings() {
            tracing::error!(error = %e, cause = ?std::error::Error::source(&e), "failed to save settings");
        }
        self.audio.release();
        tracing::info!("squad ready released");
    }
}

impl std::fmt::Debug for SquadReady {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquadReady")
            .field("settings_path", &self.settings_path)
            .field("tracker", &self.tracker)
            .field("audio", &self.audio)
            .field("flasher", &self.flasher)
            .finish_non_exhaustive()
    }
}
