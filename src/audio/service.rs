//! Audio playback thread and the handle the plugin talks to
//!
//! The thread owns the output backend and both cue tracks. Everything else
//! talks to it through a bounded channel; sends never block the caller, and a
//! full queue drops the request with a warning.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use squad_ready_core::AudioNotifier;
use squad_ready_types::{Cue, DEFAULT_VOLUME, Settings};

use super::AudioError;
use super::events::AudioEvent;
use super::output::{SoundOutput, default_output};
use super::track::{CueTrack, SoundData};

/// Sender handle for sending audio events
pub type AudioSender = mpsc::Sender<AudioEvent>;

/// Create a new audio channel
pub fn create_audio_channel() -> (AudioSender, mpsc::Receiver<AudioEvent>) {
    // Cues arrive a few per second at most
    mpsc::channel(64)
}

// ─────────────────────────────────────────────────────────────────────────────
// Cue Status
// ─────────────────────────────────────────────────────────────────────────────

/// Per-cue status lines written by the audio thread, read by the settings UI
#[derive(Debug, Clone, Default)]
pub struct CueStatus(Arc<Mutex<[String; 2]>>);

impl CueStatus {
    fn index(cue: Cue) -> usize {
        match cue {
            Cue::ReadyCheck => 0,
            Cue::SquadReady => 1,
        }
    }

    pub fn get(&self, cue: Cue) -> String {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        guard[Self::index(cue)].clone()
    }

    fn set(&self, cue: Cue, status: &str) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        guard[Self::index(cue)] = status.to_string();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio Thread
// ─────────────────────────────────────────────────────────────────────────────

/// Audio service that owns the output and plays cues on request
pub struct AudioService {
    event_rx: mpsc::Receiver<AudioEvent>,
    output: Box<dyn SoundOutput>,
    ready_check: CueTrack,
    squad_ready: CueTrack,
    status: CueStatus,
}

impl AudioService {
    pub fn new(
        event_rx: mpsc::Receiver<AudioEvent>,
        output: Box<dyn SoundOutput>,
        status: CueStatus,
    ) -> Self {
        let service = Self {
            event_rx,
            output,
            ready_check: CueTrack::builtin(Cue::ReadyCheck, DEFAULT_VOLUME as u8),
            squad_ready: CueTrack::builtin(Cue::SquadReady, DEFAULT_VOLUME as u8),
            status,
        };
        service.status.set(Cue::ReadyCheck, &service.ready_check.status);
        service.status.set(Cue::SquadReady, &service.squad_ready.status);
        service
    }

    /// Process events until `Terminate` arrives or every sender is gone
    pub fn run(mut self) {
        while let Some(event) = self.event_rx.blocking_recv() {
            match event {
                AudioEvent::Play(cue) => self.play(cue),
                AudioEvent::Load { cue, path, volume } => self.load(cue, path, volume),
                AudioEvent::SetVolume { cue, volume } => self.track_mut(cue).volume = volume,
                AudioEvent::SetDevice(device) => {
                    if let Err(e) = self.output.set_device(device.as_deref()) {
                        tracing::warn!(error = %e, device = ?device, "failed to switch output device");
                    }
                }
                AudioEvent::Terminate => break,
            }
        }
        tracing::debug!("audio thread stopped");
    }

    fn track_mut(&mut self, cue: Cue) -> &mut CueTrack {
        match cue {
            Cue::ReadyCheck => &mut self.ready_check,
            Cue::SquadReady => &mut self.squad_ready,
        }
    }

    fn play(&mut self, cue: Cue) {
        let track = match cue {
            Cue::ReadyCheck => &self.ready_check,
            Cue::SquadReady => &self.squad_ready,
        };
        if let Err(e) = self.output.play(track) {
            tracing::warn!(cue = cue.label(), error = %e, "failed to play cue");
        }
    }

    fn load(&mut self, cue: Cue, path: Option<String>, volume: u8) {
        let track = match path {
            None => CueTrack::builtin(cue, volume),
            Some(path) => {
                let loaded = SoundData::from_path(Path::new(&path)).and_then(|data| {
                    self.output.validate(&path, &data)?;
                    Ok(data)
                });
                match loaded {
                    Ok(data) => CueTrack::file(cue, path, data, volume),
                    Err(e) => {
                        tracing::warn!(cue = cue.label(), error = %e, "failed to load cue sound");
                        CueTrack::unavailable(cue, volume, &e)
                    }
                }
            }
        };
        self.status.set(cue, &track.status);
        *self.track_mut(cue) = track;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Player Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a running audio thread
pub struct AudioPlayer {
    sender: AudioSender,
    status: CueStatus,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Start the audio thread. `make_output` runs on that thread.
    pub fn spawn<F>(make_output: F) -> Result<Self, AudioError>
    where
        F: FnOnce() -> Box<dyn SoundOutput> + Send + 'static,
    {
        let (sender, receiver) = create_audio_channel();
        let status = CueStatus::default();
        let thread_status = status.clone();

        let thread = std::thread::Builder::new()
            .name("squad-ready-audio".to_string())
            .spawn(move || AudioService::new(receiver, make_output(), thread_status).run())
            .map_err(AudioError::Spawn)?;

        Ok(Self {
            sender,
            status,
            thread: Mutex::new(Some(thread)),
        })
    }

    pub fn with_default_output() -> Result<Self, AudioError> {
        Self::spawn(default_output)
    }

    pub fn play(&self, cue: Cue) {
        self.send(AudioEvent::Play(cue));
    }

    pub fn load_cue(&self, cue: Cue, path: Option<&str>, volume: u8) {
        self.send(AudioEvent::Load {
            cue,
            path: path.map(str::to_string),
            volume,
        });
    }

    pub fn set_volume(&self, cue: Cue, volume: u8) {
        self.send(AudioEvent::SetVolume { cue, volume });
    }

    pub fn set_device(&self, device: Option<&str>) {
        self.send(AudioEvent::SetDevice(device.map(str::to_string)));
    }

    /// Push device and both cues from settings
    pub fn apply_settings(&self, settings: &Settings) {
        self.set_device(settings.audio_output_device.as_deref());
        for cue in [Cue::ReadyCheck, Cue::SquadReady] {
            self.load_cue(cue, settings.cue_path(cue), settings.cue_volume(cue));
        }
    }

    /// Status line for a cue, as of the last load the thread processed
    pub fn status(&self, cue: Cue) -> String {
        self.status.get(cue)
    }

    /// Stop the thread after it drains queued events. Safe to call twice.
    pub fn release(&self) {
        let thread = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(thread) = thread else {
            return;
        };

        if self.sender.blocking_send(AudioEvent::Terminate).is_err() {
            tracing::debug!("audio thread already gone");
        }
        if thread.join().is_err() {
            tracing::error!("audio thread panicked");
        }
    }

    fn send(&self, event: AudioEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "audio queue full, dropping request");
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!(?event, "audio thread stopped, dropping request");
            }
        }
    }
}

impl AudioNotifier for AudioPlayer {
    fn play_ready_check_cue(&self) {
        self.play(Cue::ReadyCheck);
    }

    fn play_squad_ready_cue(&self) {
        self.play(Cue::SquadReady);
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("ready_check", &self.status(Cue::ReadyCheck))
            .field("squad_ready", &self.status(Cue::SquadReady))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueSource;

    #[derive(Debug, Clone, PartialEq)]
    struct Played {
        cue: Cue,
        volume: u8,
        builtin: bool,
    }

    #[derive(Default, Clone)]
    struct Recorder {
        played: Arc<Mutex<Vec<Played>>>,
        devices: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl SoundOutput for Recorder {
        fn play(&mut self, track: &CueTrack) -> Result<(), AudioError> {
            if !track.is_valid() {
                return Err(AudioError::NotLoaded(track.cue));
            }
            self.played.lock().unwrap().push(Played {
                cue: track.cue,
                volume: track.volume,
                builtin: matches!(track.source, CueSource::Builtin(_)),
            });
            Ok(())
        }

        fn set_device(&mut self, device: Option<&str>) -> Result<(), AudioError> {
            self.devices.lock().unwrap().push(device.map(str::to_string));
            Ok(())
        }

        fn validate(&self, path: &str, data: &SoundData) -> Result<(), AudioError> {
            if data.is_empty() {
                return Err(AudioError::Decode {
                    path: path.to_string(),
                    reason: "empty".to_string(),
                });
            }
            Ok(())
        }
    }

    fn spawn_recorder() -> (AudioPlayer, Recorder) {
        let recorder = Recorder::default();
        let output = recorder.clone();
        let player = AudioPlayer::spawn(move || Box::new(output) as Box<dyn SoundOutput>).unwrap();
        (player, recorder)
    }

    #[test]
    fn test_plays_builtin_cues_in_order() {
        let (player, recorder) = spawn_recorder();

        player.play_ready_check_cue();
        player.play_squad_ready_cue();
        player.release();

        let played = recorder.played.lock().unwrap();
        assert_eq!(played.len(), 2);
        assert_eq!(played[0].cue, Cue::ReadyCheck);
        assert_eq!(played[1].cue, Cue::SquadReady);
        assert!(played.iter().all(|p| p.builtin && p.volume == 100));
    }

    #[test]
    fn test_load_custom_sound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check.wav");
        std::fs::write(&path, b"not really audio").unwrap();
        let path = path.display().to_string();

        let (player, recorder) = spawn_recorder();
        player.load_cue(Cue::ReadyCheck, Some(&path), 40);
        player.play(Cue::ReadyCheck);
        player.release();

        let played = recorder.played.lock().unwrap();
        assert_eq!(
            played.as_slice(),
            &[Played {
                cue: Cue::ReadyCheck,
                volume: 40,
                builtin: false
            }]
        );
        assert!(player.status(Cue::ReadyCheck).starts_with("Loaded"));
        assert_eq!(player.status(Cue::SquadReady), "Using default sound");
    }

    #[test]
    fn test_failed_load_reports_status_and_skips_playback() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.wav");
        std::fs::write(&empty, b"").unwrap();
        let empty = empty.display().to_string();

        let (player, recorder) = spawn_recorder();
        player.load_cue(Cue::SquadReady, Some(&empty), 100);
        player.load_cue(Cue::ReadyCheck, Some("missing/cue.wav"), 100);
        player.play(Cue::SquadReady);
        player.play(Cue::ReadyCheck);
        player.release();

        assert!(recorder.played.lock().unwrap().is_empty());
        assert!(player.status(Cue::SquadReady).contains("empty"));
        assert!(player.status(Cue::ReadyCheck).contains("missing/cue.wav"));
    }

    #[test]
    fn test_apply_settings() {
        let (player, recorder) = spawn_recorder();
        let settings = Settings {
            squad_ready_volume: 25,
            audio_output_device: Some("Headphones".to_string()),
            ..Settings::default()
        };

        player.apply_settings(&settings);
        player.set_volume(Cue::ReadyCheck, 10);
        player.play(Cue::ReadyCheck);
        player.play(Cue::SquadReady);
        player.release();

        let devices = recorder.devices.lock().unwrap();
        assert_eq!(devices.as_slice(), &[Some("Headphones".to_string())]);
        let volumes: Vec<u8> = recorder.played.lock().unwrap().iter().map(|p| p.volume).collect();
        assert_eq!(volumes, vec![10, 25]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let (player, recorder) = spawn_recorder();
        player.release();
        player.release();

        // Requests after release are dropped
        player.play(Cue::ReadyCheck);
        assert!(recorder.played.lock().unwrap().is_empty());
    }
}
