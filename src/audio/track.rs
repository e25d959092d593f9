//! Loaded cue sounds

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use squad_ready_types::Cue;

use super::AudioError;

/// Sound file contents. `Arc`'ed, so cheap to clone into a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundData(Arc<[u8]>);

impl SoundData {
    pub fn from_path(path: &Path) -> Result<Self, AudioError> {
        let bytes = fs::read(path).map_err(|source| AudioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SoundData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl AsRef<[u8]> for SoundData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Built-in tone used when no custom file is configured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl Tone {
    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::ReadyCheck => Self {
                frequency_hz: 880.0,
                duration: Duration::from_millis(250),
            },
            Cue::SquadReady => Self {
                frequency_hz: 660.0,
                duration: Duration::from_millis(450),
            },
        }
    }
}

/// What a cue plays
#[derive(Debug, Clone, PartialEq)]
pub enum CueSource {
    Builtin(Tone),
    File { path: String, data: SoundData },
    /// Loading failed; playing reports the stored status
    Unavailable,
}

/// A cue with its sound, volume and a status line for the settings panel
#[derive(Debug, Clone, PartialEq)]
pub struct CueTrack {
    pub cue: Cue,
    pub source: CueSource,
    pub volume: u8,
    pub status: String,
}

impl CueTrack {
    pub fn builtin(cue: Cue, volume: u8) -> Self {
        Self {
            cue,
            source: CueSource::Builtin(Tone::for_cue(cue)),
            volume,
            status: "Using default sound".to_string(),
        }
    }

    pub fn file(cue: Cue, path: String, data: SoundData, volume: u8) -> Self {
        let status = format!("Loaded '{}' successfully", path);
        Self {
            cue,
            source: CueSource::File { path, data },
            volume,
            status,
        }
    }

    pub fn unavailable(cue: Cue, volume: u8, error: &AudioError) -> Self {
        Self {
            cue,
            source: CueSource::Unavailable,
            volume,
            status: error.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.source, CueSource::Unavailable)
    }

    /// Playback gain in 0.0..=1.0
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(100)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_path() {
        let err = SoundData::from_path(Path::new("definitely/missing.wav")).unwrap_err();
        let track = CueTrack::unavailable(Cue::ReadyCheck, 80, &err);

        assert!(!track.is_valid());
        assert!(track.status.contains("definitely/missing.wav"));
    }

    #[test]
    fn test_file_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cue.wav");
        std::fs::write(&path, b"RIFF....WAVE").unwrap();

        let data = SoundData::from_path(&path).unwrap();
        assert_eq!(data.len(), 12);

        let track = CueTrack::file(Cue::SquadReady, path.display().to_string(), data, 50);
        assert!(track.is_valid());
        assert_eq!(track.gain(), 0.5);
        assert!(track.status.starts_with("Loaded"));
    }

    #[test]
    fn test_builtin_tones_differ() {
        assert_ne!(Tone::for_cue(Cue::ReadyCheck), Tone::for_cue(Cue::SquadReady));
        assert!(CueTrack::builtin(Cue::ReadyCheck, 100).is_valid());
    }
}
