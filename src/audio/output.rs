//! Output backends for the audio thread
//!
//! Backends are created on the audio thread and never leave it, so they
//! do not need to be `Send`.

use super::AudioError;
use super::track::{CueSource, CueTrack, SoundData};

/// Something the audio thread can play cues through
pub trait SoundOutput {
    fn play(&mut self, track: &CueTrack) -> Result<(), AudioError>;

    /// `None` selects the system default device
    fn set_device(&mut self, device: Option<&str>) -> Result<(), AudioError>;

    /// Check that a sound file can be played before accepting it
    fn validate(&self, path: &str, data: &SoundData) -> Result<(), AudioError>;
}

/// Best available output for this build
pub fn default_output() -> Box<dyn SoundOutput> {
    #[cfg(feature = "playback")]
    {
        match RodioOutput::open(None) {
            Ok(output) => return Box::new(output),
            Err(e) => tracing::warn!(error = %e, "no audio device, cues will only be logged"),
        }
    }
    Box::new(LogOutput::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Output
// ─────────────────────────────────────────────────────────────────────────────

/// Logs cues instead of playing them. Used for headless builds.
#[derive(Debug, Default)]
pub struct LogOutput {
    device: Option<String>,
}

impl SoundOutput for LogOutput {
    fn play(&mut self, track: &CueTrack) -> Result<(), AudioError> {
        let source = match &track.source {
            CueSource::Builtin(_) => "builtin",
            CueSource::File { path, .. } => path.as_str(),
            CueSource::Unavailable => return Err(AudioError::NotLoaded(track.cue)),
        };
        tracing::info!(
            cue = track.cue.label(),
            source,
            volume = track.volume,
            device = self.device.as_deref().unwrap_or("default"),
            "cue played"
        );
        Ok(())
    }

    fn set_device(&mut self, device: Option<&str>) -> Result<(), AudioError> {
        self.device = device.map(str::to_string);
        Ok(())
    }

    fn validate(&self, path: &str, data: &SoundData) -> Result<(), AudioError> {
        if data.is_empty() {
            return Err(AudioError::Decode {
                path: path.to_string(),
                reason: "file is empty".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rodio Output
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "playback")]
pub use rodio_output::RodioOutput;

#[cfg(feature = "playback")]
mod rodio_output {
    use std::io::Cursor;

    use rodio::cpal::traits::{DeviceTrait, HostTrait};
    use rodio::source::SineWave;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::*;

    /// Amplitude of the generated tones before the cue volume is applied
    const TONE_AMPLITUDE: f32 = 0.25;

    /// Plays cues through rodio. Holds the output stream open for its lifetime.
    pub struct RodioOutput {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioOutput {
        pub fn open(device: Option<&str>) -> Result<Self, AudioError> {
            let (stream, handle) = open_stream(device)?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    fn open_stream(device: Option<&str>) -> Result<(OutputStream, OutputStreamHandle), AudioError> {
        let Some(name) = device else {
            return OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()));
        };

        let host = rodio::cpal::default_host();
        let mut devices = host
            .output_devices()
            .map_err(|e| AudioError::Output(e.to_string()))?;
        let device = devices
            .find(|d| d.name().is_ok_and(|n| n == name))
            .ok_or_else(|| AudioError::DeviceNotFound(name.to_string()))?;

        OutputStream::try_from_device(&device).map_err(|e| AudioError::Output(e.to_string()))
    }

    impl SoundOutput for RodioOutput {
        fn play(&mut self, track: &CueTrack) -> Result<(), AudioError> {
            let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Output(e.to_string()))?;
            sink.set_volume(track.gain());

            match &track.source {
                CueSource::Builtin(tone) => {
                    let source = SineWave::new(tone.frequency_hz)
                        .take_duration(tone.duration)
                        .amplify(TONE_AMPLITUDE);
                    sink.append(source);
                }
                CueSource::File { path, data } => {
                    let decoder =
                        Decoder::new(Cursor::new(data.clone())).map_err(|e| AudioError::Decode {
                            path: path.clone(),
                            reason: e.to_string(),
                        })?;
                    sink.append(decoder);
                }
                CueSource::Unavailable => return Err(AudioError::NotLoaded(track.cue)),
            }

            // Keep playing after the sink handle goes away
            sink.detach();
            Ok(())
        }

        fn set_device(&mut self, device: Option<&str>) -> Result<(), AudioError> {
            let (stream, handle) = match open_stream(device) {
                Ok(opened) => opened,
                Err(AudioError::DeviceNotFound(name)) => {
                    tracing::warn!(device = %name, "output device not found, using default");
                    open_stream(None)?
                }
                Err(e) => return Err(e),
            };
            self._stream = stream;
            self.handle = handle;
            Ok(())
        }

        fn validate(&self, path: &str, data: &SoundData) -> Result<(), AudioError> {
            Decoder::new(Cursor::new(data.clone()))
                .map(|_| ())
                .map_err(|e| AudioError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
        }
    }
}
