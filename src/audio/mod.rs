//! Audio subsystem for ready check cues
//!
//! Cues are played on a dedicated thread fed through a channel, so the
//! tracker never blocks on file or device I/O.

mod error;
mod events;
mod output;
mod service;
mod track;

pub use error::AudioError;
pub use events::AudioEvent;
#[cfg(feature = "playback")]
pub use output::RodioOutput;
pub use output::{LogOutput, SoundOutput, default_output};
pub use service::{AudioPlayer, AudioSender, AudioService, CueStatus, create_audio_channel};
pub use track::{CueSource, CueTrack, SoundData, Tone};
