use std::path::PathBuf;

use squad_ready_types::Cue;

/// Errors from loading or playing cue sounds
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to read sound file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("no sound loaded for the {} cue", .0.label())]
    NotLoaded(Cue),

    #[error("failed to start audio thread")]
    Spawn(#[source] std::io::Error),
}
