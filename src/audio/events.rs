//! Audio event types sent to the audio thread

use squad_ready_types::Cue;

/// Requests handled by the audio thread, in order of arrival
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Play the currently loaded sound for a cue
    Play(Cue),

    /// Load (or reload) the sound for a cue.
    /// `path: None` selects the built-in sound.
    Load {
        cue: Cue,
        path: Option<String>,
        volume: u8,
    },

    /// Change the volume of an already loaded cue
    SetVolume { cue: Cue, volume: u8 },

    /// Switch output device. `None` selects the system default.
    SetDevice(Option<String>),

    /// Stop the audio thread
    Terminate,
}
