//! Collaborator interfaces for ready check side effects
//!
//! The tracker decides *when* something should happen and hands the result
//! to these traits after releasing its lock. Implementations must return
//! quickly and swallow their own failures.

use std::sync::Arc;
use std::time::Duration;

use squad_ready_types::DEFAULT_NAG_INTERVAL_SECS;

/// Shortest nag interval accepted from configuration
pub const MIN_NAG_INTERVAL_SECS: f32 = 0.5;

/// Plays the two ready check cues. Fire-and-forget.
pub trait AudioNotifier: Send + Sync {
    fn play_ready_check_cue(&self);
    fn play_squad_ready_cue(&self);
}

/// Best-effort attention signal on the game window
pub trait WindowFlasher: Send + Sync {
    fn flash(&self);
}

/// Nag configuration, read fresh every time the nag timer is armed
pub trait NagPolicySource: Send + Sync {
    fn nag_enabled(&self) -> bool;
    fn nag_interval_seconds(&self) -> f32;

    fn nag_interval(&self) -> Duration {
        nag_interval_from_secs(self.nag_interval_seconds())
    }
}

/// Convert a configured interval to a `Duration`.
///
/// Non-finite values fall back to the default; anything shorter than
/// [`MIN_NAG_INTERVAL_SECS`] is raised to it.
pub fn nag_interval_from_secs(secs: f32) -> Duration {
    let secs = if secs.is_finite() {
        secs.max(MIN_NAG_INTERVAL_SECS)
    } else {
        DEFAULT_NAG_INTERVAL_SECS
    };
    Duration::from_secs_f32(secs)
}

/// Side effects raised by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Squad leader started a ready check
    ReadyCheckStarted,
    /// Every squad member readied up
    SquadReady,
    /// Reminder while the local player is still not ready
    Nag,
}

/// The audio and window collaborators, dispatched together
#[derive(Clone)]
pub struct Notifiers {
    audio: Arc<dyn AudioNotifier>,
    flasher: Arc<dyn WindowFlasher>,
}

impl Notifiers {
    pub fn new(audio: Arc<dyn AudioNotifier>, flasher: Arc<dyn WindowFlasher>) -> Self {
        Self { audio, flasher }
    }

    pub fn dispatch(&self, notification: Notification) {
        tracing::debug!(?notification, "dispatching notification");
        self.flasher.flash();
        match notification {
            Notification::ReadyCheckStarted | Notification::Nag => {
                self.audio.play_ready_check_cue()
            }
            Notification::SquadReady => self.audio.play_squad_ready_cue(),
        }
    }
}

impl std::fmt::Debug for Notifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifiers").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_conversion() {
        assert_eq!(nag_interval_from_secs(5.0), Duration::from_secs(5));
        assert_eq!(nag_interval_from_secs(2.5), Duration::from_millis(2500));
        assert_eq!(nag_interval_from_secs(0.0), Duration::from_millis(500));
        assert_eq!(nag_interval_from_secs(-3.0), Duration::from_millis(500));
        assert_eq!(nag_interval_from_secs(f32::NAN), Duration::from_secs(5));
        assert_eq!(nag_interval_from_secs(f32::INFINITY), Duration::from_secs(5));
    }
}
