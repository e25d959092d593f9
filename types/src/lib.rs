//! Shared settings and roster types for Squad Ready
//!
//! This crate contains serializable types that are shared between the
//! tracker core, the plugin and the CLI.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Roster Types
// ─────────────────────────────────────────────────────────────────────────────

/// Squad role as reported by the host.
///
/// `None` is a removal signal, not a real role: a record carrying it means the
/// account has left the squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SquadLeader,
    Lieutenant,
    Member,
    Invited,
    Applied,
    #[default]
    None,
    Invalid,
}

impl UserRole {
    /// Roles that take part in a ready check
    pub fn is_squad_member(&self) -> bool {
        matches!(
            self,
            UserRole::SquadLeader | UserRole::Lieutenant | UserRole::Member
        )
    }

    /// Returns true if this record removes the account from the squad
    pub fn is_removal(&self) -> bool {
        matches!(self, UserRole::None)
    }

    /// Short label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::SquadLeader => "Leader",
            UserRole::Lieutenant => "Lieutenant",
            UserRole::Member => "Member",
            UserRole::Invited => "Invited",
            UserRole::Applied => "Applied",
            UserRole::None => "None",
            UserRole::Invalid => "Invalid",
        }
    }
}

/// Host role codes: 0 leader, 1 lieutenant, 2 member, 3 invited, 4 applied, 5 none.
impl From<u8> for UserRole {
    fn from(code: u8) -> Self {
        match code {
            0 => UserRole::SquadLeader,
            1 => UserRole::Lieutenant,
            2 => UserRole::Member,
            3 => UserRole::Invited,
            4 => UserRole::Applied,
            5 => UserRole::None,
            _ => UserRole::Invalid,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub const SETTINGS_VERSION: u32 = 1;
pub const DEFAULT_VOLUME: i32 = 100;
pub const DEFAULT_NAG_INTERVAL_SECS: f32 = 5.0;

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_volume() -> i32 {
    DEFAULT_VOLUME
}

fn default_true() -> bool {
    true
}

fn default_nag_interval() -> f32 {
    DEFAULT_NAG_INTERVAL_SECS
}

/// Persisted plugin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Custom ready check sound. `None` uses the built-in cue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_check_path: Option<String>,

    /// Custom squad ready sound. `None` uses the built-in cue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_ready_path: Option<String>,

    #[serde(default = "default_volume")]
    pub ready_check_volume: i32,

    #[serde(default = "default_volume")]
    pub squad_ready_volume: i32,

    #[serde(default = "default_true")]
    pub flash_window: bool,

    /// Repeat the ready check cue until the local player readies up
    #[serde(default)]
    pub ready_check_nag: bool,

    /// Persisted for the settings panel; nag gating does not read it.
    #[serde(default)]
    pub ready_check_nag_in_combat: bool,

    #[serde(default = "default_nag_interval")]
    pub ready_check_nag_interval_seconds: f32,

    /// Output device name. `None` uses the system default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_output_device: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            ready_check_path: None,
            squad_ready_path: None,
            ready_check_volume: DEFAULT_VOLUME,
            squad_ready_volume: DEFAULT_VOLUME,
            flash_window: true,
            ready_check_nag: false,
            ready_check_nag_in_combat: false,
            ready_check_nag_interval_seconds: DEFAULT_NAG_INTERVAL_SECS,
            audio_output_device: None,
        }
    }
}

/// Which of the two cues a setting or playback request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    ReadyCheck,
    SquadReady,
}

impl Cue {
    pub fn label(&self) -> &'static str {
        match self {
            Cue::ReadyCheck => "ready check",
            Cue::SquadReady => "squad ready",
        }
    }
}

impl Settings {
    /// Configured sound path for a cue; empty paths count as unset
    pub fn cue_path(&self, cue: Cue) -> Option<&str> {
        let path = match cue {
            Cue::ReadyCheck => self.ready_check_path.as_deref(),
            Cue::SquadReady => self.squad_ready_path.as_deref(),
        };
        path.filter(|p| !p.trim().is_empty())
    }

    /// Configured volume for a cue, clamped to 0..=100
    pub fn cue_volume(&self, cue: Cue) -> u8 {
        let volume = match cue {
            Cue::ReadyCheck => self.ready_check_volume,
            Cue::SquadReady => self.squad_ready_volume,
        };
        volume.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(UserRole::from(0), UserRole::SquadLeader);
        assert_eq!(UserRole::from(2), UserRole::Member);
        assert_eq!(UserRole::from(5), UserRole::None);
        assert_eq!(UserRole::from(42), UserRole::Invalid);
    }

    #[test]
    fn test_squad_member_roles() {
        assert!(UserRole::SquadLeader.is_squad_member());
        assert!(UserRole::Lieutenant.is_squad_member());
        assert!(UserRole::Member.is_squad_member());
        assert!(!UserRole::Invited.is_squad_member());
        assert!(!UserRole::Applied.is_squad_member());
        assert!(!UserRole::Invalid.is_squad_member());
        assert!(!UserRole::None.is_squad_member());
    }

    #[test]
    fn test_cue_accessors() {
        let settings = Settings {
            ready_check_path: Some("  ".to_string()),
            squad_ready_path: Some("ready.wav".to_string()),
            ready_check_volume: 250,
            squad_ready_volume: -3,
            ..Settings::default()
        };

        assert_eq!(settings.cue_path(Cue::ReadyCheck), None);
        assert_eq!(settings.cue_path(Cue::SquadReady), Some("ready.wav"));
        assert_eq!(settings.cue_volume(Cue::ReadyCheck), 100);
        assert_eq!(settings.cue_volume(Cue::SquadReady), 0);
    }
}
