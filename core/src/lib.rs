pub mod context;
pub mod identity;
pub mod notify;
pub mod roster;
pub mod tracker;

// Re-exports for convenience
pub use context::{ConfigError, DEFAULT_SETTINGS_PATH, SettingsExt, SharedSettings};
pub use identity::SelfIdentity;
pub use notify::{AudioNotifier, NagPolicySource, Notification, Notifiers, WindowFlasher};
pub use roster::{MemberView, Roster, UserRecord, UserUpdate, normalize_account};
pub use squad_ready_types::{Cue, Settings, UserRole};
pub use tracker::{DebugInfo, ReadyCheckPhase, ReadyCheckState, ReadyCheckTracker};
