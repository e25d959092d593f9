pub mod audio;
pub mod logging;
pub mod platform;
pub mod plugin;

pub use plugin::SquadReady;
pub use squad_ready_core::{Cue, DebugInfo, Notification, Settings, UserRole, UserUpdate};
