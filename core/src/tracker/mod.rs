//! Ready check tracking
//!
//! This module provides:
//! - **Tracker**: ingests squad update batches and derives the ready check lifecycle
//! - **State**: the derived lifecycle state and the debug snapshot
//! - **Nag**: reminder scheduling while the local player is not ready

mod nag;
mod ready_check;
mod state;


pub use ready_check::ReadyCheckTracker;
pub use state::{DebugInfo, ReadyCheckPhase, ReadyCheckState};
