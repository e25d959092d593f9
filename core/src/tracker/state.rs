//! Ready check lifecycle state

use std::time::Instant;

use serde::Serialize;

use crate::roster::MemberView;

/// Lifecycle phase derived from [`ReadyCheckState::in_progress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReadyCheckPhase {
    #[default]
    Idle,
    InProgress,
}

/// Derived ready check state. Timers are only set while a check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadyCheckState {
    pub in_progress: bool,
    pub self_readied: bool,
    pub started_at: Option<Instant>,
    pub next_nag_at: Option<Instant>,
}

impl ReadyCheckState {
    pub fn phase(&self) -> ReadyCheckPhase {
        if self.in_progress {
            ReadyCheckPhase::InProgress
        } else {
            ReadyCheckPhase::Idle
        }
    }

    /// Enter `InProgress`. The nag timer is armed separately.
    pub(crate) fn start(&mut self, now: Instant) {
        self.in_progress = true;
        self.started_at = Some(now);
        self.next_nag_at = None;
    }

    /// Return to `Idle` and drop both timers. Returns true if a check was running.
    pub(crate) fn finish(&mut self) -> bool {
        let was_running = self.in_progress;
        self.in_progress = false;
        self.started_at = None;
        self.next_nag_at = None;
        was_running
    }
}

/// Snapshot for the debug window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    pub self_account: Option<String>,
    pub in_ready_check: bool,
    pub self_readied: bool,
    pub ready_check_elapsed_secs: Option<f32>,
    pub time_until_nag_secs: Option<f32>,
    pub members: Vec<MemberView>,
}

impl DebugInfo {
    pub(crate) fn new(
        self_account: Option<String>,
        state: &ReadyCheckState,
        members: Vec<MemberView>,
        now: Instant,
    ) -> Self {
        Self {
            self_account,
            in_ready_check: state.in_progress,
            self_readied: state.self_readied,
            ready_check_elapsed_secs: state
                .started_at
                .map(|start| now.saturating_duration_since(start).as_secs_f32()),
            time_until_nag_secs: state
                .next_nag_at
                .map(|nag| nag.saturating_duration_since(now).as_secs_f32()),
            members,
        }
    }

    pub fn ready_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role.is_squad_member() && m.ready)
            .count()
    }

    pub fn member_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role.is_squad_member())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_finish_clears_timers() {
        let now = Instant::now();
        let mut state = ReadyCheckState::default();
        state.start(now);
        state.next_nag_at = Some(now + Duration::from_secs(5));
        assert_eq!(state.phase(), ReadyCheckPhase::InProgress);

        assert!(state.finish());
        assert_eq!(state.phase(), ReadyCheckPhase::Idle);
        assert_eq!(state.started_at, None);
        assert_eq!(state.next_nag_at, None);
        assert!(!state.finish());
    }

    #[test]
    fn test_debug_info_timers() {
        let now = Instant::now();
        let state = ReadyCheckState {
            in_progress: true,
            self_readied: false,
            started_at: Some(now),
            next_nag_at: Some(now + Duration::from_secs(5)),
        };

        let info = DebugInfo::new(None, &state, Vec::new(), now + Duration::from_secs(2));
        assert_eq!(info.ready_check_elapsed_secs, Some(2.0));
        assert_eq!(info.time_until_nag_secs, Some(3.0));

        let late = DebugInfo::new(None, &state, Vec::new(), now + Duration::from_secs(9));
        assert_eq!(late.time_until_nag_secs, Some(0.0));
    }
}
