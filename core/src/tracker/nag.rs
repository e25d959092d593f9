//! Nag scheduling
//!
//! While a check runs and the local player has not readied, the ready check
//! cue is repeated every configured interval. Time is passed in by the caller
//! so the frame loop and tests share one code path.

use std::time::Instant;

use crate::notify::NagPolicySource;

use super::ReadyCheckState;

/// Arm the nag timer from `now` if nagging is enabled.
///
/// The interval is read from the policy on every call, so a changed setting
/// applies from the next nag on.
pub(crate) fn arm(state: &mut ReadyCheckState, policy: &dyn NagPolicySource, now: Instant) {
    state.next_nag_at = if policy.nag_enabled() {
        Some(now + policy.nag_interval())
    } else {
        None
    };
}

/// Advance the nag timer. Returns true if a nag is due at `now`.
pub(crate) fn poll(state: &mut ReadyCheckState, policy: &dyn NagPolicySource, now: Instant) -> bool {
    if !state.in_progress || state.self_readied || !policy.nag_enabled() {
        return false;
    }

    match state.next_nag_at {
        // Nagging was switched on mid-check: start counting from now
        None => {
            arm(state, policy, now);
            false
        }
        Some(due) if now < due => false,
        Some(_) => {
            arm(state, policy, now);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct Policy {
        enabled: AtomicBool,
        secs: f32,
    }

    impl NagPolicySource for Policy {
        fn nag_enabled(&self) -> bool {
            self.enabled.load(Ordering::Relaxed)
        }

        fn nag_interval_seconds(&self) -> f32 {
            self.secs
        }
    }

    fn running(now: Instant) -> ReadyCheckState {
        ReadyCheckState {
            in_progress: true,
            self_readied: false,
            started_at: Some(now),
            next_nag_at: Some(now + Duration::from_secs(5)),
        }
    }

    #[test]
    fn test_arm_respects_enabled_flag() {
        let now = Instant::now();
        let policy = Policy {
            enabled: AtomicBool::new(false),
            secs: 5.0,
        };
        let mut state = running(now);

        arm(&mut state, &policy, now);
        assert_eq!(state.next_nag_at, None);

        policy.enabled.store(true, Ordering::Relaxed);
        arm(&mut state, &policy, now);
        assert_eq!(state.next_nag_at, Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_poll_lazily_arms_when_enabled_mid_check() {
        let now = Instant::now();
        let policy = Policy {
            enabled: AtomicBool::new(true),
            secs: 3.0,
        };
        let mut state = ReadyCheckState {
            next_nag_at: None,
            ..running(now)
        };

        assert!(!poll(&mut state, &policy, now));
        assert_eq!(state.next_nag_at, Some(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_poll_gates() {
        let now = Instant::now();
        let late = now + Duration::from_secs(60);
        let policy = Policy {
            enabled: AtomicBool::new(true),
            secs: 5.0,
        };

        let mut readied = ReadyCheckState {
            self_readied: true,
            ..running(now)
        };
        assert!(!poll(&mut readied, &policy, late));

        let mut idle = ReadyCheckState::default();
        assert!(!poll(&mut idle, &policy, late));
        assert_eq!(idle.next_nag_at, None);

        policy.enabled.store(false, Ordering::Relaxed);
        let mut disabled = running(now);
        assert!(!poll(&mut disabled, &policy, late));
        assert_eq!(disabled.next_nag_at, Some(now + Duration::from_secs(5)));
    }
}
