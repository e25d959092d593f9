//! Ready check tracker
//!
//! Consumes squad update batches from the host and derives the ready check
//! lifecycle from them:
//!
//! - A squad leader whose ready flag flips false→true starts a check.
//! - Any other leader update while a check runs ends it silently. The host
//!   gives no way to tell a cancelled check from the ready flags being reset
//!   after a successful one, so neither gets a cue.
//! - A member update that leaves every squad member ready completes the check.
//!
//! One mutex guards the roster and the check state. Batches are applied
//! atomically under it, and notifications are dispatched only after it is
//! released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use squad_ready_types::UserRole;

use crate::identity::SelfIdentity;
use crate::notify::{NagPolicySource, Notification, Notifiers};
use crate::roster::{MemberView, Roster, UserRecord, UserUpdate, normalize_account};

use super::nag;
use super::state::{DebugInfo, ReadyCheckPhase, ReadyCheckState};

#[derive(Debug, Default)]
struct TrackerState {
    roster: Roster,
    check: ReadyCheckState,
}

pub struct ReadyCheckTracker {
    state: Mutex<TrackerState>,
    identity: SelfIdentity,
    notifiers: Notifiers,
    policy: Arc<dyn NagPolicySource>,
}

impl ReadyCheckTracker {
    pub fn new(notifiers: Notifiers, policy: Arc<dyn NagPolicySource>) -> Self {
        Self {
            state: Mutex::new(TrackerState::default()),
            identity: SelfIdentity::new(),
            notifiers,
            policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the local account name. Only the first non-empty name sticks.
    pub fn set_self_account(&self, name: &str) -> bool {
        let stored = self.identity.set(name);
        if stored {
            tracing::debug!(account = normalize_account(name), "self account set");
        }
        stored
    }

    pub fn self_account(&self) -> Option<String> {
        self.identity.get()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a batch of user updates in order.
    pub fn update_users(&self, users: &[UserUpdate]) -> Vec<Notification> {
        self.update_users_at(users, Instant::now())
    }

    /// Apply a batch as of `now`. Returns the notifications that were dispatched.
    pub fn update_users_at(&self, users: &[UserUpdate], now: Instant) -> Vec<Notification> {
        let notifications = {
            let mut state = self.lock();
            tracing::debug!(count = users.len(), "received squad update");
            users
                .iter()
                .filter_map(|user| self.apply_update(&mut state, user, now))
                .collect::<Vec<_>>()
        };

        for notification in &notifications {
            self.notifiers.dispatch(*notification);
        }
        notifications
    }

    fn apply_update(
        &self,
        state: &mut TrackerState,
        user: &UserUpdate,
        now: Instant,
    ) -> Option<Notification> {
        let account = normalize_account(&user.account_id);
        tracing::debug!(
            account,
            role = %user.role,
            ready = user.ready,
            join_time = user.join_time,
            subgroup = user.subgroup,
            "user update"
        );

        if account.is_empty() {
            tracing::debug!("skipping update without account name");
            return None;
        }
        let is_self = self.identity.matches(account);

        if user.role.is_removal() {
            if is_self {
                tracing::debug!("self left squad, resetting roster");
                state.check.self_readied = false;
                state.roster.clear();
                if state.check.finish() {
                    tracing::info!("ready check ended by leaving squad");
                }
            } else {
                state.roster.remove(account);
            }
            return None;
        }

        if is_self {
            state.check.self_readied = user.ready;
        }

        // New members carry no previous ready flag to compare against
        let previous = state.roster.upsert(account, UserRecord::from(user))?;

        if user.role == UserRole::SquadLeader {
            if user.ready && !previous.ready {
                state.check.start(now);
                nag::arm(&mut state.check, self.policy.as_ref(), now);
                tracing::info!(leader = account, "ready check started");
                return Some(Notification::ReadyCheckStarted);
            }
            if state.check.finish() {
                tracing::info!(leader = account, "ready check ended");
            }
            return None;
        }

        if state.check.in_progress && state.roster.all_players_readied() {
            state.check.finish();
            tracing::info!(members = state.roster.len(), "squad is ready");
            return Some(Notification::SquadReady);
        }
        None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame tick
    // ─────────────────────────────────────────────────────────────────────────

    /// Periodic tick from the frame loop; fires a nag when one is due.
    pub fn tick(&self) -> Option<Notification> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&self, now: Instant) -> Option<Notification> {
        let due = {
            let mut state = self.lock();
            nag::poll(&mut state.check, self.policy.as_ref(), now)
        };

        if !due {
            return None;
        }
        tracing::debug!("nagging for ready check");
        self.notifiers.dispatch(Notification::Nag);
        Some(Notification::Nag)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> ReadyCheckState {
        self.lock().check
    }

    pub fn phase(&self) -> ReadyCheckPhase {
        self.lock().check.phase()
    }

    pub fn member_count(&self) -> usize {
        self.lock().roster.len()
    }

    /// Members ordered for display
    pub fn snapshot(&self) -> Vec<MemberView> {
        self.lock().roster.snapshot()
    }

    /// Visit every member while holding the tracker lock.
    ///
    /// The callback must not call back into the tracker.
    pub fn for_each_member(&self, mut f: impl FnMut(&str, &UserRecord)) {
        let state = self.lock();
        for (account, record) in state.roster.iter() {
            f(account, record);
        }
    }

    pub fn debug_info(&self) -> DebugInfo {
        self.debug_info_at(Instant::now())
    }

    pub fn debug_info_at(&self, now: Instant) -> DebugInfo {
        let self_account = self.identity.get();
        let state = self.lock();
        DebugInfo::new(self_account, &state.check, state.roster.snapshot(), now)
    }
}

impl std::fmt::Debug for ReadyCheckTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyCheckTracker")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
