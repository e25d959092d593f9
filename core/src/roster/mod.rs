//! Squad roster
//!
//! Last-known state of every squad member, keyed by normalized account name.
//! The roster has no locking of its own: it lives inside the tracker's state
//! and is only reachable while the tracker lock is held.

mod account;

pub use account::{ACCOUNT_SIGIL, normalize_account};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use squad_ready_types::UserRole;

/// One user record as delivered by the host in a squad update batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// Raw account name, possibly carrying the instance sigil
    #[serde(alias = "account")]
    pub account_id: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub join_time: u64,
    /// Zero-based subgroup index
    #[serde(default)]
    pub subgroup: u8,
}

impl UserUpdate {
    pub fn new(account_id: impl Into<String>, role: UserRole, ready: bool) -> Self {
        Self {
            account_id: account_id.into(),
            role,
            ready,
            join_time: 0,
            subgroup: 0,
        }
    }

    /// Removal record for an account
    pub fn removal(account_id: impl Into<String>) -> Self {
        Self::new(account_id, UserRole::None, false)
    }

    pub fn with_subgroup(mut self, subgroup: u8) -> Self {
        self.subgroup = subgroup;
        self
    }

    pub fn with_join_time(mut self, join_time: u64) -> Self {
        self.join_time = join_time;
        self
    }
}

/// Stored state for one squad member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord {
    pub role: UserRole,
    pub ready: bool,
    pub join_time: u64,
    pub subgroup: u8,
}

impl From<&UserUpdate> for UserRecord {
    fn from(update: &UserUpdate) -> Self {
        Self {
            role: update.role,
            ready: update.ready,
            join_time: update.join_time,
            subgroup: update.subgroup,
        }
    }
}

/// Read-only view of a member for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub account: String,
    pub role: UserRole,
    /// One-based subgroup number as shown in game
    pub subgroup: u16,
    pub ready: bool,
    pub join_time: u64,
}

/// Mapping from normalized account name to last-known record.
///
/// Never stores a record whose role is [`UserRole::None`].
#[derive(Debug, Default)]
pub struct Roster {
    members: HashMap<String, UserRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `account`, returning the previous one.
    ///
    /// A removal record erases the entry instead of being stored.
    pub fn upsert(&mut self, account: &str, record: UserRecord) -> Option<UserRecord> {
        if record.role.is_removal() {
            return self.remove(account);
        }
        self.members.insert(account.to_string(), record)
    }

    /// Erase the entry for `account` if present
    pub fn remove(&mut self, account: &str) -> Option<UserRecord> {
        self.members.remove(account)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn get(&self, account: &str) -> Option<&UserRecord> {
        self.members.get(account)
    }

    pub fn contains(&self, account: &str) -> bool {
        self.members.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserRecord)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if every leader, lieutenant and member is ready.
    ///
    /// Other roles are ignored, so an empty roster (or one holding only
    /// invited/applied accounts) counts as ready.
    pub fn all_players_readied(&self) -> bool {
        for (account, record) in self.iter() {
            if !record.role.is_squad_member() {
                tracing::debug!(account, role = %record.role, "ignoring non-member");
                continue;
            }
            if !record.ready {
                tracing::debug!(account, "squad not ready");
                return false;
            }
        }
        tracing::debug!(members = self.len(), "all players are readied");
        true
    }

    /// Members ordered by subgroup, then account name
    pub fn snapshot(&self) -> Vec<MemberView> {
        let mut members: Vec<MemberView> = self
            .iter()
            .map(|(account, record)| MemberView {
                account: account.to_string(),
                role: record.role,
                subgroup: u16::from(record.subgroup) + 1,
                ready: record.ready,
                join_time: record.join_time,
            })
            .collect();
        members.sort_by(|a, b| {
            a.subgroup
                .cmp(&b.subgroup)
                .then_with(|| a.account.cmp(&b.account))
        });
        members
    }
}
