//! Local account identity
//!
//! The host reports the local account name once at startup. Later or
//! duplicate reports must not replace it, so the first non-empty name wins.

use std::sync::{PoisonError, RwLock};

use crate::roster::normalize_account;

#[derive(Debug, Default)]
pub struct SelfIdentity {
    name: RwLock<String>,
}

impl SelfIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the normalized account name if none is stored yet.
    ///
    /// Returns true if this call set the identity.
    pub fn set(&self, name: &str) -> bool {
        let name = normalize_account(name);
        let mut current = self.name.write().unwrap_or_else(PoisonError::into_inner);
        if !current.is_empty() || name.is_empty() {
            return false;
        }
        *current = name.to_string();
        true
    }

    pub fn get(&self) -> Option<String> {
        let current = self.name.read().unwrap_or_else(PoisonError::into_inner);
        (!current.is_empty()).then(|| current.clone())
    }

    /// Compare a raw or normalized account name against the local account
    pub fn matches(&self, account: &str) -> bool {
        let current = self.name.read().unwrap_or_else(PoisonError::into_inner);
        !current.is_empty() && *current == normalize_account(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_caller_wins() {
        let identity = SelfIdentity::new();
        assert_eq!(identity.get(), None);

        assert!(identity.set(":Me.1234"));
        assert!(!identity.set("Someone.5678"));
        assert_eq!(identity.get().as_deref(), Some("Me.1234"));
    }

    #[test]
    fn test_empty_name_does_not_claim() {
        let identity = SelfIdentity::new();
        assert!(!identity.set(""));
        assert!(!identity.set(":"));
        assert!(identity.set("Me.1234"));
    }

    #[test]
    fn test_matches_normalizes_both_sides() {
        let identity = SelfIdentity::new();
        assert!(!identity.matches(""));

        identity.set(":Me.1234");
        assert!(identity.matches("Me.1234"));
        assert!(identity.matches(":Me.1234"));
        assert!(!identity.matches("Me.12345"));
    }
}
