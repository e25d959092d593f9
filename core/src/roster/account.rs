//! Account name normalization
//!
//! The host prefixes some account names with an instance sigil (`:`). The
//! sigil carries no identity, so every lookup key and every comparison
//! against the local account goes through [`normalize_account`].

/// Leading marker the host may put in front of an account name
pub const ACCOUNT_SIGIL: char = ':';

/// Strip leading sigils from an account name.
pub fn normalize_account(name: &str) -> &str {
    name.trim_start_matches(ACCOUNT_SIGIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_sigil() {
        assert_eq!(normalize_account(":Player.1234"), "Player.1234");
        assert_eq!(normalize_account("Player.1234"), "Player.1234");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in [":Player.1234", "::Player.1234", "Player.1234", ":", ""] {
            let once = normalize_account(name);
            assert_eq!(normalize_account(once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_sigil_only_in_prefix() {
        assert_eq!(normalize_account("Odd:Name.1"), "Odd:Name.1");
        assert_eq!(normalize_account(":"), "");
    }
}
