//! Account records and the explicit session context.

use serde::{Deserialize, Serialize};

/// Account identifier. Accounts are keyed by email address.
pub type AccountId = String;

/// Display name used when an account has no usable name.
pub const DEFAULT_DISPLAY_NAME: &str = "นักเรียน";

/// One registered account in the local account directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: AccountId,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl Account {
    /// Returns the trimmed name, or the default student label when blank.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            trimmed
        }
    }
}

/// Identity context handed to every operation that acts on a profile.
///
/// Only the auth service mints sessions, so holding one means the account
/// signed in (or signed up) and its profile was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account_id: AccountId,
}

impl Session {
    pub(crate) fn new(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, DEFAULT_DISPLAY_NAME};

    #[test]
    fn display_name_falls_back_for_blank_names() {
        let mut account = Account {
            email: "a@school.th".to_string(),
            password: "pw".to_string(),
            name: "   ".to_string(),
        };
        assert_eq!(account.display_name(), DEFAULT_DISPLAY_NAME);

        account.name = "  Ploy ".to_string();
        assert_eq!(account.display_name(), "Ploy");
    }
}
