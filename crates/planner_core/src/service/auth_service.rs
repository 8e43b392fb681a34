//! Sign-up, sign-in and session use-cases.
//!
//! # Responsibility
//! - Register accounts and validate credentials against the directory.
//! - Mint `Session` values and maintain the persisted active pointer.
//! - Create the account profile explicitly at sign-up/sign-in.
//!
//! # Invariants
//! - Emails are unique; a duplicate sign-up changes nothing.
//! - A returned `Session` always has a stored profile.

use crate::model::account::{Account, Session, DEFAULT_DISPLAY_NAME};
use crate::repo::account_repo::AccountDirectory;
use crate::repo::kv_store::{KeyValueStore, RepoError};
use crate::repo::profile_repo::ProfileStore;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("valid email regex"));

/// Errors from auth use-cases. Display text is shown to the user as is.
#[derive(Debug)]
pub enum AuthError {
    /// Email is already registered.
    DuplicateAccount(String),
    /// No account matches the email/password pair.
    InvalidCredentials,
    /// Email is blank or not shaped like `local@domain`.
    InvalidEmail(String),
    /// Password is empty.
    EmptyPassword,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateAccount(_) => write!(f, "อีเมลนี้ถูกสมัครไว้แล้ว"),
            Self::InvalidCredentials => write!(f, "อีเมลหรือรหัสผ่านไม่ถูกต้อง"),
            Self::InvalidEmail(email) => write!(f, "invalid email: `{email}`"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Optional display name; blank falls back to the default label.
    pub name: Option<String>,
}

/// Auth facade over the account directory and profile store.
pub struct AuthService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers an account, signs it in, and creates its profile.
    pub fn sign_up(&self, request: SignUpRequest) -> Result<Session, AuthError> {
        let email = normalize_email(&request.email)?;
        if request.password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let account = Account {
            email: email.clone(),
            password: request.password,
            name: request.name.unwrap_or_default().trim().to_string(),
        };

        let accounts = self.accounts();
        let profiles = self.profiles();
        let inserted = self.store.atomically(|| {
            if accounts.find(&email)?.is_some() {
                return Ok(false);
            }
            accounts.insert(account)?;
            accounts.set_active_account_id(Some(email.as_str()))?;
            profiles.get_or_create(&email)?;
            Ok(true)
        })?;

        if !inserted {
            warn!("event=sign_up module=service status=rejected reason=duplicate_account");
            return Err(AuthError::DuplicateAccount(email));
        }

        info!("event=sign_up module=service status=ok");
        Ok(Session::new(email))
    }

    /// Validates credentials, signs the account in, and ensures its profile.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        let accounts = self.accounts();
        let profiles = self.profiles();

        let matched = self.store.atomically(|| {
            let Some(account) = accounts
                .find(email)?
                .filter(|account| account.password == password)
            else {
                return Ok(None);
            };
            accounts.set_active_account_id(Some(account.email.as_str()))?;
            profiles.get_or_create(&account.email)?;
            Ok(Some(account))
        })?;

        match matched {
            Some(account) => {
                info!("event=sign_in module=service status=ok");
                Ok(Session::new(account.email))
            }
            None => {
                warn!("event=sign_in module=service status=rejected reason=invalid_credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Clears the active-session pointer.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.accounts().set_active_account_id(None)?;
        info!("event=sign_out module=service status=ok");
        Ok(())
    }

    /// Resumes the persisted session, if it still points at a known account.
    ///
    /// The profile is ensured so the returned session keeps its invariant.
    pub fn active_session(&self) -> Result<Option<Session>, AuthError> {
        let accounts = self.accounts();
        let Some(account_id) = accounts.active_account_id()? else {
            return Ok(None);
        };
        if accounts.find(&account_id)?.is_none() {
            warn!("event=session_resume module=service status=stale");
            return Ok(None);
        }
        self.profiles().get_or_create(&account_id)?;
        Ok(Some(Session::new(account_id)))
    }

    pub fn current_account(&self, session: &Session) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts().find(session.account_id())?)
    }

    /// Display name of the session's account, or the default label.
    pub fn display_name(&self, session: &Session) -> Result<String, AuthError> {
        let name = self
            .current_account(session)?
            .map(|account| account.display_name().to_string())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        Ok(name)
    }

    fn accounts(&self) -> AccountDirectory<&S> {
        AccountDirectory::new(&self.store)
    }

    fn profiles(&self) -> ProfileStore<&S> {
        ProfileStore::new(&self.store)
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let trimmed = email.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(AuthError::InvalidEmail(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
