use chrono::{DateTime, Utc};

use wms_core::{DomainError, DomainResult};

use crate::{Credentials, User};

/// Binary login state: either nobody or the configured user is signed in.
#[derive(Debug, Clone)]
pub struct AuthSession {
    credentials: Credentials,
    account: User,
    current: Option<User>,
}

impl AuthSession {
    pub fn new(credentials: Credentials) -> Self {
        let account = User::administrator(credentials.username());
        Self::with_account(credentials, account)
    }

    pub fn with_account(credentials: Credentials, account: User) -> Self {
        Self {
            credentials,
            account,
            current: None,
        }
    }

    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<&User> {
        if !self.credentials.matches(username, password) {
            tracing::warn!(username, "login rejected");
            return Err(DomainError::Unauthorized);
        }
        self.account.last_login = Some(now);
        tracing::info!(user_id = %self.account.id, username, "login succeeded");
        let user = self.current.insert(self.account.clone());
        Ok(&*user)
    }

    /// Sign in by presenting a credential object rather than raw strings.
    pub fn login_with(
        &mut self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> DomainResult<&User> {
        self.login(credentials.username(), credentials.password(), now)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// The signed-in user, or `Unauthorized`.
    pub fn require_user(&self) -> DomainResult<&User> {
        self.current.as_ref().ok_or(DomainError::Unauthorized)
    }
}
