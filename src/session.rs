//! Logged-in user session
//!
//! The session is owned by the app state and handed to screens through
//! their context; nothing reads the current user from a global.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{Id, User};

/// Local credential validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Email must not be empty")]
    EmptyEmail,
    #[error("Email is not valid")]
    InvalidEmail,
    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Checks credentials before anything is sent to the server
pub fn validate_credentials(email: &str, password: &str) -> Result<(), LoginError> {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let email_re = EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

    if email.trim().is_empty() {
        return Err(LoginError::EmptyEmail);
    }
    if !email_re.is_match(email) {
        return Err(LoginError::InvalidEmail);
    }
    if password.trim().is_empty() {
        return Err(LoginError::EmptyPassword);
    }
    Ok(())
}

/// Which auth call a pending token belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRequest {
    Restore,
    Login,
    Logout,
}

/// What changed after an auth response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    Stale,
    Unchanged,
    LoggedIn,
    LoggedOut,
    LoginRejected(String),
}

#[derive(Clone, Debug)]
pub struct Session {
    user: Option<User>,
    loading: bool,
    pending: Option<(u64, SessionRequest)>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session that has not yet been restored from the server
    pub fn new() -> Self {
        Session {
            user: None,
            loading: true,
            pending: None,
        }
    }

    /// A session already holding `user`
    pub fn with_user(user: User) -> Self {
        Session {
            user: Some(user),
            loading: false,
            pending: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<Id> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_pending(&self, token: u64) -> bool {
        self.pending.map_or(false, |(t, _)| t == token)
    }

    pub fn begin(&mut self, token: u64, request: SessionRequest) {
        self.loading = request != SessionRequest::Logout;
        self.pending = Some((token, request));
    }

    /// Forget the user locally; the server call is fire-and-forget
    pub fn clear(&mut self) {
        self.user = None;
        self.loading = false;
    }

    pub fn settle(&mut self, token: u64, result: Result<Option<User>, String>) -> SessionOutcome {
        let request = match self.pending {
            Some((t, request)) if t == token => request,
            _ => return SessionOutcome::Stale,
        };
        self.pending = None;
        self.loading = false;

        match (request, result) {
            (SessionRequest::Logout, _) => SessionOutcome::Unchanged,
            (_, Ok(Some(user))) => {
                tracing::info!(user_id = user.id, "Session established");
                self.user = Some(user);
                SessionOutcome::LoggedIn
            }
            (SessionRequest::Restore, Ok(None)) | (SessionRequest::Restore, Err(_)) => {
                let was_logged_in = self.user.take().is_some();
                if was_logged_in {
                    SessionOutcome::LoggedOut
                } else {
                    SessionOutcome::Unchanged
                }
            }
            (SessionRequest::Login, Ok(None)) => {
                SessionOutcome::LoginRejected("Email or password is incorrect".into())
            }
            (SessionRequest::Login, Err(reason)) => {
                tracing::warn!(%reason, "Login request failed");
                SessionOutcome::LoginRejected("Something went wrong, try again later".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn student() -> User {
        User {
            id: 1,
            full_name: "Oxy".into(),
            role: Role::Student,
            avatar_url: String::new(),
            username: None,
            email: Some("oxy@example.com".into()),
        }
    }

    #[test]
    fn test_validate_credentials() {
        assert_eq!(validate_credentials("  ", "pw"), Err(LoginError::EmptyEmail));
        assert_eq!(validate_credentials("oxy@", "pw"), Err(LoginError::InvalidEmail));
        assert_eq!(validate_credentials("a b@c.de", "pw"), Err(LoginError::InvalidEmail));
        assert_eq!(
            validate_credentials("oxy@example.com", " "),
            Err(LoginError::EmptyPassword)
        );
        assert!(validate_credentials("oxy@example.com", "secret").is_ok());
    }

    #[test]
    fn test_restore_with_user_logs_in() {
        let mut session = Session::new();
        session.begin(1, SessionRequest::Restore);
        assert!(session.is_loading());
        assert_eq!(session.settle(1, Ok(Some(student()))), SessionOutcome::LoggedIn);
        assert_eq!(session.user_id(), Some(1));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failed_restore_is_silent() {
        let mut session = Session::new();
        session.begin(1, SessionRequest::Restore);
        assert_eq!(
            session.settle(1, Err("Connection failed".into())),
            SessionOutcome::Unchanged
        );
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_rejected_login() {
        let mut session = Session::new();
        session.begin(2, SessionRequest::Login);
        assert_eq!(
            session.settle(2, Ok(None)),
            SessionOutcome::LoginRejected("Email or password is incorrect".into())
        );

        session.begin(3, SessionRequest::Login);
        assert_eq!(
            session.settle(3, Err("timeout".into())),
            SessionOutcome::LoginRejected("Something went wrong, try again later".into())
        );
    }

    #[test]
    fn test_logout_clears_regardless_of_response() {
        let mut session = Session::with_user(student());
        session.clear();
        session.begin(5, SessionRequest::Logout);
        assert!(!session.is_loading());
        assert_eq!(
            session.settle(5, Err("500".into())),
            SessionOutcome::Unchanged
        );
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_stale_token() {
        let mut session = Session::new();
        session.begin(1, SessionRequest::Restore);
        assert_eq!(session.settle(7, Ok(Some(student()))), SessionOutcome::Stale);
        assert!(session.is_pending(1));
    }
}
