//! Session context holding the bearer credential
//!
//! The credential lives in one explicit, shared context object handed to the
//! [`ApiClient`](super::ApiClient) at construction. Logout is an explicit
//! method call, not a storage side effect, so tests and callers can observe
//! the teardown.

use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
}

/// Shared session context. Cheap to clone; all clones observe the same
/// credential and the same invalidation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// Create a session from a bearer token obtained at login.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                token: Some(token.into()),
            })),
        }
    }

    /// An empty session with no credential. Requests made through it carry
    /// no Authorization header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Current bearer token, if the session is still valid.
    pub fn token(&self) -> Option<String> {
        self.state.read().expect("session lock poisoned").token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().expect("session lock poisoned").token.is_some()
    }

    /// Tear the session down. Called by the client on HTTP 401 and by
    /// explicit logout; idempotent.
    pub fn invalidate(&self) {
        let mut state = self.state.write().expect("session lock poisoned");
        if state.token.take().is_some() {
            tracing::info!("Session invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_is_shared_across_clones() {
        let session = Session::new("tok-1");
        let clone = session.clone();
        assert!(clone.is_authenticated());

        session.invalidate();
        assert!(!clone.is_authenticated());
        assert_eq!(clone.token(), None);
    }

    #[test]
    fn test_anonymous_has_no_token() {
        assert_eq!(Session::anonymous().token(), None);
    }
}
