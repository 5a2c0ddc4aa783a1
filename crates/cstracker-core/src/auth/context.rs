use std::sync::{Arc, PoisonError, RwLock};

use crate::api::ApiError;
use crate::models::Role;

use super::SessionData;

/// Shared view of the signed-in session.
///
/// One value is created at startup and cloned into every component that makes
/// authenticated requests. Only login and logout write to it; everything else
/// takes a snapshot of the token per request.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl SessionContext {
    pub fn new(data: Option<SessionData>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Replace the current session (login).
    pub fn set(&self, data: SessionData) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(data);
    }

    /// Forget the current session (logout, or 401 from the server).
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Snapshot of the whole session.
    pub fn snapshot(&self) -> Option<SessionData> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().map(|d| d.token)
    }

    /// Token snapshot, or `ApiError::NotAuthenticated` when signed out.
    pub fn require_token(&self) -> Result<String, ApiError> {
        self.token()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotAuthenticated)
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot().map(|d| d.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let ctx = SessionContext::default();
        let other = ctx.clone();
        assert!(matches!(other.require_token(), Err(ApiError::NotAuthenticated)));

        ctx.set(SessionData::new("abc".into(), "admin".into(), Role::Admin));
        assert_eq!(other.require_token().unwrap(), "abc");
        assert_eq!(other.role(), Some(Role::Admin));
        assert!(other.is_authenticated());

        other.clear();
        assert!(!ctx.is_authenticated());
        assert!(ctx.snapshot().is_none());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let ctx = SessionContext::new(Some(SessionData::new(String::new(), "u".into(), Role::Student)));
        assert!(!ctx.is_authenticated());
        assert!(ctx.require_token().is_err());
    }
}
