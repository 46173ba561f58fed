use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// The slice of an authenticated session the record store cares about:
/// which user owns the remote rows, and the bearer token to act as them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
}

/// Shared "current session or none" cell. The auth layer sets and clears
/// it; the record store only ever checks presence before going remote.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: AuthSession) {
        *self.inner.write().unwrap() = Some(session);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    pub fn current(&self) -> Option<AuthSession> {
        self.inner.read().unwrap().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_signed_out() {
        let store = SessionStore::new();
        assert!(!store.is_signed_in());
        assert!(store.current().is_none());
    }

    #[test]
    fn set_and_clear_round_trip() {
        let store = SessionStore::new();
        store.set(AuthSession {
            user_id: "user-1".to_string(),
            access_token: "token".to_string(),
        });
        assert!(store.is_signed_in());
        assert_eq!(store.current().unwrap().user_id, "user-1");

        store.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn clones_share_the_same_session() {
        let store = SessionStore::new();
        let other = store.clone();
        store.set(AuthSession {
            user_id: "user-1".to_string(),
            access_token: "token".to_string(),
        });
        assert!(other.is_signed_in());
    }
}
