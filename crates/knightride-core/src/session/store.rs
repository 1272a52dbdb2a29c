//! Session token ownership.

use std::sync::{Arc, PoisonError, RwLock};

use super::slot::TokenSlot;

/// Opaque bearer credential.
///
/// `Debug` never prints the value so the token cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token. Blank strings are not tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Single owner of the session token.
///
/// The store is opened once at startup and shared by `Arc` with everything
/// that needs token material. The durable slot is optional: without one, or
/// when it fails, the session lives in memory only. Persistence failures are
/// logged and never surfaced.
pub struct SessionStore {
    token: RwLock<Option<SessionToken>>,
    slot: Option<Arc<dyn TokenSlot>>,
}

impl SessionStore {
    /// Opens a store backed by `slot`, hydrating the token from it once.
    pub fn open(slot: Arc<dyn TokenSlot>) -> Self {
        let token = match slot.read() {
            Ok(raw) => raw.and_then(SessionToken::new),
            Err(e) => {
                tracing::warn!("Token storage unreadable, starting signed out: {}", e);
                None
            }
        };

        tracing::debug!(restored = token.is_some(), "Session store opened");

        Self {
            token: RwLock::new(token),
            slot: Some(slot),
        }
    }

    /// Opens a store with no durable storage capability.
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            slot: None,
        }
    }

    /// Whether token changes survive a restart.
    pub fn is_persistent(&self) -> bool {
        self.slot.is_some()
    }

    /// Returns the current token, if any.
    pub fn get_token(&self) -> Option<SessionToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the token and persists it. A blank token clears the session.
    pub fn set_token(&self, raw: impl Into<String>) {
        let Some(token) = SessionToken::new(raw) else {
            tracing::debug!("Ignoring blank session token, clearing session");
            self.clear_token();
            return;
        };

        if let Some(slot) = &self.slot
            && let Err(e) = slot.write(token.as_str())
        {
            tracing::warn!("Failed to persist session token, keeping it in memory: {}", e);
        }

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drops the token and removes the durable entry.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;

        if let Some(slot) = &self.slot
            && let Err(e) = slot.remove()
        {
            tracing::warn!("Failed to remove persisted session token: {}", e);
        }
    }

    /// True iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("persistent", &self.is_persistent())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenSlot, TokenSlotError};

    /// Slot whose backing storage is missing entirely.
    struct BrokenSlot;

    impl TokenSlot for BrokenSlot {
        fn read(&self) -> Result<Option<String>, TokenSlotError> {
            Err(TokenSlotError::Unavailable("no storage".into()))
        }

        fn write(&self, _token: &str) -> Result<(), TokenSlotError> {
            Err(TokenSlotError::Unavailable("no storage".into()))
        }

        fn remove(&self) -> Result<(), TokenSlotError> {
            Err(TokenSlotError::Unavailable("no storage".into()))
        }
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let store = SessionStore::open(Arc::new(MemoryTokenSlot::new()));

        store.set_token("abc");

        assert_eq!(store.get_token().unwrap().as_str(), "abc");
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_clear_then_get_is_absent() {
        let slot = Arc::new(MemoryTokenSlot::new());
        let store = SessionStore::open(slot.clone());

        store.set_token("abc");
        store.clear_token();

        assert!(store.get_token().is_none());
        assert!(!store.is_authenticated());
        assert!(slot.peek().is_none());
    }

    #[test]
    fn test_set_token_is_idempotent() {
        let slot = Arc::new(MemoryTokenSlot::new());
        let store = SessionStore::open(slot.clone());

        store.set_token("abc");
        let once = (store.get_token(), slot.peek());
        store.set_token("abc");
        let twice = (store.get_token(), slot.peek());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_token_overwrites_previous_value() {
        let slot = Arc::new(MemoryTokenSlot::new());
        let store = SessionStore::open(slot.clone());

        store.set_token("first");
        store.set_token("second");

        assert_eq!(store.get_token().unwrap().as_str(), "second");
        assert_eq!(slot.peek().as_deref(), Some("second"));
    }

    #[test]
    fn test_open_hydrates_from_slot() {
        let slot = Arc::new(MemoryTokenSlot::with_token("restored"));
        let store = SessionStore::open(slot);

        assert_eq!(store.get_token().unwrap().as_str(), "restored");
    }

    #[test]
    fn test_blank_persisted_token_hydrates_as_absent() {
        let store = SessionStore::open(Arc::new(MemoryTokenSlot::with_token("  \n")));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_broken_slot_degrades_to_memory() {
        let store = SessionStore::open(Arc::new(BrokenSlot));
        assert!(!store.is_authenticated());

        store.set_token("abc");
        assert_eq!(store.get_token().unwrap().as_str(), "abc");

        store.clear_token();
        assert!(store.get_token().is_none());
    }

    #[test]
    fn test_in_memory_store_has_no_persistence() {
        let store = SessionStore::in_memory();
        assert!(!store.is_persistent());

        store.set_token("abc");
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = SessionToken::new("super-secret").unwrap();
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.bearer(), "Bearer super-secret");
    }
}
