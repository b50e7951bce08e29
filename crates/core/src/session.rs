//! Client-side presentation gate.
//!
//! A single shared secret unlocks the presentation for the rest of the
//! session. This is a convenience gate, not access control.

use crate::settings::{DEFAULT_SECRET, DEFAULT_SESSION_KEY};
use crate::store::Storage;

/// Inline message shown after a failed attempt.
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password. Please try again.";

/// Session flag value marking an authenticated session.
const AUTHENTICATED: &str = "true";

/// Gate over session-scoped storage.
#[derive(Debug)]
pub struct SessionGate<S: Storage> {
    storage: S,
    key: String,
    secret: String,
    authenticated: bool,
    loading: bool,
}

impl<S: Storage> SessionGate<S> {
    /// Create a gate with the default key and secret.
    pub fn new(storage: S) -> Self {
        Self::with_secret(storage, DEFAULT_SESSION_KEY, DEFAULT_SECRET)
    }

    /// Create a gate with an explicit session key and secret.
    pub fn with_secret(storage: S, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            secret: secret.into(),
            authenticated: false,
            loading: true,
        }
    }

    /// Check the existing session flag. Until this runs the gate reports
    /// loading and unauthenticated.
    pub fn mount(&mut self) -> bool {
        self.authenticated = match self.storage.get_item(&self.key) {
            Ok(value) => value.as_deref() == Some(AUTHENTICATED),
            Err(e) => {
                log::warn!("Failed to read session flag: {}", e);
                false
            }
        };
        self.loading = false;
        self.authenticated
    }

    /// Whether the mount-time check is still pending.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the session is unlocked.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Compare `candidate` with the secret; on a match mark the session as
    /// authenticated.
    pub fn authenticate(&mut self, candidate: &str) -> bool {
        if candidate != self.secret {
            log::debug!("Gate rejected a password attempt");
            return false;
        }

        if let Err(e) = self.storage.set_item(&self.key, AUTHENTICATED) {
            log::warn!("Failed to persist session flag: {}", e);
        }
        self.authenticated = true;
        self.loading = false;
        true
    }

    /// Clear the session flag.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            log::warn!("Failed to clear session flag: {}", e);
        }
        self.authenticated = false;
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    #[test]
    fn test_loading_until_mounted() {
        let mut gate = SessionGate::new(MemoryStorage::new());
        assert!(gate.is_loading());
        assert!(!gate.is_authenticated());

        assert!(!gate.mount());
        assert!(!gate.is_loading());
    }

    #[test]
    fn test_existing_flag_restores_session() {
        let storage = MemoryStorage::with_item(DEFAULT_SESSION_KEY, "true");
        let mut gate = SessionGate::new(storage);

        assert!(gate.mount());
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_other_flag_values_do_not_authenticate() {
        let storage = MemoryStorage::with_item(DEFAULT_SESSION_KEY, "yes");
        let mut gate = SessionGate::new(storage);
        assert!(!gate.mount());
    }

    #[test]
    fn test_authenticate() {
        let mut gate = SessionGate::new(MemoryStorage::new());
        gate.mount();

        assert!(!gate.authenticate("tachyonmotors"));
        assert!(!gate.is_authenticated());
        assert_eq!(gate.storage().get_item(DEFAULT_SESSION_KEY).unwrap(), None);

        assert!(gate.authenticate("TachyonMotors"));
        assert!(gate.is_authenticated());
        assert_eq!(
            gate.storage().get_item(DEFAULT_SESSION_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_logout_clears_flag() {
        let mut gate = SessionGate::with_secret(MemoryStorage::new(), "auth", "pw");
        gate.mount();
        assert!(gate.authenticate("pw"));

        gate.logout();

        assert!(!gate.is_authenticated());
        assert_eq!(gate.storage().get_item("auth").unwrap(), None);
    }
}
