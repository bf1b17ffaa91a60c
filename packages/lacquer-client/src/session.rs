//! Process-wide session state.
//!
//! The session store is the single source of truth for "who is logged in".
//! The token/user-id/username triple is committed and cleared atomically,
//! and durable storage always mirrors the in-memory triple after a
//! successful mutation. All reads and writes go through the methods here;
//! nothing else touches the storage keys.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USERNAME_KEY, USER_ID_KEY};

/// A snapshot of the authentication state.
///
/// `is_loading` is an orthogonal flag overlaid on whichever authentication
/// state is current; there is no "loading" state of its own.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// True iff the whole triple is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user_id.is_some() && self.username.is_some()
    }
}

/// Shared, storage-backed session state.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<AuthState>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store over the given storage. The state starts empty with
    /// `is_loading` set until [`SessionStore::bootstrap`] runs.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState {
                is_loading: true,
                ..AuthState::default()
            })),
            storage,
        }
    }

    /// Hydrate the session from durable storage.
    ///
    /// All three entries present means authenticated with those exact
    /// values; anything else leaves the session unauthenticated with no
    /// partial values. Storage failures are logged and treated as "not
    /// authenticated" — bootstrap never fails.
    pub fn bootstrap(&self) {
        let read = |key| match self.storage.get(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, key, "failed to read session entry");
                None
            }
        };

        let token = read(TOKEN_KEY);
        let user_id = read(USER_ID_KEY);
        let username = read(USERNAME_KEY);

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let (Some(token), Some(user_id), Some(username)) = (token, user_id, username) {
            state.token = Some(token);
            state.user_id = Some(user_id);
            state.username = Some(username);
        }
        state.is_loading = false;
    }

    /// Snapshot the current state.
    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether the full triple is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_authenticated()
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .token
            .clone()
    }

    /// Current display name, if any.
    pub fn username(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .username
            .clone()
    }

    /// Last auth failure message, if any.
    pub fn error(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .error
            .clone()
    }

    /// Commit a freshly authenticated triple: persist to storage first, then
    /// publish to memory in one write so readers never see a torn triple.
    pub fn commit(&self, token: &str, user_id: &str, username: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_ID_KEY, user_id)?;
        self.storage.set(USERNAME_KEY, username)?;

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.token = Some(token.to_string());
        state.user_id = Some(user_id.to_string());
        state.username = Some(username.to_string());
        state.is_loading = false;
        state.error = None;
        Ok(())
    }

    /// Update only the display name, in storage and in memory. Used after a
    /// profile update so the new name shows everywhere without a re-login.
    pub fn update_username(&self, username: &str) -> Result<(), StorageError> {
        self.storage.set(USERNAME_KEY, username)?;
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.username = Some(username.to_string());
        Ok(())
    }

    /// Clear the session: remove all three storage entries and reset the
    /// in-memory state. This is the single clearing path shared by logout
    /// and forced invalidation on 401, and it is idempotent. Storage
    /// failures are logged; the in-memory state is reset regardless.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_ID_KEY, USERNAME_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!(%error, key, "failed to remove session entry");
            }
        }
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = AuthState::default();
    }

    /// Mark the start of an auth operation: loading on, error cleared.
    pub(crate) fn start_loading(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_loading = true;
        state.error = None;
    }

    /// Mark the end of an auth operation, optionally recording a failure.
    pub(crate) fn finish(&self, error: Option<String>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_loading = false;
        state.error = error;
    }

    /// Clear the error without touching any other field.
    pub fn clear_error(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.error = None;
    }
}
