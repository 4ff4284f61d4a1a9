//! Session
//!
//! Holds the bearer token for the current user. The dispatcher reads it
//! on every request and clears it when the server answers 401; login,
//! registration and logout are the only other writers.
//!
//! ```text
//! ANONYMOUS --(login ok)--> AUTHENTICATED --(logout | 401)--> ANONYMOUS
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        token: String,
        /// Display only, never sent to the server
        username: Option<String>,
    },
}

/// Why a session was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Logout,
    Unauthorized,
}

/// Session transitions, for hosts that react to them (navigation, UI)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Authenticated,
    Cleared { reason: ClearReason },
}

/// What a [`SessionStore`] persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Persistence for the session between process runs
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Keeps nothing beyond the process lifetime
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Option<StoredSession>>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.inner.read().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.inner.write().map_err(|_| SessionError::Poisoned)? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.inner.write().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

/// JSON file holding the token and display name
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io { path: self.path.clone(), error: e }),
        };

        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                error: e.to_string(),
            })?;

        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Io { path: parent.to_path_buf(), error: e })?;
        }
        let content = serde_json::to_string_pretty(session).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })?;
        std::fs::write(&self.path, content)
            .map_err(|e| SessionError::Io { path: self.path.clone(), error: e })
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io { path: self.path.clone(), error: e }),
        }
    }
}

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Session file {path:?} is not valid: {error}")]
    Corrupt { path: PathBuf, error: String },

    #[error("Session lock poisoned")]
    Poisoned,
}

struct Inner {
    state: RwLock<SessionState>,
    store: Box<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Session {
    /// Anonymous session that is never persisted
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::default(), SessionState::Anonymous)
    }

    /// Restore the session from `store`.
    ///
    /// An unreadable store yields an anonymous session.
    pub fn load(store: impl SessionStore + 'static) -> Self {
        let state = match store.load() {
            Ok(Some(stored)) => SessionState::Authenticated {
                token: stored.token,
                username: stored.username,
            },
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session store");
                SessionState::Anonymous
            }
        };
        Self::with_store(store, state)
    }

    fn with_store(store: impl SessionStore + 'static, state: SessionState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                store: Box::new(store),
                events,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.read() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            SessionState::Anonymous => None,
        }
    }

    pub fn username(&self) -> Option<String> {
        match &*self.read() {
            SessionState::Authenticated { username, .. } => username.clone(),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read(), SessionState::Authenticated { .. })
    }

    /// ANONYMOUS -> AUTHENTICATED. Replaces any previous token and forgets
    /// the display name that went with it.
    pub fn establish(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        *self.write() = SessionState::Authenticated {
            token: token.clone(),
            username: None,
        };
        let stored = StoredSession { token, username: None };

        tracing::debug!("Session established");
        let _ = self.inner.events.send(SessionEvent::Authenticated);
        self.inner.store.save(&stored)
    }

    /// Attach a display name to an authenticated session. No-op when anonymous.
    pub fn set_username(&self, name: impl Into<String>) -> Result<(), SessionError> {
        let stored = {
            let mut state = self.write();
            match &mut *state {
                SessionState::Authenticated { token, username } => {
                    *username = Some(name.into());
                    StoredSession { token: token.clone(), username: username.clone() }
                }
                SessionState::Anonymous => return Ok(()),
            }
        };
        self.inner.store.save(&stored)
    }

    /// Any state -> ANONYMOUS, unconditionally.
    ///
    /// The in-memory token is gone even if the store fails to forget it.
    pub fn clear(&self, reason: ClearReason) {
        *self.write() = SessionState::Anonymous;

        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }

        tracing::debug!(?reason, "Session cleared");
        let _ = self.inner.events.send(SessionEvent::Cleared { reason });
    }

    /// Stream of session transitions
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }
}
