//! Typed, versioned session state on top of [`MemoryStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{MemoryStore, SessionError};

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session data stored in the store.
///
/// Generic over the user data type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session data.
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// When the session was created (Unix timestamp).
    pub created_at: u64,
    /// When the session was last written (Unix timestamp).
    pub last_accessed: u64,
}

/// Session manager for one kind of per-session state.
///
/// Several managers can share one [`MemoryStore`]; each uses its own key
/// namespace so a bag and, say, recently viewed products never collide.
pub struct Session<T> {
    store: Arc<MemoryStore>,
    namespace: String,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            namespace: self.namespace.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Create a session manager with its own private store.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), namespace)
    }

    /// Create a session manager over a shared store.
    pub fn with_store(store: Arc<MemoryStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            _phantom: PhantomData,
        }
    }

    /// Get session data, or create a new session if it doesn't exist.
    pub fn get_or_create(&self, id: &SessionId) -> Result<T, SessionError> {
        let key = self.session_key(id);
        let session = self.store.modify(&key, |current: Option<SessionData<T>>| {
            current.unwrap_or_else(|| {
                let now = current_timestamp();
                SessionData {
                    id: id.clone(),
                    data: T::default(),
                    version: 1,
                    created_at: now,
                    last_accessed: now,
                }
            })
        })?;
        Ok(session.data)
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, SessionError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Get full session data including version.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, SessionError> {
        self.store.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Set session data (unconditional write).
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), SessionError> {
        self.update(id, |current| *current = data.clone()).map(|_| ())
    }

    /// Delete a session.
    pub fn delete(&self, id: &SessionId) -> Result<(), SessionError> {
        tracing::debug!(session = %id, namespace = %self.namespace, "session state discarded");
        self.store.delete(&self.session_key(id))
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &SessionId) -> Result<bool, SessionError> {
        self.store.exists(&self.session_key(id))
    }

    /// Update session data with a closure.
    ///
    /// The read, the closure and the write happen under the store's write lock,
    /// so two concurrent updates of the same session never lose each other's
    /// changes. A missing session starts from `T::default()`.
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut T),
    {
        let key = self.session_key(id);
        let session = self.store.modify(&key, |current: Option<SessionData<T>>| {
            let now = current_timestamp();
            let mut session = current.unwrap_or_else(|| SessionData {
                id: id.clone(),
                data: T::default(),
                version: 0,
                created_at: now,
                last_accessed: now,
            });
            f(&mut session.data);
            session.version += 1;
            session.last_accessed = now;
            session
        })?;
        Ok(session.data)
    }

    fn session_key(&self, id: &SessionId) -> String {
        format!("session:{}:{}", self.namespace, id)
    }
}

fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
