//! Per-session cart stores.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use maison_session::SessionId;

use crate::cart::{CartPersistence, CartStore, NoPersistence};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;

/// Hands out one [`CartStore`] per browsing session.
///
/// Stores are created on first use and never shared between sessions. Views
/// receive the `Arc<CartStore>` for their own session and nothing else.
pub struct CartRegistry {
    config: StorefrontConfig,
    persistence: Arc<dyn CartPersistence>,
    stores: Mutex<HashMap<SessionId, Arc<CartStore>>>,
}

impl CartRegistry {
    /// A registry whose carts disappear with the process.
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_persistence(config, Arc::new(NoPersistence))
    }

    /// A registry that restores and saves carts through `persistence`.
    pub fn with_persistence(
        config: StorefrontConfig,
        persistence: Arc<dyn CartPersistence>,
    ) -> Self {
        Self {
            config,
            persistence,
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// The storefront settings carts are created with.
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// The cart for `session`, opening it on first use.
    pub fn store_for(&self, session: &SessionId) -> Result<Arc<CartStore>, CommerceError> {
        let mut stores = self.lock();
        if let Some(store) = stores.get(session) {
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(CartStore::open(
            session.clone(),
            &self.config,
            Arc::clone(&self.persistence),
        )?);
        stores.insert(session.clone(), Arc::clone(&store));
        tracing::info!(session = %session, "opened session cart");
        Ok(store)
    }

    /// End a session: close its store and drop any persisted cart.
    ///
    /// Views still holding the old store get `SessionClosed` on their next
    /// mutation; the next `store_for` opens a fresh, empty cart.
    ///
    /// Returns whether the session had an open store.
    pub fn end_session(&self, session: &SessionId) -> Result<bool, CommerceError> {
        let removed = self.lock().remove(session);
        match &removed {
            Some(store) => store.close()?,
            None => self.persistence.discard(session)?,
        }
        tracing::info!(session = %session, "session cart discarded");
        Ok(removed.is_some())
    }

    /// Number of sessions with an open cart.
    pub fn active_sessions(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<CartStore>>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
