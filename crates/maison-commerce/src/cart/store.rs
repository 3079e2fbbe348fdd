//! The session's single source of truth for the shopping bag.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use maison_session::{Session, SessionId};

use crate::cart::{Cart, LineItem};
use crate::catalog::{Product, ProductVariant, VariantOption};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::Money;

/// Where a session's cart is kept between page views.
///
/// `save` runs after every successful mutation, while the store's lock is
/// held, so saves for one session are never reordered.
pub trait CartPersistence: Send + Sync {
    /// Load the cart saved for `session`, if any.
    fn load(&self, session: &SessionId) -> Result<Option<Cart>, CommerceError>;

    /// Save the cart for `session`.
    fn save(&self, session: &SessionId, cart: &Cart) -> Result<(), CommerceError>;

    /// Forget the cart for `session`.
    fn discard(&self, session: &SessionId) -> Result<(), CommerceError>;
}

/// Keeps nothing; the cart lives only as long as its [`CartStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl CartPersistence for NoPersistence {
    fn load(&self, _session: &SessionId) -> Result<Option<Cart>, CommerceError> {
        Ok(None)
    }

    fn save(&self, _session: &SessionId, _cart: &Cart) -> Result<(), CommerceError> {
        Ok(())
    }

    fn discard(&self, _session: &SessionId) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Persists carts as session state in a [`maison_session::MemoryStore`].
#[derive(Clone)]
pub struct SessionPersistence {
    sessions: Session<Cart>,
}

impl SessionPersistence {
    pub fn new(sessions: Session<Cart>) -> Self {
        Self { sessions }
    }
}

impl CartPersistence for SessionPersistence {
    fn load(&self, session: &SessionId) -> Result<Option<Cart>, CommerceError> {
        Ok(self.sessions.get(session)?)
    }

    fn save(&self, session: &SessionId, cart: &Cart) -> Result<(), CommerceError> {
        Ok(self.sessions.set(session, cart)?)
    }

    fn discard(&self, session: &SessionId) -> Result<(), CommerceError> {
        Ok(self.sessions.delete(session)?)
    }
}

/// One session's cart behind a mutex.
///
/// Every operation takes the lock for its whole read-modify-write, so two
/// rapid `add_item` calls for the same variant both land. A mutation is
/// applied to a copy and only committed once it succeeded and was persisted;
/// a failed call leaves the cart exactly as it was.
///
/// Once its session has ended the store is closed: every further mutation
/// fails with `SessionClosed` and nothing is persisted again.
pub struct CartStore {
    session: SessionId,
    state: Mutex<StoreState>,
    persistence: Arc<dyn CartPersistence>,
}

#[derive(Debug)]
struct StoreState {
    cart: Cart,
    closed: bool,
}

impl StoreState {
    fn open(cart: Cart) -> Self {
        Self {
            cart,
            closed: false,
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("session", &self.session)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// An empty, unpersisted cart.
    pub fn new(session: SessionId, config: &StorefrontConfig) -> Self {
        Self {
            session,
            state: Mutex::new(StoreState::open(Cart::with_config(config))),
            persistence: Arc::new(NoPersistence),
        }
    }

    /// Open the cart for `session`, restoring whatever `persistence` holds.
    ///
    /// Limits and currency always come from `config`, not from the saved cart.
    pub fn open(
        session: SessionId,
        config: &StorefrontConfig,
        persistence: Arc<dyn CartPersistence>,
    ) -> Result<Self, CommerceError> {
        let cart = match persistence.load(&session)? {
            Some(mut saved) => {
                tracing::info!(
                    session = %session,
                    lines = saved.unique_item_count(),
                    "restored session cart"
                );
                saved.currency = config.currency;
                saved.max_quantity_per_item = config.max_quantity_per_item;
                saved
            }
            None => Cart::with_config(config),
        };

        Ok(Self {
            session,
            state: Mutex::new(StoreState::open(cart)),
            persistence,
        })
    }

    /// The session this cart belongs to.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Add `quantity` of a variant; see [`Cart::add_item`].
    ///
    /// Returns the line's quantity after the add.
    pub fn add_item(
        &self,
        product: &Product,
        variant_id: VariantId,
        variant_title: impl Into<String>,
        price: Money,
        quantity: i64,
        selected_options: Vec<VariantOption>,
    ) -> Result<i64, CommerceError> {
        let variant_title = variant_title.into();
        let log_variant = variant_id.clone();
        let new_quantity = self.mutate(|cart| {
            cart.add_item(product, variant_id, variant_title, price, quantity, selected_options)
        })?;
        tracing::debug!(
            session = %self.session,
            variant = %log_variant,
            added = quantity,
            quantity = new_quantity,
            "added to bag"
        );
        Ok(new_quantity)
    }

    /// Add a resolved variant using its own title, price and options.
    pub fn add_variant(
        &self,
        product: &Product,
        variant: &ProductVariant,
        quantity: i64,
    ) -> Result<i64, CommerceError> {
        self.add_item(
            product,
            variant.id.clone(),
            variant.title.clone(),
            variant.price,
            quantity,
            variant.selected_options.clone(),
        )
    }

    /// Remove a line. Removing an absent variant is a no-op returning `false`.
    pub fn remove_item(&self, variant_id: &VariantId) -> Result<bool, CommerceError> {
        let mut guard = self.lock_open()?;
        if guard.cart.get_item(variant_id).is_none() {
            return Ok(false);
        }
        let mut next = guard.cart.clone();
        next.remove_item(variant_id);
        self.persistence.save(&self.session, &next)?;
        guard.cart = next;
        tracing::debug!(session = %self.session, variant = %variant_id, "removed from bag");
        Ok(true)
    }

    /// Replace a line's quantity; see [`Cart::set_quantity`].
    pub fn set_quantity(
        &self,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        let updated = self.mutate(|cart| cart.set_quantity(variant_id, quantity))?;
        if updated {
            tracing::debug!(
                session = %self.session,
                variant = %variant_id,
                quantity,
                "quantity set"
            );
        }
        Ok(updated)
    }

    /// Empty the cart.
    pub fn clear(&self) -> Result<(), CommerceError> {
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })?;
        tracing::debug!(session = %self.session, "bag cleared");
        Ok(())
    }

    /// Hand the lines to the external checkout and empty the cart in one step.
    pub fn checkout_handoff(&self) -> Result<Vec<LineItem>, CommerceError> {
        let lines = self.mutate(|cart| Ok(cart.take_items()))?;
        tracing::info!(session = %self.session, lines = lines.len(), "bag handed to checkout");
        Ok(lines)
    }

    /// A copy of the current lines in insertion order.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.lock().cart.items().to_vec()
    }

    /// A copy of the whole cart.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Sum of `price * quantity`; see [`Cart::total`].
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.lock().cart.total()
    }

    /// Total number of units in the bag.
    pub fn item_count(&self) -> i64 {
        self.lock().cart.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().cart.is_empty()
    }

    /// Whether the session behind this store has ended.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Close the store and forget any persisted copy of its cart.
    ///
    /// The flag is set under the store's lock before the discard, so a handle
    /// still held by a view can never write the cart back afterwards.
    pub(crate) fn close(&self) -> Result<(), CommerceError> {
        let mut guard = self.lock();
        guard.closed = true;
        self.persistence.discard(&self.session)
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Cart) -> Result<R, CommerceError>,
    ) -> Result<R, CommerceError> {
        let mut guard = self.lock_open()?;
        let mut next = guard.cart.clone();
        let result = f(&mut next)?;
        self.persistence.save(&self.session, &next)?;
        guard.cart = next;
        Ok(result)
    }

    fn lock_open(&self) -> Result<MutexGuard<'_, StoreState>, CommerceError> {
        let guard = self.lock();
        if guard.closed {
            return Err(CommerceError::SessionClosed(self.session.to_string()));
        }
        Ok(guard)
    }

    // A panic can only happen before a copy is committed, so the guarded cart
    // is always consistent and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
