//! Shopping cart module.
//!
//! Contains the cart value type, the locked per-session store, and the
//! registry that keeps one store per session.

mod cart;
mod registry;
mod store;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use registry::CartRegistry;
pub use store::{CartPersistence, CartStore, NoPersistence, SessionPersistence};
