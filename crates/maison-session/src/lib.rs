//! Session identifiers and session-scoped state storage for the Maison storefront.
//!
//! State that must live for exactly one browsing session (the shopping bag, for
//! instance) is kept in a [`MemoryStore`] and accessed through a typed
//! [`Session`] manager that serializes values as JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use maison_session::{MemoryStore, Session, SessionId};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Deserialize, Default, Clone)]
//! struct Bag {
//!     lines: Vec<String>,
//! }
//!
//! let store = Arc::new(MemoryStore::new());
//! let sessions = Session::<Bag>::with_store(store, "bag");
//!
//! let id = SessionId::generate();
//! sessions.update(&id, |bag| bag.lines.push("silk-scarf-red".to_string()))?;
//!
//! let bag = sessions.get(&id)?;
//! sessions.delete(&id)?;
//! ```

mod error;
mod kv;
mod session;

pub use error::SessionError;
pub use kv::MemoryStore;
pub use session::{Session, SessionData, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{MemoryStore, Session, SessionData, SessionError, SessionId};
}
