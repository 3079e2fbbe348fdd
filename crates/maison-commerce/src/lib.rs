//! Catalog, variant resolution and session-scoped shopping bag for the Maison
//! storefront.
//!
//! - **Catalog**: products, option axes and variants as supplied by the
//!   commerce platform, plus the [`catalog::CatalogProvider`] seam
//! - **Resolution**: from the shopper's chosen option values to the one
//!   sellable variant, or none
//! - **Cart**: a bag of line items keyed by variant, one locked store per
//!   browsing session
//!
//! # Example
//!
//! ```rust,ignore
//! use maison_commerce::prelude::*;
//!
//! let registry = CartRegistry::new(StorefrontConfig::default());
//! let bag = registry.store_for(&SessionId::generate())?;
//!
//! let product = catalog.product_by_handle("silk-scarf")?.ok_or(...)?;
//! let selection = Selection::default_for(&product).with("Color", "Red");
//!
//! if let Some(variant) = purchasable(&product, &selection) {
//!     bag.add_variant(&product, variant, 1)?;
//! }
//!
//! println!("Total: {}", bag.total()?.display_with_code());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod config;

pub use error::CommerceError;
pub use ids::*;
pub use maison_session::SessionId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use maison_session::SessionId;

    // Catalog
    pub use crate::catalog::{
        purchasable, resolve, selection_label, try_resolve, CatalogProvider, InMemoryCatalog,
        ListingQuery, Product, ProductImage, ProductOption, ProductVariant, ResolveError,
        Selection, VariantOption,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartPersistence, CartRegistry, CartStore, LineItem, NoPersistence,
        SessionPersistence,
    };

    pub use crate::config::{ConfigError, StorefrontConfig};
}
