//! Product catalog module.
//!
//! Contains the product model supplied by the catalog provider, option
//! selections, and variant resolution.

mod product;
mod provider;
mod resolver;
mod selection;

pub use product::{Product, ProductImage, ProductOption, ProductVariant, VariantOption};
pub use provider::{CatalogProvider, InMemoryCatalog, ListingQuery};
pub use resolver::{purchasable, resolve, selection_label, try_resolve, ResolveError};
pub use selection::Selection;
