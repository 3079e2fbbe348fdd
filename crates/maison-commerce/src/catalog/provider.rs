//! The seam between the core and whatever supplies catalog data.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::config::StorefrontConfig;
use crate::error::CommerceError;

/// A listing request: how many products, optionally narrowed by free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Maximum number of products to return.
    pub limit: usize,
    /// Free-text filter applied by the provider.
    #[serde(default)]
    pub filter: Option<String>,
}

impl ListingQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            filter: None,
        }
    }

    /// The shop page's listing size.
    pub fn shop(config: &StorefrontConfig) -> Self {
        Self::new(config.listing_page_size)
    }

    /// The home page's featured grid.
    pub fn featured(config: &StorefrontConfig) -> Self {
        Self::new(config.featured_page_size)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Source of product data.
///
/// Implementations own transport, retries and caching; the core only reads
/// what they return.
pub trait CatalogProvider {
    /// List products for a listing page.
    fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, CommerceError>;

    /// Fetch one product by its URL handle.
    fn product_by_handle(&self, handle: &str) -> Result<Option<Product>, CommerceError>;
}

/// A provider over a fixed list of products.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product after checking its variant invariants.
    pub fn insert(&mut self, product: Product) -> Result<(), CommerceError> {
        if let Err(e) = product.validate() {
            tracing::warn!(
                product = %product.handle,
                error = %e,
                "rejected invalid catalog product"
            );
            return Err(e);
        }
        for group in product.duplicate_combinations() {
            let ids: Vec<&str> = group.iter().map(|id| id.as_str()).collect();
            tracing::warn!(
                product = %product.handle,
                variants = ?ids,
                "variants share an option combination; the first one will be sold"
            );
        }
        self.products.retain(|p| p.handle != product.handle);
        self.products.push(product);
        Ok(())
    }

    /// Build a catalog from products, rejecting the first invalid one.
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CommerceError> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn list_products(&self, query: &ListingQuery) -> Result<Vec<Product>, CommerceError> {
        let needle = query
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .products
            .iter()
            .filter(|p| match &needle {
                Some(needle) => {
                    p.title.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                }
                None => true,
            })
            .take(query.limit)
            .cloned()
            .collect())
    }

    fn product_by_handle(&self, handle: &str) -> Result<Option<Product>, CommerceError> {
        Ok(self.products.iter().find(|p| p.handle == handle).cloned())
    }
}
