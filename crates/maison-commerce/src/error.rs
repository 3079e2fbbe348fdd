//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog and cart operations.
///
/// An unresolvable option selection is deliberately absent: it is a normal
/// outcome, reported through [`crate::catalog::ResolveError`] instead.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Catalog data violates the product/variant invariants.
    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    /// A line item needs a variant identifier.
    #[error("Variant identifier must not be empty")]
    EmptyVariantId,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Currency code the storefront cannot price in.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Monetary amount that could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// The session owning the cart has ended.
    #[error("Session has ended: {0}")]
    SessionClosed(String),

    /// Session persistence failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<maison_session::SessionError> for CommerceError {
    fn from(e: maison_session::SessionError) -> Self {
        CommerceError::Persistence(e.to_string())
    }
}
