//! Cart and line item types.

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, VariantOption};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::{Currency, Money};

/// Default maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

fn default_max_quantity() -> i64 {
    MAX_QUANTITY_PER_ITEM
}

/// A shopping bag: line items in the order they were first added, at most one
/// per variant.
///
/// Every stored quantity is at least 1. `Cart` is a plain value; sharing and
/// locking are the job of [`crate::cart::CartStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Items in the cart.
    items: Vec<LineItem>,
    /// Currency reported for the total of an empty cart.
    pub currency: Currency,
    /// Largest quantity one line may reach.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: i64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            max_quantity_per_item: MAX_QUANTITY_PER_ITEM,
        }
    }

    /// Create an empty cart using storefront settings.
    pub fn with_config(config: &StorefrontConfig) -> Self {
        Self {
            items: Vec::new(),
            currency: config.currency,
            max_quantity_per_item: config.max_quantity_per_item,
        }
    }

    /// Add `quantity` of a variant.
    ///
    /// If the variant is already in the cart its quantity grows by `quantity`
    /// and the line keeps its position; otherwise a new line is appended.
    /// Availability is not checked here.
    ///
    /// Returns an error if:
    /// - `variant_id` is empty
    /// - `quantity` is not positive
    /// - the line would exceed the per-item limit
    pub fn add_item(
        &mut self,
        product: &Product,
        variant_id: VariantId,
        variant_title: impl Into<String>,
        price: Money,
        quantity: i64,
        selected_options: Vec<VariantOption>,
    ) -> Result<i64, CommerceError> {
        if variant_id.is_blank() {
            return Err(CommerceError::EmptyVariantId);
        }
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.variant_id == variant_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > self.max_quantity_per_item {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    self.max_quantity_per_item,
                ));
            }
            existing.quantity = new_quantity;
            return Ok(new_quantity);
        }

        if quantity > self.max_quantity_per_item {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                self.max_quantity_per_item,
            ));
        }

        self.items.push(LineItem {
            product_id: product.id.clone(),
            product_handle: product.handle.clone(),
            product_title: product.title.clone(),
            variant_id,
            variant_title: variant_title.into(),
            price,
            quantity,
            selected_options,
        });
        Ok(quantity)
    }

    /// Replace a line's quantity in place.
    ///
    /// Quantities below 1 are rejected rather than treated as removal. Returns
    /// `Ok(false)` if the variant is not in the cart.
    pub fn set_quantity(
        &mut self,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > self.max_quantity_per_item {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                self.max_quantity_per_item,
            ));
        }

        match self.items.iter_mut().find(|i| &i.variant_id == variant_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove_item(&mut self, variant_id: &VariantId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.variant_id != variant_id);
        self.items.len() < len_before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove and return every line.
    pub fn take_items(&mut self) -> Vec<LineItem> {
        std::mem::take(&mut self.items)
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get a line by variant ID.
    pub fn get_item(&self, variant_id: &VariantId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.variant_id == variant_id)
    }

    /// Total item count (sum of quantities), as shown on the bag badge.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// An empty cart totals zero in [`Cart::currency`]. Lines priced in
    /// different currencies cannot be summed and yield `CurrencyMismatch`.
    pub fn total(&self) -> Result<Money, CommerceError> {
        let Some(first) = self.items.first() else {
            return Ok(Money::zero(self.currency));
        };
        let currency = first.price.currency;

        if let Some(other) = self.items.iter().find(|i| i.price.currency != currency) {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: other.price.currency.code().to_string(),
            });
        }

        let line_totals = self
            .items
            .iter()
            .map(LineItem::total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(line_totals.iter(), currency).ok_or(CommerceError::Overflow)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

/// One line of the cart: a resolved variant and how many of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product the variant belongs to.
    pub product_id: ProductId,
    /// Product URL handle (for linking back to the detail page).
    pub product_handle: String,
    /// Product title (denormalized for display).
    pub product_title: String,
    /// Variant being purchased.
    pub variant_id: VariantId,
    /// Variant title (e.g., "M / Ivory").
    pub variant_title: String,
    /// Unit price.
    pub price: Money,
    /// Quantity, always at least 1.
    pub quantity: i64,
    /// The option values that produced this variant.
    pub selected_options: Vec<VariantOption>,
}

impl LineItem {
    /// `price * quantity`.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn scarf() -> Product {
        Product::new("p-scarf", "silk-scarf", "Silk Scarf")
    }

    fn red() -> Vec<VariantOption> {
        vec![VariantOption::new("Color", "Red")]
    }

    fn add(
        cart: &mut Cart,
        variant: &str,
        quantity: i64,
        price: Money,
    ) -> Result<i64, CommerceError> {
        cart.add_item(&scarf(), VariantId::new(variant), variant, price, quantity, red())
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.total().unwrap(), Money::zero(Currency::USD));
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 2, usd(4500)).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);

        let line = cart.get_item(&VariantId::new("v1")).unwrap();
        assert_eq!(line.product_title, "Silk Scarf");
        assert_eq!(line.selected_options, red());
    }

    #[test]
    fn test_add_same_item_accumulates_quantity() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(4500)).unwrap();
        let quantity = add(&mut cart, "v1", 2, usd(4500)).unwrap();

        assert_eq!(quantity, 3);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.total().unwrap(), usd(13500));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(100)).unwrap();
        add(&mut cart, "v2", 1, usd(100)).unwrap();
        add(&mut cart, "v1", 1, usd(100)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2"]);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::default();
        assert!(matches!(
            add(&mut cart, "v1", 0, usd(100)),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            add(&mut cart, "v1", -3, usd(100)),
            Err(CommerceError::InvalidQuantity(-3))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_variant_id() {
        let mut cart = Cart::default();
        let result = cart.add_item(&scarf(), VariantId::new(""), "", usd(100), 1, Vec::new());
        assert!(matches!(result, Err(CommerceError::EmptyVariantId)));
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::default();
        let result = add(&mut cart, "v1", MAX_QUANTITY_PER_ITEM + 1, usd(100));
        assert!(matches!(result, Err(CommerceError::QuantityExceedsLimit(_, _))));

        add(&mut cart, "v1", MAX_QUANTITY_PER_ITEM, usd(100)).unwrap();
        assert!(add(&mut cart, "v1", 1, usd(100)).is_err());
        assert_eq!(cart.item_count(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(100)).unwrap();
        add(&mut cart, "v2", 1, usd(100)).unwrap();

        assert!(cart.set_quantity(&VariantId::new("v1"), 5).unwrap());
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].variant_id.as_str(), "v1");

        assert!(!cart.set_quantity(&VariantId::new("missing"), 5).unwrap());
    }

    #[test]
    fn test_set_quantity_below_one_is_rejected() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 2, usd(100)).unwrap();

        let result = cart.set_quantity(&VariantId::new("v1"), 0);
        assert!(matches!(result, Err(CommerceError::InvalidQuantity(0))));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(100)).unwrap();

        assert!(!cart.remove_item(&VariantId::new("missing")));
        assert_eq!(cart.unique_item_count(), 1);

        assert!(cart.remove_item(&VariantId::new("v1")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 2, usd(1000)).unwrap();
        add(&mut cart, "v2", 1, usd(2000)).unwrap();

        assert_eq!(cart.total().unwrap(), usd(4000));
    }

    #[test]
    fn test_mixed_currency_total_is_rejected() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(1000)).unwrap();
        add(&mut cart, "v2", 1, Money::new(1000, Currency::EUR)).unwrap();

        match cart.total() {
            Err(CommerceError::CurrencyMismatch { expected, got }) => {
                assert_eq!(expected, "USD");
                assert_eq!(got, "EUR");
            }
            other => panic!("expected currency mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_total_uses_line_currency() {
        let mut cart = Cart::new(Currency::USD);
        add(&mut cart, "v1", 2, Money::new(500, Currency::GBP)).unwrap();
        assert_eq!(cart.total().unwrap(), Money::new(1000, Currency::GBP));
    }

    #[test]
    fn test_take_items() {
        let mut cart = Cart::default();
        add(&mut cart, "v1", 1, usd(100)).unwrap();

        let taken = cart.take_items();
        assert_eq!(taken.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_config_limit() {
        let config = StorefrontConfig {
            max_quantity_per_item: 3,
            ..StorefrontConfig::default()
        };
        let mut cart = Cart::with_config(&config);
        add(&mut cart, "v1", 3, usd(100)).unwrap();
        assert!(matches!(
            cart.set_quantity(&VariantId::new("v1"), 4),
            Err(CommerceError::QuantityExceedsLimit(4, 3))
        ));
    }
}
