//! Product and variant types.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// A product as supplied by the catalog provider.
///
/// The core never mutates a product; it only reads axes and variants from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// URL handle used by the detail page.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain-text description.
    #[serde(default)]
    pub description: String,
    /// Images in display order.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Option axes in display order.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Sellable variants in catalog order.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Create a product with no images, axes or variants.
    pub fn new(
        id: impl Into<ProductId>,
        handle: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            title: title.into(),
            description: String::new(),
            images: Vec::new(),
            options: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Look up an axis by name.
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The variant offered by quick-add buttons on listing cards.
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// The lowest variant price, shown as the listing price.
    ///
    /// Only variants priced in the first variant's currency are compared.
    pub fn min_price(&self) -> Option<Money> {
        let currency = self.variants.first()?.price.currency;
        self.variants
            .iter()
            .map(|v| v.price)
            .filter(|p| p.currency == currency)
            .min_by_key(|p| p.amount_cents)
    }

    /// Alt text for the image at `index`, falling back to the product title.
    pub fn image_alt(&self, index: usize) -> Option<&str> {
        self.images
            .get(index)
            .map(|img| img.alt_text.as_deref().unwrap_or(&self.title))
    }

    /// Check that every variant assigns exactly one allowed value to every
    /// declared axis and to nothing else.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut seen_axes = HashSet::new();
        for option in &self.options {
            if !seen_axes.insert(option.name.as_str()) {
                return Err(self.invalid(format!("axis '{}' declared twice", option.name)));
            }
        }

        for variant in &self.variants {
            if variant.id.is_blank() {
                return Err(self.invalid("variant with empty id".to_string()));
            }

            let mut assigned = HashSet::new();
            for pair in &variant.selected_options {
                let axis = self.option(&pair.name).ok_or_else(|| {
                    self.invalid(format!(
                        "variant {} uses undeclared axis '{}'",
                        variant.id, pair.name
                    ))
                })?;
                if !axis.allows(&pair.value) {
                    return Err(self.invalid(format!(
                        "variant {} uses '{}' which is not a value of '{}'",
                        variant.id, pair.value, pair.name
                    )));
                }
                if !assigned.insert(pair.name.as_str()) {
                    return Err(self.invalid(format!(
                        "variant {} assigns axis '{}' twice",
                        variant.id, pair.name
                    )));
                }
            }

            if let Some(missing) = self
                .options
                .iter()
                .find(|o| !assigned.contains(o.name.as_str()))
            {
                return Err(self.invalid(format!(
                    "variant {} has no value for axis '{}'",
                    variant.id, missing.name
                )));
            }
        }

        Ok(())
    }

    /// Groups of variant IDs that share an identical full option combination.
    ///
    /// Resolution picks the first variant of each group in catalog order.
    pub fn duplicate_combinations(&self) -> Vec<Vec<VariantId>> {
        let mut groups: BTreeMap<BTreeMap<&str, &str>, Vec<VariantId>> = BTreeMap::new();
        let mut order = Vec::new();
        for variant in &self.variants {
            let key: BTreeMap<&str, &str> = variant
                .selected_options
                .iter()
                .map(|o| (o.name.as_str(), o.value.as_str()))
                .collect();
            let ids = groups.entry(key.clone()).or_default();
            if ids.is_empty() {
                order.push(key);
            }
            ids.push(variant.id.clone());
        }

        order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .filter(|ids| ids.len() > 1)
            .collect()
    }

    fn invalid(&self, reason: String) -> CommerceError {
        CommerceError::InvalidCatalog(format!("{}: {}", self.handle, reason))
    }
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl ProductImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: None,
        }
    }
}

/// An option axis such as Size or Color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    /// Axis name (e.g., "Size").
    pub name: String,
    /// Allowed values in display order.
    pub values: Vec<String>,
}

impl ProductOption {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether `value` is one of this axis's allowed values.
    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A sellable combination of one value per axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Display title (e.g., "M / Ivory").
    pub title: String,
    /// Unit price.
    pub price: Money,
    /// Whether the platform currently sells this variant.
    pub available_for_sale: bool,
    /// The (axis, value) pairs that define this variant.
    pub selected_options: Vec<VariantOption>,
}

impl ProductVariant {
    /// Create an available variant with no options.
    pub fn new(id: impl Into<VariantId>, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            available_for_sale: true,
            selected_options: Vec::new(),
        }
    }

    /// Add an option to this variant.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.selected_options.push(VariantOption::new(name, value));
        self
    }

    /// Mark the variant as sold out.
    pub fn sold_out(mut self) -> Self {
        self.available_for_sale = false;
        self
    }
}

/// A variant option (e.g., Size: Large).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Option value (e.g., "Large", "Blue").
    pub value: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
