//! Caller-chosen option values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ResolveError, VariantOption};

/// The value currently chosen for each axis.
///
/// A selection may be partial while the shopper is still choosing; only a
/// complete one can resolve to a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The detail page's initial state: the first value of every axis.
    pub fn default_for(product: &Product) -> Self {
        product
            .options
            .iter()
            .filter_map(|o| o.values.first().map(|v| (o.name.clone(), v.clone())))
            .collect()
    }

    /// Choose `value` for `axis`, replacing any earlier choice.
    pub fn with(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(axis, value);
        self
    }

    /// Choose `value` for `axis` in place.
    pub fn set(&mut self, axis: impl Into<String>, value: impl Into<String>) {
        self.0.insert(axis.into(), value.into());
    }

    /// The value chosen for `axis`.
    pub fn get(&self, axis: &str) -> Option<&str> {
        self.0.get(axis).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (axis, value) pairs in axis-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check that this selection names exactly the product's axes, each with an
    /// allowed value.
    pub fn validate_against(&self, product: &Product) -> Result<(), ResolveError> {
        if let Some((axis, _)) = self.iter().find(|(axis, _)| product.option(axis).is_none()) {
            return Err(ResolveError::UnknownAxis(axis.to_string()));
        }

        for (axis, value) in self.iter() {
            let allowed = product.option(axis).is_some_and(|o| o.allows(value));
            if !allowed {
                return Err(ResolveError::UnknownValue {
                    axis: axis.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let missing: Vec<String> = product
            .options
            .iter()
            .filter(|o| !self.0.contains_key(&o.name))
            .map(|o| o.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::MissingAxes(missing));
        }

        Ok(())
    }

    /// Whether every (axis, value) pair recorded on a variant is chosen here.
    pub(crate) fn covers(&self, options: &[VariantOption]) -> bool {
        options
            .iter()
            .all(|o| self.get(&o.name) == Some(o.value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Selection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&[VariantOption]> for Selection {
    fn from(options: &[VariantOption]) -> Self {
        options
            .iter()
            .map(|o| (o.name.clone(), o.value.clone()))
            .collect()
    }
}
