//! Variant resolution: from chosen option values to a sellable variant.

use thiserror::Error;

use crate::catalog::{Product, ProductVariant, Selection};

/// Why a selection did not resolve to a variant.
///
/// None of these is a failure of the storefront. They tell the caller why the
/// add-to-bag action must stay disabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The shopper has not chosen a value for these axes yet.
    #[error("no value chosen for: {}", .0.join(", "))]
    MissingAxes(Vec<String>),

    /// The selection names an axis the product does not have.
    #[error("product has no option '{0}'")]
    UnknownAxis(String),

    /// The selection uses a value the axis does not allow.
    #[error("'{value}' is not a value of '{axis}'")]
    UnknownValue { axis: String, value: String },

    /// The combination is well-formed but no variant sells it.
    #[error("this combination is not sold")]
    NotSold,
}

/// Find the variant matching `selection`.
///
/// The selection must name exactly the product's axes. Variants are then
/// scanned in catalog order and the first one whose every (axis, value) pair is
/// chosen in `selection` wins. A partial selection or a combination nobody
/// sells yields `None`. If catalog data lists the same full combination twice,
/// the earlier variant is returned.
pub fn resolve<'p>(product: &'p Product, selection: &Selection) -> Option<&'p ProductVariant> {
    let names_every_axis = product.options.iter().all(|o| selection.get(&o.name).is_some());
    if !names_every_axis || selection.len() != product.options.len() {
        return None;
    }
    product
        .variants
        .iter()
        .find(|v| selection.covers(&v.selected_options))
}

/// Like [`resolve`], but explains a miss.
pub fn try_resolve<'p>(
    product: &'p Product,
    selection: &Selection,
) -> Result<&'p ProductVariant, ResolveError> {
    selection.validate_against(product)?;
    resolve(product, selection).ok_or(ResolveError::NotSold)
}

/// The resolved variant, only if it can be added to the bag right now.
pub fn purchasable<'p>(product: &'p Product, selection: &Selection) -> Option<&'p ProductVariant> {
    resolve(product, selection).filter(|v| v.available_for_sale)
}

/// Option values joined with " / ", e.g. "M / Ivory".
pub fn selection_label(variant: &ProductVariant) -> String {
    variant
        .selected_options
        .iter()
        .map(|o| o.value.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductOption, ProductVariant};
    use crate::money::{Currency, Money};

    fn silk_scarf() -> Product {
        let price = Money::new(4500, Currency::USD);
        let mut product = Product::new("p-scarf", "silk-scarf", "Silk Scarf");
        product.options = vec![ProductOption::new("Color", ["Red", "Blue"])];
        product.variants = vec![
            ProductVariant::new("v1", "Red", price).with_option("Color", "Red"),
            ProductVariant::new("v2", "Blue", price)
                .with_option("Color", "Blue")
                .sold_out(),
        ];
        product
    }

    fn trench() -> Product {
        let price = Money::new(189000, Currency::USD);
        let mut product = Product::new("p-trench", "trench-coat", "Trench Coat");
        product.options = vec![
            ProductOption::new("Size", ["S", "M", "L"]),
            ProductOption::new("Color", ["Honey", "Stone"]),
        ];
        // M / Stone is not sold.
        product.variants = vec![
            ProductVariant::new("t-s-honey", "S / Honey", price)
                .with_option("Size", "S")
                .with_option("Color", "Honey"),
            ProductVariant::new("t-m-honey", "M / Honey", price)
                .with_option("Size", "M")
                .with_option("Color", "Honey"),
            ProductVariant::new("t-l-stone", "L / Stone", price)
                .with_option("Size", "L")
                .with_option("Color", "Stone"),
        ];
        product
    }

    #[test]
    fn test_resolves_single_axis() {
        let scarf = silk_scarf();
        let variant = resolve(&scarf, &Selection::new().with("Color", "Red")).unwrap();
        assert_eq!(variant.id.as_str(), "v1");
    }

    #[test]
    fn test_unsold_value_resolves_to_none() {
        let scarf = silk_scarf();
        assert!(resolve(&scarf, &Selection::new().with("Color", "Green")).is_none());
    }

    #[test]
    fn test_complete_selection_resolves_exactly() {
        let trench = trench();
        for variant in &trench.variants {
            let selection = Selection::from(variant.selected_options.as_slice());
            assert_eq!(resolve(&trench, &selection).map(|v| &v.id), Some(&variant.id));
        }
    }

    #[test]
    fn test_partial_selection_resolves_to_none() {
        let trench = trench();
        assert!(resolve(&trench, &Selection::new().with("Size", "S")).is_none());
        assert!(resolve(&trench, &Selection::new()).is_none());
    }

    #[test]
    fn test_unsold_combination() {
        let trench = trench();
        let selection = Selection::new().with("Size", "M").with("Color", "Stone");
        assert!(resolve(&trench, &selection).is_none());
        assert_eq!(try_resolve(&trench, &selection), Err(ResolveError::NotSold));
    }

    #[test]
    fn test_first_declared_variant_wins_on_duplicates() {
        let mut trench = trench();
        let price = Money::new(1, Currency::USD);
        let duplicate = ProductVariant::new("t-s-honey-dup", "S / Honey", price)
            .with_option("Size", "S")
            .with_option("Color", "Honey");
        trench.variants.push(duplicate);

        let selection = Selection::new().with("Size", "S").with("Color", "Honey");
        assert_eq!(resolve(&trench, &selection).unwrap().id.as_str(), "t-s-honey");
    }

    #[test]
    fn test_extra_axis_does_not_resolve() {
        let scarf = silk_scarf();
        let selection = Selection::new().with("Color", "Red").with("Size", "One Size");
        assert!(resolve(&scarf, &selection).is_none());
        assert_eq!(
            try_resolve(&scarf, &selection),
            Err(ResolveError::UnknownAxis("Size".to_string()))
        );
    }

    #[test]
    fn test_try_resolve_explains_partial_selection() {
        let trench = trench();
        let result = try_resolve(&trench, &Selection::new().with("Color", "Honey"));
        assert_eq!(result, Err(ResolveError::MissingAxes(vec!["Size".to_string()])));
    }

    #[test]
    fn test_purchasable_respects_availability() {
        let scarf = silk_scarf();
        assert!(purchasable(&scarf, &Selection::new().with("Color", "Red")).is_some());
        // Blue resolves, but is sold out.
        let blue = Selection::new().with("Color", "Blue");
        assert!(resolve(&scarf, &blue).is_some());
        assert!(purchasable(&scarf, &blue).is_none());
    }

    #[test]
    fn test_product_without_axes_resolves_its_only_variant() {
        let mut tote = Product::new("p-tote", "leather-tote", "Leather Tote");
        let price = Money::new(120000, Currency::USD);
        tote.variants = vec![ProductVariant::new("tote", "Default Title", price)];
        assert_eq!(resolve(&tote, &Selection::new()).unwrap().id.as_str(), "tote");
    }

    #[test]
    fn test_selection_label() {
        let trench = trench();
        assert_eq!(selection_label(&trench.variants[2]), "L / Stone");
    }
}
