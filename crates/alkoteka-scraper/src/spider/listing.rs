use serde_json::Value;

use crate::error::LoaderError;
use crate::loader::{ItemLoader, PRODUCT_LOADER};
use crate::types::ProductSummary;

/// Starts a product record from its listing card.
///
/// # Errors
///
/// Returns [`LoaderError`] if a card field cannot be coerced.
pub(super) fn partial_product(
    summary: &ProductSummary,
    collected_at: i64,
) -> Result<ItemLoader, LoaderError> {
    let mut loader = ItemLoader::new(&PRODUCT_LOADER);
    loader.add_value("collected_at", collected_at)?;
    loader.add_value("sku", summary.vendor_code.clone())?;
    loader.add_value("url", summary.product_url.as_str())?;
    loader.add_value("title", summary.name.clone())?;
    loader.add_value(
        "marketing_tags",
        summary
            .action_labels
            .iter()
            .map(|label| Value::from(label.title.clone()))
            .collect::<Vec<_>>(),
    )?;
    Ok(loader)
}

/// Last non-empty path segment of a storefront product URL.
pub(super) fn product_slug(product_url: &str) -> Option<&str> {
    let path = product_url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}
