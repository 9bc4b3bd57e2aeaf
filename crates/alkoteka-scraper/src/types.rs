//! Response types for the catalog's `web-api/v1` endpoints.
//!
//! ## Observed shape
//!
//! ### Nulls
//! The API sends explicit `null` for absent data far more often than it
//! omits keys: `subname`, `prev_price`, `text_blocks`, `gastronomics` and
//! the `category.parent` chain are all observed as `null`. Every collection
//! field therefore goes through [`null_as_default`], and scalar fields are
//! modelled as `Option`.
//!
//! ### `vendor_code`
//! An integer in every observed response. It is kept as a raw
//! [`serde_json::Value`] so the loaders decide how to coerce it (text for the
//! product SKU, integer for the metadata facet).
//!
//! ### `gastronomics`
//! A mapping from pairing group name to a list of `{ "title": ... }` entries
//! when present, but an empty JSON array (`[]`) when the product has none.
//! It is kept as a raw value; only objects are walked.
//!
//! ### Description block values
//! `values[].name` is usually a string, but numeric for some facets
//! (serving temperature is sent as `[6, 8]`). Names are kept raw and
//! stringified at extraction time.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::pagination::PageMeta;

/// Deserializes `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of `GET /city`.
#[derive(Debug, Deserialize)]
pub struct CityPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<City>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct City {
    pub name: String,
    pub uuid: String,
}

/// One page of `GET /product?root_category_slug=...`.
#[derive(Debug, Deserialize)]
pub struct ProductListPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ProductSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PageMeta,
}

/// Product card as shown in a category listing.
#[derive(Debug, Deserialize)]
pub struct ProductSummary {
    #[serde(default)]
    pub vendor_code: Value,

    /// Absolute storefront URL, e.g.
    /// `"https://alkoteka.com/product/vodka/vodka-x_12345"`. The last path
    /// segment is the product slug used by the detail endpoint.
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_url: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Promotional badges in display order (`"СКИДКА"`, `"НОВИНКА"`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_labels: Vec<ActionLabel>,
}

#[derive(Debug, Deserialize)]
pub struct ActionLabel {
    #[serde(default)]
    pub title: Option<String>,
}

/// `GET /product/{slug}` wraps the product in `results`.
#[derive(Debug, Deserialize)]
pub struct ProductDetailEnvelope {
    pub results: ProductDetail,
}

#[derive(Debug, Deserialize)]
pub struct ProductDetail {
    #[serde(default)]
    pub vendor_code: Value,

    #[serde(default)]
    pub category: Option<Category>,

    /// Oval filter badges shown under the breadcrumbs, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_labels: Vec<FilterLabel>,

    /// Tagged attribute blocks. `code` selects the facet.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_blocks: Vec<DescriptionBlock>,

    /// Current (online) price in roubles. Numbers sometimes arrive as
    /// strings, so the numeric fields stay raw until the loaders coerce them.
    #[serde(default)]
    pub price: Value,

    /// Shelf price before the discount. `null` when the product is not on sale.
    #[serde(default)]
    pub prev_price: Value,

    /// Units available across all stores of the selected city.
    #[serde(default)]
    pub quantity_total: Value,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub text_blocks: Vec<TextBlock>,

    /// Original-language name for imported products.
    #[serde(default)]
    pub subname: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub availability: Availability,

    #[serde(default)]
    pub gastronomics: Value,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub parent: Option<ParentCategory>,
}

#[derive(Debug, Deserialize)]
pub struct ParentCategory {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterLabel {
    #[serde(default)]
    pub title: Option<String>,
}

/// A tagged attribute block. Either `values` (list facets) or
/// `min`/`max`/`unit` (range facets) is populated, depending on `code`.
#[derive(Debug, Deserialize)]
pub struct DescriptionBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<BlockValue>,
    #[serde(default)]
    pub min: Value,
    #[serde(default)]
    pub max: Value,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockValue {
    #[serde(default)]
    pub name: Value,
}

#[derive(Debug, Deserialize)]
pub struct TextBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Availability {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stores: Vec<Store>,
}

/// One row of the "available in stores" table.
#[derive(Debug, Deserialize)]
pub struct Store {
    /// Street address; the API calls it `title`.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub longitude: Value,
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub price: Value,
    /// Shelf quantity, sent either as text (`"5 шт"`) or a number.
    #[serde(default)]
    pub quantity: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_page_tolerates_null_meta() {
        let page: CityPage = serde_json::from_str(
            r#"{"results":[{"name":"Москва","uuid":"u-1"}],"meta":null}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(!page.meta.has_more_pages);
    }

    #[test]
    fn detail_with_nulls_deserializes() {
        let json = r#"{
            "results": {
                "vendor_code": 12345,
                "category": {"parent": null},
                "filter_labels": null,
                "description_blocks": [{"code": "obem", "min": 0.5, "max": 0.5, "unit": "л"}],
                "price": 90,
                "prev_price": null,
                "quantity_total": 4,
                "image_url": "https://alkoteka.com/img/x.png",
                "text_blocks": null,
                "subname": null,
                "availability": {"stores": [{"title": "ул. Красная, 1", "quantity": 3}]},
                "gastronomics": []
            }
        }"#;
        let detail = serde_json::from_str::<ProductDetailEnvelope>(json)
            .unwrap()
            .results;
        assert_eq!(detail.price, Value::from(90));
        assert!(detail.prev_price.is_null());
        assert!(detail.filter_labels.is_empty());
        assert!(detail.text_blocks.is_empty());
        assert_eq!(detail.description_blocks[0].code, "obem");
        assert!(detail.description_blocks[0].values.is_empty());
        assert_eq!(detail.availability.stores.len(), 1);
        assert!(detail.gastronomics.is_array());
    }

    #[test]
    fn summary_defaults_missing_fields() {
        let summary: ProductSummary = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert!(summary.vendor_code.is_null());
        assert_eq!(summary.product_url, "");
        assert!(summary.action_labels.is_empty());
    }
}
