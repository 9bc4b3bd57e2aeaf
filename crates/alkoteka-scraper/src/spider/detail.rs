//! Field extraction from one product detail payload.

use alkoteka_core::MetadataShape;
use serde_json::{json, Map, Value};

use crate::error::LoaderError;
use crate::loader::{
    ItemLoader, ASSETS_LOADER, BASE_METADATA_LOADER, EXTENDED_METADATA_LOADER, PRICE_LOADER,
    STOCK_LOADER,
};
use crate::types::{DescriptionBlock, ProductDetail};

const BRAND_CODE: &str = "brend";
const DESCRIPTION_TITLE: &str = "описание";

/// How a description block feeds the metadata loader.
#[derive(Debug, Clone, Copy)]
enum Facet {
    /// The block's value names, as a list.
    Names(&'static str),
    /// `{min, max, unit}` taken from the block itself.
    Range(&'static str),
    /// `{values, unit}` with every value rendered as text.
    ServingTemperature,
    /// Presence alone sets the gift-package flag.
    GiftPackage,
}

/// Upstream tag code to metadata facet. Unlisted codes are ignored.
static FACETS: &[(&str, Facet)] = &[
    ("cvet", Facet::Names("color")),
    ("obem", Facet::Range("volume")),
    ("ves", Facet::Range("weight")),
    ("strana", Facet::Names("country")),
    ("region", Facet::Names("region")),
    ("krepost", Facet::Range("strength")),
    ("vid", Facet::Names("type")),
    ("proizvoditel", Facet::Names("manufacturer")),
    ("soderzanie-saxara", Facet::Names("sugar")),
    ("temperatura-podaci", Facet::ServingTemperature),
    ("sortovoi-sostav", Facet::Names("blend")),
    ("prodolzitelnost-vyderzki", Facet::Names("exposure_time")),
    ("emkost-vyderzki", Facet::Names("exposure_vessel")),
    ("filtration", Facet::Names("filtration")),
    ("vid-upakovki", Facet::Names("package_type")),
    ("podarocnaya-upakovka", Facet::GiftPackage),
];

fn facet_for(code: &str) -> Option<Facet> {
    let code = code.to_lowercase();
    FACETS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, facet)| *facet)
}

/// Completes `product` with everything the detail payload provides.
///
/// # Errors
///
/// Returns [`LoaderError`] if a value cannot be coerced to its field type.
pub(super) fn fill_product(
    product: &mut ItemLoader,
    detail: &ProductDetail,
    shape: MetadataShape,
) -> Result<(), LoaderError> {
    product.add_value("brand", brand(detail))?;
    product.add_value("breadcrumbs", breadcrumbs(detail))?;
    product.add_value("price", Value::Object(price_info(detail)?))?;
    product.add_value("stock", Value::Object(stock_info(detail)?))?;
    product.add_value("assets", Value::Object(assets_info(detail)?))?;
    product.add_value("metadata", Value::Object(metadata(detail, shape)?))?;
    product.add_value("variant_count", 0)?;
    Ok(())
}

/// Names of the first brand block, joined with `;`.
fn brand(detail: &ProductDetail) -> Value {
    detail
        .description_blocks
        .iter()
        .find(|block| block.code.to_lowercase() == BRAND_CODE)
        .map_or(Value::Null, |block| {
            let names: Vec<String> = block
                .values
                .iter()
                .filter_map(|v| text(&v.name))
                .collect();
            Value::String(names.join(";"))
        })
}

/// Parent category followed by the filter labels.
fn breadcrumbs(detail: &ProductDetail) -> Value {
    let parent = detail
        .category
        .as_ref()
        .and_then(|c| c.parent.as_ref())
        .and_then(|p| p.name.clone());
    let mut crumbs = vec![Value::from(parent)];
    crumbs.extend(
        detail
            .filter_labels
            .iter()
            .map(|label| Value::from(label.title.clone())),
    );
    Value::Array(crumbs)
}

/// `100 - floor(current * 100 / original)`, only when both prices are
/// present and non-zero.
#[must_use]
pub fn discount_percent(current: Option<f64>, original: Option<f64>) -> Option<i64> {
    match (current, original) {
        (Some(current), Some(original)) if current != 0.0 && original != 0.0 => {
            #[allow(clippy::cast_possible_truncation)]
            let floored = (current * 100.0 / original).floor() as i64;
            Some(100 - floored)
        }
        _ => None,
    }
}

/// The discount is derived from the coerced prices, so numeric strings
/// count as prices too.
fn price_info(detail: &ProductDetail) -> Result<Map<String, Value>, LoaderError> {
    let mut price = ItemLoader::new(&PRICE_LOADER);
    price.add_value("current", detail.price.clone())?;
    price.add_value("original", detail.prev_price.clone())?;

    let loaded = price.load_item();
    let discount = discount_percent(
        loaded.get("current").and_then(Value::as_f64),
        loaded.get("original").and_then(Value::as_f64),
    );
    price.add_value("discount_label", discount.map(|n| n.to_string()))?;
    Ok(price.load_item())
}

/// An unknown quantity leaves both fields to their defaults.
fn stock_info(detail: &ProductDetail) -> Result<Map<String, Value>, LoaderError> {
    let mut stock = ItemLoader::new(&STOCK_LOADER);
    stock.add_value("count", detail.quantity_total.clone())?;
    if let Some(count) = stock.load_item().get("count").and_then(Value::as_i64) {
        stock.add_value("in_stock", count != 0)?;
    }
    Ok(stock.load_item())
}

fn assets_info(detail: &ProductDetail) -> Result<Map<String, Value>, LoaderError> {
    let mut assets = ItemLoader::new(&ASSETS_LOADER);
    assets.add_value("main_image", detail.image_url.clone())?;
    Ok(assets.load_item())
}

fn description(detail: &ProductDetail) -> Value {
    detail
        .text_blocks
        .iter()
        .rev()
        .find(|block| block.title.to_lowercase() == DESCRIPTION_TITLE)
        .map_or(Value::Null, |block| Value::from(block.content.clone()))
}

fn metadata(detail: &ProductDetail, shape: MetadataShape) -> Result<Map<String, Value>, LoaderError> {
    match shape {
        MetadataShape::Base => {
            let mut metadata = ItemLoader::new(&BASE_METADATA_LOADER);
            metadata.add_value("description", description(detail))?;
            Ok(metadata.load_item())
        }
        MetadataShape::Extended => extended_metadata(detail),
    }
}

fn extended_metadata(detail: &ProductDetail) -> Result<Map<String, Value>, LoaderError> {
    let mut metadata = ItemLoader::new(&EXTENDED_METADATA_LOADER);
    metadata.add_value("description", description(detail))?;
    metadata.add_value("vendor_code", detail.vendor_code.clone())?;

    let mut gift_package = false;
    for block in &detail.description_blocks {
        match facet_for(&block.code) {
            Some(Facet::Names(field)) => metadata.add_value(field, names(block))?,
            Some(Facet::Range(field)) => metadata.add_value(field, range(block))?,
            Some(Facet::ServingTemperature) => {
                metadata.add_value("serving_temperature", serving_temperature(block))?;
            }
            Some(Facet::GiftPackage) => gift_package = true,
            None => {}
        }
    }
    metadata.add_value("gift_package", gift_package)?;
    metadata.add_value("subname", detail.subname.clone())?;

    let stores: Vec<Value> = detail
        .availability
        .stores
        .iter()
        .map(|store| {
            json!({
                "address": store.title,
                "phone": store.phone,
                "opening_hours": store.opening_hours,
                "longitude": store.longitude,
                "latitude": store.latitude,
                "price": store.price,
                "quantity": text(&store.quantity),
            })
        })
        .collect();
    metadata.add_value("stores", stores)?;
    metadata.add_value("gastronomics", gastronomics(&detail.gastronomics))?;

    Ok(metadata.load_item())
}

fn names(block: &DescriptionBlock) -> Value {
    Value::Array(
        block
            .values
            .iter()
            .filter_map(|v| text(&v.name))
            .map(Value::String)
            .collect(),
    )
}

fn range(block: &DescriptionBlock) -> Value {
    json!({ "min": block.min, "max": block.max, "unit": block.unit })
}

fn serving_temperature(block: &DescriptionBlock) -> Value {
    json!({ "values": names(block), "unit": block.unit })
}

/// Titles of every pairing, group by group.
fn gastronomics(raw: &Value) -> Value {
    let Value::Object(groups) = raw else {
        return Value::Array(Vec::new());
    };
    Value::Array(
        groups
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(|entry| entry.get("title").and_then(text))
            .map(Value::String)
            .collect(),
    )
}

/// Scalars rendered as text; `null` and collections yield nothing.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_from_both_prices() {
        assert_eq!(discount_percent(Some(90.0), Some(100.0)), Some(10));
        assert_eq!(discount_percent(Some(333.0), Some(999.0)), Some(67));
    }

    #[test]
    fn no_discount_without_both_prices() {
        assert_eq!(discount_percent(Some(0.0), Some(100.0)), None);
        assert_eq!(discount_percent(Some(90.0), Some(0.0)), None);
        assert_eq!(discount_percent(Some(90.0), None), None);
        assert_eq!(discount_percent(None, Some(100.0)), None);
    }

    #[test]
    fn facet_codes_match_case_insensitively() {
        assert!(matches!(facet_for("CVET"), Some(Facet::Names("color"))));
        assert!(matches!(facet_for("Obem"), Some(Facet::Range("volume"))));
        assert!(facet_for("brend").is_none());
        assert!(facet_for("unknown-code").is_none());
    }

    #[test]
    fn gastronomics_keeps_group_order() {
        let raw: Value = serde_json::from_str(
            r#"{"meat":[{"title":"Стейк"},{"title":"Шашлык"}],"cheese":[{"title":"Бри"}]}"#,
        )
        .unwrap();
        assert_eq!(gastronomics(&raw), json!(["Стейк", "Шашлык", "Бри"]));
    }

    #[test]
    fn gastronomics_as_empty_array_yields_nothing() {
        assert_eq!(gastronomics(&json!([])), json!([]));
    }

    #[test]
    fn text_renders_numbers() {
        assert_eq!(text(&json!(6)), Some("6".to_owned()));
        assert_eq!(text(&Value::Null), None);
    }
}
