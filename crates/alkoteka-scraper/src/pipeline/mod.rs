//! Post-processing applied to every loaded product, in order:
//! formatting, schema validation, field renaming.
//!
//! Renaming runs last so validation always sees canonical field names.

mod format;
mod rename;

pub use format::format_fields;
pub use rename::rename_fields;

use alkoteka_core::{validate_record, CrawlTarget, MetadataShape, RenameMap};
use serde_json::{Map, Value};

use crate::error::PipelineError;

#[derive(Debug, Clone)]
pub struct Pipeline {
    shape: MetadataShape,
    rename: RenameMap,
}

impl Pipeline {
    #[must_use]
    pub fn new(shape: MetadataShape, rename: RenameMap) -> Self {
        Self { shape, rename }
    }

    #[must_use]
    pub fn for_target(target: &CrawlTarget) -> Self {
        Self::new(target.metadata, target.rename.clone())
    }

    /// Formats, validates and renames one loaded product.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] with the offending field path if
    /// the record does not satisfy the schema.
    pub fn process(&self, mut item: Map<String, Value>) -> Result<Value, PipelineError> {
        format_fields(&mut item);

        let record = validate_record(item, self.shape)?;
        tracing::debug!(sku = %record.sku, "record passed validation");

        let value = serde_json::to_value(&record)?;
        Ok(rename_fields(value, &self.rename))
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use alkoteka_core::RenameRule;
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn formats_then_validates_then_renames() {
        let mut rename = IndexMap::new();
        rename.insert(
            "metadata".to_owned(),
            RenameRule::Nested(IndexMap::from([(
                "description".to_owned(),
                "__description".to_owned(),
            )])),
        );
        let pipeline = Pipeline::new(MetadataShape::Extended, rename);

        let out = pipeline
            .process(raw(json!({
                "sku": "12345",
                "title": "Vodka X",
                "breadcrumbs": ["Крепкий алкоголь", "0.5 л"],
                "price": { "current": 90.0, "original": 100.0, "discount_label": "10" },
                "stock": { "in_stock": true, "count": 3 },
                "metadata": { "description": "Мягкий" }
            })))
            .unwrap();

        assert_eq!(out["title"], json!("Vodka X, 0.5 л"));
        assert_eq!(out["price"]["discount_label"], json!("Скидка 10%"));
        assert_eq!(out["metadata"]["__description"], json!("Мягкий"));
        assert!(out["metadata"].get("description").is_none());
        assert_eq!(out["metadata"]["gift_package"], json!(false));
        assert_eq!(out["variant_count"], json!(0));
    }

    #[test]
    fn empty_item_yields_all_zero_values() {
        let pipeline = Pipeline::new(MetadataShape::Base, IndexMap::new());
        let out = pipeline.process(Map::new()).unwrap();
        assert_eq!(out["sku"], json!(""));
        assert_eq!(out["marketing_tags"], json!([]));
        assert_eq!(out["price"]["current"], json!(0.0));
        assert_eq!(out["stock"]["in_stock"], json!(false));
        assert_eq!(out["metadata"], json!({ "description": "" }));
    }

    #[test]
    fn validation_failure_carries_field_path() {
        let pipeline = Pipeline::new(MetadataShape::Extended, IndexMap::new());
        let err = pipeline
            .process(raw(json!({ "stock": { "in_stock": true, "count": 0 } })))
            .unwrap_err();
        match err {
            PipelineError::Validation(e) => assert_eq!(e.path, "stock.in_stock"),
            PipelineError::Serialize(e) => panic!("unexpected serialize error: {e}"),
        }
    }
}
