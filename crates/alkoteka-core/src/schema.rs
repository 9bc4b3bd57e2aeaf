//! Schema-driven normalization and validation of raw product mappings.
//!
//! Loaders hand over a `serde_json` object in which any field may be
//! missing or `null`. Validation runs in three steps:
//!
//! 1. [`fill_defaults`] substitutes the zero value of each declared field's
//!    kind for a missing or `null` value. The substitution looks only at the
//!    declared [`FieldKind`], never at the field name.
//! 2. Every field is type-checked (with the few lossless coercions upstream
//!    data needs, such as `3.0` for an integer) and its [`Constraint`] is
//!    enforced.
//! 3. The checked mapping is deserialized into [`ProductRecord`], with the
//!    metadata shape chosen by the caller through [`MetadataShape`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::record::{Metadata, ProductRecord};

/// Primitive kind of a declared field; drives zero-value substitution.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Int,
    Float,
    Str,
    Bool,
    /// List of strings.
    List,
    /// Free-form mapping whose contents are not declared.
    Map,
    /// Nested record with its own declared fields.
    Record(&'static Schema),
    /// List whose items are records of the given schema.
    ListOf(&'static Schema),
}

/// Extra rule a field value must satisfy after type checking.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    None,
    NonNegative,
    /// String must satisfy the predicate; the `&str` describes it in errors.
    Matches(fn(&str) -> bool, &'static str),
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub constraint: Constraint,
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

/// Which metadata record the crawl target produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataShape {
    Base,
    #[default]
    Extended,
}

impl MetadataShape {
    #[must_use]
    pub fn schema(self) -> &'static Schema {
        match self {
            MetadataShape::Base => &BASE_METADATA,
            MetadataShape::Extended => &EXTENDED_METADATA,
        }
    }
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef {
        name,
        kind,
        constraint: Constraint::None,
    }
}

const fn constrained(name: &'static str, kind: FieldKind, constraint: Constraint) -> FieldDef {
    FieldDef {
        name,
        kind,
        constraint,
    }
}

static DISCOUNT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Скидка [0-9]{1,2}%)?$").expect("valid discount label regex")
});

fn is_discount_label(s: &str) -> bool {
    DISCOUNT_LABEL.is_match(s)
}

pub static PRICE: Schema = Schema {
    name: "price",
    fields: &[
        constrained("current", FieldKind::Float, Constraint::NonNegative),
        constrained("original", FieldKind::Float, Constraint::NonNegative),
        constrained(
            "discount_label",
            FieldKind::Str,
            Constraint::Matches(is_discount_label, "\"Скидка N%\" (N of 1-2 digits) or empty"),
        ),
    ],
};

pub static STOCK: Schema = Schema {
    name: "stock",
    fields: &[
        field("in_stock", FieldKind::Bool),
        constrained("count", FieldKind::Int, Constraint::NonNegative),
    ],
};

pub static ASSETS: Schema = Schema {
    name: "assets",
    fields: &[
        field("main_image", FieldKind::Str),
        field("gallery_images", FieldKind::List),
        field("view360", FieldKind::List),
        field("video", FieldKind::List),
    ],
};

pub static RANGE: Schema = Schema {
    name: "range",
    fields: &[
        field("min", FieldKind::Float),
        field("max", FieldKind::Float),
        field("unit", FieldKind::Str),
    ],
};

pub static SERVING_TEMPERATURE: Schema = Schema {
    name: "serving_temperature",
    fields: &[
        field("values", FieldKind::List),
        field("unit", FieldKind::Str),
    ],
};

pub static STORE: Schema = Schema {
    name: "store",
    fields: &[
        field("address", FieldKind::Str),
        field("phone", FieldKind::Str),
        field("opening_hours", FieldKind::Str),
        field("longitude", FieldKind::Float),
        field("latitude", FieldKind::Float),
        field("price", FieldKind::Float),
        field("quantity", FieldKind::Str),
    ],
};

pub static BASE_METADATA: Schema = Schema {
    name: "metadata",
    fields: &[field("description", FieldKind::Str)],
};

pub static EXTENDED_METADATA: Schema = Schema {
    name: "metadata",
    fields: &[
        field("description", FieldKind::Str),
        field("vendor_code", FieldKind::Int),
        field("color", FieldKind::List),
        field("volume", FieldKind::Record(&RANGE)),
        field("weight", FieldKind::Record(&RANGE)),
        field("country", FieldKind::List),
        field("region", FieldKind::List),
        field("strength", FieldKind::Record(&RANGE)),
        field("type", FieldKind::List),
        field("manufacturer", FieldKind::List),
        field("sugar", FieldKind::List),
        field("serving_temperature", FieldKind::Record(&SERVING_TEMPERATURE)),
        field("blend", FieldKind::List),
        field("exposure_time", FieldKind::List),
        field("exposure_vessel", FieldKind::List),
        field("filtration", FieldKind::List),
        field("package_type", FieldKind::List),
        field("gift_package", FieldKind::Bool),
        field("subname", FieldKind::Str),
        field("stores", FieldKind::ListOf(&STORE)),
        field("gastronomics", FieldKind::List),
    ],
};

/// Root record. `metadata` is declared as a plain mapping here and checked
/// against the schema of the caller's [`MetadataShape`].
pub static PRODUCT: Schema = Schema {
    name: "product",
    fields: &[
        field("collected_at", FieldKind::Int),
        field("sku", FieldKind::Str),
        field("url", FieldKind::Str),
        field("title", FieldKind::Str),
        field("marketing_tags", FieldKind::List),
        field("brand", FieldKind::Str),
        field("breadcrumbs", FieldKind::List),
        field("price", FieldKind::Record(&PRICE)),
        field("stock", FieldKind::Record(&STOCK)),
        field("assets", FieldKind::Record(&ASSETS)),
        field("metadata", FieldKind::Map),
        constrained("variant_count", FieldKind::Int, Constraint::NonNegative),
    ],
};

/// The zero value of a field kind. Nested records start out as an empty
/// mapping; [`fill_defaults`] then populates their own fields.
#[must_use]
pub fn zero_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Int => Value::from(0),
        FieldKind::Float => Value::from(0.0),
        FieldKind::Str => Value::String(String::new()),
        FieldKind::Bool => Value::Bool(false),
        FieldKind::List | FieldKind::ListOf(_) => Value::Array(Vec::new()),
        FieldKind::Map | FieldKind::Record(_) => Value::Object(Map::new()),
    }
}

/// Replaces every missing or `null` declared field with its zero value,
/// recursing into nested records and record lists.
pub fn fill_defaults(map: &mut Map<String, Value>, schema: &Schema) {
    for def in schema.fields {
        let slot = map
            .entry(def.name.to_string())
            .or_insert(Value::Null);
        if slot.is_null() {
            *slot = zero_value(def.kind);
        }

        match (def.kind, slot) {
            (FieldKind::Record(nested), Value::Object(inner)) => fill_defaults(inner, nested),
            (FieldKind::ListOf(nested), Value::Array(items)) => {
                for item in items {
                    if item.is_null() {
                        *item = Value::Object(Map::new());
                    }
                    if let Value::Object(inner) = item {
                        fill_defaults(inner, nested);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Normalizes and validates a raw product mapping into a [`ProductRecord`].
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first offending field path.
pub fn validate_record(
    mut raw: Map<String, Value>,
    shape: MetadataShape,
) -> Result<ProductRecord, ValidationError> {
    fill_defaults(&mut raw, &PRODUCT);
    check_fields(&mut raw, &PRODUCT, "")?;

    let mut metadata_map = match raw.remove("metadata") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    fill_defaults(&mut metadata_map, shape.schema());
    check_fields(&mut metadata_map, shape.schema(), "metadata")?;

    let metadata = match shape {
        MetadataShape::Base => Metadata::Base(
            serde_json::from_value(Value::Object(metadata_map))
                .map_err(|e| ValidationError::new("metadata", e.to_string()))?,
        ),
        MetadataShape::Extended => Metadata::Extended(Box::new(
            serde_json::from_value(Value::Object(metadata_map))
                .map_err(|e| ValidationError::new("metadata", e.to_string()))?,
        )),
    };

    let mut record: ProductRecord = serde_json::from_value(Value::Object(raw))
        .map_err(|e| ValidationError::new("product", e.to_string()))?;
    record.metadata = metadata;

    if record.stock.in_stock != (record.stock.count != 0) {
        return Err(ValidationError::new(
            "stock.in_stock",
            "true exactly when stock.count is non-zero",
        ));
    }

    Ok(record)
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    map: &mut Map<String, Value>,
    schema: &Schema,
    prefix: &str,
) -> Result<(), ValidationError> {
    for def in schema.fields {
        let path = join_path(prefix, def.name);
        let Some(value) = map.get_mut(def.name) else {
            return Err(ValidationError::new(path, "a value"));
        };
        check_kind(value, def.kind, &path)?;
        check_constraint(value, def.constraint, &path)?;
    }
    Ok(())
}

fn check_kind(value: &mut Value, kind: FieldKind, path: &str) -> Result<(), ValidationError> {
    match kind {
        FieldKind::Int => {
            if value.is_i64() || value.is_u64() {
                return Ok(());
            }
            let coerced = match value {
                #[allow(clippy::cast_possible_truncation)]
                Value::Number(n) => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match coerced {
                Some(i) => {
                    *value = Value::from(i);
                    Ok(())
                }
                None => Err(ValidationError::new(path, "an integer")),
            }
        }
        FieldKind::Float => {
            if value.is_number() {
                return Ok(());
            }
            let coerced = value
                .as_str()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .and_then(serde_json::Number::from_f64);
            match coerced {
                Some(n) => {
                    *value = Value::Number(n);
                    Ok(())
                }
                None => Err(ValidationError::new(path, "a number")),
            }
        }
        FieldKind::Str => expect(value.is_string(), path, "a string"),
        FieldKind::Bool => expect(value.is_boolean(), path, "a boolean"),
        FieldKind::List => match value {
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    expect(item.is_string(), &format!("{path}[{idx}]"), "a string")?;
                }
                Ok(())
            }
            _ => Err(ValidationError::new(path, "a list")),
        },
        FieldKind::Map => expect(value.is_object(), path, "a mapping"),
        FieldKind::Record(nested) => match value {
            Value::Object(inner) => check_fields(inner, nested, path),
            _ => Err(ValidationError::new(path, format!("a {} record", nested.name))),
        },
        FieldKind::ListOf(nested) => match value {
            Value::Array(items) => {
                for (idx, item) in items.iter_mut().enumerate() {
                    let item_path = format!("{path}[{idx}]");
                    match item {
                        Value::Object(inner) => check_fields(inner, nested, &item_path)?,
                        _ => {
                            return Err(ValidationError::new(
                                item_path,
                                format!("a {} record", nested.name),
                            ))
                        }
                    }
                }
                Ok(())
            }
            _ => Err(ValidationError::new(path, "a list")),
        },
    }
}

fn check_constraint(
    value: &Value,
    constraint: Constraint,
    path: &str,
) -> Result<(), ValidationError> {
    match constraint {
        Constraint::None => Ok(()),
        Constraint::NonNegative => {
            let ok = value.as_f64().is_some_and(|n| n >= 0.0);
            expect(ok, path, "a value >= 0")
        }
        Constraint::Matches(predicate, description) => {
            let ok = value.as_str().is_some_and(predicate);
            expect(ok, path, description)
        }
    }
}

fn expect(ok: bool, path: &str, expected: &str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(path, expected))
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
