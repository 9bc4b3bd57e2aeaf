//! Collector-style field loaders.
//!
//! An [`ItemLoader`] accumulates raw values per field and reduces them to
//! one output mapping. Each field declares
//!
//! - an [`Input`] coercion applied to every added value, and
//! - an [`Output`] reducer applied once in [`ItemLoader::load_item`].
//!
//! Adding a list adds each of its elements; `null` elements are dropped.
//! A field that never received a value is absent from the output and gets
//! its zero value later, during schema validation.

mod entities;

pub use entities::{
    ASSETS_LOADER, BASE_METADATA_LOADER, EXTENDED_METADATA_LOADER, PRICE_LOADER, PRODUCT_LOADER,
    STOCK_LOADER,
};

use serde_json::{Map, Number, Value};

use crate::error::LoaderError;

/// Coercion applied to each value as it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Identity,
    /// Trim surrounding whitespace; only strings are accepted.
    Strip,
    /// Render scalars as text (`12345` becomes `"12345"`).
    Text,
    Float,
    /// Integer; floats are truncated toward zero.
    Int,
    /// Truthiness: zero, empty strings and empty collections are `false`.
    Bool,
}

/// How the collected values of a field reduce to the output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// The first value that is neither `null` nor an empty string.
    TakeFirst,
    /// All values, in the order they were added.
    Collect,
}

#[derive(Debug)]
pub struct LoaderField {
    pub name: &'static str,
    pub input: Input,
    pub output: Output,
}

/// Declared fields of one entity loader, in output order.
#[derive(Debug)]
pub struct LoaderSpec {
    pub name: &'static str,
    pub fields: &'static [LoaderField],
}

pub(crate) const fn take_first(name: &'static str, input: Input) -> LoaderField {
    LoaderField {
        name,
        input,
        output: Output::TakeFirst,
    }
}

pub(crate) const fn collect(name: &'static str, input: Input) -> LoaderField {
    LoaderField {
        name,
        input,
        output: Output::Collect,
    }
}

/// Accumulates values for the fields of one [`LoaderSpec`].
#[derive(Debug, Clone)]
pub struct ItemLoader {
    spec: &'static LoaderSpec,
    values: Vec<Vec<Value>>,
}

impl ItemLoader {
    #[must_use]
    pub fn new(spec: &'static LoaderSpec) -> Self {
        Self {
            spec,
            values: vec![Vec::new(); spec.fields.len()],
        }
    }

    /// Adds `value` to `field` after applying the field's input coercion.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnknownField`] if the loader does not declare
    /// `field`, and [`LoaderError::Coercion`] if a value cannot be coerced.
    /// On error nothing is added.
    pub fn add_value(&mut self, field: &str, value: impl Into<Value>) -> Result<(), LoaderError> {
        let index = self
            .spec
            .fields
            .iter()
            .position(|f| f.name == field)
            .ok_or_else(|| LoaderError::UnknownField {
                loader: self.spec.name,
                field: field.to_owned(),
            })?;
        let def = &self.spec.fields[index];

        let raw = match value.into() {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };

        let mut processed = Vec::with_capacity(raw.len());
        for item in raw.into_iter().filter(|v| !v.is_null()) {
            processed.push(coerce(def, item)?);
        }

        self.values[index].extend(processed);
        Ok(())
    }

    /// Reduces the collected values into a mapping in declaration order.
    #[must_use]
    pub fn load_item(&self) -> Map<String, Value> {
        let mut item = Map::new();
        for (def, values) in self.spec.fields.iter().zip(&self.values) {
            if values.is_empty() {
                continue;
            }
            let reduced = match def.output {
                Output::TakeFirst => values
                    .iter()
                    .find(|v| !v.is_null() && v.as_str() != Some(""))
                    .cloned(),
                Output::Collect => Some(Value::Array(values.clone())),
            };
            if let Some(value) = reduced {
                item.insert(def.name.to_owned(), value);
            }
        }
        item
    }
}

fn coerce(def: &LoaderField, value: Value) -> Result<Value, LoaderError> {
    let fail = |target: &'static str, value: &Value| LoaderError::Coercion {
        field: def.name,
        target,
        value: value.to_string(),
    };

    match def.input {
        Input::Identity => Ok(value),
        Input::Strip => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_owned())),
            other => Err(fail("trimmed text", &other)),
        },
        Input::Text => match value {
            Value::String(s) => Ok(Value::String(s)),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(fail("text", &other)),
        },
        Input::Float => {
            let parsed = match &value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| fail("float", &value))
        }
        Input::Int => {
            #[allow(clippy::cast_possible_truncation)]
            let parsed = match &value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                Value::Bool(b) => Some(i64::from(*b)),
                _ => None,
            };
            parsed.map(Value::from).ok_or_else(|| fail("integer", &value))
        }
        Input::Bool => Ok(Value::Bool(truthy(&value))),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
#[path = "../loader_test.rs"]
mod tests;
