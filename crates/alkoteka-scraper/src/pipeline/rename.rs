use alkoteka_core::{RenameMap, RenameRule};
use serde_json::{Map, Value};

/// Applies `rules` to a finalized record. Renamed keys keep their position.
///
/// A top-level rule renames the field itself; a nested rule renames keys one
/// level down inside that field when it is a mapping. Rules naming absent
/// fields are ignored.
#[must_use]
pub fn rename_fields(record: Value, rules: &RenameMap) -> Value {
    let Value::Object(mut map) = record else {
        return record;
    };

    for (field, rule) in rules {
        match rule {
            RenameRule::Field(new_name) => {
                if map.contains_key(field.as_str()) {
                    map = rename_key(map, field, new_name);
                    tracing::debug!(from = %field, to = %new_name, "renamed field");
                }
            }
            RenameRule::Nested(nested_rules) => {
                let Some(Value::Object(nested)) = map.get_mut(field.as_str()) else {
                    continue;
                };
                for (old_name, new_name) in nested_rules {
                    if nested.contains_key(old_name.as_str()) {
                        *nested = rename_key(std::mem::take(nested), old_name, new_name);
                        tracing::debug!(
                            field = %field,
                            from = %old_name,
                            to = %new_name,
                            "renamed nested field"
                        );
                    }
                }
            }
        }
    }

    Value::Object(map)
}

/// An existing `to` entry is replaced by the renamed value.
fn rename_key(map: Map<String, Value>, from: &str, to: &str) -> Map<String, Value> {
    if from == to {
        return map;
    }
    map.into_iter()
        .filter(|(key, _)| key != to)
        .map(|(key, value)| {
            if key == from {
                (to.to_owned(), value)
            } else {
                (key, value)
            }
        })
        .collect()
}
