use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// A volume in litres: `0.5 л`, `0,75Л`, `1л`.
static VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d[.,]\d{1,2}\s*[лЛ]|\d[лЛ]").expect("valid volume regex")
});

/// Display adjustments applied before validation.
///
/// - A title without a volume gets the first volume found in the
///   breadcrumbs appended as `", {volume}"`.
/// - A bare numeric discount (`"10"`) becomes `"Скидка 10%"`.
pub fn format_fields(item: &mut Map<String, Value>) {
    append_volume_to_title(item);
    format_discount_label(item);
}

fn append_volume_to_title(item: &mut Map<String, Value>) {
    let Some(title) = item.get("title").and_then(Value::as_str) else {
        return;
    };
    if VOLUME.is_match(title) {
        return;
    }

    let joined = item
        .get("breadcrumbs")
        .and_then(Value::as_array)
        .map(|crumbs| {
            crumbs
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(";")
        })
        .unwrap_or_default();

    if let Some(volume) = VOLUME.find(&joined) {
        let titled = format!("{title}, {}", volume.as_str());
        item.insert("title".to_owned(), Value::String(titled));
    }
}

fn format_discount_label(item: &mut Map<String, Value>) {
    let Some(label) = item
        .get_mut("price")
        .and_then(Value::as_object_mut)
        .and_then(|price| price.get_mut("discount_label"))
    else {
        return;
    };

    let Some(percent) = label
        .as_str()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_owned)
    else {
        return;
    };
    *label = Value::String(format!("Скидка {percent}%"));
}
