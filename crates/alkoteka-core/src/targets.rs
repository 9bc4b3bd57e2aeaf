use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::schema::MetadataShape;
use crate::ConfigError;

/// One rename rule: either a new name for a top-level field, or a map of
/// renames applied one level down inside that field.
///
/// Only these two levels exist; a deeper rule fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RenameRule {
    Field(String),
    Nested(IndexMap<String, String>),
}

/// Field renames keyed by top-level field name, applied in file order.
pub type RenameMap = IndexMap<String, RenameRule>;

/// Raw parameter block for one crawl target as written in the targets file.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub city_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_city_name")]
    pub default_city_name: String,
    #[serde(default)]
    pub referer_url: String,
    #[serde(default)]
    pub metadata: MetadataShape,
    #[serde(default)]
    pub rename: RenameMap,
}

fn default_per_page() -> u32 {
    20
}

fn default_city_name() -> String {
    "Краснодар".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    pub targets: BTreeMap<String, TargetConfig>,
}

/// A crawl target whose required endpoints are known to be set.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub name: String,
    pub city_url: String,
    pub product_url: String,
    pub per_page: u32,
    pub default_city_name: String,
    /// Site root used to build `Referer` headers, without a trailing slash.
    pub referer_url: String,
    pub metadata: MetadataShape,
    pub rename: RenameMap,
}

impl TargetsFile {
    /// Resolve the named target, checking that both endpoints are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTarget`] if no block exists for `name`,
    /// [`ConfigError::MissingEndpoint`] if `city_url` or `product_url` is
    /// unset or blank, and [`ConfigError::Validation`] for a zero page size.
    pub fn target(&self, name: &str) -> Result<CrawlTarget, ConfigError> {
        let config = self
            .targets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTarget(name.to_string()))?;

        let required = |value: &Option<String>, field: &'static str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MissingEndpoint {
                    target: name.to_string(),
                    field,
                })
        };

        let city_url = required(&config.city_url, "city_url")?;
        let product_url = required(&config.product_url, "product_url")?;

        if config.per_page == 0 {
            return Err(ConfigError::Validation(format!(
                "crawl target '{name}' has per_page 0; must be at least 1"
            )));
        }

        Ok(CrawlTarget {
            name: name.to_string(),
            city_url,
            product_url: product_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            default_city_name: config.default_city_name.clone(),
            referer_url: config.referer_url.trim_end_matches('/').to_string(),
            metadata: config.metadata,
            rename: config.rename.clone(),
        })
    }

    /// Names of all configured targets, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}

/// Load the crawl-target file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed (including a
/// rename rule nested more than two levels deep).
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content)
}

fn parse_targets(content: &str) -> Result<TargetsFile, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
targets:
  products_by_category:
    per_page: 20
    default_city_name: Краснодар
    city_url: https://alkoteka.com/web-api/v1/city?city_uuid=396df2b5-7b2b-11eb-80cd-00155d039009
    product_url: https://alkoteka.com/web-api/v1/product
    referer_url: https://alkoteka.com/
    rename:
      metadata:
        description: __description
      sku: RPC
";

    #[test]
    fn parses_sample_file() {
        let file = parse_targets(SAMPLE).unwrap();
        let target = file.target("products_by_category").unwrap();
        assert_eq!(target.per_page, 20);
        assert_eq!(target.default_city_name, "Краснодар");
        assert_eq!(target.product_url, "https://alkoteka.com/web-api/v1/product");
        assert_eq!(target.referer_url, "https://alkoteka.com");
        assert_eq!(target.metadata, MetadataShape::Extended);
        assert_eq!(
            target.rename.get("sku"),
            Some(&RenameRule::Field("RPC".to_string()))
        );
        let nested = match target.rename.get("metadata") {
            Some(RenameRule::Nested(map)) => map,
            other => panic!("expected nested rule, got {other:?}"),
        };
        assert_eq!(nested.get("description").map(String::as_str), Some("__description"));
    }

    #[test]
    fn rename_rules_keep_file_order() {
        let yaml = r"
targets:
  ordered:
    city_url: https://example.com/city
    product_url: https://example.com/product
    rename:
      title: name
      sku: title
      metadata:
        vendor_code: code
        description: __description
";
        let target = parse_targets(yaml).unwrap().target("ordered").unwrap();
        let fields: Vec<&str> = target.rename.keys().map(String::as_str).collect();
        assert_eq!(fields, ["title", "sku", "metadata"]);
        let nested = match target.rename.get("metadata") {
            Some(RenameRule::Nested(map)) => map,
            other => panic!("expected nested rule, got {other:?}"),
        };
        let keys: Vec<&str> = nested.keys().map(String::as_str).collect();
        assert_eq!(keys, ["vendor_code", "description"]);
    }

    #[test]
    fn defaults_fill_optional_parameters() {
        let yaml = r"
targets:
  minimal:
    city_url: https://example.com/city
    product_url: https://example.com/product
";
        let target = parse_targets(yaml).unwrap().target("minimal").unwrap();
        assert_eq!(target.per_page, 20);
        assert_eq!(target.default_city_name, "Краснодар");
        assert!(target.rename.is_empty());
        assert_eq!(target.referer_url, "");
    }

    #[test]
    fn base_metadata_shape_is_selectable() {
        let yaml = r"
targets:
  plain:
    city_url: https://example.com/city
    product_url: https://example.com/product
    metadata: base
";
        let target = parse_targets(yaml).unwrap().target("plain").unwrap();
        assert_eq!(target.metadata, MetadataShape::Base);
    }

    #[test]
    fn missing_product_url_is_reported() {
        let yaml = r"
targets:
  broken:
    city_url: https://example.com/city
";
        let err = parse_targets(yaml).unwrap().target("broken").unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEndpoint { field: "product_url", .. }),
            "expected MissingEndpoint(product_url), got: {err:?}"
        );
    }

    #[test]
    fn blank_city_url_is_reported() {
        let yaml = r"
targets:
  broken:
    city_url: '  '
    product_url: https://example.com/product
";
        let err = parse_targets(yaml).unwrap().target("broken").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEndpoint {
                field: "city_url",
                ..
            }
        ));
    }

    #[test]
    fn unknown_target_is_reported() {
        let err = parse_targets(SAMPLE).unwrap().target("nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget(ref n) if n == "nope"));
    }

    #[test]
    fn zero_per_page_is_rejected() {
        let yaml = r"
targets:
  t:
    city_url: https://example.com/city
    product_url: https://example.com/product
    per_page: 0
";
        let err = parse_targets(yaml).unwrap().target("t").unwrap_err();
        assert!(err.to_string().contains("per_page 0"));
    }

    #[test]
    fn rename_rules_deeper_than_two_levels_are_rejected() {
        let yaml = r"
targets:
  t:
    city_url: https://example.com/city
    product_url: https://example.com/product
    rename:
      metadata:
        stores:
          address: street
";
        let result = parse_targets(yaml);
        assert!(
            matches!(result, Err(ConfigError::TargetsFileParse(_))),
            "expected TargetsFileParse, got: {result:?}"
        );
    }

    #[test]
    fn load_targets_reports_missing_file() {
        let err = load_targets(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TargetsFileIo { .. }));
    }

    #[test]
    fn names_lists_targets() {
        let file = parse_targets(SAMPLE).unwrap();
        assert_eq!(file.names().collect::<Vec<_>>(), ["products_by_category"]);
    }
}
