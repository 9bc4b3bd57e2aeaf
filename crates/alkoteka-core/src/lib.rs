pub mod app_config;
pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod seeds;
pub mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ValidationError};
pub use record::{
    AssetsInfo, BaseMetadata, ExtendedMetadata, Metadata, PriceInfo, ProductRecord, RangeFacet,
    ServingTemperature, StockInfo, StoreAvailability,
};
pub use schema::{validate_record, MetadataShape};
pub use seeds::{category_slug, load_seed_urls};
pub use targets::{load_targets, CrawlTarget, RenameMap, RenameRule, TargetConfig, TargetsFile};
