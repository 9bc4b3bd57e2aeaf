use serde::{Deserialize, Serialize};

/// One scraped product, finalized after the detail page has been parsed
/// and every absent field has been replaced by its zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unix timestamp (seconds) of collection.
    pub collected_at: i64,
    /// Vendor article code.
    pub sku: String,
    pub url: String,
    /// Display name, possibly suffixed with a volume taken from the breadcrumbs.
    pub title: String,
    /// Promotional labels in display order.
    pub marketing_tags: Vec<String>,
    /// Brand names joined with `;`, or empty.
    pub brand: String,
    /// Parent category followed by the filter labels, in order.
    pub breadcrumbs: Vec<String>,
    pub price: PriceInfo,
    pub stock: StockInfo,
    pub assets: AssetsInfo,
    /// Shape is chosen by the crawl target, not inferred from the payload.
    #[serde(skip_deserializing)]
    pub metadata: Metadata,
    pub variant_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub current: f64,
    /// Shelf price before the discount.
    pub original: f64,
    /// `"Скидка N%"` or empty.
    pub discount_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub in_stock: bool,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsInfo {
    pub main_image: String,
    pub gallery_images: Vec<String>,
    pub view360: Vec<String>,
    pub video: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metadata {
    Base(BaseMetadata),
    Extended(Box<ExtendedMetadata>),
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata::Base(BaseMetadata::default())
    }
}

impl Metadata {
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Metadata::Base(base) => &base.description,
            Metadata::Extended(extended) => &extended.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMetadata {
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedMetadata {
    pub description: String,
    pub vendor_code: i64,
    pub color: Vec<String>,
    pub volume: RangeFacet,
    pub weight: RangeFacet,
    pub country: Vec<String>,
    pub region: Vec<String>,
    pub strength: RangeFacet,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub manufacturer: Vec<String>,
    pub sugar: Vec<String>,
    pub serving_temperature: ServingTemperature,
    /// Grape or ingredient composition.
    pub blend: Vec<String>,
    pub exposure_time: Vec<String>,
    pub exposure_vessel: Vec<String>,
    pub filtration: Vec<String>,
    pub package_type: Vec<String>,
    pub gift_package: bool,
    /// Original (usually foreign-language) title.
    pub subname: String,
    pub stores: Vec<StoreAvailability>,
    pub gastronomics: Vec<String>,
}

/// Upstream expresses volume, weight and strength as ranges even when
/// `min == max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFacet {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServingTemperature {
    pub values: Vec<String>,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreAvailability {
    pub address: String,
    pub phone: String,
    pub opening_hours: String,
    pub longitude: f64,
    pub latitude: f64,
    pub price: f64,
    /// Free text as shown by the store, e.g. `"5 шт"`.
    pub quantity: String,
}
