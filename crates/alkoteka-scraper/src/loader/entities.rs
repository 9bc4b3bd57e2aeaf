//! Loader declarations for the product record and its nested entities.
//!
//! Field names match the record schema in `alkoteka_core::schema`.

use super::{collect, take_first, Input, LoaderSpec};

pub static PRODUCT_LOADER: LoaderSpec = LoaderSpec {
    name: "product",
    fields: &[
        take_first("collected_at", Input::Int),
        take_first("sku", Input::Text),
        take_first("url", Input::Strip),
        take_first("title", Input::Strip),
        collect("marketing_tags", Input::Identity),
        take_first("brand", Input::Strip),
        collect("breadcrumbs", Input::Identity),
        take_first("price", Input::Identity),
        take_first("stock", Input::Identity),
        take_first("assets", Input::Identity),
        take_first("metadata", Input::Identity),
        take_first("variant_count", Input::Int),
    ],
};

/// `discount_label` receives the bare percentage; the formatting pass turns
/// it into the display label.
pub static PRICE_LOADER: LoaderSpec = LoaderSpec {
    name: "price",
    fields: &[
        take_first("current", Input::Float),
        take_first("original", Input::Float),
        take_first("discount_label", Input::Strip),
    ],
};

pub static STOCK_LOADER: LoaderSpec = LoaderSpec {
    name: "stock",
    fields: &[
        take_first("in_stock", Input::Bool),
        take_first("count", Input::Int),
    ],
};

pub static ASSETS_LOADER: LoaderSpec = LoaderSpec {
    name: "assets",
    fields: &[
        take_first("main_image", Input::Strip),
        collect("gallery_images", Input::Identity),
        collect("view360", Input::Identity),
        collect("video", Input::Identity),
    ],
};

pub static BASE_METADATA_LOADER: LoaderSpec = LoaderSpec {
    name: "metadata",
    fields: &[take_first("description", Input::Strip)],
};

pub static EXTENDED_METADATA_LOADER: LoaderSpec = LoaderSpec {
    name: "metadata",
    fields: &[
        take_first("description", Input::Strip),
        take_first("vendor_code", Input::Int),
        collect("color", Input::Identity),
        take_first("volume", Input::Identity),
        take_first("weight", Input::Identity),
        collect("country", Input::Identity),
        collect("region", Input::Identity),
        take_first("strength", Input::Identity),
        collect("type", Input::Identity),
        collect("manufacturer", Input::Identity),
        collect("sugar", Input::Identity),
        take_first("serving_temperature", Input::Identity),
        collect("blend", Input::Identity),
        collect("exposure_time", Input::Identity),
        collect("exposure_vessel", Input::Identity),
        collect("filtration", Input::Identity),
        collect("package_type", Input::Identity),
        take_first("gift_package", Input::Bool),
        take_first("subname", Input::Strip),
        collect("stores", Input::Identity),
        collect("gastronomics", Input::Identity),
    ],
};
