use alkoteka_core::{ConfigError, ValidationError};
use thiserror::Error;

/// Transport-level failure fetching one URL.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A raw value a loader could not accept.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("loader {loader} has no field named {field}")]
    UnknownField { loader: &'static str, field: String },

    #[error("cannot convert {value} to {target} for field {field}")]
    Coercion {
        field: &'static str,
        target: &'static str,
        value: String,
    },
}

/// A listing or detail response that cannot be turned into records or
/// requests. Only that unit of work is lost.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON at {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Url(#[from] ScraperError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to serialize validated record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Conditions that abort the whole crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("city directory request to {url} failed: {source}")]
    CityDirectory {
        url: String,
        #[source]
        source: ScraperError,
    },

    #[error("invalid JSON at {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("city '{name}' not found; did you mean one of: {}?", .suggestions.join(", "))]
    CityNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("pagination limit reached for {url}: exceeded {max_pages} pages")]
    PaginationLimit { url: String, max_pages: u32 },

    #[error(transparent)]
    Url(#[from] ScraperError),

    #[error("record rejected: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("failed to write record: {0}")]
    Sink(#[from] std::io::Error),
}

/// Outcome of a failed callback: either the whole run stops or only the
/// current request is dropped.
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error(transparent)]
    Fatal(#[from] CrawlError),

    #[error(transparent)]
    Skip(#[from] ParseError),
}
