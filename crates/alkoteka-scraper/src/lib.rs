pub mod client;
pub mod crawler;
pub mod error;
pub mod loader;
pub mod pagination;
pub mod pipeline;
pub mod rate_limit;
pub mod sink;
pub mod spider;
pub mod types;

pub use client::CatalogClient;
pub use crawler::{CrawlReport, Crawler};
pub use error::{CrawlError, LoaderError, ParseError, PipelineError, ScraperError, SpiderError};
pub use loader::ItemLoader;
pub use pipeline::Pipeline;
pub use rate_limit::RetryPolicy;
pub use sink::{JsonLinesSink, RecordSink};
pub use spider::{CategorySpider, CrawlRequest, ParseOutput, Step};
