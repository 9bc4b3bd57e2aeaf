//! Drives a [`CategorySpider`] against the live API.
//!
//! Requests are processed one at a time in FIFO order with a fixed delay
//! between them, so a category's next listing page is fetched only after
//! the detail requests of the current page have been queued.

use std::collections::VecDeque;
use std::time::Duration;

use crate::client::CatalogClient;
use crate::error::{CrawlError, SpiderError};
use crate::pipeline::Pipeline;
use crate::sink::RecordSink;
use crate::spider::CategorySpider;

/// Counters for a finished crawl.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub requests: u64,
    pub records: u64,
    /// Listing or detail requests dropped after a fetch or parse failure.
    pub skipped: u64,
    /// Loaded products that failed validation.
    pub rejected: u64,
}

pub struct Crawler<'a> {
    client: &'a CatalogClient,
    pipeline: Pipeline,
    delay: Duration,
    strict: bool,
}

impl<'a> Crawler<'a> {
    #[must_use]
    pub fn new(client: &'a CatalogClient, pipeline: Pipeline, delay: Duration) -> Self {
        Self {
            client,
            pipeline,
            delay,
            strict: false,
        }
    }

    /// Abort the crawl on the first record that fails validation instead of
    /// dropping it.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs the crawl until every category is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError`] if the city directory cannot be fetched or
    /// parsed, the city cannot be resolved, a record fails validation in
    /// strict mode, or the sink fails. Nothing is requested after a fatal
    /// error.
    pub async fn run<S: RecordSink>(
        &self,
        spider: &mut CategorySpider,
        sink: &mut S,
    ) -> Result<CrawlReport, CrawlError> {
        let mut report = CrawlReport::default();
        let mut queue = VecDeque::from([spider.start_request()]);

        while let Some(request) = queue.pop_front() {
            if report.requests > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            report.requests += 1;

            let body = match self.client.fetch_text(&request.url, &request.referer).await {
                Ok(body) => body,
                Err(e) if request.step.is_city_directory() => {
                    tracing::error!(url = %request.url, error = %e, "city directory request failed");
                    return Err(CrawlError::CityDirectory {
                        url: request.url,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "request failed, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            let url = request.url.clone();
            let output = match spider.parse(request, &body) {
                Ok(output) => output,
                Err(SpiderError::Fatal(e)) => {
                    tracing::error!(url = %url, error = %e, "aborting crawl");
                    return Err(e);
                }
                Err(SpiderError::Skip(e)) => {
                    tracing::warn!(url = %url, error = %e, "unusable response, skipping");
                    report.skipped += 1;
                    continue;
                }
            };

            queue.extend(output.requests);

            for item in output.items {
                match self.pipeline.process(item) {
                    Ok(record) => {
                        sink.write_record(&record)?;
                        report.records += 1;
                    }
                    Err(e) if self.strict => {
                        tracing::error!(url = %url, error = %e, "record failed validation");
                        return Err(CrawlError::Pipeline(e));
                    }
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "record failed validation, dropping");
                        report.rejected += 1;
                    }
                }
            }
        }

        sink.flush()?;
        tracing::info!(
            requests = report.requests,
            records = report.records,
            skipped = report.skipped,
            rejected = report.rejected,
            "crawl finished"
        );
        Ok(report)
    }
}
