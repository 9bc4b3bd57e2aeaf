//! The `crawl` and `targets` command handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::Context;

use alkoteka_core::{load_seed_urls, load_targets, AppConfig};
use alkoteka_scraper::{
    CatalogClient, CategorySpider, CrawlReport, Crawler, JsonLinesSink, Pipeline,
};

use crate::CrawlArgs;

/// Runs one crawl and writes its records as JSON lines.
///
/// # Errors
///
/// Returns an error on any fatal crawl condition: bad configuration, an
/// unusable links file, an unreachable or unparseable city directory, an
/// unknown city, or an unwritable output.
pub(crate) async fn run_crawl(config: &AppConfig, args: &CrawlArgs) -> anyhow::Result<()> {
    let targets = load_targets(&config.targets_path)?;
    let target = targets.target(&args.target)?;

    let links_path = args.links.as_ref().unwrap_or(&config.links_path);
    let seeds = load_seed_urls(links_path)?;
    tracing::info!(
        target = %target.name,
        categories = seeds.len(),
        links = %links_path.display(),
        "loaded category links"
    );

    let client = CatalogClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build catalog client")?;

    let pipeline = Pipeline::for_target(&target);
    let mut spider = CategorySpider::new(target, args.city.clone(), seeds, config.max_pages);
    let crawler = Crawler::new(
        &client,
        pipeline,
        Duration::from_millis(config.inter_request_delay_ms),
    )
    .strict(args.strict || config.strict_validation);

    let report = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut sink = JsonLinesSink::new(BufWriter::new(file));
            crawler.run(&mut spider, &mut sink).await?
        }
        None => {
            let mut sink = JsonLinesSink::new(BufWriter::new(io::stdout()));
            crawler.run(&mut spider, &mut sink).await?
        }
    };

    eprintln!("{}", summary_line(&report));
    Ok(())
}

fn summary_line(report: &CrawlReport) -> String {
    format!(
        "crawl finished: {} records written, {} skipped, {} rejected ({} requests)",
        report.records, report.skipped, report.rejected, report.requests
    )
}

/// Prints the configured target names, one per line.
///
/// # Errors
///
/// Returns an error if the targets file cannot be read or parsed.
pub(crate) fn list_targets(config: &AppConfig) -> anyhow::Result<()> {
    let targets = load_targets(&config.targets_path)?;
    let mut out = io::stdout().lock();
    for name in targets.names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_reports_all_counters() {
        let report = CrawlReport {
            requests: 12,
            records: 9,
            skipped: 2,
            rejected: 1,
        };
        assert_eq!(
            summary_line(&report),
            "crawl finished: 9 records written, 2 skipped, 1 rejected (12 requests)"
        );
    }
}
