//! The category crawl as a state machine.
//!
//! [`CategorySpider`] performs no I/O. The engine fetches each
//! [`CrawlRequest`] and hands the body back to [`CategorySpider::parse`],
//! which returns follow-up requests and loaded products:
//!
//! 1. City directory pages are walked until `has_more_pages` is false, then
//!    the configured city is resolved to its identifier.
//! 2. Every seed category is listed page by page.
//! 3. Every listed product gets a detail request carrying its partially
//!    loaded record, which the detail callback completes.

mod cities;
mod detail;
mod listing;
mod request;

pub use cities::{jaccard, CityDirectory};
pub use detail::discount_percent;
pub use request::{CrawlRequest, Step};

use alkoteka_core::{category_slug, CrawlTarget};
use serde_json::{Map, Value};

use crate::client::{build_url, referer_for};
use crate::error::{CrawlError, ParseError, ScraperError, SpiderError};
use crate::loader::ItemLoader;
use crate::pagination::{next_page, NextPage};
use crate::types::{CityPage, ProductDetailEnvelope, ProductListPage};

/// What one parsed response produced.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub requests: Vec<CrawlRequest>,
    pub items: Vec<Map<String, Value>>,
}

pub struct CategorySpider {
    target: CrawlTarget,
    city_name: String,
    seeds: Vec<String>,
    max_pages: u32,
    cities: CityDirectory,
    city_uuid: Option<String>,
}

impl CategorySpider {
    /// `city` overrides the target's default city name.
    #[must_use]
    pub fn new(target: CrawlTarget, city: Option<String>, seeds: Vec<String>, max_pages: u32) -> Self {
        let city_name = city.unwrap_or_else(|| target.default_city_name.clone());
        Self {
            target,
            city_name,
            seeds,
            max_pages,
            cities: CityDirectory::default(),
            city_uuid: None,
        }
    }

    #[must_use]
    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    /// Identifier of the resolved city, once the directory walk is complete.
    #[must_use]
    pub fn city_uuid(&self) -> Option<&str> {
        self.city_uuid.as_deref()
    }

    /// The first city directory page.
    #[must_use]
    pub fn start_request(&self) -> CrawlRequest {
        CrawlRequest {
            url: self.target.city_url.clone(),
            referer: referer_for(&self.target.referer_url, ""),
            step: Step::Cities { page: 1 },
        }
    }

    /// Routes a response body to the callback named by the request's step.
    ///
    /// # Errors
    ///
    /// Returns [`SpiderError::Fatal`] for problems with the city directory
    /// (non-JSON body, unknown city, pagination limit) and
    /// [`SpiderError::Skip`] when a listing or detail response cannot be
    /// used.
    pub fn parse(&mut self, request: CrawlRequest, body: &str) -> Result<ParseOutput, SpiderError> {
        match request.step {
            Step::Cities { page } => Ok(self.parse_cities(&request.url, page, body)?),
            Step::Listing { slug, page } => Ok(self.parse_listing(&request.url, slug, page, body)?),
            Step::Detail { slug, partial } => {
                Ok(self.parse_detail(&request.url, &slug, *partial, body)?)
            }
        }
    }

    fn parse_cities(&mut self, url: &str, page: u32, body: &str) -> Result<ParseOutput, CrawlError> {
        let data: CityPage = serde_json::from_str(body).map_err(|e| CrawlError::InvalidJson {
            url: url.to_owned(),
            source: e,
        })?;

        for city in data.results {
            self.cities.insert(&city.name, city.uuid);
        }

        match next_page(&data.meta, page, self.max_pages) {
            NextPage::Fetch(next) => {
                let next_str = next.to_string();
                let url = build_url(&self.target.city_url, &[("page", next_str.as_str())])?;
                tracing::debug!(page = next, "requesting next city directory page");
                Ok(ParseOutput {
                    requests: vec![CrawlRequest {
                        url,
                        referer: referer_for(&self.target.referer_url, ""),
                        step: Step::Cities { page: next },
                    }],
                    items: Vec::new(),
                })
            }
            NextPage::LimitReached => Err(CrawlError::PaginationLimit {
                url: self.target.city_url.clone(),
                max_pages: self.max_pages,
            }),
            NextPage::Exhausted => {
                let uuid = self.cities.resolve(&self.city_name)?.to_owned();
                tracing::info!(
                    city = %self.city_name,
                    city_uuid = %uuid,
                    known_cities = self.cities.len(),
                    "resolved city"
                );
                self.city_uuid = Some(uuid);

                let mut requests = Vec::with_capacity(self.seeds.len());
                for seed in &self.seeds {
                    let slug = category_slug(seed).to_owned();
                    requests.push(self.listing_request(slug, 1)?);
                }
                Ok(ParseOutput {
                    requests,
                    items: Vec::new(),
                })
            }
        }
    }

    fn listing_request(&self, slug: String, page: u32) -> Result<CrawlRequest, ScraperError> {
        let page_str = page.to_string();
        let per_page = self.target.per_page.to_string();
        let url = build_url(
            &self.target.product_url,
            &[
                ("city_uuid", self.city_uuid.as_deref().unwrap_or_default()),
                ("page", page_str.as_str()),
                ("per_page", per_page.as_str()),
                ("root_category_slug", slug.as_str()),
            ],
        )?;
        Ok(CrawlRequest {
            url,
            referer: referer_for(&self.target.referer_url, &format!("catalog/{slug}")),
            step: Step::Listing { slug, page },
        })
    }

    fn parse_listing(
        &self,
        url: &str,
        slug: String,
        page: u32,
        body: &str,
    ) -> Result<ParseOutput, ParseError> {
        let data: ProductListPage = serde_json::from_str(body).map_err(|e| ParseError::Payload {
            url: url.to_owned(),
            source: e,
        })?;

        let collected_at = chrono::Utc::now().timestamp();
        let mut requests = Vec::with_capacity(data.results.len() + 1);

        for summary in &data.results {
            let Some(product_slug) = listing::product_slug(&summary.product_url) else {
                tracing::warn!(
                    slug = %slug,
                    product_url = %summary.product_url,
                    "listing card has no usable product URL, skipping product"
                );
                continue;
            };

            let partial = match listing::partial_product(summary, collected_at) {
                Ok(loader) => loader,
                Err(e) => {
                    tracing::warn!(
                        slug = %slug,
                        product_slug,
                        error = %e,
                        "could not load listing card, skipping product"
                    );
                    continue;
                }
            };

            let detail_base = format!("{}/{product_slug}", self.target.product_url);
            let detail_url = build_url(
                &detail_base,
                &[("city_uuid", self.city_uuid.as_deref().unwrap_or_default())],
            )?;
            requests.push(CrawlRequest {
                url: detail_url,
                referer: referer_for(
                    &self.target.referer_url,
                    &format!("product/{slug}/{product_slug}"),
                ),
                step: Step::Detail {
                    slug: slug.clone(),
                    partial: Box::new(partial),
                },
            });
        }

        tracing::info!(
            slug = %slug,
            page,
            products = data.results.len(),
            "parsed listing page"
        );

        match next_page(&data.meta, page, self.max_pages) {
            NextPage::Fetch(next) => requests.push(self.listing_request(slug, next)?),
            NextPage::LimitReached => tracing::warn!(
                slug = %slug,
                max_pages = self.max_pages,
                "listing still reports more pages at the page limit, stopping category"
            ),
            NextPage::Exhausted => tracing::info!(slug = %slug, pages = page, "category exhausted"),
        }

        Ok(ParseOutput {
            requests,
            items: Vec::new(),
        })
    }

    fn parse_detail(
        &self,
        url: &str,
        slug: &str,
        mut product: ItemLoader,
        body: &str,
    ) -> Result<ParseOutput, ParseError> {
        let envelope: ProductDetailEnvelope =
            serde_json::from_str(body).map_err(|e| ParseError::Payload {
                url: url.to_owned(),
                source: e,
            })?;

        detail::fill_product(&mut product, &envelope.results, self.target.metadata)?;
        tracing::debug!(slug, url, "parsed product detail");

        Ok(ParseOutput {
            requests: Vec::new(),
            items: vec![product.load_item()],
        })
    }
}

#[cfg(test)]
#[path = "../spider_test.rs"]
mod tests;
