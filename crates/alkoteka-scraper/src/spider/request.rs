use crate::loader::ItemLoader;

/// The callback a response is routed to, with the state it needs.
#[derive(Debug, Clone)]
pub enum Step {
    /// A page of the city directory.
    Cities { page: u32 },
    /// A page of one category's product listing.
    Listing { slug: String, page: u32 },
    /// One product's detail payload. `partial` holds the fields already
    /// loaded from the listing card.
    Detail {
        slug: String,
        partial: Box<ItemLoader>,
    },
}

impl Step {
    /// Failures on the city directory abort the run; failures anywhere else
    /// only drop the request.
    #[must_use]
    pub fn is_city_directory(&self) -> bool {
        matches!(self, Step::Cities { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub url: String,
    pub referer: String,
    pub step: Step,
}
