//! Page-number pagination driven by the upstream `meta` block.
//!
//! Every paginated endpoint (city directory, product listing) returns
//!
//! ```text
//! "meta": { "has_more_pages": true, "current_page": 3, ... }
//! ```
//!
//! The next page is `current_page + 1`. The page counter never moves
//! backwards, so a server that keeps reporting the same `current_page`
//! with `has_more_pages: true` still runs into the `max_pages` bound.

use serde::Deserialize;

/// Pagination block shared by all paginated responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub has_more_pages: bool,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            has_more_pages: false,
            current_page: first_page(),
        }
    }
}

fn first_page() -> u32 {
    1
}

/// What to do after a page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    Fetch(u32),
    Exhausted,
    /// More pages are advertised but fetching them would exceed the bound.
    LimitReached,
}

/// Decide the follow-up for the page that was requested as `requested`.
#[must_use]
pub fn next_page(meta: &PageMeta, requested: u32, max_pages: u32) -> NextPage {
    if !meta.has_more_pages {
        return NextPage::Exhausted;
    }
    let next = meta.current_page.max(requested).saturating_add(1);
    if next > max_pages {
        NextPage::LimitReached
    } else {
        NextPage::Fetch(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(has_more_pages: bool, current_page: u32) -> PageMeta {
        PageMeta {
            has_more_pages,
            current_page,
        }
    }

    #[test]
    fn stops_when_no_more_pages() {
        assert_eq!(next_page(&meta(false, 1), 1, 200), NextPage::Exhausted);
    }

    #[test]
    fn follows_current_page_plus_one() {
        assert_eq!(next_page(&meta(true, 3), 3, 200), NextPage::Fetch(4));
    }

    #[test]
    fn never_moves_backwards_on_stale_meta() {
        assert_eq!(next_page(&meta(true, 1), 5, 200), NextPage::Fetch(6));
    }

    #[test]
    fn reports_limit_instead_of_exceeding_it() {
        assert_eq!(next_page(&meta(true, 2), 2, 2), NextPage::LimitReached);
    }

    #[test]
    fn always_true_flag_terminates_within_bound() {
        let mut requested = 1;
        let mut fetched = 1;
        loop {
            match next_page(&meta(true, 1), requested, 10) {
                NextPage::Fetch(n) => {
                    requested = n;
                    fetched += 1;
                }
                NextPage::Exhausted | NextPage::LimitReached => break,
            }
        }
        assert_eq!(fetched, 10);
    }

    #[test]
    fn missing_meta_fields_default_to_last_first_page() {
        let parsed: PageMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PageMeta::default());
    }
}
