//! Category seed links.
//!
//! The seed file lists one category URL per line. Only links to catalog
//! categories on the allowed domain are crawled; anything else is skipped.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

static CATEGORY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://alkoteka\.com/catalog/[a-zA-Z0-9\-_]+$").expect("valid category url regex")
});

/// Read category links from `path`, keeping valid ones in file order.
///
/// # Errors
///
/// Returns [`ConfigError::SeedsFileIo`] if the file cannot be read and
/// [`ConfigError::NoValidSeeds`] if no line is a valid category link.
pub fn load_seed_urls(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let (urls, skipped) = parse_seed_urls(&content);

    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            "not every line in the links file is a valid category link; invalid lines were ignored"
        );
    }

    if urls.is_empty() {
        return Err(ConfigError::NoValidSeeds {
            path: path.display().to_string(),
        });
    }

    Ok(urls)
}

/// Splits seed file content into valid links and a count of rejected lines.
fn parse_seed_urls(content: &str) -> (Vec<String>, usize) {
    let mut urls = Vec::new();
    let mut skipped = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if !line.is_empty() && CATEGORY_URL.is_match(line) {
            urls.push(line.to_string());
        } else {
            skipped += 1;
        }
    }

    (urls, skipped)
}

/// The category slug is the last path segment of a category link.
#[must_use]
pub fn category_slug(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn keeps_valid_links_in_order() {
        let content = "https://alkoteka.com/catalog/vino\nhttps://alkoteka.com/catalog/krepkiy-alkogol\n";
        let (urls, skipped) = parse_seed_urls(content);
        assert_eq!(
            urls,
            [
                "https://alkoteka.com/catalog/vino",
                "https://alkoteka.com/catalog/krepkiy-alkogol"
            ]
        );
        assert_eq!(skipped, 0);
    }

    #[test]
    fn skips_foreign_domains_and_nested_paths() {
        let content = concat!(
            "https://example.com/catalog/vino\n",
            "https://alkoteka.com/catalog/vino/sub\n",
            "http://alkoteka.com/catalog/vino\n",
            "  https://alkoteka.com/catalog/pivo  \n",
        );
        let (urls, skipped) = parse_seed_urls(content);
        assert_eq!(urls, ["https://alkoteka.com/catalog/pivo"]);
        assert_eq!(skipped, 3);
    }

    #[test]
    fn blank_lines_count_as_skipped() {
        let (urls, skipped) = parse_seed_urls("\n\nhttps://alkoteka.com/catalog/vino\n");
        assert_eq!(urls.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn load_seed_urls_fails_without_valid_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a link").unwrap();
        let err = load_seed_urls(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NoValidSeeds { .. }));
    }

    #[test]
    fn load_seed_urls_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://alkoteka.com/catalog/slaboalkogolnye-napitki-2").unwrap();
        writeln!(file, "garbage").unwrap();
        let urls = load_seed_urls(file.path()).unwrap();
        assert_eq!(urls, ["https://alkoteka.com/catalog/slaboalkogolnye-napitki-2"]);
    }

    #[test]
    fn load_seed_urls_fails_for_missing_file() {
        let err = load_seed_urls(Path::new("/definitely/not/links.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::SeedsFileIo { .. }));
    }

    #[test]
    fn category_slug_is_last_segment() {
        assert_eq!(category_slug("https://alkoteka.com/catalog/vino"), "vino");
        assert_eq!(category_slug("https://alkoteka.com/catalog/vino/"), "vino");
        assert_eq!(category_slug("vino"), "vino");
    }
}
