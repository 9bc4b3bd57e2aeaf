use std::collections::HashSet;

use crate::error::CrawlError;

/// How many near matches a "city not found" error suggests.
const SUGGESTIONS: usize = 3;

/// City name to identifier mapping accumulated across directory pages.
///
/// Names are stored case-folded. Insertion order is kept; it breaks ties
/// between equally similar suggestions.
#[derive(Debug, Default)]
pub struct CityDirectory {
    entries: Vec<(String, String)>,
}

impl CityDirectory {
    /// Records `name`. A name seen again keeps its position and takes the
    /// newer identifier.
    pub fn insert(&mut self, name: &str, uuid: String) {
        let key = name.to_lowercase();
        match self.entries.iter_mut().find(|(n, _)| *n == key) {
            Some(entry) => entry.1 = uuid,
            None => self.entries.push((key, uuid)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks `name` up case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::CityNotFound`] with the most similar known names
    /// when there is no exact match.
    pub fn resolve(&self, name: &str) -> Result<&str, CrawlError> {
        let wanted = name.to_lowercase();
        if let Some((_, uuid)) = self.entries.iter().find(|(n, _)| *n == wanted) {
            return Ok(uuid.as_str());
        }

        let mut scored: Vec<(f64, &str)> = self
            .entries
            .iter()
            .map(|(n, _)| (jaccard(&wanted, n), n.as_str()))
            .collect();
        // Stable: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Err(CrawlError::CityNotFound {
            name: name.to_owned(),
            suggestions: scored
                .into_iter()
                .take(SUGGESTIONS)
                .map(|(_, n)| capitalize(n))
                .collect(),
        })
    }
}

/// Jaccard index of the character sets of `a` and `b`, case-folded.
/// Two empty names score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard(a: &str, b: &str) -> f64 {
    let left: HashSet<char> = a.to_lowercase().chars().collect();
    let right: HashSet<char> = b.to_lowercase().chars().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    intersection as f64 / union as f64
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(names: &[&str]) -> CityDirectory {
        let mut dir = CityDirectory::default();
        for (i, name) in names.iter().enumerate() {
            dir.insert(name, format!("uuid-{i}"));
        }
        dir
    }

    #[test]
    fn exact_match_ignores_case() {
        let dir = directory(&["Москва", "Краснодар"]);
        assert_eq!(dir.resolve("москва").unwrap(), "uuid-0");
        assert_eq!(dir.resolve("КРАСНОДАР").unwrap(), "uuid-1");
    }

    #[test]
    fn duplicate_name_keeps_position_and_updates_uuid() {
        let mut dir = directory(&["Москва", "Сочи"]);
        dir.insert("МОСКВА", "uuid-new".to_owned());
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.resolve("Москва").unwrap(), "uuid-new");
    }

    #[test]
    fn miss_suggests_three_most_similar() {
        let dir = directory(&["Сочи", "Краснодар", "Красноярск", "Анапа", "Краснолесье"]);
        let err = dir.resolve("Красндар").unwrap_err();
        match err {
            CrawlError::CityNotFound { name, suggestions } => {
                assert_eq!(name, "Красндар");
                assert_eq!(suggestions.len(), 3);
                assert_eq!(suggestions[0], "Краснодар");
                assert!(!suggestions.contains(&"Сочи".to_owned()));
            }
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn ties_keep_insertion_order() {
        // None of these share a character with the query, so all score 0.
        let dir = directory(&["бб", "вв", "гг", "дд"]);
        match dir.resolve("аа").unwrap_err() {
            CrawlError::CityNotFound { suggestions, .. } => {
                assert_eq!(suggestions, ["Бб", "Вв", "Гг"]);
            }
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn fewer_than_three_cities_suggests_all() {
        let dir = directory(&["Сочи"]);
        match dir.resolve("Анапа").unwrap_err() {
            CrawlError::CityNotFound { suggestions, .. } => assert_eq!(suggestions, ["Сочи"]),
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn jaccard_of_character_sets() {
        assert!((jaccard("abc", "abd") - 0.5).abs() < f64::EPSILON);
        assert!((jaccard("ABC", "cba") - 1.0).abs() < f64::EPSILON);
        assert!(jaccard("", "").abs() < f64::EPSILON);
        assert!(jaccard("ab", "cd").abs() < f64::EPSILON);
    }

    #[test]
    fn capitalize_matches_display_form() {
        assert_eq!(capitalize("нижний новгород"), "Нижний новгород");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn error_message_lists_suggestions() {
        let err = CrawlError::CityNotFound {
            name: "Мск".to_owned(),
            suggestions: vec!["Москва".to_owned(), "Омск".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "city 'Мск' not found; did you mean one of: Москва, Омск?"
        );
    }
}
