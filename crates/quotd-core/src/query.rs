//! Pure query operations over a loaded quote collection.
//!
//! Every function borrows the full slice and returns either a single quote
//! or a serializable envelope echoing the filter parameters alongside the
//! matches. Nothing here mutates the collection, so all operations are safe
//! to run concurrently.

use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Serialize, Serializer};

use crate::Quote;

#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<'a> {
    pub query: String,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

#[derive(Debug, Serialize)]
pub struct AuthorResults<'a> {
    pub author: String,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

#[derive(Debug, Serialize)]
pub struct TagResults<'a> {
    pub tag: String,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

#[derive(Debug, Serialize)]
pub struct DateResults<'a> {
    pub date: String,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

#[derive(Debug, Serialize)]
pub struct LengthResults<'a> {
    pub filter: LengthFilter,
    pub total: usize,
    pub results: Vec<&'a Quote>,
}

/// The echoed length-range filter. An unset upper bound serializes as the
/// string `"unlimited"` rather than a numeric sentinel.
#[derive(Debug, Serialize)]
pub struct LengthFilter {
    pub min: u64,
    #[serde(serialize_with = "serialize_max")]
    pub max: Option<u64>,
}

fn serialize_max<S>(max: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match max {
        Some(value) => serializer.serialize_u64(*value),
        None => serializer.serialize_str("unlimited"),
    }
}

#[derive(Debug, Serialize)]
pub struct TagList {
    pub total: usize,
    pub tags: Vec<String>,
}

/// Picks one quote uniformly at random, or `None` on an empty slice.
pub fn random<'a>(quotes: &'a [Quote], rng: &mut impl Rng) -> Option<&'a Quote> {
    if quotes.is_empty() {
        return None;
    }
    quotes.get(rng.random_range(0..quotes.len()))
}

/// Slices the collection into a page.
///
/// `page` defaults to 1 (values below 1 are clamped to it) and `limit`
/// defaults to the full collection size. An out-of-range page yields an
/// empty result set with the correct `total`, never an error.
pub fn paginate<'a>(quotes: &'a [Quote], page: Option<usize>, limit: Option<usize>) -> Page<'a> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(quotes.len());
    let start = (page - 1).saturating_mul(limit);
    let end = start.saturating_add(limit).min(quotes.len());

    let results = if start < quotes.len() {
        quotes[start..end].iter().collect()
    } else {
        Vec::new()
    };

    Page {
        page,
        limit,
        total: quotes.len(),
        results,
    }
}

/// Case-insensitive substring search over quote content.
pub fn search<'a>(quotes: &'a [Quote], q: &str) -> SearchResults<'a> {
    let needle = q.to_lowercase();
    let results: Vec<_> = quotes
        .iter()
        .filter(|quote| quote.content.to_lowercase().contains(&needle))
        .collect();

    SearchResults {
        query: q.to_string(),
        total: results.len(),
        results,
    }
}

/// Case-insensitive substring match on the author name.
pub fn by_author<'a>(quotes: &'a [Quote], name: &str) -> AuthorResults<'a> {
    let needle = name.to_lowercase();
    let results: Vec<_> = quotes
        .iter()
        .filter(|quote| quote.author.to_lowercase().contains(&needle))
        .collect();

    AuthorResults {
        author: name.to_string(),
        total: results.len(),
        results,
    }
}

/// Case-insensitive exact match against any element of a quote's tag set.
pub fn by_tag<'a>(quotes: &'a [Quote], tag: &str) -> TagResults<'a> {
    let needle = tag.to_lowercase();
    let results: Vec<_> = quotes
        .iter()
        .filter(|quote| quote.tags.iter().any(|t| t.to_lowercase() == needle))
        .collect();

    TagResults {
        tag: tag.to_string(),
        total: results.len(),
        results,
    }
}

/// Exact id lookup.
pub fn by_id<'a>(quotes: &'a [Quote], id: &str) -> Option<&'a Quote> {
    quotes.iter().find(|quote| quote.id == id)
}

/// Prefix match on `dateAdded`, so a year or year-month selects every quote
/// added within it.
pub fn by_date<'a>(quotes: &'a [Quote], date: &str) -> DateResults<'a> {
    let results: Vec<_> = quotes
        .iter()
        .filter(|quote| quote.date_added.starts_with(date))
        .collect();

    DateResults {
        date: date.to_string(),
        total: results.len(),
        results,
    }
}

/// Inclusive range filter on the precomputed content length.
///
/// `min` defaults to 0 and an unset `max` means unbounded. A range with
/// `min > max` matches nothing.
pub fn by_length<'a>(quotes: &'a [Quote], min: Option<u64>, max: Option<u64>) -> LengthResults<'a> {
    let lower = min.unwrap_or(0);
    let results: Vec<_> = quotes
        .iter()
        .filter(|quote| quote.length >= lower && max.is_none_or(|upper| quote.length <= upper))
        .collect();

    LengthResults {
        filter: LengthFilter { min: lower, max },
        total: results.len(),
        results,
    }
}

/// The union of all tags across the collection, deduplicated without regard
/// to case (first-seen casing wins) and sorted ascending.
pub fn all_tags(quotes: &[Quote]) -> TagList {
    let mut seen = FxHashSet::default();
    let mut tags = Vec::new();

    for quote in quotes {
        for tag in &quote.tags {
            if seen.insert(tag.to_lowercase()) {
                tags.push(tag.clone());
            }
        }
    }
    tags.sort();

    TagList {
        total: tags.len(),
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    fn quote(id: &str, content: &str, author: &str, tags: &[&str], date: &str) -> Quote {
        Quote {
            id: id.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            length: content.chars().count() as u64,
            date_added: date.to_string(),
        }
    }

    fn sample() -> Vec<Quote> {
        vec![
            quote(
                "q1",
                "The only way to do great work is to love what you do.",
                "Steve Jobs",
                &["work", "passion"],
                "2023-01-01",
            ),
            quote(
                "q2",
                "Stay hungry, stay foolish.",
                "Steve Jobs",
                &["Life", "inspiration"],
                "2023-03-10",
            ),
            quote(
                "q3",
                "Know thyself.",
                "Socrates",
                &["wisdom", "life"],
                "2024-06-01",
            ),
            quote(
                "q4",
                "Less is more.",
                "Mies van der Rohe",
                &["design"],
                "2024-07-22",
            ),
        ]
    }

    #[test]
    fn test_random_is_deterministic_with_seeded_rng() {
        let quotes = sample();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let first = random(&quotes, &mut a).unwrap();
        let second = random(&quotes, &mut b).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_random_empty_slice() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random(&[], &mut rng).is_none());
    }

    #[test]
    fn test_random_is_member_of_collection() {
        let quotes = sample();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let picked = random(&quotes, &mut rng).unwrap();
            assert!(quotes.iter().any(|q| q.id == picked.id));
        }
    }

    #[rstest]
    #[case(None, None, 4, &["q1", "q2", "q3", "q4"])]
    #[case(Some(1), Some(2), 2, &["q1", "q2"])]
    #[case(Some(2), Some(2), 2, &["q3", "q4"])]
    #[case(Some(2), Some(3), 1, &["q4"])]
    #[case(Some(3), Some(2), 0, &[])]
    #[case(Some(100), Some(10), 0, &[])]
    #[case(Some(1), Some(0), 0, &[])]
    fn test_paginate(
        #[case] page: Option<usize>,
        #[case] limit: Option<usize>,
        #[case] expected_len: usize,
        #[case] expected_ids: &[&str],
    ) {
        let quotes = sample();
        let result = paginate(&quotes, page, limit);

        assert_eq!(result.total, 4);
        assert_eq!(result.results.len(), expected_len);
        let ids: Vec<_> = result.results.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, expected_ids);
    }

    #[test]
    fn test_paginate_length_law() {
        let quotes = sample();
        for page in 1..=5_usize {
            for limit in 0..=5_usize {
                let result = paginate(&quotes, Some(page), Some(limit));
                let start = (page - 1) * limit;
                let expected = if start < quotes.len() {
                    limit.min(quotes.len() - start)
                } else {
                    0
                };
                assert_eq!(result.results.len(), expected, "page={page} limit={limit}");
            }
        }
    }

    #[test]
    fn test_search_case_insensitive() {
        let quotes = sample();
        let result = search(&quotes, "LOVE");
        assert_eq!(result.total, 1);
        assert_eq!(result.results[0].id, "q1");
        assert_eq!(result.query, "LOVE");
    }

    #[test]
    fn test_search_no_matches() {
        let quotes = sample();
        let result = search(&quotes, "nonexistent");
        assert_eq!(result.total, 0);
        assert!(result.results.is_empty());
    }

    #[rstest]
    #[case("steve", 2)]
    #[case("SOCRATES", 1)]
    #[case("van der", 1)]
    #[case("nobody", 0)]
    fn test_by_author_substring(#[case] name: &str, #[case] expected: usize) {
        let quotes = sample();
        let result = by_author(&quotes, name);
        assert_eq!(result.total, expected);
        assert_eq!(result.author, name);
    }

    #[rstest]
    #[case("WORK", 1)]
    #[case("life", 2)]
    #[case("wis", 0)] // exact token match, not substring
    #[case("design", 1)]
    fn test_by_tag_exact(#[case] tag: &str, #[case] expected: usize) {
        let quotes = sample();
        let result = by_tag(&quotes, tag);
        assert_eq!(result.total, expected);
    }

    #[test]
    fn test_by_id_found_and_missing() {
        let quotes = sample();
        let found = by_id(&quotes, "q3").unwrap();
        assert_eq!(found.author, "Socrates");
        assert!(by_id(&quotes, "q999").is_none());
    }

    #[rstest]
    #[case("2023", 2)]
    #[case("2024-06", 1)]
    #[case("2024-07-22", 1)]
    #[case("2020", 0)]
    fn test_by_date_prefix(#[case] date: &str, #[case] expected: usize) {
        let quotes = sample();
        let result = by_date(&quotes, date);
        assert_eq!(result.total, expected);
    }

    #[test]
    fn test_by_length_inclusive_bounds() {
        let quotes = sample();
        let len = quotes[0].length;

        let result = by_length(&quotes, Some(len), Some(len));
        assert_eq!(result.total, 1);
        assert_eq!(result.results[0].id, "q1");

        // Quotes sitting exactly on min (13) and max (26) are both included
        let result = by_length(&quotes, Some(13), Some(26));
        let lengths: Vec<_> = result.results.iter().map(|q| q.length).collect();
        assert!(lengths.contains(&13));
        assert!(lengths.contains(&26));
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_by_length_defaults_match_all() {
        let quotes = sample();
        let result = by_length(&quotes, None, None);
        assert_eq!(result.total, 4);
        assert_eq!(result.filter.min, 0);
        assert!(result.filter.max.is_none());
    }

    #[test]
    fn test_by_length_min_above_max_is_empty() {
        let quotes = sample();
        let result = by_length(&quotes, Some(50), Some(10));
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_length_filter_unbounded_marker() {
        let quotes = sample();
        let result = by_length(&quotes, Some(5), None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["filter"]["min"], 5);
        assert_eq!(value["filter"]["max"], "unlimited");

        let bounded = by_length(&quotes, None, Some(20));
        let value = serde_json::to_value(&bounded).unwrap();
        assert_eq!(value["filter"]["max"], 20);
    }

    #[test]
    fn test_all_tags_sorted_and_deduplicated() {
        let quotes = sample();
        let result = all_tags(&quotes);

        // "Life" (q2) and "life" (q3) collapse into the first-seen casing.
        assert_eq!(result.total, result.tags.len());
        assert_eq!(
            result.tags,
            vec!["Life", "design", "inspiration", "passion", "wisdom", "work"]
        );

        let mut sorted = result.tags.clone();
        sorted.sort();
        assert_eq!(result.tags, sorted);
    }

    #[test]
    fn test_filters_return_members_of_collection() {
        let quotes = sample();

        let from_search = search(&quotes, "o");
        let from_author = by_author(&quotes, "e");
        let from_date = by_date(&quotes, "20");
        let from_length = by_length(&quotes, None, None);

        for result in from_search
            .results
            .iter()
            .chain(from_author.results.iter())
            .chain(from_date.results.iter())
            .chain(from_length.results.iter())
        {
            assert!(quotes.iter().any(|q| q == *result));
        }
    }
}
