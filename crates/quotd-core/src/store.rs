use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::Quote;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read quotes file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse quotes data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate quote id: {0}")]
    DuplicateId(String),
    #[error("quote collection is empty")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct QuotesFile {
    quotes: Vec<Quote>,
}

/// The process-lifetime quote collection.
///
/// Constructed once at startup and read-only afterwards. Insertion order of
/// the data file is preserved, which is what default pagination exposes.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Loads the collection from a JSON file of the form `{"quotes": [...]}`.
    ///
    /// Any failure here is fatal for the service: with a missing or
    /// malformed data file there is nothing to serve.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses a collection from an in-memory JSON document.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let file: QuotesFile = serde_json::from_str(json)?;
        Self::new(file.quotes)
    }

    fn new(quotes: Vec<Quote>) -> Result<Self, StoreError> {
        if quotes.is_empty() {
            return Err(StoreError::Empty);
        }

        let mut seen = FxHashSet::default();
        for quote in &quotes {
            if !seen.insert(quote.id.as_str()) {
                return Err(StoreError::DuplicateId(quote.id.clone()));
            }
        }

        Ok(Self { quotes })
    }

    /// The full collection, in original insertion order.
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "quotes": [
            {"_id": "q1", "content": "Know thyself.", "author": "Socrates",
             "tags": ["wisdom"], "length": 13, "dateAdded": "2023-01-01"},
            {"_id": "q2", "content": "Less is more.", "author": "Mies van der Rohe",
             "tags": ["design"], "length": 13, "dateAdded": "2023-02-15"}
        ]
    }"#;

    #[test]
    fn test_from_json_preserves_order() {
        let store = QuoteStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].id, "q1");
        assert_eq!(store.all()[1].id, "q2");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = QuoteStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = QuoteStore::load("does/not/exist/quotes.json");
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = QuoteStore::from_json("{\"quotes\": [");
        assert!(matches!(result, Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_duplicate_id() {
        let json = r#"{
            "quotes": [
                {"_id": "q1", "content": "a", "author": "x", "tags": [], "length": 1, "dateAdded": "2023-01-01"},
                {"_id": "q1", "content": "b", "author": "y", "tags": [], "length": 1, "dateAdded": "2023-01-02"}
            ]
        }"#;
        let result = QuoteStore::from_json(json);
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == "q1"));
    }

    #[test]
    fn test_empty_collection() {
        let result = QuoteStore::from_json(r#"{"quotes": []}"#);
        assert!(matches!(result, Err(StoreError::Empty)));
    }
}
