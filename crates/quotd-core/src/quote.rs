use serde::{Deserialize, Serialize};

/// A single quotation record.
///
/// `length` is the precomputed character count of `content`, stored in the
/// data file rather than derived at query time. The wire name of `id` is
/// `_id`, matching the quotes data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub length: u64,
    pub date_added: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_wire_names() {
        let json = r#"{
            "_id": "q1",
            "content": "The only way to do great work is to love what you do.",
            "author": "Steve Jobs",
            "tags": ["work", "passion"],
            "length": 53,
            "dateAdded": "2023-01-01"
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, "q1");
        assert_eq!(quote.author, "Steve Jobs");
        assert_eq!(quote.date_added, "2023-01-01");

        let value = serde_json::to_value(&quote).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("dateAdded").is_some());
        assert!(value.get("date_added").is_none());
    }
}
