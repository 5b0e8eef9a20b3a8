//! `quotd-core` provides the quote collection and the query operations the
//! quotd HTTP API is built on.
//!
//! The collection is loaded once from a JSON file into a [`QuoteStore`] and
//! never mutated afterwards. Every query in [`query`] is a pure function over
//! the loaded slice, so the store can be shared freely between request
//! handlers.
//!
//! ## Examples
//!
//! ```
//! use quotd_core::{QuoteStore, query};
//!
//! let store = QuoteStore::from_json(
//!     r#"{"quotes": [{"_id": "q1", "content": "Know thyself.", "author": "Socrates",
//!         "tags": ["wisdom"], "length": 13, "dateAdded": "2023-01-01"}]}"#,
//! )
//! .unwrap();
//!
//! let found = query::search(store.all(), "thyself");
//! assert_eq!(found.total, 1);
//! ```

mod quote;
mod store;

pub mod query;

pub use quote::Quote;
pub use store::{QuoteStore, StoreError};
