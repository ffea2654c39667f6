//! Shared test utilities for the folio-paginate test suite.
//!
//! Provides metadata fixtures, lookup helpers, and bulk extractors that work
//! with pagination results (`Paginated`, `PageSet`, `PageFile`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let result = Paginator::new()
//!     .collection("collections.articles", options)
//!     .run(&articles_metadata(7))
//!     .unwrap();
//!
//! let page = find_file(&result, "articles/page/2/index.html");
//! assert_eq!(page.pagination.num(), 2);
//! ```

use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

use crate::page::PageSet;
use crate::paginate::{PageFile, Paginated};

// =========================================================================
// Fixtures
// =========================================================================

/// Metadata with `collections.articles` holding `len` items `{ "id": 1.. }`.
pub fn articles_metadata(len: usize) -> Value {
    let articles: Vec<Value> = (1..=len).map(|id| json!({ "id": id })).collect();
    json!({ "collections": { "articles": articles } })
}

/// Seven articles; the first three have `hide = true`.
pub fn hidden_articles_metadata() -> Value {
    let articles: Vec<Value> = (1..=7)
        .map(|id| json!({ "id": id, "hide": id <= 3 }))
        .collect();
    json!({ "collections": { "articles": articles } })
}

/// Write `content` as `paginate.toml` in a fresh temp directory.
pub fn write_config(content: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(config_path(tmp.path()), content).unwrap();
    tmp
}

pub fn config_path(dir: &Path) -> std::path::PathBuf {
    dir.join("paginate.toml")
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an output record by path. Panics if not found.
pub fn find_file<'a>(result: &'a Paginated<Value>, path: &str) -> &'a PageFile<Value> {
    result.files.get(path).unwrap_or_else(|| {
        let paths = file_paths(result);
        panic!("file '{path}' not found. Available: {paths:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All output paths in map order.
pub fn file_paths<T>(result: &Paginated<T>) -> Vec<&str> {
    result.files.keys().map(String::as_str).collect()
}

/// The `id` field of every item, page by page.
pub fn page_item_ids(pages: &PageSet<Value>) -> Vec<Vec<u64>> {
    pages
        .iter()
        .map(|page| {
            page.items
                .iter()
                .map(|item| {
                    item["id"]
                        .as_u64()
                        .unwrap_or_else(|| panic!("item without numeric id: {item}"))
                })
                .collect()
        })
        .collect()
}
