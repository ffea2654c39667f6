//! CLI output formatting.
//!
//! Output is **page-centric**: each collection lists its pages by position and
//! group name, with the output paths registered for that page shown as
//! indented context lines. Page one typically has two paths (its `first`
//! override and its plain `path`), and with `no_page_one` only one.
//!
//! ```text
//! 001 collections.articles (7 items, 3 pages)
//!     001 1 (3 items)
//!         → articles/index.html
//!         → articles/page/1/index.html
//!     002 2 (3 items)
//!         → articles/page/2/index.html
//!     003 3 (1 item)
//!         → articles/page/3/index.html
//!
//! Generated 4 files from 1 collection
//! ```
//!
//! Each `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout.

use crate::paginate::{Collection, Paginated};
use std::sync::Arc;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Output paths registered for each page of `collection`, in map order.
fn paths_by_page<'a, T>(result: &'a Paginated<T>, collection: &Collection<T>) -> Vec<Vec<&'a str>> {
    let mut by_page = vec![Vec::new(); collection.pages.len()];
    for (path, file) in &result.files {
        if Arc::ptr_eq(file.pagination.pages(), &collection.pages) {
            by_page[file.pagination.index()].push(path.as_str());
        }
    }
    by_page
}

/// Format the pages and output paths of every collection.
pub fn format_paginate_output<T>(result: &Paginated<T>) -> Vec<String> {
    let mut lines = Vec::new();

    for (pos, collection) in result.collections.iter().enumerate() {
        let item_count: usize = collection.pages.iter().map(|p| p.items.len()).sum();
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(pos + 1),
            collection.name,
            plural(item_count, "item", "items"),
            plural(collection.pages.len(), "page", "pages"),
        ));

        let paths = paths_by_page(result, collection);
        for (page, page_paths) in collection.pages.iter().zip(&paths) {
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(page.num),
                page.name,
                plural(page.items.len(), "item", "items"),
            ));
            for path in page_paths {
                lines.push(format!("{}→ {}", indent(2), path));
            }
        }
    }

    lines.push(String::new());
    lines.push(format_summary(result));
    lines
}

/// One-line totals: files written and collections processed.
pub fn format_summary<T>(result: &Paginated<T>) -> String {
    format!(
        "Generated {} from {}",
        plural(result.files.len(), "file", "files"),
        plural(result.collections.len(), "collection", "collections"),
    )
}

pub fn print_paginate_output<T>(result: &Paginated<T>) {
    for line in format_paginate_output(result) {
        println!("{}", line);
    }
}
