//! Pagination configuration module.
//!
//! Handles loading and validating `paginate.toml`. The file declares one
//! `[[collection]]` table per paginated collection; tables are processed in
//! the order they appear, and the first failing collection stops the batch.
//!
//! ## Configuration Options
//!
//! ```toml
//! [[collection]]
//! name = "collections.articles"       # Dotted reference into the metadata (required)
//! per_page = 10                       # Or [first, rest], e.g. [5, 10]
//! template = "index.html"             # Exactly one of template / layout
//! path = "articles/page/:num/index.html"
//! first = "articles/index.html"       # Optional page-one override
//! no_page_one = false                 # Skip `path` for page one (requires `first`)
//! filter = { draft = false }          # Or a field name: filter = "published"
//! group_by = "date"                   # Group on a field instead of page size
//! group_by_date = "year"              # year | month | day prefix of `group_by`
//! page_contents = ""
//!
//! [collection.page_metadata]
//! title = "Articles"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Option combinations that
//! the paginator itself checks (template/layout, path, first) are reported by
//! the paginator with the collection name, so `check` and `paginate` give the
//! same messages.

use crate::matcher::{DatePart, FilterSpec, GroupSpec};
use crate::options::{Options, PerPage};
use crate::paginate::Paginator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `paginate.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginateConfig {
    /// Collections in processing order.
    #[serde(rename = "collection")]
    pub collections: Vec<CollectionConfig>,
}

/// Page size as written in TOML: `10` or `[5, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerPageConfig {
    Count(usize),
    Split([usize; 2]),
}

impl From<PerPageConfig> for PerPage {
    fn from(value: PerPageConfig) -> Self {
        match value {
            PerPageConfig::Count(n) => PerPage::Count(n),
            PerPageConfig::Split([first, rest]) => PerPage::Split { first, rest },
        }
    }
}

/// One `[[collection]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Dotted reference to the collection inside the metadata.
    pub name: String,
    pub per_page: Option<PerPageConfig>,
    /// Dotted field path to group on.
    pub group_by: Option<String>,
    /// Group on the year, month or day prefix of a date field.
    pub group_by_date: Option<DatePart>,
    pub filter: Option<FilterSpec>,
    pub template: Option<String>,
    pub layout: Option<String>,
    pub path: Option<String>,
    pub first: Option<String>,
    #[serde(default)]
    pub no_page_one: bool,
    /// Kept as TOML so datetimes survive until [`toml_to_json`] renders
    /// them as strings.
    #[serde(default)]
    pub page_metadata: toml::Table,
    pub page_contents: Option<String>,
}

impl CollectionConfig {
    /// Compile into library options over JSON items.
    pub fn into_options(self) -> Options<Value> {
        let mut options = Options::new();
        if let Some(per_page) = self.per_page {
            options.per_page = per_page.into();
        }
        if let Some(field) = self.group_by {
            options.group_by = Some(
                GroupSpec {
                    field,
                    date: self.group_by_date,
                }
                .compile(),
            );
        }
        options.filter = self.filter.map(FilterSpec::compile);
        options.template = self.template;
        options.layout = self.layout;
        options.path = self.path;
        options.first = self.first;
        options.no_page_one = self.no_page_one;
        options.page_metadata = table_to_json(self.page_metadata);
        options.page_contents = self.page_contents;
        options
    }
}

/// Convert a TOML value to JSON. Datetimes become their RFC 3339 string and
/// non-finite floats become `null`.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(table_to_json(table)),
    }
}

fn table_to_json(table: toml::Table) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect()
}

impl PaginateConfig {
    /// Validate structure that the paginator doesn't check itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "collection.name must not be empty".into(),
                ));
            }
            if !seen.insert(collection.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "collection \"{}\" is declared more than once",
                    collection.name
                )));
            }
            if collection.group_by_date.is_some() && collection.group_by.is_none() {
                return Err(ConfigError::Validation(format!(
                    "group_by_date needs group_by ({})",
                    collection.name
                )));
            }
        }
        Ok(())
    }

    /// Build a paginator for every declared collection, in order.
    pub fn into_paginator(self) -> Paginator<Value> {
        self.collections
            .into_iter()
            .fold(Paginator::new(), |paginator, collection| {
                let name = collection.name.clone();
                paginator.collection(name, collection.into_options())
            })
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<PaginateConfig, ConfigError> {
    let config: PaginateConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<PaginateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented example `paginate.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-paginate configuration
# ============================
# One [[collection]] table per paginated collection. Collections are
# processed in the order they appear; the first error stops the run.
#
# Path templates may use these placeholders:
#   :num    one-based page number
#   :index  zero-based page index
#   :name   group key of the page (the page number unless group_by is set)
#   :total  number of pages in the collection

[[collection]]
# Dotted reference to the collection in the metadata file.
name = "collections.articles"

# Items per page. Use [first, rest] to size page one separately,
# e.g. per_page = [5, 10].
per_page = 10

# Exactly one of template / layout is passed through to the renderer.
template = "index.html"
# layout = "list.html"

# Output path for every page.
path = "articles/page/:num/index.html"

# Optional output path for page one, in addition to `path`.
first = "articles/index.html"

# Skip the `path` entry for page one; requires `first`.
no_page_one = false

# Keep only some items: a field name (kept when truthy) or a table of
# dotted keys that must all match.
# filter = "published"
# filter = { draft = false }

# Group on a field instead of page size. Pages are ordered by the first
# item of each group.
# group_by = "date"
# group_by_date = "year"    # year | month | day

# Initial contents for every generated page.
# page_contents = ""

# Extra fields merged into every generated page.
[collection.page_metadata]
title = "Articles"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    #[test]
    fn parse_minimal_collection() {
        let config = parse_config(
            r#"
[[collection]]
name = "posts"
template = "index.html"
path = "posts/:num"
"#,
        )
        .unwrap();

        assert_eq!(config.collections.len(), 1);
        let posts = &config.collections[0];
        assert_eq!(posts.name, "posts");
        assert_eq!(posts.per_page, None);
        assert!(!posts.no_page_one);
        assert!(posts.page_metadata.is_empty());
    }

    #[test]
    fn empty_config_has_no_collections() {
        let config = parse_config("").unwrap();
        assert!(config.collections.is_empty());
    }

    #[test]
    fn parse_per_page_forms() {
        let config = parse_config(
            r#"
[[collection]]
name = "a"
per_page = 3

[[collection]]
name = "b"
per_page = [2, 5]
"#,
        )
        .unwrap();

        assert_eq!(config.collections[0].per_page, Some(PerPageConfig::Count(3)));
        assert_eq!(
            config.collections[1].per_page,
            Some(PerPageConfig::Split([2, 5]))
        );
        assert_eq!(
            PerPage::from(PerPageConfig::Split([2, 5])),
            PerPage::Split { first: 2, rest: 5 }
        );
    }

    #[test]
    fn collections_keep_declaration_order() {
        let config = parse_config(
            r#"
[[collection]]
name = "zebra"

[[collection]]
name = "alpha"
"#,
        )
        .unwrap();
        let names: Vec<&str> = config.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "alpha"]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse_config(
            r#"
[[collection]]
name = "posts"
perPage = 3
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = parse_config(
            r#"
[[collection]]
name = "posts"

[[collection]]
name = "posts"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn rejects_empty_name() {
        let err = parse_config("[[collection]]\nname = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_date_grouping_without_field() {
        let err = parse_config(
            r#"
[[collection]]
name = "posts"
group_by_date = "year"
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Config validation error: group_by_date needs group_by (posts)"
        );
    }

    #[test]
    fn page_metadata_becomes_json() {
        let config = parse_config(
            r#"
[[collection]]
name = "posts"

[collection.page_metadata]
foo = "bar"
some = { thing = true }
"#,
        )
        .unwrap();
        let options = config.collections[0].clone().into_options();
        assert_eq!(options.page_metadata["foo"], "bar");
        assert_eq!(options.page_metadata["some"], json!({ "thing": true }));
    }

    #[test]
    fn page_metadata_datetimes_become_strings() {
        let config = parse_config(
            r#"
[[collection]]
name = "posts"

[collection.page_metadata]
updated = 2024-03-01T10:30:00Z
day = 2024-03-01
ratio = 0.5
tags = ["a", 1]
"#,
        )
        .unwrap();
        let options = config.collections[0].clone().into_options();
        assert_eq!(options.page_metadata["updated"], "2024-03-01T10:30:00Z");
        assert_eq!(options.page_metadata["day"], "2024-03-01");
        assert_eq!(options.page_metadata["ratio"], 0.5);
        assert_eq!(options.page_metadata["tags"], json!(["a", 1]));
    }

    #[test]
    fn into_options_carries_every_field() {
        let config = parse_config(
            r#"
[[collection]]
name = "posts"
per_page = [1, 2]
layout = "list.hbs"
path = "p/:num"
first = "index.html"
no_page_one = true
page_contents = "placeholder"
filter = "published"

[collection.page_metadata]
title = "Posts"
"#,
        )
        .unwrap();

        let options = config.collections[0].clone().into_options();
        assert_eq!(options.per_page, PerPage::Split { first: 1, rest: 2 });
        assert_eq!(options.layout.as_deref(), Some("list.hbs"));
        assert!(options.template.is_none());
        assert_eq!(options.path.as_deref(), Some("p/:num"));
        assert_eq!(options.first.as_deref(), Some("index.html"));
        assert!(options.no_page_one);
        assert_eq!(options.page_contents.as_deref(), Some("placeholder"));
        assert_eq!(options.page_metadata["title"], "Posts");

        let filter = options.filter.as_ref().unwrap();
        assert!(filter(&json!({ "published": true })));
        assert!(!filter(&json!({ "published": false })));
    }

    #[test]
    fn declarative_filter_and_grouping_drive_paginator() {
        let config = parse_config(
            r#"
[[collection]]
name = "collections.articles"
template = "index.jade"
path = "articles/:name/index.html"
group_by = "date"
group_by_date = "year"
filter = { hide = false }
"#,
        )
        .unwrap();

        let metadata = json!({
            "collections": {
                "articles": [
                    { "id": 1, "date": "2014-11-07", "hide": false },
                    { "id": 2, "date": "2014-12-12", "hide": true },
                    { "id": 3, "date": "2015-10-23", "hide": false },
                    { "id": 4, "date": "2014-01-02", "hide": false },
                ]
            }
        });

        let result = config.into_paginator().run(&metadata).unwrap();
        assert_eq!(
            file_paths(&result),
            vec!["articles/2014/index.html", "articles/2015/index.html"]
        );
        let pages = result.pages("collections.articles").unwrap();
        assert_eq!(page_item_ids(pages), vec![vec![1, 4], vec![3]]);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = write_config(
            r#"
[[collection]]
name = "posts"
template = "t"
path = "p/:num"
"#,
        );
        let config = load_config(&config_path(tmp.path())).unwrap();
        assert_eq!(config.collections[0].template.as_deref(), Some("t"));
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_config(&config_path(tmp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn stock_config_parses_and_runs() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config.collections.len(), 1);

        let result = config.into_paginator().run(&articles_metadata(25)).unwrap();
        assert_eq!(
            file_paths(&result),
            vec![
                "articles/index.html",
                "articles/page/1/index.html",
                "articles/page/2/index.html",
                "articles/page/3/index.html",
            ]
        );
        assert_eq!(
            find_file(&result, "articles/index.html").metadata["title"],
            "Articles"
        );
    }
}
