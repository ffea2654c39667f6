//! Per-collection pagination options.
//!
//! [`Options`] enumerates every recognized setting with its default applied
//! at construction. Builder-style setters keep call sites short:
//!
//! ```rust
//! use folio_paginate::options::Options;
//!
//! let opts: Options<u32> = Options::new()
//!     .per_page(3)
//!     .template("index.html")
//!     .path("articles/page/:num/index.html")
//!     .first("articles/index.html");
//! ```
//!
//! Validation is deferred to [`Options::validate`], which the paginator calls
//! for each collection before any pages are built.

use crate::paginate::PaginateError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Items per page used when nothing else is configured.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Page sizing for the default grouping function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerPage {
    /// Every page holds up to `n` items.
    Count(usize),
    /// Page one holds up to `first` items, every later page up to `rest`.
    Split { first: usize, rest: usize },
}

impl Default for PerPage {
    fn default() -> Self {
        PerPage::Count(DEFAULT_PER_PAGE)
    }
}

impl PerPage {
    /// One-based group number for the item at zero-based `index`.
    ///
    /// - `Count(p)`: `ceil((index + 1) / p)`
    /// - `Split { first, rest }`: group 1 below `first`, then
    ///   `1 + ceil((index - first + 1) / rest)`
    pub fn group_of(&self, index: usize) -> usize {
        match *self {
            PerPage::Count(per_page) => (index + 1).div_ceil(per_page),
            PerPage::Split { first, rest } => {
                if index < first {
                    1
                } else {
                    1 + (index - first + 1).div_ceil(rest)
                }
            }
        }
    }

    fn is_valid(&self) -> bool {
        match *self {
            PerPage::Count(per_page) => per_page > 0,
            PerPage::Split { rest, .. } => rest > 0,
        }
    }
}

/// Predicate applied to source items before grouping.
pub type Filter<T> = Box<dyn Fn(&T) -> bool>;

/// Custom grouping function: `(item, index, options) → group key`.
pub type GroupBy<T> = Box<dyn Fn(&T, usize, &Options<T>) -> String>;

/// How an external renderer should turn a page into contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Render {
    Template(String),
    Layout(String),
}

/// Options for paginating one named collection.
pub struct Options<T> {
    pub per_page: PerPage,
    pub group_by: Option<GroupBy<T>>,
    pub filter: Option<Filter<T>>,
    pub template: Option<String>,
    pub layout: Option<String>,
    /// Output path template for every page (`:num`, `:name`, ...).
    pub path: Option<String>,
    /// Output path template that overrides page one's path.
    pub first: Option<String>,
    /// Skip the `path` entry for page one (requires `first`).
    pub no_page_one: bool,
    /// Fields shallow-merged into every output record.
    pub page_metadata: Map<String, Value>,
    /// Initial contents placeholder for every output record.
    pub page_contents: Option<String>,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            per_page: PerPage::default(),
            group_by: None,
            filter: None,
            template: None,
            layout: None,
            path: None,
            first: None,
            no_page_one: false,
            page_metadata: Map::new(),
            page_contents: None,
        }
    }
}

impl<T> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("per_page", &self.per_page)
            .field("group_by", &self.group_by.as_ref().map(|_| "<fn>"))
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("template", &self.template)
            .field("layout", &self.layout)
            .field("path", &self.path)
            .field("first", &self.first)
            .field("no_page_one", &self.no_page_one)
            .field("page_metadata", &self.page_metadata)
            .field("page_contents", &self.page_contents)
            .finish()
    }
}

impl<T> Options<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = PerPage::Count(per_page);
        self
    }

    pub fn per_page_split(mut self, first: usize, rest: usize) -> Self {
        self.per_page = PerPage::Split { first, rest };
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn first(mut self, first: impl Into<String>) -> Self {
        self.first = Some(first.into());
        self
    }

    pub fn no_page_one(mut self, no_page_one: bool) -> Self {
        self.no_page_one = no_page_one;
        self
    }

    pub fn page_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.page_metadata = metadata;
        self
    }

    /// Add a single `page_metadata` field.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.page_metadata.insert(key.into(), value.into());
        self
    }

    pub fn page_contents(mut self, contents: impl Into<String>) -> Self {
        self.page_contents = Some(contents.into());
        self
    }

    pub fn filter(mut self, filter: impl Fn(&T) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn group_by(mut self, group_by: impl Fn(&T, usize, &Options<T>) -> String + 'static) -> Self {
        self.group_by = Some(Box::new(group_by));
        self
    }

    /// Check the options for collection `name`, returning the render target.
    ///
    /// Empty strings count as unset. Rules, in evaluation order:
    /// - exactly one of `template` / `layout`
    /// - `path` is set
    /// - `no_page_one` requires `first`
    /// - page sizes are non-zero
    pub fn validate(&self, name: &str) -> Result<Render, PaginateError> {
        let template = self.template.as_deref().filter(|s| !s.is_empty());
        let layout = self.layout.as_deref().filter(|s| !s.is_empty());
        let render = match (template, layout) {
            (None, None) => return Err(PaginateError::TemplateRequired(name.to_string())),
            (Some(_), Some(_)) => {
                return Err(PaginateError::TemplateAndLayout(name.to_string()));
            }
            (Some(template), None) => Render::Template(template.to_string()),
            (None, Some(layout)) => Render::Layout(layout.to_string()),
        };
        if self.path.as_deref().is_none_or(str::is_empty) {
            return Err(PaginateError::PathRequired(name.to_string()));
        }
        if self.no_page_one && self.first_path().is_none() {
            return Err(PaginateError::FirstRequired(name.to_string()));
        }
        if !self.per_page.is_valid() {
            return Err(PaginateError::InvalidPerPage(name.to_string()));
        }
        Ok(render)
    }

    /// The `first` template, if set and non-empty.
    pub fn first_path(&self) -> Option<&str> {
        self.first.as_deref().filter(|s| !s.is_empty())
    }

    /// Group key for `item` at `index`: custom `group_by` or page number.
    pub fn group_key(&self, item: &T, index: usize) -> String {
        match &self.group_by {
            Some(group_by) => group_by(item, index, self),
            None => self.per_page.group_of(index).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(per_page: PerPage, len: usize) -> Vec<usize> {
        (0..len).map(|i| per_page.group_of(i)).collect()
    }

    #[test]
    fn default_per_page_is_ten() {
        let opts: Options<()> = Options::new();
        assert_eq!(opts.per_page, PerPage::Count(10));
    }

    #[test]
    fn count_groups_in_runs() {
        assert_eq!(groups(PerPage::Count(3), 7), vec![1, 1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn count_of_one_gives_each_item_a_page() {
        assert_eq!(groups(PerPage::Count(1), 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn split_uses_first_size_then_rest() {
        let per_page = PerPage::Split { first: 2, rest: 3 };
        assert_eq!(groups(per_page, 9), vec![1, 1, 2, 2, 2, 3, 3, 3, 4]);
    }

    #[test]
    fn split_with_empty_first_page_starts_at_two() {
        let per_page = PerPage::Split { first: 0, rest: 2 };
        assert_eq!(groups(per_page, 3), vec![2, 2, 3]);
    }

    #[test]
    fn group_key_defaults_to_page_number() {
        let opts: Options<&str> = Options::new().per_page(2);
        assert_eq!(opts.group_key(&"a", 0), "1");
        assert_eq!(opts.group_key(&"c", 2), "2");
    }

    #[test]
    fn group_key_uses_custom_function() {
        let opts: Options<&str> = Options::new().group_by(|item: &&str, _, _| item.to_uppercase());
        assert_eq!(opts.group_key(&"news", 0), "NEWS");
    }

    #[test]
    fn group_by_receives_index_and_options() {
        let opts: Options<&str> = Options::new()
            .per_page(5)
            .group_by(|_: &&str, index: usize, opts: &Options<&str>| format!("{}-{}", index, opts.per_page.group_of(index)));
        assert_eq!(opts.group_key(&"x", 6), "6-2");
    }

    #[test]
    fn validate_requires_template_or_layout() {
        let opts: Options<()> = Options::new().path("p/:num");
        let err = opts.validate("posts").unwrap_err();
        assert_eq!(err.to_string(), "A template or layout is required (posts)");
    }

    #[test]
    fn validate_rejects_template_and_layout() {
        let opts: Options<()> = Options::new().template("a").layout("b").path("p");
        let err = opts.validate("posts").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Template and layout can not be used simultaneously (posts)"
        );
    }

    #[test]
    fn validate_requires_path() {
        let opts: Options<()> = Options::new().template("a");
        let err = opts.validate("posts").unwrap_err();
        assert_eq!(err.to_string(), "The path is required (posts)");
    }

    #[test]
    fn validate_treats_empty_strings_as_unset() {
        let opts: Options<()> = Options::new().template("").path("p/:num");
        assert_eq!(
            opts.validate("posts"),
            Err(PaginateError::TemplateRequired("posts".into()))
        );

        let opts: Options<()> = Options::new().layout("").path("p/:num");
        assert_eq!(
            opts.validate("posts"),
            Err(PaginateError::TemplateRequired("posts".into()))
        );

        let opts: Options<()> = Options::new().template("t").layout("").path("p/:num");
        assert_eq!(
            opts.validate("posts"),
            Ok(Render::Template("t".into()))
        );

        let opts: Options<()> = Options::new().template("t").path("");
        assert_eq!(
            opts.validate("posts"),
            Err(PaginateError::PathRequired("posts".into()))
        );

        let opts: Options<()> = Options::new()
            .template("t")
            .path("p/:num")
            .first("")
            .no_page_one(true);
        assert_eq!(
            opts.validate("posts"),
            Err(PaginateError::FirstRequired("posts".into()))
        );
    }

    #[test]
    fn validate_no_page_one_requires_first() {
        let opts: Options<()> = Options::new().template("a").path("123").no_page_one(true);
        let err = opts.validate("posts").unwrap_err();
        assert_eq!(
            err.to_string(),
            "When `noPageOne` is enabled, a first page must be set (posts)"
        );
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let opts: Options<()> = Options::new().template("a").path("p").per_page(0);
        assert!(matches!(
            opts.validate("posts"),
            Err(PaginateError::InvalidPerPage(_))
        ));

        let opts: Options<()> = Options::new().template("a").path("p").per_page_split(3, 0);
        assert!(matches!(
            opts.validate("posts"),
            Err(PaginateError::InvalidPerPage(_))
        ));
    }

    #[test]
    fn validate_returns_render_target() {
        let opts: Options<()> = Options::new().layout("list.hbs").path("p");
        assert_eq!(
            opts.validate("posts").unwrap(),
            Render::Layout("list.hbs".into())
        );

        let opts: Options<()> = Options::new()
            .template("index.jade")
            .path("p")
            .first("index.html")
            .no_page_one(true);
        assert_eq!(
            opts.validate("posts").unwrap(),
            Render::Template("index.jade".into())
        );
    }

    #[test]
    fn meta_adds_fields() {
        let opts: Options<()> = Options::new().meta("foo", "bar").meta("count", 3);
        assert_eq!(opts.page_metadata["foo"], "bar");
        assert_eq!(opts.page_metadata["count"], 3);
    }
}
