//! Collection pagination.
//!
//! The [`Paginator`] takes named collections with their [`Options`], splits
//! each collection into pages and produces the output file map that an
//! external renderer fills in:
//!
//! ```text
//! collections.articles (7 items), per_page = 3, path = "page/:num", first = "index"
//!
//!   index   → page 1  [1, 2, 3]
//!   page/1  → page 1  [1, 2, 3]
//!   page/2  → page 2  [4, 5, 6]
//!   page/3  → page 3  [7]
//! ```
//!
//! ## Per-Collection Flow
//!
//! 1. Resolve the collection through the caller's [`CollectionSource`]
//! 2. Validate the options
//! 3. Apply the filter, preserving order
//! 4. Group in one pass: a page is created the first time its key is seen
//!    and every later item with that key joins it, contiguous or not
//! 5. Interpolate paths, freeze the [`PageSet`], register output records
//!
//! Collections are processed in declaration order. The first error aborts the
//! whole batch and no partial result is returned.
//!
//! The input is never mutated: pages come back in [`Paginated::collections`]
//! next to the file map.

use crate::interpolate::{PathContext, interpolate};
use crate::options::{Options, Render};
use crate::page::{Page, PageRef, PageSet};
use crate::source::CollectionSource;
use log::{debug, trace, warn};
use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginateError {
    #[error("Collection not found ({0})")]
    CollectionNotFound(String),
    #[error("A template or layout is required ({0})")]
    TemplateRequired(String),
    #[error("Template and layout can not be used simultaneously ({0})")]
    TemplateAndLayout(String),
    #[error("The path is required ({0})")]
    PathRequired(String),
    #[error("When `noPageOne` is enabled, a first page must be set ({0})")]
    FirstRequired(String),
    #[error("Page sizes must be greater than zero ({0})")]
    InvalidPerPage(String),
}

/// One entry of the output file map.
#[derive(Debug, Clone)]
pub struct PageFile<T> {
    /// Key this record is registered under.
    pub path: String,
    pub render: Render,
    /// Placeholder for the renderer; `page_contents` or empty.
    pub contents: String,
    /// `page_metadata` fields.
    pub metadata: Map<String, Value>,
    pub pagination: PageRef<T>,
}

/// Keys the record's own fields take over from `page_metadata`.
const RESERVED_KEYS: &[&str] = &["template", "layout", "contents", "path", "pagination"];

impl<T: Serialize> Serialize for PageFile<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.metadata {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        match &self.render {
            Render::Template(template) => map.serialize_entry("template", template)?,
            Render::Layout(layout) => map.serialize_entry("layout", layout)?,
        }
        map.serialize_entry("contents", &self.contents)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("pagination", &self.pagination)?;
        map.end()
    }
}

/// The pages of one collection.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub name: String,
    pub pages: Arc<PageSet<T>>,
}

/// Result of a pagination batch.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Output records keyed by path.
    pub files: BTreeMap<String, PageFile<T>>,
    /// Page sequences in declaration order.
    pub collections: Vec<Collection<T>>,
}

impl<T> Paginated<T> {
    /// Pages of the named collection.
    pub fn pages(&self, name: &str) -> Option<&Arc<PageSet<T>>> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.pages)
    }
}

impl<T: Serialize> Serialize for Paginated<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.files.serialize(serializer)
    }
}

/// A batch of named collections to paginate.
pub struct Paginator<T> {
    collections: Vec<(String, Options<T>)>,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self {
            collections: Vec::new(),
        }
    }
}

impl<T: Clone> Paginator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection. Collections run in the order they are added.
    pub fn collection(mut self, name: impl Into<String>, options: Options<T>) -> Self {
        self.collections.push((name.into(), options));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|(name, _)| name.as_str())
    }

    /// Paginate every collection from `source`.
    pub fn run<S>(&self, source: &S) -> Result<Paginated<T>, PaginateError>
    where
        S: CollectionSource<T> + ?Sized,
    {
        let mut result = Paginated {
            files: BTreeMap::new(),
            collections: Vec::with_capacity(self.collections.len()),
        };

        for (name, options) in &self.collections {
            let items = source
                .collection(name)
                .ok_or_else(|| PaginateError::CollectionNotFound(name.clone()))?;
            let (pages, files) = paginate_collection(name, items, options)?;

            for file in files {
                if result.files.contains_key(&file.path) {
                    warn!("{name}: output path {} replaces an earlier page", file.path);
                }
                trace!("{name}: registered {}", file.path);
                result.files.insert(file.path.clone(), file);
            }
            result.collections.push(Collection {
                name: name.clone(),
                pages,
            });
        }

        Ok(result)
    }
}

/// Paginate one already-resolved collection.
///
/// Returns the frozen page sequence and the output records for it, in
/// registration order.
pub fn paginate_collection<T: Clone>(
    name: &str,
    items: Vec<T>,
    options: &Options<T>,
) -> Result<(Arc<PageSet<T>>, Vec<PageFile<T>>), PaginateError> {
    let render = options.validate(name)?;
    let source_len = items.len();

    let items: Vec<T> = match &options.filter {
        Some(filter) => items.into_iter().filter(|item| filter(item)).collect(),
        None => items,
    };
    let shown = items.len();

    let mut pages = group(items, options);
    assign_paths(&mut pages, options);
    let pages = Arc::new(PageSet::new(pages));

    debug!(
        "{name}: {shown} of {source_len} items into {} pages",
        pages.len()
    );

    let record = |pagination: PageRef<T>, path: String| PageFile {
        path,
        render: render.clone(),
        contents: options.page_contents.clone().unwrap_or_default(),
        metadata: options.page_metadata.clone(),
        pagination,
    };

    let mut files = Vec::with_capacity(pages.len() + 1);
    for page in pages.refs() {
        if page.index() == 0 {
            if !options.no_page_one {
                let path = page.page().paginated_path.clone();
                files.push(record(page.clone(), path));
            }
            if options.first_path().is_some() {
                let path = page.path().to_string();
                files.push(record(page, path));
            }
        } else {
            let path = page.path().to_string();
            files.push(record(page, path));
        }
    }

    Ok((pages, files))
}

/// Group items into pages, ordered by first occurrence of each key.
fn group<T>(items: Vec<T>, options: &Options<T>) -> Vec<Page<T>> {
    let mut pages: Vec<Page<T>> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (index, item) in items.into_iter().enumerate() {
        let key = options.group_key(&item, index);
        let slot = *by_key.entry(key).or_insert_with_key(|key| {
            let index = pages.len();
            pages.push(Page {
                index,
                num: index + 1,
                name: key.clone(),
                items: Vec::new(),
                path: String::new(),
                paginated_path: String::new(),
            });
            index
        });
        pages[slot].items.push(item);
    }

    pages
}

fn assign_paths<T>(pages: &mut [Page<T>], options: &Options<T>) {
    let total = pages.len();
    let template = options.path.as_deref().unwrap_or_default();

    for page in pages.iter_mut() {
        let ctx = PathContext {
            index: page.index,
            num: page.num,
            name: &page.name,
            total,
        };
        let paginated_path = interpolate(template, &ctx);
        page.path = match (options.first_path(), page.index) {
            (Some(first), 0) => interpolate(first, &ctx),
            _ => paginated_path.clone(),
        };
        page.paginated_path = paginated_path;
    }
}
