//! Pages and page navigation.
//!
//! A paginated collection is a [`PageSet`]: the finished, ordered sequence of
//! [`Page`]s, frozen once every item has been grouped. Every output record
//! holds a [`PageRef`], a cheap `(Arc<PageSet>, index)` handle that answers
//! navigation questions at call time:
//!
//! ```text
//! previous ← [ page 1 ] ⇄ [ page 2 ] ⇄ [ page 3 ] → next
//!              first                     last
//! ```
//!
//! Links are positions in the shared sequence rather than stored references,
//! so there are no cycles and nothing to keep in sync after the set is built.
//! Two handles are equal when they point into the same set allocation at the
//! same index, which is the identity the templates care about.

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// One group of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Zero-based position in the page sequence.
    pub index: usize,
    /// One-based page number.
    pub num: usize,
    /// Group key that produced this page.
    pub name: String,
    /// Items in source order.
    pub items: Vec<T>,
    /// Primary output path. For page one with a `first` template this is the
    /// `first` path, so links to page one point there.
    pub path: String,
    /// The `path` template result, whether or not it was overridden.
    pub paginated_path: String,
}

/// The frozen page sequence of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet<T> {
    pages: Vec<Page<T>>,
}

impl<T> PageSet<T> {
    pub(crate) fn new(pages: Vec<Page<T>>) -> Self {
        debug_assert!(pages.iter().enumerate().all(|(i, p)| p.index == i));
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page<T>> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<T>> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[Page<T>] {
        &self.pages
    }

    /// Handle to the page at `index`, if it exists.
    pub fn page_ref(self: &Arc<Self>, index: usize) -> Option<PageRef<T>> {
        (index < self.len()).then(|| PageRef {
            set: Arc::clone(self),
            index,
        })
    }

    /// Handles to every page, in order.
    pub fn refs(self: &Arc<Self>) -> Vec<PageRef<T>> {
        (0..self.len())
            .map(|index| PageRef {
                set: Arc::clone(self),
                index,
            })
            .collect()
    }
}

impl<'a, T> IntoIterator for &'a PageSet<T> {
    type Item = &'a Page<T>;
    type IntoIter = std::slice::Iter<'a, Page<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Range of `n` pages centered on `index` in a sequence of `total` pages.
///
/// Uses `offset = n / 2`. Near the end the window clamps to the last `n`
/// pages; near the start it clamps to the first. Asking for more pages than
/// exist yields all of them.
pub fn window(index: usize, n: usize, total: usize) -> Range<usize> {
    let offset = n / 2;
    if index + offset >= total {
        total.saturating_sub(n)..total
    } else {
        let start = index.saturating_sub(offset);
        start..(start + n).min(total)
    }
}

/// Navigation handle to one page of a [`PageSet`].
pub struct PageRef<T> {
    set: Arc<PageSet<T>>,
    index: usize,
}

impl<T> Clone for PageRef<T> {
    fn clone(&self) -> Self {
        Self {
            set: Arc::clone(&self.set),
            index: self.index,
        }
    }
}

impl<T> PartialEq for PageRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.set, &other.set) && self.index == other.index
    }
}

impl<T> Eq for PageRef<T> {}

impl<T> fmt::Debug for PageRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page();
        f.debug_struct("PageRef")
            .field("index", &page.index)
            .field("name", &page.name)
            .field("path", &page.path)
            .finish()
    }
}

impl<T> PageRef<T> {
    pub fn page(&self) -> &Page<T> {
        &self.set.pages[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn num(&self) -> usize {
        self.index + 1
    }

    pub fn name(&self) -> &str {
        &self.page().name
    }

    pub fn items(&self) -> &[T] {
        &self.page().items
    }

    pub fn path(&self) -> &str {
        &self.page().path
    }

    /// The shared page sequence this page belongs to.
    pub fn pages(&self) -> &Arc<PageSet<T>> {
        &self.set
    }

    pub fn previous(&self) -> Option<PageRef<T>> {
        self.index.checked_sub(1).and_then(|i| self.set.page_ref(i))
    }

    pub fn next(&self) -> Option<PageRef<T>> {
        self.set.page_ref(self.index + 1)
    }

    pub fn first(&self) -> PageRef<T> {
        self.at(0)
    }

    pub fn last(&self) -> PageRef<T> {
        self.at(self.set.len() - 1)
    }

    /// Up to `n` contiguous pages centered on this one. See [`window`].
    pub fn get_pages(&self, n: usize) -> Vec<PageRef<T>> {
        window(self.index, n, self.set.len())
            .map(|i| self.at(i))
            .collect()
    }

    fn at(&self, index: usize) -> PageRef<T> {
        PageRef {
            set: Arc::clone(&self.set),
            index,
        }
    }
}

/// Serialized form of the pagination context. Neighbors are given by path
/// since the JSON output can't carry object references.
#[derive(Serialize)]
struct PaginationContext<'a, T> {
    index: usize,
    num: usize,
    name: &'a str,
    total: usize,
    items: &'a [T],
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<&'a str>,
    first: &'a str,
    last: &'a str,
}

impl<T: Serialize> Serialize for PageRef<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let pages = self.set.as_slice();
        let page = self.page();
        PaginationContext {
            index: page.index,
            num: page.num,
            name: &page.name,
            total: pages.len(),
            items: &page.items,
            previous: self
                .index
                .checked_sub(1)
                .map(|i| pages[i].path.as_str()),
            next: pages.get(self.index + 1).map(|p| p.path.as_str()),
            first: &pages[0].path,
            last: &pages[pages.len() - 1].path,
        }
        .serialize(serializer)
    }
}
