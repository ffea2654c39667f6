//! Collection resolution.
//!
//! The paginator never reaches into caller data by itself. Instead the caller
//! hands it a [`CollectionSource`] that maps a collection name to its ordered
//! items. Three sources are provided:
//!
//! - `serde_json::Value`: dotted names (`collections.articles`) walk nested
//!   objects and must end at an array
//! - `BTreeMap<String, Vec<T>>`: exact key lookup
//! - [`from_fn`]: any `Fn(&str) -> Option<Vec<T>>` closure

use serde_json::Value;
use std::collections::BTreeMap;

/// Resolves a collection name to its ordered items.
pub trait CollectionSource<T> {
    fn collection(&self, name: &str) -> Option<Vec<T>>;
}

impl CollectionSource<Value> for Value {
    fn collection(&self, name: &str) -> Option<Vec<Value>> {
        lookup_path(self, name)?.as_array().cloned()
    }
}

impl<T: Clone> CollectionSource<T> for BTreeMap<String, Vec<T>> {
    fn collection(&self, name: &str) -> Option<Vec<T>> {
        self.get(name).cloned()
    }
}

/// A source backed by a closure. Built with [`from_fn`].
pub struct FnSource<F>(F);

/// Use a closure as a [`CollectionSource`].
pub fn from_fn<T, F>(f: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<Vec<T>>,
{
    FnSource(f)
}

impl<T, F> CollectionSource<T> for FnSource<F>
where
    F: Fn(&str) -> Option<Vec<T>>,
{
    fn collection(&self, name: &str) -> Option<Vec<T>> {
        (self.0)(name)
    }
}

/// Walk a dotted path (`a.b.c`) through nested JSON objects.
///
/// Numeric segments also index into arrays, so `posts.0.title` works.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
