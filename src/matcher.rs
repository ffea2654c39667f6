//! Declarative filters and grouping for JSON items.
//!
//! Config files can't carry closures, so `filter` and `group_by` are written
//! declaratively and compiled into the same function types the library API
//! takes:
//!
//! ```toml
//! filter = "published"             # field is truthy
//! filter = { hide = false }        # every dotted key equals its value
//! group_by = "date"                # stringified field value
//! group_by_date = "year"           # ...sliced to YYYY / YYYY-MM / YYYY-MM-DD
//! ```
//!
//! Truthiness follows JSON conventions: `null`, `false`, `0`, `""` and missing
//! fields are falsy; everything else (including empty arrays) is truthy.

use crate::options::{Filter, GroupBy, Options};
use crate::source::lookup_path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A declarative item filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// Keep items whose field at this dotted path is truthy.
    Field(String),
    /// Keep items where every dotted key equals the given value.
    Equals(Map<String, Value>),
}

impl FilterSpec {
    pub fn matches(&self, item: &Value) -> bool {
        match self {
            FilterSpec::Field(path) => lookup_path(item, path).is_some_and(is_truthy),
            FilterSpec::Equals(expected) => expected
                .iter()
                .all(|(path, value)| lookup_path(item, path) == Some(value)),
        }
    }

    pub fn compile(self) -> Filter<Value> {
        Box::new(move |item: &Value| self.matches(item))
    }
}

/// Which prefix of an ISO-8601 date to group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn prefix_len(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month => 7,
            DatePart::Day => 10,
        }
    }

    /// `2014-11-07T10:00:00Z` → `2014` / `2014-11` / `2014-11-07`.
    ///
    /// Values shorter than the prefix are returned whole.
    pub fn slice(self, date: &str) -> &str {
        date.get(..self.prefix_len()).unwrap_or(date)
    }
}

/// A declarative grouping on one item field.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub field: String,
    pub date: Option<DatePart>,
}

impl GroupSpec {
    pub fn key(&self, item: &Value) -> String {
        let value = lookup_path(item, &self.field).map(stringify).unwrap_or_default();
        match self.date {
            Some(part) => part.slice(&value).to_string(),
            None => value,
        }
    }

    pub fn compile(self) -> GroupBy<Value> {
        Box::new(move |item: &Value, _: usize, _: &Options<Value>| self.key(item))
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value as a group key: strings verbatim, `null` empty, the rest
/// as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
