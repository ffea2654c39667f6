//! # Folio Paginate
//!
//! Splits ordered content collections into linked pages for static site
//! pipelines. A host pipeline supplies the collections; folio-paginate groups
//! their items, links the pages together and returns an output file map of
//! page descriptors that a renderer turns into HTML.
//!
//! ```text
//! metadata.json ─┐
//!                ├─► Paginator ─► { path → PageFile } ─► renderer
//! paginate.toml ─┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paginate`] | The paginator: validation, filtering, grouping, output file map |
//! | [`page`] | `Page`, the shared `PageSet`, and `PageRef` navigation handles |
//! | [`options`] | Per-collection options record and the default grouping function |
//! | [`interpolate`] | `:token` substitution in output path templates |
//! | [`source`] | Caller-supplied collection resolution |
//! | [`matcher`] | Declarative filters and grouping compiled from config |
//! | [`config`] | `paginate.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure Results, No Mutation
//!
//! [`paginate::Paginator::run`] borrows the source and returns a
//! [`paginate::Paginated`] holding both the file map and the page sequences.
//! Running twice over the same data yields two independent results.
//!
//! ## Links by Position
//!
//! Pages don't store references to each other. A [`page::PageRef`] is an
//! index into a shared, frozen [`page::PageSet`], and `previous`, `next`,
//! `first`, `last` and `get_pages` are answered from that position on demand.
//!
//! ## Explicit Collection Access
//!
//! The paginator never walks caller data on its own. Collections are looked up
//! through a [`source::CollectionSource`], so a host can back it with JSON,
//! a map, or a closure over its own types.
//!
//! ## All or Nothing
//!
//! Every failure is a configuration error detected before pages are built.
//! The first one stops the batch and nothing is returned.

pub mod config;
pub mod interpolate;
pub mod matcher;
pub mod options;
pub mod output;
pub mod page;
pub mod paginate;
pub mod source;

pub use options::{Options, PerPage, Render};
pub use page::{Page, PageRef, PageSet};
pub use paginate::{PageFile, PaginateError, Paginated, Paginator};
pub use source::CollectionSource;

#[cfg(test)]
pub(crate) mod test_helpers;
