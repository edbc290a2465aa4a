//! # simrec Source
//!
//! Catalog sources that feed training passes:
//!
//! - [`JsonFileSource`] - a JSON file on disk
//! - [`HttpSource`] - a JSON document fetched over HTTP
//!
//! Both accept a bare array of product records or a `{"products": [...]}`
//! wrapper. Records may use `id` or `_id` and `subCategory` or
//! `sub_category`; malformed records are skipped with a warning.

pub mod file;
pub mod http;
pub mod record;

pub use file::JsonFileSource;
pub use http::HttpSource;
pub use record::{decode_catalog, decode_record};
