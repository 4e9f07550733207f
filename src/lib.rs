//! mdsearch - a minimal in-memory search engine for markdown documents.
//!
//! An [`Index`] is built once from a batch of [`Document`]s. Text fields are
//! tokenized and scored with smoothed TF-IDF; keyword fields are matched
//! exactly and used as filters. Documents usually come from a source
//! archive or a directory of markdown files (see [`source`]).
//!
//! # Quick start
//!
//! ```
//! use mdsearch::{Document, Index, IndexConfig, SearchParams};
//!
//! let docs = vec![
//!     Document::new()
//!         .with("filename", "a.md")
//!         .with("content", "fastmcp servers expose tools"),
//!     Document::new()
//!         .with("filename", "b.md")
//!         .with("content", "fastmcp clients call tools"),
//! ];
//! let config = IndexConfig::new(["content"], ["filename"]);
//! let index = Index::build(docs, config).unwrap();
//!
//! let params = SearchParams::new("fastmcp").filter("filename", "a.md");
//! let hits = index.search(&params).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].document.get("filename"), Some("a.md"));
//! ```

pub mod cli;
pub mod config;
pub mod doc_id;
pub mod document;
pub mod error;
pub mod index;
pub mod inverted_index;
pub mod keyword_filter;
pub mod scorer;
pub mod search;
pub mod source;
pub mod text_util;
pub mod tokenizer;
pub mod walker;

pub use config::{IndexConfig, SearchParams};
pub use doc_id::DocId;
pub use document::Document;
pub use error::{Error, Result};
pub use index::{Index, SearchHit};
pub use source::Source;
