//! # interview-rag-catalog
//!
//! The read-only interview question catalog and the retrieval step built on it.
//!
//! ## Key Types
//!
//! - [`CatalogStore`] - Immutable company catalog, built once at startup
//! - [`CompanyCatalog`] / [`QuestionEntry`] - Catalog records
//! - [`MatchGroup`] - One company's questions selected for a query
//!
//! ## Retrieval
//!
//! [`search`] walks the catalog in definition order and keeps a company when
//! the query names it directly or shares a keyword with one of its
//! questions. [`format_context`] renders the resulting groups as prompt text.

mod context;
mod model;
mod retriever;
mod store;

pub use context::format_context;
pub use model::{CompanyCatalog, QuestionEntry};
pub use retriever::{search, MatchGroup, DEFAULT_MAX_MATCHES_PER_COMPANY, MIN_TOKEN_CHARS};
pub use store::{CatalogError, CatalogStore};
