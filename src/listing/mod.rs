//! ListObjectsV2 listing engine.
//!
//! The engine is a pure function of an ordered [`KeySpace`] snapshot and a
//! [`ListingRequest`]. It keeps no state between calls; everything needed to
//! resume lives in the continuation token.

pub mod engine;
pub mod keyspace;
pub mod page;
pub mod request;
pub mod token;

pub use engine::list;
pub use keyspace::{KeyRecord, KeySpace, Owner};
pub use page::{CommonPrefix, ContentEntry, ListingPage, PageEntry};
pub use request::{EncodingType, ListingRequest, DEFAULT_MAX_KEYS};
pub use token::Cursor;
