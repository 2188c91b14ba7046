//! S3-compatible mock object store built around a ListObjectsV2 listing engine.

pub mod config;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod s3;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
