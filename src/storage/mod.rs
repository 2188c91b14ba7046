pub mod memory;

use crate::error::Result;
use crate::listing::KeyRecord;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use memory::MemoryBackend;

/// Point-in-time view of a bucket's keys. Later writes never show up in it.
pub type KeySnapshot = Arc<BTreeMap<String, KeyRecord>>;

#[derive(Debug, Clone)]
pub struct BucketInfo {
    pub name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub record: KeyRecord,
    pub content_type: String,
    pub data: Bytes,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    // Bucket operations
    async fn create_bucket(&self, bucket: &str) -> Result<BucketInfo>;
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    // Object operations
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> Result<KeyRecord>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<KeyRecord>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    // Listing
    async fn key_space(&self, bucket: &str) -> Result<KeySnapshot>;
}

/// S3 bucket naming rules.
pub fn is_valid_bucket_name(name: &str) -> bool {
    name.len() >= 3
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && !name.starts_with('.')
        && !name.ends_with('.')
        && !name.contains("..")
}
