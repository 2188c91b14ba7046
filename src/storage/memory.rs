use super::{is_valid_bucket_name, BucketInfo, KeySnapshot, StorageBackend, StoredObject};
use crate::error::{Error, Result};
use crate::listing::{KeyRecord, Owner};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const STORAGE_CLASS: &str = "STANDARD";

struct ObjectBody {
    data: Bytes,
    content_type: String,
}

struct Bucket {
    created: DateTime<Utc>,
    // Copy-on-write so listings can hold a snapshot while writers continue.
    records: KeySnapshot,
    bodies: HashMap<String, ObjectBody>,
}

impl Bucket {
    fn new() -> Self {
        Self {
            created: Utc::now(),
            records: Arc::new(BTreeMap::new()),
            bodies: HashMap::new(),
        }
    }
}

/// Bucket store held entirely in memory. Each instance is independent.
pub struct MemoryBackend {
    owner: Owner,
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl MemoryBackend {
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            buckets: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn create_bucket(&self, bucket: &str) -> Result<BucketInfo> {
        if !is_valid_bucket_name(bucket) {
            return Err(Error::InvalidBucketName(bucket.to_string()));
        }

        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(bucket) {
            return Err(Error::BucketAlreadyExists);
        }

        let new_bucket = Bucket::new();
        let info = BucketInfo {
            name: bucket.to_string(),
            created: new_bucket.created,
        };
        buckets.insert(bucket.to_string(), new_bucket);
        info!("Created bucket: {}", bucket);
        Ok(info)
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        let b = buckets.get(bucket).ok_or(Error::NoSuchBucket)?;
        if !b.records.is_empty() {
            return Err(Error::BucketNotEmpty);
        }

        buckets.remove(bucket);
        info!("Deleted bucket: {}", bucket);
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let buckets = self.buckets.read().await;
        let mut infos: Vec<BucketInfo> = buckets
            .iter()
            .map(|(name, b)| BucketInfo {
                name: name.clone(),
                created: b.created,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.buckets.read().await.contains_key(bucket))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> Result<KeyRecord> {
        if key.is_empty() {
            return Err(Error::invalid_argument("Object key must not be empty"));
        }

        let record = KeyRecord {
            key: key.to_string(),
            size: data.len() as u64,
            etag: format!("{:x}", md5::compute(&data)),
            last_modified: Utc::now(),
            storage_class: STORAGE_CLASS.to_string(),
            owner: self.owner.clone(),
        };

        let mut buckets = self.buckets.write().await;
        let b = buckets.get_mut(bucket).ok_or(Error::NoSuchBucket)?;
        Arc::make_mut(&mut b.records).insert(key.to_string(), record.clone());
        b.bodies.insert(
            key.to_string(),
            ObjectBody {
                data,
                content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            },
        );

        debug!("Stored object {}/{} ({} bytes)", bucket, key, record.size);
        Ok(record)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let buckets = self.buckets.read().await;
        let b = buckets.get(bucket).ok_or(Error::NoSuchBucket)?;
        let record = b.records.get(key).ok_or(Error::NoSuchKey)?;
        let body = b.bodies.get(key).ok_or(Error::NoSuchKey)?;

        Ok(StoredObject {
            record: record.clone(),
            content_type: body.content_type.clone(),
            data: body.data.clone(),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<KeyRecord> {
        let buckets = self.buckets.read().await;
        let b = buckets.get(bucket).ok_or(Error::NoSuchBucket)?;
        b.records.get(key).cloned().ok_or(Error::NoSuchKey)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        let b = buckets.get_mut(bucket).ok_or(Error::NoSuchBucket)?;
        if b.records.contains_key(key) {
            Arc::make_mut(&mut b.records).remove(key);
            b.bodies.remove(key);
            debug!("Deleted object {}/{}", bucket, key);
        }
        Ok(())
    }

    async fn key_space(&self, bucket: &str) -> Result<KeySnapshot> {
        let buckets = self.buckets.read().await;
        let b = buckets.get(bucket).ok_or(Error::NoSuchBucket)?;
        Ok(Arc::clone(&b.records))
    }
}
