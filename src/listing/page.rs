use super::keyspace::{KeyRecord, Owner};
use super::request::EncodingType;
use chrono::{DateTime, Utc};

/// A literal key returned under `Contents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub key: String,
    pub size: u64,
    pub etag: String,
    pub last_modified: DateTime<Utc>,
    pub storage_class: String,
    pub owner: Option<Owner>,
}

impl ContentEntry {
    pub(crate) fn from_record(record: &KeyRecord, fetch_owner: bool) -> Self {
        Self {
            key: record.key.clone(),
            size: record.size,
            etag: record.etag.clone(),
            last_modified: record.last_modified,
            storage_class: record.storage_class.clone(),
            owner: fetch_owner.then(|| record.owner.clone()),
        }
    }
}

/// A synthesized directory: every key sharing this prefix up to and including the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CommonPrefix(pub String);

impl CommonPrefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry in scan order, before the page splits entries into their two lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEntry {
    Content(ContentEntry),
    Prefix(CommonPrefix),
}

impl PageEntry {
    pub fn key(&self) -> &str {
        match self {
            PageEntry::Content(entry) => &entry.key,
            PageEntry::Prefix(prefix) => prefix.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub contents: Vec<ContentEntry>,
    pub common_prefixes: Vec<CommonPrefix>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
    pub key_count: usize,
    pub prefix: String,
    pub delimiter: Option<String>,
    pub max_keys: i32,
    pub continuation_token: Option<String>,
    pub start_after: Option<String>,
    pub encoding_type: Option<EncodingType>,
}

impl ListingPage {
    /// Entries merged back into key order.
    pub fn entries(&self) -> Vec<PageEntry> {
        let mut entries: Vec<PageEntry> = self
            .contents
            .iter()
            .cloned()
            .map(PageEntry::Content)
            .chain(self.common_prefixes.iter().cloned().map(PageEntry::Prefix))
            .collect();
        entries.sort_by(|a, b| a.key().cmp(b.key()));
        entries
    }
}
