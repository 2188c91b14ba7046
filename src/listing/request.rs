use super::token::Cursor;
use crate::error::{Error, Result};
use std::str::FromStr;

pub const DEFAULT_MAX_KEYS: i32 = 1000;

/// Response encoding requested through `encoding-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingType {
    Url,
}

impl EncodingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingType::Url => "url",
        }
    }
}

impl FromStr for EncodingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "url" => Ok(EncodingType::Url),
            other => Err(Error::invalid_argument(format!(
                "Invalid Encoding Method specified in Request: {}",
                other
            ))),
        }
    }
}

/// Parameters of one ListObjectsV2 call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub prefix: String,
    pub delimiter: Option<String>,
    pub max_keys: i32,
    pub continuation_token: Option<String>,
    pub start_after: Option<String>,
    pub fetch_owner: bool,
    pub encoding_type: Option<EncodingType>,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            delimiter: None,
            max_keys: DEFAULT_MAX_KEYS,
            continuation_token: None,
            start_after: None,
            fetch_owner: false,
            encoding_type: None,
        }
    }
}

impl ListingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    pub fn with_start_after(mut self, start_after: impl Into<String>) -> Self {
        self.start_after = Some(start_after.into());
        self
    }

    pub fn with_fetch_owner(mut self, fetch_owner: bool) -> Self {
        self.fetch_owner = fetch_owner;
        self
    }

    /// Delimiter used for grouping. An empty delimiter disables grouping.
    pub fn effective_delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref().filter(|d| !d.is_empty())
    }

    /// Page size after validation.
    pub fn page_size(&self) -> Result<usize> {
        usize::try_from(self.max_keys)
            .map_err(|_| Error::invalid_argument("max-keys must not be negative"))
    }

    /// Resolve where the scan starts. A continuation token always wins over `start_after`.
    pub fn cursor(&self) -> Result<Option<Cursor>> {
        match (&self.continuation_token, &self.start_after) {
            (Some(token), _) => Cursor::decode(token).map(Some),
            (None, Some(start_after)) => Ok(Some(Cursor::AfterKey(start_after.clone()))),
            (None, None) => Ok(None),
        }
    }
}
