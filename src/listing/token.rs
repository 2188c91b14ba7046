//! Continuation tokens.
//!
//! A token is a tag character followed by the unpadded URL-safe base64 of a
//! key or common prefix. `K` resumes strictly after a raw key, `P` resumes
//! after every key under a common prefix.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

const AFTER_KEY: char = 'K';
const AFTER_PREFIX: char = 'P';

/// Where a listing resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Skip every key `<=` this key.
    AfterKey(String),
    /// Skip every key `<=` this prefix and every key starting with it.
    AfterPrefix(String),
}

impl Cursor {
    /// Lowest key that may still be emitted.
    pub fn key(&self) -> &str {
        match self {
            Cursor::AfterKey(key) | Cursor::AfterPrefix(key) => key,
        }
    }

    /// Whether `key` has already been consumed by the page that produced this cursor.
    pub fn covers(&self, key: &str) -> bool {
        match self {
            Cursor::AfterKey(after) => key <= after.as_str(),
            Cursor::AfterPrefix(prefix) => key <= prefix.as_str() || key.starts_with(prefix.as_str()),
        }
    }

    pub fn encode(&self) -> String {
        let (tag, value) = match self {
            Cursor::AfterKey(key) => (AFTER_KEY, key),
            Cursor::AfterPrefix(prefix) => (AFTER_PREFIX, prefix),
        };
        let mut token = String::with_capacity(1 + value.len() * 4 / 3 + 4);
        token.push(tag);
        token.push_str(&URL_SAFE_NO_PAD.encode(value.as_bytes()));
        token
    }

    pub fn decode(token: &str) -> Result<Self> {
        let mut chars = token.chars();
        let tag = chars.next().ok_or_else(invalid_token)?;
        let payload = URL_SAFE_NO_PAD
            .decode(chars.as_str())
            .map_err(|_| invalid_token())?;
        let value = String::from_utf8(payload).map_err(|_| invalid_token())?;

        match tag {
            AFTER_KEY => Ok(Cursor::AfterKey(value)),
            AFTER_PREFIX => Ok(Cursor::AfterPrefix(value)),
            _ => Err(invalid_token()),
        }
    }
}

fn invalid_token() -> Error {
    Error::invalid_argument("The continuation token provided is incorrect")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_keys_with_reserved_characters() {
        for cursor in [
            Cursor::AfterKey("photos/2006/January/sample.jpg".into()),
            Cursor::AfterKey("a b+c&d=é?".into()),
            Cursor::AfterPrefix("photos/2006/".into()),
            Cursor::AfterKey(String::new()),
        ] {
            let token = cursor.encode();
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            assert_eq!(Cursor::decode(&token).unwrap(), cursor);
        }
    }

    #[test]
    fn rejects_foreign_tokens() {
        for token in ["", "file2", "Zabc", "K!!!", "K_w"] {
            let err = Cursor::decode(token).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "token {:?}", token);
        }
    }

    #[test]
    fn prefix_cursor_covers_whole_group() {
        let cursor = Cursor::AfterPrefix("photos/".into());
        assert!(cursor.covers("photos/"));
        assert!(cursor.covers("photos/zzz"));
        assert!(cursor.covers("apple"));
        assert!(!cursor.covers("photos0"));
        assert!(!cursor.covers("sample.jpg"));

        let cursor = Cursor::AfterKey("file2".into());
        assert!(cursor.covers("file2"));
        assert!(!cursor.covers("file2a"));
    }
}
