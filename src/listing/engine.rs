use super::keyspace::KeySpace;
use super::page::{CommonPrefix, ContentEntry, ListingPage};
use super::request::ListingRequest;
use super::token::Cursor;
use crate::error::Result;
use std::ops::Bound;
use tracing::debug;

/// Produce one page of a ListObjectsV2 listing over `keys`.
///
/// Every literal key and every newly seen common prefix counts once against
/// `max_keys`. Keys absorbed into a common prefix are consumed in full before
/// the page is cut, so a group never straddles two pages.
pub fn list<K: KeySpace + ?Sized>(keys: &K, request: &ListingRequest) -> Result<ListingPage> {
    let page_size = request.page_size()?;
    let cursor = request.cursor()?;

    let mut page = ListingPage {
        contents: Vec::new(),
        common_prefixes: Vec::new(),
        is_truncated: false,
        next_continuation_token: None,
        key_count: 0,
        prefix: request.prefix.clone(),
        delimiter: request.delimiter.clone(),
        max_keys: request.max_keys,
        continuation_token: request.continuation_token.clone(),
        start_after: request.start_after.clone(),
        encoding_type: request.encoding_type,
    };

    if page_size == 0 {
        return Ok(page);
    }

    let prefix = request.prefix.as_str();
    let delimiter = request.effective_delimiter();

    let lower = match &cursor {
        Some(cursor) if cursor.key() >= prefix => Bound::Excluded(cursor.key()),
        _ => Bound::Included(prefix),
    };

    let mut scan = keys
        .scan_from(lower)
        .take_while(|record| record.key.starts_with(prefix))
        .skip_while(|record| cursor.as_ref().is_some_and(|c| c.covers(&record.key)))
        .peekable();

    let mut last: Option<Cursor> = None;
    while let Some(record) = scan.next() {
        if page.key_count == page_size {
            page.is_truncated = true;
            break;
        }

        match common_prefix(&record.key, prefix, delimiter) {
            Some(group) => {
                while scan.next_if(|next| next.key.starts_with(group)).is_some() {}
                page.common_prefixes.push(CommonPrefix(group.to_string()));
                last = Some(Cursor::AfterPrefix(group.to_string()));
            }
            None => {
                page.contents
                    .push(ContentEntry::from_record(record, request.fetch_owner));
                last = Some(Cursor::AfterKey(record.key.clone()));
            }
        }
        page.key_count += 1;
    }

    if page.is_truncated {
        page.next_continuation_token = last.map(|cursor| cursor.encode());
    }

    debug!(
        prefix = %prefix,
        delimiter = ?delimiter,
        contents = page.contents.len(),
        common_prefixes = page.common_prefixes.len(),
        is_truncated = page.is_truncated,
        "Listed page"
    );

    Ok(page)
}

/// The common prefix `key` collapses into: `prefix` plus the remainder up to
/// and including the first delimiter after it.
fn common_prefix<'a>(key: &'a str, prefix: &str, delimiter: Option<&str>) -> Option<&'a str> {
    let delimiter = delimiter?;
    key[prefix.len()..]
        .find(delimiter)
        .map(|i| &key[..prefix.len() + i + delimiter.len()])
}
