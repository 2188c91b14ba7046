use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

/// One stored object as the listing engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: String,
    pub size: u64,
    pub etag: String,
    pub last_modified: DateTime<Utc>,
    pub storage_class: String,
    pub owner: Owner,
}

/// Ordered view over a bucket's keys.
///
/// Implementations yield records in ascending byte-wise key order and must
/// present a consistent snapshot for as long as the returned iterator lives.
pub trait KeySpace {
    /// Iterate records whose key satisfies `lower`, in ascending order.
    fn scan_from<'a>(&'a self, lower: Bound<&str>) -> Box<dyn Iterator<Item = &'a KeyRecord> + 'a>;
}

impl KeySpace for BTreeMap<String, KeyRecord> {
    fn scan_from<'a>(&'a self, lower: Bound<&str>) -> Box<dyn Iterator<Item = &'a KeyRecord> + 'a> {
        Box::new(
            self.range::<str, _>((lower, Bound::Unbounded))
                .map(|(_, record)| record),
        )
    }
}

/// Slices must already be sorted by key.
impl KeySpace for [KeyRecord] {
    fn scan_from<'a>(&'a self, lower: Bound<&str>) -> Box<dyn Iterator<Item = &'a KeyRecord> + 'a> {
        let start = match lower {
            Bound::Included(key) => self.partition_point(|r| r.key.as_str() < key),
            Bound::Excluded(key) => self.partition_point(|r| r.key.as_str() <= key),
            Bound::Unbounded => 0,
        };
        Box::new(self[start..].iter())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn record(key: &str) -> KeyRecord {
        KeyRecord {
            key: key.to_string(),
            size: key.len() as u64,
            etag: format!("{:x}", md5::compute(key.as_bytes())),
            last_modified: Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap(),
            storage_class: "STANDARD".to_string(),
            owner: Owner {
                id: "owner-id".to_string(),
                display_name: "owner".to_string(),
            },
        }
    }

    pub(crate) fn records(keys: &[&str]) -> Vec<KeyRecord> {
        let mut out: Vec<KeyRecord> = keys.iter().map(|k| record(k)).collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    fn keys<'a>(iter: impl Iterator<Item = &'a KeyRecord>) -> Vec<&'a str> {
        iter.map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn slice_and_map_agree_on_bounds() {
        let sorted = records(&["b", "a", "c/d", "c"]);
        let map: BTreeMap<String, KeyRecord> = sorted
            .iter()
            .map(|r| (r.key.clone(), r.clone()))
            .collect();

        for lower in [
            Bound::Unbounded,
            Bound::Included("b"),
            Bound::Excluded("b"),
            Bound::Included("bb"),
            Bound::Excluded("c"),
            Bound::Excluded("z"),
        ] {
            assert_eq!(
                keys(sorted.as_slice().scan_from(lower)),
                keys(map.scan_from(lower)),
                "bound {:?}",
                lower
            );
        }

        assert_eq!(keys(map.scan_from(Bound::Excluded("b"))), vec!["c", "c/d"]);
    }

    #[test]
    fn ordering_is_bytewise() {
        // '/' (0x2f) sorts before '0' (0x30) and uppercase before lowercase.
        let sorted = records(&["a0", "a/", "B", "a"]);
        assert_eq!(keys(sorted.as_slice().scan_from(Bound::Unbounded)), vec!["B", "a", "a/", "a0"]);
    }
}
