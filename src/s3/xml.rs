use crate::listing::{EncodingType, ListingPage, Owner};
use crate::storage::BucketInfo;
use chrono::{DateTime, SecondsFormat, Utc};
use std::borrow::Cow;

const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Escape text for use inside an XML element.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn owner_xml(xml: &mut String, owner: &Owner, indent: &str) {
    xml.push_str(&format!("\n{}<Owner>", indent));
    xml.push_str(&format!("\n{}  <ID>{}</ID>", indent, escape(&owner.id)));
    xml.push_str(&format!(
        "\n{}  <DisplayName>{}</DisplayName>",
        indent,
        escape(&owner.display_name)
    ));
    xml.push_str(&format!("\n{}</Owner>", indent));
}

pub fn list_buckets_response(buckets: &[BucketInfo], owner: &Owner) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(&format!("\n<ListAllMyBucketsResult xmlns=\"{}\">", S3_NAMESPACE));
    owner_xml(&mut xml, owner, "  ");
    xml.push_str("\n  <Buckets>");

    for bucket in buckets {
        xml.push_str(&format!(
            "\n    <Bucket>\n      <Name>{}</Name>\n      <CreationDate>{}</CreationDate>\n    </Bucket>",
            escape(&bucket.name),
            timestamp(&bucket.created)
        ));
    }

    xml.push_str("\n  </Buckets>");
    xml.push_str("\n</ListAllMyBucketsResult>");
    xml
}

/// Render a listing page as a ListObjectsV2 `ListBucketResult`.
pub fn list_objects_v2_response(bucket: &str, page: &ListingPage) -> String {
    // Values that carry user keys are URL-encoded when the client asked for it.
    let value = |s: &str| -> String {
        match page.encoding_type {
            Some(EncodingType::Url) => urlencoding::encode(s).into_owned(),
            None => escape(s).into_owned(),
        }
    };

    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(&format!("\n<ListBucketResult xmlns=\"{}\">", S3_NAMESPACE));
    xml.push_str(&format!("\n  <Name>{}</Name>", escape(bucket)));
    xml.push_str(&format!("\n  <Prefix>{}</Prefix>", value(&page.prefix)));

    if let Some(delimiter) = &page.delimiter {
        xml.push_str(&format!("\n  <Delimiter>{}</Delimiter>", value(delimiter)));
    }

    xml.push_str(&format!("\n  <MaxKeys>{}</MaxKeys>", page.max_keys));
    xml.push_str(&format!("\n  <KeyCount>{}</KeyCount>", page.key_count));
    xml.push_str(&format!("\n  <IsTruncated>{}</IsTruncated>", page.is_truncated));

    if let Some(token) = &page.continuation_token {
        xml.push_str(&format!("\n  <ContinuationToken>{}</ContinuationToken>", escape(token)));
    }

    if let Some(token) = &page.next_continuation_token {
        xml.push_str(&format!(
            "\n  <NextContinuationToken>{}</NextContinuationToken>",
            escape(token)
        ));
    }

    if let Some(start_after) = &page.start_after {
        xml.push_str(&format!("\n  <StartAfter>{}</StartAfter>", value(start_after)));
    }

    if let Some(encoding_type) = page.encoding_type {
        xml.push_str(&format!("\n  <EncodingType>{}</EncodingType>", encoding_type.as_str()));
    }

    for entry in &page.contents {
        xml.push_str("\n  <Contents>");
        xml.push_str(&format!("\n    <Key>{}</Key>", value(&entry.key)));
        xml.push_str(&format!("\n    <LastModified>{}</LastModified>", timestamp(&entry.last_modified)));
        xml.push_str(&format!("\n    <ETag>&quot;{}&quot;</ETag>", escape(&entry.etag)));
        xml.push_str(&format!("\n    <Size>{}</Size>", entry.size));
        xml.push_str(&format!("\n    <StorageClass>{}</StorageClass>", escape(&entry.storage_class)));
        if let Some(owner) = &entry.owner {
            owner_xml(&mut xml, owner, "    ");
        }
        xml.push_str("\n  </Contents>");
    }

    for prefix in &page.common_prefixes {
        xml.push_str("\n  <CommonPrefixes>");
        xml.push_str(&format!("\n    <Prefix>{}</Prefix>", value(prefix.as_str())));
        xml.push_str("\n  </CommonPrefixes>");
    }

    xml.push_str("\n</ListBucketResult>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{CommonPrefix, ContentEntry};
    use chrono::TimeZone;

    fn page() -> ListingPage {
        ListingPage {
            contents: vec![ContentEntry {
                key: "a&b c.txt".to_string(),
                size: 7,
                etag: "9a0364b9e99bb480dd25e1f0284c8555".to_string(),
                last_modified: Utc.with_ymd_and_hms(2017, 6, 1, 12, 0, 0).unwrap(),
                storage_class: "STANDARD".to_string(),
                owner: None,
            }],
            common_prefixes: vec![CommonPrefix("photos/".to_string())],
            is_truncated: true,
            next_continuation_token: Some("Kbm93".to_string()),
            key_count: 2,
            prefix: String::new(),
            delimiter: Some("/".to_string()),
            max_keys: 2,
            continuation_token: None,
            start_after: None,
            encoding_type: None,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn renders_list_bucket_result() {
        let xml = list_objects_v2_response("test-bucket", &page());

        assert!(xml.contains("<Name>test-bucket</Name>"));
        assert!(xml.contains("<Prefix></Prefix>"));
        assert!(xml.contains("<Delimiter>/</Delimiter>"));
        assert!(xml.contains("<MaxKeys>2</MaxKeys>"));
        assert!(xml.contains("<KeyCount>2</KeyCount>"));
        assert!(xml.contains("<IsTruncated>true</IsTruncated>"));
        assert!(xml.contains("<NextContinuationToken>Kbm93</NextContinuationToken>"));
        assert!(xml.contains("<Key>a&amp;b c.txt</Key>"));
        assert!(xml.contains("<LastModified>2017-06-01T12:00:00.000Z</LastModified>"));
        assert!(xml.contains("<CommonPrefixes>\n    <Prefix>photos/</Prefix>\n  </CommonPrefixes>"));
        assert!(!xml.contains("<Owner>"));
        assert!(!xml.contains("<ContinuationToken>"));
        assert!(!xml.contains("<EncodingType>"));
    }

    #[test]
    fn url_encoding_applies_to_keys_and_prefixes() {
        let mut page = page();
        page.encoding_type = Some(EncodingType::Url);
        page.start_after = Some("a b".to_string());
        let xml = list_objects_v2_response("test-bucket", &page);

        assert!(xml.contains("<Key>a%26b%20c.txt</Key>"));
        assert!(xml.contains("<Prefix>photos%2F</Prefix>"));
        assert!(xml.contains("<Delimiter>%2F</Delimiter>"));
        assert!(xml.contains("<StartAfter>a%20b</StartAfter>"));
        assert!(xml.contains("<EncodingType>url</EncodingType>"));
    }

    #[test]
    fn owner_is_rendered_when_present() {
        let mut page = page();
        page.contents[0].owner = Some(Owner {
            id: "owner-id".to_string(),
            display_name: "owner".to_string(),
        });
        let xml = list_objects_v2_response("test-bucket", &page);

        assert!(xml.contains("<Owner>\n      <ID>owner-id</ID>\n      <DisplayName>owner</DisplayName>\n    </Owner>"));
    }
}
