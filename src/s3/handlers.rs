use crate::{
    error::{Error, Result},
    listing::{self, EncodingType, KeyRecord, ListingRequest},
    server::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

// Health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// List all buckets
pub async fn list_buckets(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let buckets = state.storage.list_buckets().await?;
    let xml = super::xml::list_buckets_response(&buckets, &state.config.owner());

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    ))
}

// Create bucket
pub async fn create_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse> {
    info!("Creating bucket: {}", bucket);

    state.storage.create_bucket(&bucket).await?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, format!("/{}", bucket))],
        "",
    ))
}

// Delete bucket
pub async fn delete_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse> {
    info!("Deleting bucket: {}", bucket);

    state.storage.delete_bucket(&bucket).await?;

    Ok((StatusCode::NO_CONTENT, ""))
}

// Check if bucket exists
pub async fn head_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse> {
    if !state.storage.bucket_exists(&bucket).await? {
        return Err(Error::NoSuchBucket);
    }

    Ok((StatusCode::OK, ""))
}

// List objects in bucket (ListObjectsV2)
pub async fn list_objects(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    Query(params): Query<ListObjectsParams>,
) -> Result<impl IntoResponse> {
    debug!("Listing objects in bucket: {} with params: {:?}", bucket, params);

    match params.list_type.as_deref() {
        None | Some("2") => {}
        Some(_) => return Err(Error::NotImplemented),
    }

    let request = params.into_request(state.config.listing.default_max_keys)?;
    let snapshot = state.storage.key_space(&bucket).await?;
    let page = listing::list(&*snapshot, &request)?;

    info!(
        "Listed bucket {}: {} keys, {} common prefixes, truncated: {}",
        bucket,
        page.contents.len(),
        page.common_prefixes.len(),
        page.is_truncated
    );

    let xml = super::xml::list_objects_v2_response(&bucket, &page);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    ))
}

// Upload object
pub async fn put_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    info!("Uploading object: {}/{}", bucket, key);

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let record = state
        .storage
        .put_object(&bucket, &key, body, content_type)
        .await?;

    Ok((StatusCode::OK, object_headers(&record), ""))
}

// Download object
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    debug!("Getting object: {}/{}", bucket, key);

    let object = state.storage.get_object(&bucket, &key).await?;
    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        object_headers(&object.record),
        object.data,
    ))
}

// Get object metadata
pub async fn head_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let record = state.storage.head_object(&bucket, &key).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_LENGTH, record.size.to_string())],
        object_headers(&record),
    ))
}

// Delete object
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    info!("Deleting object: {}/{}", bucket, key);

    state.storage.delete_object(&bucket, &key).await?;

    Ok((StatusCode::NO_CONTENT, ""))
}

// Helper functions

fn object_headers(record: &KeyRecord) -> [(header::HeaderName, String); 2] {
    [
        (header::ETAG, format!("\"{}\"", record.etag)),
        (
            header::LAST_MODIFIED,
            record
                .last_modified
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string(),
        ),
    ]
}

// Query parameter structs

#[derive(Debug, Default, Deserialize)]
pub struct ListObjectsParams {
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "max-keys")]
    pub max_keys: Option<String>,
    #[serde(rename = "continuation-token")]
    pub continuation_token: Option<String>,
    #[serde(rename = "start-after")]
    pub start_after: Option<String>,
    #[serde(rename = "fetch-owner")]
    pub fetch_owner: Option<String>,
    #[serde(rename = "encoding-type")]
    pub encoding_type: Option<String>,
    #[serde(rename = "list-type")]
    pub list_type: Option<String>,
}

impl ListObjectsParams {
    /// Map wire parameters onto a listing request. Numbers and flags are
    /// parsed here so malformed values surface as `InvalidArgument`.
    pub fn into_request(self, default_max_keys: i32) -> Result<ListingRequest> {
        let max_keys = match self.max_keys.as_deref() {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
                Error::invalid_argument(format!("Provided max-keys not an integer or within integer range: {}", raw))
            })?,
            None => default_max_keys,
        };

        let fetch_owner = match self.fetch_owner.as_deref() {
            Some(raw) => raw.trim().to_ascii_lowercase().parse::<bool>().map_err(|_| {
                Error::invalid_argument(format!("Invalid fetch-owner value: {}", raw))
            })?,
            None => false,
        };

        let encoding_type = self
            .encoding_type
            .as_deref()
            .map(str::parse::<EncodingType>)
            .transpose()?;

        Ok(ListingRequest {
            prefix: self.prefix.unwrap_or_default(),
            delimiter: self.delimiter,
            max_keys,
            continuation_token: self.continuation_token,
            start_after: self.start_after,
            fetch_owner,
            encoding_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_first_page() {
        let request = ListObjectsParams::default().into_request(1000).unwrap();
        assert_eq!(request, ListingRequest::new());
    }

    #[test]
    fn params_parse_flags_and_numbers() {
        let params = ListObjectsParams {
            prefix: Some("photos/".to_string()),
            delimiter: Some("/".to_string()),
            max_keys: Some("2".to_string()),
            fetch_owner: Some("True".to_string()),
            encoding_type: Some("url".to_string()),
            start_after: Some("photos/a".to_string()),
            ..Default::default()
        };
        let request = params.into_request(1000).unwrap();

        assert_eq!(request.prefix, "photos/");
        assert_eq!(request.delimiter.as_deref(), Some("/"));
        assert_eq!(request.max_keys, 2);
        assert!(request.fetch_owner);
        assert_eq!(request.encoding_type, Some(EncodingType::Url));
        assert_eq!(request.start_after.as_deref(), Some("photos/a"));
    }

    #[test]
    fn malformed_params_are_invalid_arguments() {
        for params in [
            ListObjectsParams {
                max_keys: Some("ten".to_string()),
                ..Default::default()
            },
            ListObjectsParams {
                fetch_owner: Some("maybe".to_string()),
                ..Default::default()
            },
            ListObjectsParams {
                encoding_type: Some("base64".to_string()),
                ..Default::default()
            },
        ] {
            assert!(matches!(params.into_request(1000), Err(Error::InvalidArgument(_))));
        }
    }
}
