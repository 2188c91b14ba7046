use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Bucket already exists")]
    BucketAlreadyExists,

    #[error("Bucket not empty")]
    BucketNotEmpty,

    #[error("Bucket not found")]
    NoSuchBucket,

    #[error("Object not found")]
    NoSuchKey,

    #[error("Invalid bucket name: {0}")]
    InvalidBucketName(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not implemented")]
    NotImplemented,
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BucketAlreadyExists => StatusCode::CONFLICT,
            Error::BucketNotEmpty => StatusCode::CONFLICT,
            Error::NoSuchBucket => StatusCode::NOT_FOUND,
            Error::NoSuchKey => StatusCode::NOT_FOUND,
            Error::InvalidBucketName(_) => StatusCode::BAD_REQUEST,
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Error::BucketAlreadyExists => "BucketAlreadyOwnedByYou",
            Error::BucketNotEmpty => "BucketNotEmpty",
            Error::NoSuchBucket => "NoSuchBucket",
            Error::NoSuchKey => "NoSuchKey",
            Error::InvalidBucketName(_) => "InvalidBucketName",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::NotImplemented => "NotImplemented",
        }
    }

    pub fn to_xml(&self, resource: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>{}</Code>
    <Message>{}</Message>
    <Resource>{}</Resource>
    <RequestId>{}</RequestId>
</Error>"#,
            self.error_code(),
            crate::s3::xml::escape(&self.to_string()),
            crate::s3::xml::escape(resource),
            uuid::Uuid::new_v4()
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_xml("");

        (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_is_a_client_error() {
        let err = Error::invalid_argument("max-keys must not be negative");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "InvalidArgument");

        let xml = err.to_xml("/bucket");
        assert!(xml.contains("<Code>InvalidArgument</Code>"));
        assert!(xml.contains("<Message>Invalid argument: max-keys must not be negative</Message>"));
        assert!(xml.contains("<Resource>/bucket</Resource>"));
    }
}
