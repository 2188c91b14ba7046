use axum::{
    extract::Request,
    http::HeaderValue,
    response::Response,
};
use std::time::Instant;
use tower::Layer;
use tracing::{debug, info};
use uuid::Uuid;

pub const REQUEST_ID: &str = "x-amz-request-id";

/// Logs one line per request and tags the response with a request id.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl LoggingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> tower::Service<Request> for LoggingMiddleware<S>
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let start = Instant::now();
            let request_id = Uuid::new_v4().simple().to_string();
            let method = req.method().clone();
            let uri = req.uri().clone();

            let mut response = inner.call(req).await?;

            let duration = start.elapsed();
            let status = response.status();

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response.headers_mut().insert(REQUEST_ID, value);
            }

            if uri.path() == "/health" {
                debug!(request_id = %request_id, status = %status, "Health check");
            } else {
                info!(
                    request_id = %request_id,
                    method = %method,
                    uri = %uri,
                    status = %status,
                    duration_ms = duration.as_millis(),
                    "Request completed"
                );
            }

            Ok(response)
        })
    }
}
