use super::handlers;
use crate::server::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Service operations
        .route("/", get(handlers::list_buckets))
        .route("/health", get(handlers::health_check))

        // Bucket operations
        .route(
            "/:bucket",
            put(handlers::create_bucket)
                .delete(handlers::delete_bucket)
                .head(handlers::head_bucket)
                .get(handlers::list_objects),
        )
        .route("/:bucket/", get(handlers::list_objects))

        // Object operations
        .route(
            "/:bucket/*key",
            put(handlers::put_object)
                .get(handlers::get_object)
                .head(handlers::head_object)
                .delete(handlers::delete_object),
        )
}
