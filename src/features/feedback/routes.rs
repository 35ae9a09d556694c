use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::feedback::dtos::MAX_FILE_SIZE;
use crate::features::feedback::handlers;
use crate::features::feedback::services::FeedbackService;

/// Create routes for the feedback feature
///
/// Note: This feature is public (no authentication required); submissions
/// come straight from the feedback form.
pub fn routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route(
            "/api/feedback",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(handlers::submit_feedback)
                .get(handlers::feedback_index)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/api/feedback/submit", post(handlers::create_feedback))
        .route(
            "/api/feedback/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/feedback/download/{filename}",
            get(handlers::download_file),
        )
        .with_state(service)
}
