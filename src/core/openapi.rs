use utoipa::{Modify, OpenApi};

use crate::features::feedback::{dtos as feedback_dtos, handlers as feedback_handlers};
use crate::shared::types::{Detail, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Feedback
        feedback_handlers::submit_feedback,
        feedback_handlers::create_feedback,
        feedback_handlers::upload_file,
        feedback_handlers::download_file,
        feedback_handlers::feedback_index,
    ),
    components(
        schemas(
            Detail,
            UploadResponse,
            feedback_dtos::CreateFeedbackDto,
            feedback_dtos::SubmitFeedbackDto,
            feedback_dtos::UploadFileDto,
        )
    ),
    tags(
        (name = "feedback", description = "User feedback submission and attachment retrieval"),
    ),
    info(
        title = "Feedback API",
        version = "0.1.0",
        description = "API documentation for the feedback service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
