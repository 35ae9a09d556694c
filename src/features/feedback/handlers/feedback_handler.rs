use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::feedback::dtos::{
    is_mime_type_allowed, CreateFeedbackDto, FeedbackAttachment, SubmitFeedbackDto, UploadFileDto,
    ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};
use crate::features::feedback::services::FeedbackService;
use crate::shared::types::{Detail, UploadResponse};

/// Submit feedback with an optional file attachment
///
/// Accepts multipart/form-data with:
/// - `category`: Feedback category (required)
/// - `message`: The feedback text, max 280 characters (required)
/// - `file`: Optional attachment (JPEG, PNG or PDF, max 5MB)
#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "feedback",
    request_body(
        content = SubmitFeedbackDto,
        content_type = "multipart/form-data",
        description = "Feedback form with optional file attachment",
    ),
    responses(
        (status = 200, description = "Feedback submitted successfully", body = Detail),
        (status = 400, description = "Validation error or invalid file"),
        (status = 500, description = "File write or database insert failed")
    )
)]
pub async fn submit_feedback(
    State(service): State<Arc<FeedbackService>>,
    mut multipart: Multipart,
) -> Result<Json<Detail>, AppError> {
    let mut category: Option<String> = None;
    let mut message: Option<String> = None;
    let mut attachment: Option<FeedbackAttachment> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "category" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read category field: {}", e))
                })?;
                category = Some(text.trim().to_string());
            }
            "message" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read message field: {}", e))
                })?;
                message = Some(text.trim().to_string());
            }
            "file" => {
                // Browsers send an empty file part when nothing was selected
                let fname = field.file_name().unwrap_or("").to_string();
                if fname.is_empty() {
                    continue;
                }

                // Content type from the part, or inferred from the filename
                let ct = field.content_type().map(|s| s.to_string()).unwrap_or_else(|| {
                    mime_guess::from_path(&fname)
                        .first_or_octet_stream()
                        .to_string()
                });

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                attachment = Some(FeedbackAttachment {
                    file_name: fname,
                    content_type: ct,
                    data: data.to_vec(),
                });
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let dto = CreateFeedbackDto {
        category: category.unwrap_or_default(),
        message: message.unwrap_or_default(),
    };
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(att) = &attachment {
        validate_attachment(att)?;
    }

    service.submit(dto, attachment).await?;

    Ok(Json(Detail::new("Your feedback has been submitted.")))
}

/// Submit feedback without an attachment
#[utoipa::path(
    post,
    path = "/api/feedback/submit",
    tag = "feedback",
    request_body = CreateFeedbackDto,
    responses(
        (status = 200, description = "Feedback submitted successfully", body = Detail),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Database insert failed")
    )
)]
pub async fn create_feedback(
    State(service): State<Arc<FeedbackService>>,
    AppJson(dto): AppJson<CreateFeedbackDto>,
) -> Result<Json<Detail>, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.submit(dto, None).await?;

    Ok(Json(Detail::new("Your feedback has been submitted.")))
}

/// Upload a file without a feedback record
///
/// Accepts multipart/form-data with a single `file` field and returns the
/// generated filename under which the upload can be downloaded again.
#[utoipa::path(
    post,
    path = "/api/feedback/upload",
    tag = "feedback",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File to store",
    ),
    responses(
        (status = 200, description = "File stored successfully", body = UploadResponse),
        (status = 400, description = "Missing or invalid file"),
        (status = 500, description = "File write failed")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FeedbackService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut attachment: Option<FeedbackAttachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            let fname = field.file_name().unwrap_or("").to_string();
            if fname.is_empty() {
                continue;
            }

            let ct = field.content_type().map(|s| s.to_string()).unwrap_or_else(|| {
                mime_guess::from_path(&fname)
                    .first_or_octet_stream()
                    .to_string()
            });

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            attachment = Some(FeedbackAttachment {
                file_name: fname,
                content_type: ct,
                data: data.to_vec(),
            });
        } else {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let attachment =
        attachment.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    validate_attachment(&attachment)?;

    let filename = service.store_attachment(attachment).await?;

    Ok(Json(UploadResponse {
        detail: format!("File {} is written", filename),
        filename,
    }))
}

/// Download a stored file by its generated filename
#[utoipa::path(
    get,
    path = "/api/feedback/download/{filename}",
    tag = "feedback",
    params(
        ("filename" = String, Path, description = "Generated filename returned on upload")
    ),
    responses(
        (status = 200, description = "File bytes with inferred content type"),
        (status = 400, description = "Unsafe filename"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(service): State<Arc<FeedbackService>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (data, content_type) = service.download(&filename).await?;

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, data).into_response())
}

/// Feedback page placeholder, doubles as a liveness probe
#[utoipa::path(
    get,
    path = "/api/feedback",
    tag = "feedback",
    responses(
        (status = 200, description = "Service is up", body = Detail)
    )
)]
pub async fn feedback_index() -> Json<Detail> {
    Json(Detail::new("You are on the feedback page."))
}

fn validate_attachment(attachment: &FeedbackAttachment) -> Result<(), AppError> {
    if attachment.data.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !is_mime_type_allowed(&attachment.content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            attachment.content_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::features::feedback::dtos::MAX_FILE_SIZE;
    use crate::shared::test_helpers::test_router;

    fn server() -> (TestServer, TempDir) {
        let (router, dir) = test_router();
        (TestServer::new(router).unwrap(), dir)
    }

    fn feedback_form(category: &str, message: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("category", category.to_string())
            .add_text("message", message.to_string())
    }

    #[tokio::test]
    async fn test_feedback_index() {
        let (server, _dir) = server();

        let res = server.get("/api/feedback").await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(body["detail"], "You are on the feedback page.");
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_message() {
        let (server, _dir) = server();

        let res = server
            .post("/api/feedback")
            .multipart(feedback_form("general", ""))
            .await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_category() {
        let (server, _dir) = server();

        let form = MultipartForm::new().add_text("message", "Works great.");
        let res = server.post("/api/feedback").multipart(form).await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_rejects_overlong_message() {
        let (server, _dir) = server();

        let res = server
            .post("/api/feedback")
            .multipart(feedback_form("general", &"x".repeat(281)))
            .await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_rejects_disallowed_file_type() {
        let (server, _dir) = server();

        let form = feedback_form("general", "See attachment.").add_part(
            "file",
            Part::bytes(b"<html></html>".to_vec())
                .file_name("page.html")
                .mime_type("text/html"),
        );
        let res = server.post("/api/feedback").multipart(form).await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_submit_rejects_oversized_file() {
        let (server, _dir) = server();

        let form = feedback_form("general", "See attachment.").add_part(
            "file",
            Part::bytes(vec![0u8; MAX_FILE_SIZE + 1])
                .file_name("big.pdf")
                .mime_type("application/pdf"),
        );
        let res = server.post("/api/feedback").multipart(form).await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_feedback_rejects_empty_category() {
        let (server, _dir) = server();

        let res = server
            .post("/api/feedback/submit")
            .json(&json!({"category": "", "message": "Works great."}))
            .await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_upload_and_download_round_trip() {
        let (server, _dir) = server();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"hello".to_vec())
                .file_name("report card.pdf")
                .mime_type("application/pdf"),
        );
        let res = server.post("/api/feedback/upload").multipart(form).await;
        res.assert_status_ok();

        let body: Value = res.json();
        let filename = body["filename"].as_str().unwrap().to_string();
        assert!(!filename.contains(' '));

        let res = server
            .get(&format!("/api/feedback/download/{}", filename))
            .await;
        res.assert_status_ok();
        assert_eq!(res.as_bytes().as_ref(), &b"hello"[..]);
        assert_eq!(
            res.headers()
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap(),
            "application/pdf"
        );
    }

    #[tokio::test]
    async fn test_upload_requires_file() {
        let (server, _dir) = server();

        let res = server
            .post("/api/feedback/upload")
            .multipart(MultipartForm::new())
            .await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_download_missing_file_is_not_found() {
        let (server, _dir) = server();

        let res = server
            .get("/api/feedback/download/does-not-exist.pdf")
            .await;
        res.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_download_rejects_unsafe_name() {
        let (server, _dir) = server();

        let res = server
            .get("/api/feedback/download/bad%20name.pdf")
            .await;
        res.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_file() {
        // The test pool points at a closed port, so the insert always fails;
        // the file written before it must be cleaned up again.
        let (server, dir) = server();

        let form = feedback_form("general", "Works great.").add_part(
            "file",
            Part::bytes(b"hello".to_vec())
                .file_name("report.pdf")
                .mime_type("application/pdf"),
        );
        let res = server.post("/api/feedback").multipart(form).await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let leftover = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }
}
