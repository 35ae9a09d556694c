use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for a feedback submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFeedbackDto {
    /// Feedback category (e.g. "general", "technical", "billing")
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    /// The feedback text
    #[validate(length(min = 1, max = 280, message = "Message must be 1-280 characters"))]
    pub message: String,
}

/// An uploaded attachment held in memory between multipart parsing and storage
#[derive(Debug, Clone)]
pub struct FeedbackAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Multipart feedback submission for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitFeedbackDto {
    /// Feedback category
    pub category: String,
    /// The feedback text (max 280 characters)
    pub message: String,
    /// Optional file attachment
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}

/// Multipart file upload for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Allowed MIME types for attachments
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Maximum attachment size in bytes (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Check if a MIME type is allowed
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(category: &str, message: &str) -> CreateFeedbackDto {
        CreateFeedbackDto {
            category: category.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_feedback_passes() {
        assert!(dto("general", "Works great.").validate().is_ok());
        assert!(dto("technical", &"x".repeat(280)).validate().is_ok());
    }

    #[test]
    fn test_empty_fields_fail() {
        assert!(dto("", "Works great.").validate().is_err());
        assert!(dto("general", "").validate().is_err());
    }

    #[test]
    fn test_overlong_message_fails() {
        assert!(dto("general", &"x".repeat(281)).validate().is_err());
    }

    #[test]
    fn test_mime_type_allowlist() {
        assert!(is_mime_type_allowed("image/jpeg"));
        assert!(is_mime_type_allowed("image/png"));
        assert!(is_mime_type_allowed("application/pdf"));
        assert!(!is_mime_type_allowed("application/x-msdownload"));
        assert!(!is_mime_type_allowed("text/html"));
    }
}
