use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard response body carrying a human-readable message.
///
/// Used for submission acknowledgments and for every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Response body for standalone file uploads
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub detail: String,
    /// Generated filename under which the upload was stored
    pub filename: String,
}
