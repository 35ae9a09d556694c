use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a feedback record
#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub category: String,
    pub message: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
