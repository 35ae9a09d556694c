use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::feedback::dtos::{CreateFeedbackDto, FeedbackAttachment};
use crate::features::feedback::models::Feedback;
use crate::modules::storage::LocalFileStore;

/// Service for feedback submissions and attachment retrieval
pub struct FeedbackService {
    pool: PgPool,
    store: Arc<LocalFileStore>,
}

impl FeedbackService {
    pub fn new(pool: PgPool, store: Arc<LocalFileStore>) -> Self {
        Self { pool, store }
    }

    /// Persist a feedback submission.
    ///
    /// The attachment, if any, is written to the file store before the
    /// database insert. At most one file write and one insert happen per
    /// call. If the insert fails after the file was written, the file is
    /// removed again on a best-effort basis and the error propagates.
    pub async fn submit(
        &self,
        dto: CreateFeedbackDto,
        attachment: Option<FeedbackAttachment>,
    ) -> Result<Feedback> {
        let stored_name = match &attachment {
            Some(att) => Some(self.store.save(&att.file_name, &att.data).await?),
            None => None,
        };

        let file_path = stored_name
            .as_deref()
            .map(|name| self.store.stored_path(name));

        match self.insert_feedback(&dto, file_path.as_deref()).await {
            Ok(feedback) => {
                info!(
                    "Feedback created: id={}, category={}, message_len={}, file_path={:?}, created_at={}",
                    feedback.id,
                    feedback.category,
                    feedback.message.len(),
                    feedback.file_path,
                    feedback.created_at
                );
                Ok(feedback)
            }
            Err(e) => {
                // The stored file is unreachable without its record
                if let Some(name) = stored_name {
                    if let Err(cleanup_err) = self.store.remove(&name).await {
                        warn!(
                            "Failed to remove stored file {} after insert error: {}",
                            name, cleanup_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn insert_feedback(
        &self,
        dto: &CreateFeedbackDto,
        file_path: Option<&str>,
    ) -> Result<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO user_feedback (category, message, file_path)
            VALUES ($1, $2, $3)
            RETURNING id, category, message, file_path, created_at
            "#,
        )
        .bind(&dto.category)
        .bind(&dto.message)
        .bind(file_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert feedback: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(feedback)
    }

    /// Store a standalone upload without a feedback record.
    ///
    /// Returns the generated filename under which the upload can be
    /// downloaded again.
    pub async fn store_attachment(&self, attachment: FeedbackAttachment) -> Result<String> {
        let name = self
            .store
            .save(&attachment.file_name, &attachment.data)
            .await?;

        info!(
            "Standalone upload stored: name={}, size={} bytes",
            name,
            attachment.data.len()
        );

        Ok(name)
    }

    /// Fetch a stored file for download.
    pub async fn download(&self, filename: &str) -> Result<(Vec<u8>, String)> {
        self.store.read(filename).await
    }
}
