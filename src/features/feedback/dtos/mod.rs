pub mod feedback_dto;

pub use feedback_dto::{
    is_mime_type_allowed, CreateFeedbackDto, FeedbackAttachment, SubmitFeedbackDto, UploadFileDto,
    ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};
