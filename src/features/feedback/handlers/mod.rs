pub mod feedback_handler;

pub use feedback_handler::{
    __path_create_feedback, __path_download_file, __path_feedback_index, __path_submit_feedback,
    __path_upload_file, create_feedback, download_file, feedback_index, submit_feedback,
    upload_file,
};
