//! Storage module for uploaded files
//!
//! Provides a local filesystem store for feedback attachments:
//! collision-resistant filenames on write, content-type inference on read.

mod local_store;

pub use local_store::{sanitize_filename, LocalFileStore};
