mod client;
mod error;
mod types;

pub use client::UploadClient;
pub use error::UploadError;
pub use types::{ResponseContract, SelectedFile, SubmissionOutcome, UploadResponse};
