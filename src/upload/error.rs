use crate::utils::download::DownloadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please select a file to upload")]
    NoFileSelected,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status, with the service's `error` message when it sent one.
    #[error("Upload failed with status {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

impl UploadError {
    /// Errors the user is told about; everything else only reaches the log.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, UploadError::NoFileSelected)
    }
}
