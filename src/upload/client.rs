use crate::upload::error::UploadError;
use crate::upload::types::{ResponseContract, SelectedFile, UploadResponse};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

/// Name of the multipart field the conversion service reads the drawing from.
pub const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
struct ServiceError {
    error: String,
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    endpoint: String,
    contract: ResponseContract,
}

impl UploadClient {
    pub fn new(endpoint: impl Into<String>, contract: ResponseContract) -> Self {
        Self {
            endpoint: endpoint.into(),
            contract,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn contract(&self) -> ResponseContract {
        self.contract
    }

    /// Posts the file as multipart form data and waits for the whole body.
    pub async fn upload(&self, file: &SelectedFile) -> Result<UploadResponse, UploadError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(FILE_FIELD, part);

        log::debug!(
            "POST {} ({} bytes, contract: {:?})",
            self.endpoint,
            file.size(),
            self.contract
        );

        let client = reqwest::Client::new();
        let response = client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                message: service_error_message(&body),
            });
        }

        let body = response.bytes().await?;
        log::debug!("Received {} bytes with status {}", body.len(), status);

        match self.contract {
            ResponseContract::Polylines => {
                let records: Vec<Value> = serde_json::from_slice(&body)?;
                Ok(UploadResponse::Polylines(records))
            }
            ResponseContract::Spreadsheet => Ok(UploadResponse::Spreadsheet(body.to_vec())),
        }
    }
}

fn service_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServiceError>(body)
        .ok()
        .map(|e| e.error)
}
