mod state;
mod ui;

use crate::config::AppConfig;
use crate::upload::{
    ResponseContract, SelectedFile, SubmissionOutcome, UploadClient, UploadError, UploadResponse,
};
use crate::utils::download;
use eframe::{egui, App};
pub use state::{FormPhase, FormState, SavedDownload};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;

pub struct DxfUploader {
    config: AppConfig,
    config_path: Option<PathBuf>,
    state: FormState,
}

impl DxfUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        log::info!(
            "Initializing DXF uploader (contract: {:?}, endpoint: {})",
            config.contract,
            config.endpoint()
        );
        Self::with_config(config, AppConfig::default_path())
    }

    pub fn with_config(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the selected file. A cancelled picker passes `None` and
    /// leaves the form untouched.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            log::debug!("File selection cancelled");
            return;
        };

        log::info!("Selected file: {:?} ({} bytes)", file.path, file.size());
        self.state.selected_file = Some(file);
        self.state.notice = None;
    }

    pub fn select_path(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select_file(Some(file)),
            Err(e) => log::error!("{}", UploadError::from(e)),
        }
    }

    /// Switches the response contract while no request is in flight and
    /// persists the choice.
    pub fn set_contract(&mut self, contract: ResponseContract) {
        if self.state.busy || self.config.contract == contract {
            return;
        }

        log::info!("Switching response contract to {:?}", contract);
        self.config.contract = contract;

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                log::warn!("Failed to save configuration: {}", e);
            }
        }
    }

    /// Sends the selected file to the configured endpoint on a worker thread.
    /// The outcome is picked up by [`DxfUploader::poll`].
    pub fn submit(&mut self) -> Result<(), UploadError> {
        if self.state.busy {
            log::warn!("Ignoring submit: a request is already in flight");
            return Err(UploadError::SubmissionInFlight);
        }

        let Some(file) = self.state.selected_file.clone() else {
            let err = UploadError::NoFileSelected;
            self.state.notice = Some(err.to_string());
            return Err(err);
        };

        let client = UploadClient::new(self.config.endpoint(), self.config.contract);
        let download_dir = self.config.download_dir();
        log::info!(
            "Uploading {} to {} ({:?})",
            file.name,
            client.endpoint(),
            client.contract()
        );

        let (sender, receiver) = std_mpsc::channel();
        self.state.outcome_receiver = Some(receiver);
        self.state.busy = true;
        self.state.notice = None;

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(Self::run_submission(&client, &file, &download_dir)),
                Err(e) => SubmissionOutcome::Failed(format!("Failed to start runtime: {}", e)),
            };
            sender.send(outcome).unwrap_or_default();
        });

        Ok(())
    }

    async fn run_submission(
        client: &UploadClient,
        file: &SelectedFile,
        download_dir: &Path,
    ) -> SubmissionOutcome {
        let result = match client.upload(file).await {
            Ok(UploadResponse::Polylines(records)) => Ok(SubmissionOutcome::Rendered(records)),
            Ok(UploadResponse::Spreadsheet(bytes)) => {
                download::save_spreadsheet(download_dir, &bytes)
                    .map(|path| SubmissionOutcome::Downloaded {
                        path,
                        size: bytes.len() as u64,
                    })
                    .map_err(UploadError::from)
            }
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| SubmissionOutcome::Failed(e.to_string()))
    }

    /// Applies the outcome of the in-flight submission, if it has finished.
    /// Returns true when the submission completed during this call.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.state.outcome_receiver else {
            return false;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(std_mpsc::TryRecvError::Empty) => return false,
            Err(std_mpsc::TryRecvError::Disconnected) => {
                SubmissionOutcome::Failed("Upload worker exited without a result".to_string())
            }
        };

        self.state.finish_submission();
        self.apply_outcome(outcome);
        true
    }

    fn apply_outcome(&mut self, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Rendered(records) => {
                log::info!("Received {} LWPOLYLINE records", records.len());
                if let Err(e) = self.state.set_polylines(records) {
                    log::error!("Error uploading file: {}", e);
                }
            }
            SubmissionOutcome::Downloaded { path, size } => {
                self.state.last_download = Some(SavedDownload { path, size });
            }
            SubmissionOutcome::Failed(message) => {
                log::error!("Error uploading file: {}", message);
            }
        }
    }

    /// Rendered JSON to show on the form. Only the polylines contract renders
    /// records, so a spreadsheet submission never shows earlier ones.
    pub fn visible_polylines(&self) -> Option<&str> {
        match self.config.contract {
            ResponseContract::Polylines => self.state.rendered_output(),
            ResponseContract::Spreadsheet => None,
        }
    }

    pub fn open_download(&self) {
        if let Some(download) = &self.state.last_download {
            if let Err(e) = open::that(&download.path) {
                log::error!("Failed to open {:?}: {}", download.path, e);
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.poll();
        if self.state.busy {
            ctx.request_repaint();
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }
}

impl App for DxfUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
