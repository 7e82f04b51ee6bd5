//! Configuration file for the uploader.
//!
//! Holds the two conversion endpoints, which response contract is active,
//! where spreadsheet downloads go and the log verbosity. Stored as JSON in
//! the user's config directory.

use crate::upload::ResponseContract;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current configuration file format version.
pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_POLYLINES_ENDPOINT: &str = "http://localhost:5000/upload-dxf";
pub const DEFAULT_SPREADSHEET_ENDPOINT: &str = "http://localhost:5001/upload";

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Endpoint for each response contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_polylines_endpoint")]
    pub polylines: String,
    #[serde(default = "default_spreadsheet_endpoint")]
    pub spreadsheet: String,
}

fn default_polylines_endpoint() -> String {
    DEFAULT_POLYLINES_ENDPOINT.to_string()
}

fn default_spreadsheet_endpoint() -> String {
    DEFAULT_SPREADSHEET_ENDPOINT.to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            polylines: default_polylines_endpoint(),
            spreadsheet: default_spreadsheet_endpoint(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Which response shape to expect from the service
    #[serde(default)]
    pub contract: ResponseContract,

    #[serde(default)]
    pub endpoints: Endpoints,

    /// Folder spreadsheet downloads are saved to. Falls back to the
    /// system download folder.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            contract: ResponseContract::default(),
            endpoints: Endpoints::default(),
            download_dir: None,
            log_level: LogLevel::default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self.contract {
            ResponseContract::Polylines => &self.endpoints.polylines,
            ResponseContract::Spreadsheet => &self.endpoints.spreadsheet,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "config.json"
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("dxf-uploader").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("dxf-uploader")
                    .join(Self::default_filename())
            })
        }
    }

    /// Returns `Ok(None)` when there is no file. Nothing is logged here so
    /// the caller can report the result once logging is up.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map(Some)
    }

    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
