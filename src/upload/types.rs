use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which response shape the configured endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseContract {
    /// JSON array of LWPOLYLINE records, rendered on the form.
    Polylines,
    /// Binary spreadsheet body, saved as a download.
    #[default]
    Spreadsheet,
}

impl ResponseContract {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseContract::Polylines => "LWPOLYLINE JSON",
            ResponseContract::Spreadsheet => "Grid cells spreadsheet",
        }
    }

    pub fn all() -> &'static [ResponseContract] {
        &[ResponseContract::Polylines, ResponseContract::Spreadsheet]
    }
}

/// A file picked by the user, read into memory at selection time.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    #[derivative(Debug = "ignore")]
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let raw_name = path.file_name().unwrap_or_default();
        let name = raw_name.to_string_lossy().to_string();
        if raw_name.to_str().is_none() {
            log::warn!(
                "File name {:?} is not valid UTF-8, uploading it as {:?}",
                raw_name,
                name
            );
        }
        let bytes = fs::read(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            ..Self::new(name, bytes)
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Body of a successful response, shaped by the active contract.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResponse {
    Polylines(Vec<Value>),
    Spreadsheet(Vec<u8>),
}

/// What the background submission reports back to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Rendered(Vec<Value>),
    Downloaded { path: PathBuf, size: u64 },
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor plan.dxf");
        fs::write(&path, b"0\nEOF\n").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();

        assert_eq!(file.name, "floor plan.dxf");
        assert_eq!(file.path, path);
        assert_eq!(file.size(), 6);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_replaced() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"pl\xffan.dxf"));
        fs::write(&path, b"0\nEOF\n").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();

        assert_eq!(file.name, "pl\u{fffd}an.dxf");
        assert_eq!(file.path, path);
        assert_eq!(file.bytes, b"0\nEOF\n");
    }
}
