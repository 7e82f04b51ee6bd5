use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed name every spreadsheet download is saved under.
pub const SPREADSHEET_FILE_NAME: &str = "grid_cells_output.xlsx";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to create download folder {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write download: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to move download into place: {0}")]
    Persist(std::io::Error),
}

/// Saves `bytes` as [`SPREADSHEET_FILE_NAME`] inside `dir`, replacing any
/// previous download.
///
/// The bytes are staged in a temporary file in the same folder and renamed
/// into place once fully written. The staging file is removed on every
/// error path, so a half-written spreadsheet never appears under the final
/// name.
pub fn save_spreadsheet(dir: &Path, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dir).map_err(|source| DownloadError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut staged = tempfile::Builder::new()
        .prefix(".grid_cells_output")
        .suffix(".part")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    let target = dir.join(SPREADSHEET_FILE_NAME);
    // Dropping the returned file handle removes the staging file.
    staged
        .persist(&target)
        .map_err(|e| DownloadError::Persist(e.error))?;

    log::info!("Saved {} bytes to {:?}", bytes.len(), target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_saves_under_fixed_name() {
        let dir = tempfile::tempdir().unwrap();

        let path = save_spreadsheet(dir.path(), b"PK\x03\x04sheet").unwrap();

        assert_eq!(path, dir.path().join("grid_cells_output.xlsx"));
        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04sheet");
        assert_eq!(entries(dir.path()), ["grid_cells_output.xlsx"]);
    }

    #[test]
    fn test_replaces_previous_download() {
        let dir = tempfile::tempdir().unwrap();
        save_spreadsheet(dir.path(), b"first").unwrap();

        let path = save_spreadsheet(dir.path(), b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
        assert_eq!(entries(dir.path()), ["grid_cells_output.xlsx"]);
    }

    #[test]
    fn test_creates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("downloads").join("dxf");

        let path = save_spreadsheet(&nested, b"sheet").unwrap();

        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_folder_that_is_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = save_spreadsheet(&blocker, b"sheet").unwrap_err();

        assert!(matches!(err, DownloadError::CreateDir { .. }));
        assert_eq!(entries(dir.path()), ["not-a-dir"]);
    }

    #[test]
    fn test_staging_file_released_when_target_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(SPREADSHEET_FILE_NAME)).unwrap();
        fs::write(dir.path().join(SPREADSHEET_FILE_NAME).join("keep"), b"x").unwrap();

        let err = save_spreadsheet(dir.path(), b"sheet").unwrap_err();

        assert!(matches!(err, DownloadError::Persist(_)));
        assert_eq!(entries(dir.path()), [SPREADSHEET_FILE_NAME]);
    }
}
