//! Input discovery.
//!
//! Inputs may be files or directories. Files are taken as given, whatever
//! their extension; directories contribute their direct children whose
//! extension is one the selected mode reads, except earlier outputs of the
//! same mode (`<stem>.<mode>.csv`).

use crate::constants::CSV_EXTENSION;
use crate::error::{FieldLogError, Result};
use crate::models::ParseMode;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug)]
pub struct FileDiscovery {
    mode: ParseMode,
}

impl FileDiscovery {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    /// Resolve inputs to a deduplicated list of files, in argument order
    pub async fn discover(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();

        for input in inputs {
            let metadata = fs::metadata(input)
                .await
                .map_err(|_| FieldLogError::FileNotFound {
                    path: input.clone(),
                })?;

            let found = if metadata.is_dir() {
                self.discover_directory(input).await?
            } else {
                vec![input.clone()]
            };

            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        debug!("Discovered {} input files for {}", files.len(), self.mode);
        Ok(files)
    }

    async fn discover_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && self.accepts(&path) {
                files.push(path);
            }
        }

        // Directory order is platform dependent
        files.sort();
        debug!("Found {} files in {}", files.len(), dir.display());
        Ok(files)
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.is_own_output(path) {
            return false;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.mode
                    .input_extensions()
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
    }

    fn is_own_output(&self, path: &Path) -> bool {
        let suffix = format!(".{}.{}", self.mode, CSV_EXTENSION);
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_directory_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.log", "a.txt", "c.csv", "notes.md"] {
            std_fs::write(temp_dir.path().join(name), "").unwrap();
        }
        std_fs::create_dir(temp_dir.path().join("nested.log")).unwrap();

        let files = FileDiscovery::new(ParseMode::Ue)
            .discover(&[temp_dir.path().to_path_buf()])
            .await
            .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.log"]);
    }

    #[tokio::test]
    async fn test_explicit_files_are_kept_once() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("drive.csv");
        std_fs::write(&file, "Time\n").unwrap();

        let files = FileDiscovery::new(ParseMode::Ue)
            .discover(&[file.clone(), file.clone()])
            .await
            .unwrap();
        assert_eq!(files, [file]);
    }

    #[tokio::test]
    async fn test_previous_outputs_are_not_rediscovered() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["drive.csv", "drive.nemo.csv", "other.vehicleOut.csv"] {
            std_fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let files = FileDiscovery::new(ParseMode::Nemo)
            .discover(&[temp_dir.path().to_path_buf()])
            .await
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["drive.csv", "other.vehicleOut.csv"]);

        let files = FileDiscovery::new(ParseMode::VehicleOut)
            .discover(&[temp_dir.path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(!files.iter().any(|p| p.ends_with("other.vehicleOut.csv")));
    }

    #[tokio::test]
    async fn test_missing_input() {
        let err = FileDiscovery::new(ParseMode::Ping)
            .discover(&[PathBuf::from("/no/such/ping.log")])
            .await
            .unwrap_err();
        assert!(matches!(err, FieldLogError::FileNotFound { .. }));
    }
}
