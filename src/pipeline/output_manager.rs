use crate::error::{CropFilterError, Result};
use crate::pipeline::RunSummary;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Whether `ensure_directory` had to create the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    Created,
    Existing,
}

/// Owns the output directory: creating it, naming files in it, writing them.
pub struct OutputManager {
    output_directory: PathBuf,
    prefix: String,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(output_directory: P, prefix: S) -> Self {
        Self {
            output_directory: output_directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates the output directory unless it already exists.
    ///
    /// The create is non-recursive: the directory always sits one level below
    /// the scan root. An existing directory counts as success; anything else,
    /// including a regular file in its place, is fatal.
    pub fn ensure_directory(&self) -> Result<DirectoryState> {
        match fs::create_dir(&self.output_directory) {
            Ok(()) => Ok(DirectoryState::Created),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && self.output_directory.is_dir() => {
                Ok(DirectoryState::Existing)
            }
            Err(source) => Err(CropFilterError::OutputDirectory {
                path: self.output_directory.display().to_string(),
                source,
            }),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// `<output_directory>/<prefix>_<file name of source>`.
    pub fn output_path_for(&self, source: &Path) -> Option<PathBuf> {
        let file_name = source.file_name()?;
        let mut name = OsString::from(format!("{}_", self.prefix));
        name.push(file_name);
        Some(self.output_directory.join(name))
    }

    /// Replaces `destination` with `contents`.
    ///
    /// The bytes go to a temporary file in the output directory first and are
    /// then renamed into place, so readers never observe a partial document.
    pub fn write_document(&self, destination: &Path, contents: &[u8]) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.output_directory)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }

        temp.persist(destination).map_err(|e| e.error)?;
        Ok(())
    }

    /// Writes the run summary as pretty JSON next to the filtered documents.
    pub fn write_report(&self, summary: &RunSummary, file_name: &str) -> Result<PathBuf> {
        let report_path = self.output_directory.join(file_name);

        let json_content =
            serde_json::to_vec_pretty(summary).map_err(|e| CropFilterError::Report {
                path: report_path.display().to_string(),
                message: format!("failed to serialize report: {}", e),
            })?;

        self.write_document(&report_path, &json_content)
            .map_err(|e| CropFilterError::Report {
                path: report_path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(report_path)
    }
}
