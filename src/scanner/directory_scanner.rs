use crate::error::{CropFilterError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files sitting directly under a directory.
#[derive(Debug, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn new() -> Self {
        Self
    }

    /// Canonicalizes `root` and checks that it is a directory.
    pub fn resolve_root<P: AsRef<Path>>(&self, root: P) -> Result<PathBuf> {
        let root = root.as_ref();

        let resolved = fs::canonicalize(root).map_err(|source| CropFilterError::ScanFailed {
            path: root.display().to_string(),
            source,
        })?;

        if !resolved.is_dir() {
            return Err(CropFilterError::NotADirectory {
                path: resolved.display().to_string(),
            });
        }

        Ok(resolved)
    }

    /// Returns absolute paths of every regular file directly under `root`.
    ///
    /// Directories, symlinks and special files are left out and the scan does
    /// not recurse. Any listing error fails the whole scan. The result is
    /// sorted by file name.
    pub fn list_regular_files<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        let root = self.resolve_root(root)?;

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false) // symlinks are reported as such, never as files
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .unwrap_or(root.as_path())
                    .display()
                    .to_string();
                CropFilterError::ScanFailed {
                    path,
                    source: err.into(),
                }
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            } else {
                log::debug!("Ignoring non-regular entry {}", entry.path().display());
            }
        }

        log::debug!("Found {} regular files in {}", files.len(), root.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("a.json"), "[]").unwrap();
        fs::write(root.join("b.txt"), "text").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("c.json"), "[]").unwrap();

        let scanner = DirectoryScanner::new();
        let files = scanner.list_regular_files(root).unwrap();

        let names: HashSet<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        let expected: HashSet<String> = ["a.json", "b.txt"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);

        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = DirectoryScanner::new()
            .list_regular_files(temp_dir.path())
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = DirectoryScanner::new().list_regular_files(&missing);
        assert!(matches!(result, Err(CropFilterError::ScanFailed { .. })));
    }

    #[test]
    fn test_file_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("crops.json");
        fs::write(&file, "[]").unwrap();

        let result = DirectoryScanner::new().list_regular_files(&file);
        assert!(matches!(result, Err(CropFilterError::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("real.json"), "[]").unwrap();
        std::os::unix::fs::symlink(root.join("real.json"), root.join("link.json")).unwrap();

        let files = DirectoryScanner::new().list_regular_files(root).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.json"));
    }
}
