use crate::error::FileError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A file that was filtered and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub records_read: usize,
    pub records_matched: usize,
    pub records_excluded: usize,
}

/// A file that was not applicable to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// A file whose processing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub kind: String,
    pub message: String,
}

impl From<&FileError> for FailedFile {
    fn from(error: &FileError) -> Self {
        Self {
            path: error.path().to_path_buf(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of one run over a directory.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub output_directory: PathBuf,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub counts: RunCounts,
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
    #[serde(skip)]
    start_time: Instant,
}

impl RunSummary {
    pub fn new(root: &Path, output_directory: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            started_at: Utc::now(),
            duration_ms: 0,
            counts: RunCounts::default(),
            processed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record_processed(&mut self, file: ProcessedFile) {
        self.counts.processed += 1;
        self.processed.push(file);
    }

    pub fn record_skipped(&mut self, file: SkippedFile) {
        self.counts.skipped += 1;
        self.skipped.push(file);
    }

    pub fn record_failed(&mut self, error: &FileError) {
        self.counts.failed += 1;
        self.failed.push(FailedFile::from(error));
    }

    /// Freezes the duration. Call once the last file is done.
    pub fn finish(&mut self) {
        self.duration_ms = self.start_time.elapsed().as_millis() as u64;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn total_files(&self) -> usize {
        self.counts.processed + self.counts.skipped + self.counts.failed
    }

    pub fn records_matched(&self) -> usize {
        self.processed.iter().map(|f| f.records_matched).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(name: &str, matched: usize) -> ProcessedFile {
        ProcessedFile {
            source: PathBuf::from(name),
            output: PathBuf::from(format!("out/Process_{}", name)),
            records_read: 10,
            records_matched: matched,
            records_excluded: 0,
        }
    }

    #[test]
    fn test_counts_follow_records() {
        let mut summary = RunSummary::new(Path::new("/data"), Path::new("/data/out"));
        summary.record_processed(processed("a.json", 2));
        summary.record_processed(processed("b.json", 3));
        summary.record_skipped(SkippedFile {
            path: PathBuf::from("notes.txt"),
            reason: "unsupported extension .txt".to_string(),
        });
        summary.record_failed(&FileError::NotAnArray {
            path: PathBuf::from("bad.json"),
            found: "object",
        });

        assert_eq!(
            summary.counts,
            RunCounts {
                processed: 2,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(summary.total_files(), 4);
        assert_eq!(summary.records_matched(), 5);
        assert!(summary.has_failures());
        assert_eq!(summary.failed[0].kind, "not_an_array");
    }

    #[test]
    fn test_summary_serialization() {
        let mut summary = RunSummary::new(Path::new("/data"), Path::new("/data/out"));
        summary.record_processed(processed("a.json", 1));
        summary.finish();

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["counts"]["processed"], 1);
        assert_eq!(value["processed"][0]["records_matched"], 1);
        assert!(value.get("start_time").is_none());
        assert!(value["started_at"].is_string());
    }
}
