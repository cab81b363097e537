use crate::config::{Config, MissingFieldPolicy};
use crate::error::FileError;
use crate::pipeline::output_manager::OutputManager;
use crate::pipeline::record::{Batch, KeywordPredicate};
use crate::pipeline::summary::{ProcessedFile, SkippedFile};
use crate::scanner::FileFilter;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Processed(ProcessedFile),
    Skipped(SkippedFile),
}

/// Runs one file through read → decode → filter → write.
pub struct FileProcessor<'a> {
    filter: FileFilter,
    predicate: KeywordPredicate,
    policy: MissingFieldPolicy,
    indent: usize,
    output: &'a OutputManager,
}

impl<'a> FileProcessor<'a> {
    pub fn new(config: &Config, output: &'a OutputManager) -> Self {
        Self {
            filter: FileFilter::new(&config.scan),
            predicate: KeywordPredicate::new(config.filter.field.as_str(), &config.filter.keyword),
            policy: config.filter.on_missing_field,
            indent: config.output.indent,
            output,
        }
    }

    /// Processes a single file. Inapplicable files come back as
    /// [`FileOutcome::Skipped`]; everything else either writes an output
    /// document or returns the error for this file alone.
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome, FileError> {
        if let Err(reason) = self.filter.check(path) {
            return Ok(FileOutcome::Skipped(SkippedFile {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            }));
        }

        let metadata = fs::metadata(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if !self.filter.is_size_allowed(metadata.len()) {
            return Err(FileError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max_size: self.filter.max_file_size(),
            });
        }

        let text = fs::read_to_string(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let batch = Batch::from_json(&text, self.predicate.field(), self.policy)
            .map_err(|e| e.at(path))?;
        let records_read = batch.len();
        let records_excluded = batch.excluded();

        let document = batch.select(&self.predicate);
        log::debug!(
            "{}: {} of {} records matched",
            path.display(),
            document.len(),
            records_read
        );

        let contents = document
            .render(self.indent)
            .map_err(|source| FileError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;

        let destination = self.output.output_path_for(path).ok_or_else(|| FileError::Write {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name"),
        })?;

        self.output
            .write_document(&destination, &contents)
            .map_err(|source| FileError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(FileOutcome::Processed(ProcessedFile {
            source: path.to_path_buf(),
            output: destination,
            records_read,
            records_matched: document.len(),
            records_excluded,
        }))
    }
}
