pub mod file_processor;
pub mod output_manager;
pub mod record;
pub mod summary;

pub use file_processor::{FileOutcome, FileProcessor};
pub use output_manager::{DirectoryState, OutputManager};
pub use record::{Batch, BatchError, FilterPredicate, InputRecord, KeywordPredicate, OutputDocument};
pub use summary::{FailedFile, ProcessedFile, RunCounts, RunSummary, SkippedFile};
