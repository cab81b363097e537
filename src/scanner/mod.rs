pub mod directory_scanner;
pub mod file_filter;

pub use directory_scanner::DirectoryScanner;
pub use file_filter::{FileFilter, SkipReason};
