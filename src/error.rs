use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum CropFilterError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to read directory {path}: {source}")]
    ScanFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write run report {path}: {message}")]
    Report { path: String, message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

/// Errors confined to a single input file. The run records them and moves on.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{path}: file too large ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    #[error("{path}: failed to read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: document root must be an array, found {found}")]
    NotAnArray { path: PathBuf, found: &'static str },

    #[error("{path}: element {index} must be an object, found {found}")]
    NotAnObject {
        path: PathBuf,
        index: usize,
        found: &'static str,
    },

    #[error("{path}: element {index} has no \"{field}\" field")]
    MissingField {
        path: PathBuf,
        index: usize,
        field: String,
    },

    #[error("{path}: element {index} field \"{field}\" must be a string, found {found}")]
    FieldNotString {
        path: PathBuf,
        index: usize,
        field: String,
        found: &'static str,
    },

    #[error("{path}: failed to serialize output: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: failed to write output: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    /// The input file the error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            FileError::TooLarge { path, .. }
            | FileError::Read { path, .. }
            | FileError::Parse { path, .. }
            | FileError::NotAnArray { path, .. }
            | FileError::NotAnObject { path, .. }
            | FileError::MissingField { path, .. }
            | FileError::FieldNotString { path, .. }
            | FileError::Serialize { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }

    /// Short machine-friendly category, used in JSON notices and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::TooLarge { .. } => "too_large",
            FileError::Read { .. } => "read",
            FileError::Parse { .. } => "parse",
            FileError::NotAnArray { .. } => "not_an_array",
            FileError::NotAnObject { .. } => "not_an_object",
            FileError::MissingField { .. } => "missing_field",
            FileError::FieldNotString { .. } => "field_not_string",
            FileError::Serialize { .. } => "serialize",
            FileError::Write { .. } => "write",
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CropFilterError {
    fn user_message(&self) -> String {
        match self {
            CropFilterError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            CropFilterError::ScanFailed { path, source } => {
                format!("Cannot read directory {}: {}", path, source)
            }
            CropFilterError::NotADirectory { path } => {
                format!("Scan root is not a directory: {}", path)
            }
            CropFilterError::OutputDirectory { path, source } => {
                format!("Cannot create output directory {}: {}", path, source)
            }
            CropFilterError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CropFilterError::Config { .. } => Some(
                "Check your configuration file syntax and the values passed on the command line.".to_string()
            ),
            CropFilterError::ScanFailed { .. } | CropFilterError::NotADirectory { .. } => Some(
                "Pass an existing, readable directory as the scan root.".to_string()
            ),
            CropFilterError::OutputDirectory { .. } => Some(
                "Ensure you have write permission in the scan root, or choose another name with --output-dir.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CropFilterError {
    fn from(error: toml::de::Error) -> Self {
        CropFilterError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CropFilterError>;

/// JSON type name used in validation messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
