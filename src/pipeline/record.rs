use crate::config::MissingFieldPolicy;
use crate::error::{json_type_name, FileError};
use serde::ser::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// One JSON object from an input array. Field order is the source order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    fields: Map<String, Value>,
}

impl InputRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The string value of `field`, if present and a string.
    pub fn name(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Decode failures, before they are attached to a file path.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("document root must be an array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("element {index} must be an object, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    #[error("element {index} has no \"{field}\" field")]
    MissingField { index: usize, field: String },

    #[error("element {index} field \"{field}\" must be a string, found {found}")]
    FieldNotString {
        index: usize,
        field: String,
        found: &'static str,
    },
}

impl BatchError {
    pub fn at(self, path: &Path) -> FileError {
        let path = path.to_path_buf();
        match self {
            BatchError::Parse(source) => FileError::Parse { path, source },
            BatchError::NotAnArray { found } => FileError::NotAnArray { path, found },
            BatchError::NotAnObject { index, found } => FileError::NotAnObject { path, index, found },
            BatchError::MissingField { index, field } => FileError::MissingField { path, index, field },
            BatchError::FieldNotString { index, field, found } => FileError::FieldNotString {
                path,
                index,
                field,
                found,
            },
        }
    }
}

/// All records decoded from one document.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    records: Vec<InputRecord>,
    excluded: usize,
}

impl Batch {
    /// Parses `text` as a JSON array of objects, each carrying a string `field`.
    ///
    /// A root that is not an array, or an element that is not an object, always
    /// fails the batch. Elements without a usable `field` fail it under
    /// [`MissingFieldPolicy::Fail`] and are dropped and counted under
    /// [`MissingFieldPolicy::Skip`].
    pub fn from_json(
        text: &str,
        field: &str,
        policy: MissingFieldPolicy,
    ) -> Result<Self, BatchError> {
        let root: Value = serde_json::from_str(text).map_err(BatchError::Parse)?;

        let items = match root {
            Value::Array(items) => items,
            other => {
                return Err(BatchError::NotAnArray {
                    found: json_type_name(&other),
                })
            }
        };

        let mut batch = Batch {
            records: Vec::with_capacity(items.len()),
            excluded: 0,
        };

        for (index, item) in items.into_iter().enumerate() {
            let fields = match item {
                Value::Object(fields) => fields,
                other => {
                    return Err(BatchError::NotAnObject {
                        index,
                        found: json_type_name(&other),
                    })
                }
            };

            let problem = match fields.get(field) {
                Some(Value::String(_)) => None,
                Some(other) => Some(BatchError::FieldNotString {
                    index,
                    field: field.to_string(),
                    found: json_type_name(other),
                }),
                None => Some(BatchError::MissingField {
                    index,
                    field: field.to_string(),
                }),
            };

            match (problem, policy) {
                (None, _) => batch.records.push(InputRecord::new(fields)),
                (Some(problem), MissingFieldPolicy::Fail) => return Err(problem),
                (Some(_), MissingFieldPolicy::Skip) => {
                    log::debug!("Excluding element {} without a string \"{}\" field", index, field);
                    batch.excluded += 1;
                }
            }
        }

        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.records.len() + self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements dropped by the skip policy.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn records(&self) -> &[InputRecord] {
        &self.records
    }

    /// Keeps the records accepted by `predicate`, in source order.
    pub fn select<P: FilterPredicate + ?Sized>(self, predicate: &P) -> OutputDocument {
        OutputDocument {
            records: self
                .records
                .into_iter()
                .filter(|record| predicate.matches(record))
                .collect(),
        }
    }
}

pub trait FilterPredicate {
    fn matches(&self, record: &InputRecord) -> bool;
}

/// Case-insensitive substring match of a keyword against one string field.
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    field: String,
    needle: String,
}

impl KeywordPredicate {
    pub fn new<F: Into<String>>(field: F, keyword: &str) -> Self {
        Self {
            field: field.into(),
            needle: keyword.to_lowercase(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl FilterPredicate for KeywordPredicate {
    fn matches(&self, record: &InputRecord) -> bool {
        record
            .name(&self.field)
            .is_some_and(|name| name.to_lowercase().contains(&self.needle))
    }
}

/// The records that survived filtering, ready to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputDocument {
    records: Vec<InputRecord>,
}

impl OutputDocument {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[InputRecord] {
        &self.records
    }

    /// Serializes the records as a JSON array indented by `indent` spaces.
    /// An indent of 0 produces compact output. No trailing newline.
    pub fn render(&self, indent: usize) -> Result<Vec<u8>, serde_json::Error> {
        if indent == 0 {
            return serde_json::to_vec(&self.records);
        }

        let indent = vec![b' '; indent];
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
        self.records.serialize(&mut serializer)?;
        Ok(buffer)
    }
}
