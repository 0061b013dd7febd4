use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata for a file attached to a `File` question.
///
/// The engine never reads file contents; validation only needs the name,
/// the mime type and the size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    /// The extension including the leading dot, e.g. `".pdf"`.
    pub fn extension(&self) -> Option<&str> {
        self.name.rfind('.').map(|dot| &self.name[dot..])
    }
}

/// The current answer of a question.
///
/// The shape depends on the question type: free-text types hold `Text`,
/// numeric types hold `Number` once coerced, `multiple` choice questions
/// hold a `List`, matrices and composite questions hold a `Map` keyed by
/// row or subquestion id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Nothing entered yet.
    #[default]
    Empty,

    /// A numeric value (from Number questions).
    Number(f64),

    /// A single textual value (text inputs, single-select choices).
    Text(String),

    /// Several values (multi-select choices, multiple matrix cells).
    List(Vec<String>),

    /// Attached files (from File questions).
    Files(Vec<FileInfo>),

    /// Values keyed by row or subquestion id.
    Map(BTreeMap<String, AnswerValue>),
}

impl AnswerValue {
    /// Check if this value counts as user input.
    ///
    /// Strings are trimmed, collections must be non-empty and maps need at
    /// least one entry that itself has a value.
    pub fn has_value(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Number(_) => true,
            Self::Text(s) => !s.trim().is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Files(files) => !files.is_empty(),
            Self::Map(entries) => entries.values().any(Self::has_value),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_value()
    }

    /// The literal key used to look this answer up in a jump mapping.
    pub fn jump_key(&self) -> Option<String> {
        match self {
            Self::Empty | Self::Files(_) | Self::Map(_) => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(items) => Some(items.join(",")),
        }
    }

    /// Equality for scalar answers, membership for lists.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Text(s) => s == value,
            Self::Number(n) => n.to_string() == value,
            Self::List(items) => items.iter().any(|item| item == value),
            _ => false,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the answer. Text is parsed after trimming; an empty
    /// answer counts as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Empty => Some(0.0),
            Self::Text(s) if s.trim().is_empty() => Some(0.0),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[FileInfo]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, AnswerValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Length in characters of a textual answer, zero otherwise.
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Number(n) => n.to_string().chars().count(),
            _ => 0,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Number(_) => "Number",
            Self::Text(_) => "Text",
            Self::List(_) => "List",
            Self::Files(_) => "Files",
            Self::Map(_) => "Map",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<FileInfo>> for AnswerValue {
    fn from(files: Vec<FileInfo>) -> Self {
        Self::Files(files)
    }
}

impl From<BTreeMap<String, AnswerValue>> for AnswerValue {
    fn from(entries: BTreeMap<String, AnswerValue>) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<AnswerValue>> From<Option<T>> for AnswerValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
