use std::collections::BTreeMap;

use serde::Serialize;

use crate::{AnswerValue, FileInfo};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    MissingId(String),

    #[error("Type mismatch for question '{id}': expected {expected}, got {actual}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Answers collected from a form, keyed by question id.
///
/// Holds one entry per answered question on the active path, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<String, AnswerValue>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<AnswerValue> {
        self.values.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or_default()
    }

    // === Convenience accessors ===

    fn typed<'a, T>(
        &'a self,
        id: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a AnswerValue) -> Option<T>,
    ) -> Result<T, AnswerError> {
        let value = self
            .get(id)
            .ok_or_else(|| AnswerError::MissingId(id.to_string()))?;
        extract(value).ok_or_else(|| AnswerError::TypeMismatch {
            id: id.to_string(),
            expected,
            actual: value.type_name(),
        })
    }

    pub fn get_text(&self, id: &str) -> Result<&str, AnswerError> {
        self.typed(id, "Text", AnswerValue::as_text)
    }

    /// Numeric answer. Number questions store coerced numbers; text answers
    /// are not parsed here.
    pub fn get_number(&self, id: &str) -> Result<f64, AnswerError> {
        self.typed(id, "Number", |value| match value {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        })
    }

    pub fn get_list(&self, id: &str) -> Result<&[String], AnswerError> {
        self.typed(id, "List", AnswerValue::as_list)
    }

    pub fn get_files(&self, id: &str) -> Result<&[FileInfo], AnswerError> {
        self.typed(id, "Files", AnswerValue::as_files)
    }

    pub fn get_map(&self, id: &str) -> Result<&BTreeMap<String, AnswerValue>, AnswerError> {
        self.typed(id, "Map", AnswerValue::as_map)
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Answers {
    type Item = (String, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a String, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
