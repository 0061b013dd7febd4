use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a step of the form: a question id or a serial index in the
/// active path.
///
/// Used as navigation target and as timer start/stop boundary. In JSON it is
/// either a string or a number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepRef {
    Index(usize),
    Id(String),
}

impl StepRef {
    /// Check whether this reference names the step at `index` with `id`.
    pub fn matches(&self, id: Option<&str>, index: usize) -> bool {
        match self {
            Self::Index(i) => *i == index,
            Self::Id(expected) => id == Some(expected.as_str()),
        }
    }

    /// Get the id if this reference is by id.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Index(_) => None,
        }
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for StepRef {
    fn from(s: &str) -> Self {
        Self::Id(s.to_string())
    }
}

impl From<String> for StepRef {
    fn from(s: String) -> Self {
        Self::Id(s)
    }
}

impl From<&String> for StepRef {
    fn from(s: &String) -> Self {
        Self::Id(s.clone())
    }
}

impl From<usize> for StepRef {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}
