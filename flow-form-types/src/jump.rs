use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::Question;

/// Jump target that ends the form instead of naming a question.
pub const SUBMIT_TARGET: &str = "_submit";

/// Jump mapping key used when no literal answer matches.
pub const OTHER_KEY: &str = "_other";

/// A function deciding the next question from the question's own state.
pub type JumpFn = Arc<dyn Fn(&Question) -> Option<String> + Send + Sync>;

/// Per-question rule overriding sequential order.
#[derive(Clone)]
pub enum Jump {
    /// Literal answer (or [`OTHER_KEY`]) to target id.
    Map(BTreeMap<String, String>),

    /// Computed target.
    Function(JumpFn),
}

impl Jump {
    /// Build a mapping rule from `(answer, target)` pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a computed rule.
    pub fn function(f: impl Fn(&Question) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// An empty mapping behaves as if no jump was configured.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Map(entries) => entries.is_empty(),
            Self::Function(_) => false,
        }
    }

    /// Resolve the target for `question`.
    ///
    /// Functions are called with the question; mappings look up the literal
    /// answer first and fall back to [`OTHER_KEY`]. Empty targets count as
    /// missing.
    pub fn target(&self, question: &Question) -> Option<String> {
        match self {
            Self::Function(f) => f(question).filter(|target| !target.is_empty()),
            Self::Map(entries) => {
                let literal = question
                    .answer()
                    .jump_key()
                    .and_then(|key| entries.get(&key))
                    .filter(|target| !target.is_empty());

                literal
                    .or_else(|| entries.get(OTHER_KEY).filter(|target| !target.is_empty()))
                    .cloned()
            }
        }
    }
}

impl fmt::Debug for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl PartialEq for Jump {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for Jump {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer).map(Self::Map)
    }
}
