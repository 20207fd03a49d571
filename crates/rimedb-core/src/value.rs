use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Attribute values as mediated by the interception runtime: what access
/// shims and fetch callbacks exchange. Storage encoding is the persistence
/// context's concern; this is only the in-memory projection.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    List(Vec<Value>),

    /// Insertion-ordered entries; keys are unique and non-empty.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Build a map value, rejecting invalid entry lists.
    pub fn try_map(
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self, MapValueError> {
        let entries: Vec<(String, Value)> = entries.into_iter().collect();

        for (index, (key, _)) in entries.iter().enumerate() {
            if key.is_empty() {
                return Err(MapValueError::EmptyKey { index });
            }
            if let Some(left_index) = entries[..index].iter().position(|(k, _)| k == key) {
                return Err(MapValueError::DuplicateKey {
                    left_index,
                    right_index: index,
                });
            }
        }

        Ok(Self::Map(entries))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

///
/// MapValueError
///
/// Invariant violations for `Value::Map` construction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MapValueError {
    EmptyKey { index: usize },
    DuplicateKey { left_index: usize, right_index: usize },
}

impl fmt::Display for MapValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey { index } => write!(f, "map entry {index} has an empty key"),
            Self::DuplicateKey {
                left_index,
                right_index,
            } => write!(f, "map entries {left_index} and {right_index} share a key"),
        }
    }
}

impl std::error::Error for MapValueError {}
