use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The dataset label stamped on every log row (spec §6 `dataset`).
///
/// `_` is the raw log's internal delimiter, so it is rejected here rather
/// than silently rewritten the way the original
/// `combine_matches.py` does (`dataset.replace('_', '-')`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dataset(String);

impl Dataset {
    pub fn new(value: impl Into<String>) -> Result<Self, DatasetError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DatasetError::Empty);
        }
        if value.contains('_') {
            return Err(DatasetError::ContainsUnderscore(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Dataset {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Dataset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset label must not be empty")]
    Empty,
    #[error("dataset label must not contain '_', found: {0:?}")]
    ContainsUnderscore(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_underscore() {
        assert!(matches!(
            Dataset::new("my_dataset"),
            Err(DatasetError::ContainsUnderscore(_))
        ));
    }

    #[test]
    fn accepts_hyphenated() {
        assert!(Dataset::new("my-dataset").is_ok());
    }
}
