//! String-keyed data source configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConstructionError;

/// Key naming the backend kind, e.g. `type = memory`.
pub const TYPE_KEY: &str = "type";

/// Configuration handed to [`DataSourceFactory`](super::factory::DataSourceFactory)s.
///
/// Keys are backend specific; each factory documents the ones it reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceConfig {
    values: BTreeMap<String, String>,
}

impl DataSourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), failing with [`ConstructionError::MissingKey`].
    pub fn require(&self, key: &str) -> Result<&str, ConstructionError> {
        self.get(key)
            .ok_or_else(|| ConstructionError::MissingKey(key.to_string()))
    }

    /// The backend discriminator.
    pub fn kind(&self) -> Option<&str> {
        self.get(TYPE_KEY)
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind().is_some_and(|k| k.eq_ignore_ascii_case(kind))
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: DataSourceConfig) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataSourceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}
