//! Error types for data sources and their factories.

use std::path::PathBuf;

use thiserror::Error;

use crate::loader::LoadError;
use crate::model::ModelError;

/// Failure to open or connect a data source.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to open store: {0}")]
    Store(String),

    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
}

/// Failure to parse or evaluate a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("data source is not connected")]
    NotConnected,

    #[error("failed to parse query: {0}")]
    Parse(String),

    #[error("query evaluation failed: {0}")]
    Evaluation(String),

    #[error("expected a {expected} query, got {found}")]
    UnexpectedForm {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised by mutable and transactional data sources.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("cannot complete action, already in a transaction")]
    AlreadyInTransaction,

    #[error("cannot complete action, not in a transaction")]
    NotInTransaction,

    /// Part of the compensation may already have been applied; the store
    /// has to be reconciled by hand.
    #[error("rollback failed, data source is likely to be in an inconsistent state")]
    RollbackFailed(#[source] Box<DataSourceError>),

    #[error("data source is not connected")]
    NotConnected,

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("store error: {0}")]
    Store(String),

    #[error("failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataSourceError {
    pub fn store(msg: impl Into<String>) -> Self {
        DataSourceError::Store(msg.into())
    }

    /// `true` for begin/commit/rollback called in the wrong state.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            DataSourceError::AlreadyInTransaction | DataSourceError::NotInTransaction
        )
    }
}

/// Failure of [`DataSourceFactory::create`](super::factory::DataSourceFactory::create).
///
/// Configuration errors mean another factory may still accept the
/// configuration. Connection errors mean the configuration was understood
/// but the backend could not be reached.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("missing required configuration key `{0}`")]
    MissingKey(String),

    #[error("invalid value `{value}` for configuration key `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("no data source factory accepts configuration {0}")]
    NoFactory(String),

    #[error("failed to connect to data source: {0}")]
    Connection(#[source] ConnectError),
}

impl ConstructionError {
    pub fn invalid_value(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConstructionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        !self.is_connection_error()
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, ConstructionError::Connection(_))
    }
}

impl From<ConnectError> for ConstructionError {
    fn from(e: ConnectError) -> Self {
        ConstructionError::Connection(e)
    }
}
