//! Best-effort transactions over a non-transactional store.
//!
//! Writes go to the wrapped store immediately. While a transaction is open
//! the wrapper also records what was added and removed, and on rollback it
//! replays the inverse:
//!
//! ```text
//! begin     -> open, clear delta
//! add(g)    -> delta.added   += g ; store.add(g)
//! remove(g) -> delta.removed += g ; store.remove(g)
//! commit    -> clear delta, close            (store untouched)
//! rollback  -> store.add(delta.removed)
//!              store.remove(delta.added)
//!              clear delta, close            (on every exit path)
//! ```
//!
//! This is a compensation log, not a staging area. There is no atomicity and
//! no isolation: other readers of the store see writes as soon as they are
//! made, and a rollback that fails half way leaves the store in whatever
//! state the completed compensation steps produced. Use a backend with real
//! transactions when that matters.
//!
//! The log records what was asked for, not what changed. Rollback is only
//! exact for writes that actually changed the store:
//!
//! - adding a triple that was already present, then rolling back, deletes it;
//! - removing a triple that was absent, then rolling back, inserts it;
//! - a triple that was present, then added and removed in the same
//!   transaction, is absent after rollback.
//!
//! Callers that need an exact undo should only add absent triples and only
//! remove present ones.

use tracing::{debug, warn};

use super::error::{ConnectError, DataSourceError, QueryError};
use super::query::{QueryFactory, ResultSet};
use super::{DataSource, MutableDataSource, SupportsTransactions};
use crate::model::{Graph, Iri};

// ---------------------------------------------------------------------------
// GraphDelta
// ---------------------------------------------------------------------------

/// Triples added and removed since the last transaction boundary.
///
/// Append-only until cleared; the same triple may appear on both sides.
/// Entries are not checked against the store, so a no-op write (adding a
/// present triple, removing an absent one) is undone as if it had changed
/// something. See the [module documentation](self).
#[derive(Debug, Default)]
pub struct GraphDelta {
    added: Graph,
    removed: Graph,
}

impl GraphDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_add(&mut self, graph: &Graph) {
        self.added.add(graph);
    }

    pub fn record_remove(&mut self, graph: &Graph) {
        self.removed.add(graph);
    }

    pub fn added(&self) -> &Graph {
        &self.added
    }

    pub fn removed(&self) -> &Graph {
        &self.removed
    }

    /// Empty both sides without giving up their storage.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TransactionalDataSource
// ---------------------------------------------------------------------------

/// Wraps a [`MutableDataSource`] with begin/commit/rollback.
///
/// Mutations are applied to the wrapped store eagerly; see the
/// [module documentation](self) for what rollback can and cannot undo.
///
/// The wrapper is not synchronized. Share it across threads only behind
/// a lock that also covers the store.
///
/// # Example
///
/// ```ignore
/// let mut source = TransactionalDataSource::new(MemoryDataSource::connected()?);
/// source.begin()?;
/// source.add(&graph)?;
/// source.rollback()?; // graph's triples are removed again
/// ```
#[derive(Debug)]
pub struct TransactionalDataSource<S: MutableDataSource> {
    source: S,
    delta: GraphDelta,
    in_transaction: bool,
}

impl<S: MutableDataSource> TransactionalDataSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            delta: GraphDelta::new(),
            in_transaction: false,
        }
    }

    /// Triples added in the open transaction.
    pub fn added(&self) -> &Graph {
        self.delta.added()
    }

    /// Triples removed in the open transaction.
    pub fn removed(&self) -> &Graph {
        self.delta.removed()
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Direct access to the wrapped store. Changes made through it are not
    /// recorded and will not be undone by [`rollback`](SupportsTransactions::rollback).
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn assert_in_transaction(&self) -> Result<(), DataSourceError> {
        if !self.in_transaction {
            return Err(DataSourceError::NotInTransaction);
        }
        Ok(())
    }

    fn assert_not_in_transaction(&self) -> Result<(), DataSourceError> {
        if self.in_transaction {
            return Err(DataSourceError::AlreadyInTransaction);
        }
        Ok(())
    }

    /// Re-add removed triples first, then remove added ones.
    fn undo(&mut self) -> Result<(), DataSourceError> {
        if self.delta.removed().num_statements() > 0 {
            self.source.add(self.delta.removed())?;
        }
        if self.delta.added().num_statements() > 0 {
            self.source.remove(self.delta.added())?;
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.in_transaction = false;
        self.delta.clear();
    }
}

impl<S: MutableDataSource> SupportsTransactions for TransactionalDataSource<S> {
    fn begin(&mut self) -> Result<(), DataSourceError> {
        self.assert_not_in_transaction()?;
        self.in_transaction = true;
        self.delta.clear();
        debug!("transaction started");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DataSourceError> {
        self.assert_in_transaction()?;
        debug!(
            added = self.delta.added().num_statements(),
            removed = self.delta.removed().num_statements(),
            "transaction committed"
        );
        self.finish();
        Ok(())
    }

    /// Undo the open transaction as far as possible.
    ///
    /// # Errors
    ///
    /// [`DataSourceError::NotInTransaction`] if no transaction is open.
    /// [`DataSourceError::RollbackFailed`] if the store rejected one of the
    /// compensating writes; the store may then be partially rolled back.
    /// In both failure cases the wrapper ends with no open transaction and an
    /// empty delta.
    fn rollback(&mut self) -> Result<(), DataSourceError> {
        self.assert_in_transaction()?;
        debug!(
            added = self.delta.added().num_statements(),
            removed = self.delta.removed().num_statements(),
            "rolling back transaction"
        );
        let result = self.undo();
        self.finish();
        result.map_err(|e| {
            warn!(error = %e, "rollback failed, data source may be inconsistent");
            DataSourceError::RollbackFailed(Box::new(e))
        })
    }

    fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }
}

impl<S: MutableDataSource> MutableDataSource for TransactionalDataSource<S> {
    /// Records into the delta only while a transaction is open.
    fn add(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        if self.in_transaction {
            self.delta.record_add(graph);
        }
        self.source.add(graph)
    }

    fn remove(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        if self.in_transaction {
            self.delta.record_remove(graph);
        }
        self.source.remove(graph)
    }
}

impl<S: MutableDataSource> DataSource for TransactionalDataSource<S> {
    fn is_connected(&self) -> bool {
        self.source.is_connected()
    }

    fn connect(&mut self) -> Result<(), ConnectError> {
        self.source.connect()
    }

    fn disconnect(&mut self) {
        self.source.disconnect()
    }

    fn select_query(&self, query: &str) -> Result<ResultSet, QueryError> {
        self.source.select_query(query)
    }

    fn graph_query(&self, query: &str) -> Result<Graph, QueryError> {
        self.source.graph_query(query)
    }

    fn describe(&self, iri: &Iri) -> Result<Graph, DataSourceError> {
        self.source.describe(iri)
    }

    fn query_factory(&self) -> &QueryFactory {
        self.source.query_factory()
    }
}
