//! Data source abstractions and backends.
//!
//! - [`DataSource`] - connection lifecycle and read/query access
//! - [`MutableDataSource`] - add and remove triples
//! - [`SupportsTransactions`] - begin/commit/rollback
//! - [`DataSourceFactory`] - build a data source from a [`DataSourceConfig`]
//!
//! [`TransactionalDataSource`] adds best-effort transactions to any
//! [`MutableDataSource`]; see its documentation for the guarantees it does
//! *not* give.

pub mod config;
pub mod error;
pub mod factory;
pub mod file;
pub mod memory;
pub mod query;
pub mod transactional;

pub use config::DataSourceConfig;
pub use error::{ConnectError, ConstructionError, DataSourceError, QueryError};
pub use factory::{DataSourceFactory, FactoryRegistry};
pub use file::{FileDataSource, FileDataSourceFactory};
pub use memory::{MemoryDataSource, MemoryDataSourceFactory};
pub use query::{BindingSet, QueryDialect, QueryFactory, QueryForm, ResultSet};
pub use transactional::{GraphDelta, TransactionalDataSource};

use crate::model::{Graph, Iri};

/// A connectable, queryable source of RDF data.
pub trait DataSource {
    fn is_connected(&self) -> bool;

    /// Open the connection. Connecting an already connected source is a no-op.
    fn connect(&mut self) -> Result<(), ConnectError>;

    fn disconnect(&mut self);

    /// Run a SELECT query.
    fn select_query(&self, query: &str) -> Result<ResultSet, QueryError>;

    /// Run a query producing triples (CONSTRUCT or DESCRIBE).
    fn graph_query(&self, query: &str) -> Result<Graph, QueryError>;

    /// Triples describing `iri`.
    fn describe(&self, iri: &Iri) -> Result<Graph, DataSourceError>;

    fn query_factory(&self) -> &QueryFactory;
}

/// A data source whose contents can be changed.
pub trait MutableDataSource: DataSource {
    fn add(&mut self, graph: &Graph) -> Result<(), DataSourceError>;

    fn remove(&mut self, graph: &Graph) -> Result<(), DataSourceError>;
}

/// Transaction demarcation. At most one transaction is open at a time.
pub trait SupportsTransactions {
    fn begin(&mut self) -> Result<(), DataSourceError>;

    fn commit(&mut self) -> Result<(), DataSourceError>;

    fn rollback(&mut self) -> Result<(), DataSourceError>;

    fn is_in_transaction(&self) -> bool;
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn connect(&mut self) -> Result<(), ConnectError> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn select_query(&self, query: &str) -> Result<ResultSet, QueryError> {
        (**self).select_query(query)
    }

    fn graph_query(&self, query: &str) -> Result<Graph, QueryError> {
        (**self).graph_query(query)
    }

    fn describe(&self, iri: &Iri) -> Result<Graph, DataSourceError> {
        (**self).describe(iri)
    }

    fn query_factory(&self) -> &QueryFactory {
        (**self).query_factory()
    }
}

impl<T: MutableDataSource + ?Sized> MutableDataSource for Box<T> {
    fn add(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        (**self).add(graph)
    }

    fn remove(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        (**self).remove(graph)
    }
}

impl<T: SupportsTransactions + ?Sized> SupportsTransactions for Box<T> {
    fn begin(&mut self) -> Result<(), DataSourceError> {
        (**self).begin()
    }

    fn commit(&mut self) -> Result<(), DataSourceError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), DataSourceError> {
        (**self).rollback()
    }

    fn is_in_transaction(&self) -> bool {
        (**self).is_in_transaction()
    }
}
