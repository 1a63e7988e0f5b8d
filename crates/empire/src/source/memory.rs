//! In-memory data source backed by an `oxigraph` store.
//!
//! SPARQL parsing and evaluation are delegated to `oxigraph`; this module
//! only converts between its model and ours.

use std::collections::HashSet;
use std::path::PathBuf;

use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;
use tracing::debug;

use super::config::DataSourceConfig;
use super::error::{ConnectError, ConstructionError, DataSourceError, QueryError};
use super::factory::DataSourceFactory;
use super::query::{BindingSet, QueryFactory, ResultSet};
use super::{DataSource, MutableDataSource};
use crate::loader::rdf_loader::{load_graph, GraphFormat};
use crate::model::convert::{
    resource_to_oxigraph, term_from_oxigraph, triple_from_oxigraph, triple_from_quad,
    triple_to_quad,
};
use crate::model::{Graph, Iri, Resource, Term};

// ---------------------------------------------------------------------------
// MemoryDataSource
// ---------------------------------------------------------------------------

/// A mutable, non-transactional in-memory triple store.
///
/// Starts disconnected; every operation except [`connect`](DataSource::connect)
/// fails with a not-connected error until then. Disconnecting keeps the
/// data, so a later `connect` sees it again.
pub struct MemoryDataSource {
    store: Store,
    connected: bool,
    query_factory: QueryFactory,
}

impl std::fmt::Debug for MemoryDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDataSource")
            .field("connected", &self.connected)
            .field("len", &self.store.len().unwrap_or(0))
            .finish()
    }
}

impl MemoryDataSource {
    pub fn new() -> Result<Self, ConnectError> {
        let store = Store::new().map_err(|e| ConnectError::Store(e.to_string()))?;
        Ok(Self {
            store,
            connected: false,
            query_factory: QueryFactory::sparql(),
        })
    }

    /// A new, already connected source.
    pub fn connected() -> Result<Self, ConnectError> {
        let mut source = Self::new()?;
        source.connect()?;
        Ok(source)
    }

    /// Number of triples held.
    pub fn len(&self) -> Result<usize, DataSourceError> {
        self.store
            .len()
            .map_err(|e| DataSourceError::store(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, DataSourceError> {
        Ok(self.len()? == 0)
    }

    /// Copy of the full contents, read regardless of connection state.
    pub fn snapshot(&self) -> Result<Graph, DataSourceError> {
        let mut graph = Graph::new();
        for quad in self.store.iter() {
            let quad = quad.map_err(|e| DataSourceError::store(e.to_string()))?;
            graph.insert(triple_from_quad(quad)?);
        }
        Ok(graph)
    }

    fn ensure_connected(&self) -> Result<(), DataSourceError> {
        if !self.connected {
            return Err(DataSourceError::NotConnected);
        }
        Ok(())
    }

    pub(crate) fn insert_graph(&self, graph: &Graph) -> Result<(), DataSourceError> {
        for triple in graph {
            let quad = triple_to_quad(triple)?;
            self.store
                .insert(&quad)
                .map_err(|e| DataSourceError::store(e.to_string()))?;
        }
        Ok(())
    }

    fn remove_graph(&self, graph: &Graph) -> Result<(), DataSourceError> {
        for triple in graph {
            let quad = triple_to_quad(triple)?;
            self.store
                .remove(&quad)
                .map_err(|e| DataSourceError::store(e.to_string()))?;
        }
        Ok(())
    }

    fn ensure_queryable(&self) -> Result<(), QueryError> {
        if !self.connected {
            return Err(QueryError::NotConnected);
        }
        Ok(())
    }

    /// Triples about `start`, following blank-node objects so that nested
    /// structures such as `rdf:List`s come back whole.
    fn concise_description(&self, start: Resource) -> Result<Graph, DataSourceError> {
        let mut graph = Graph::new();
        let mut seen = HashSet::new();
        let mut pending = vec![start];
        while let Some(subject) = pending.pop() {
            if !seen.insert(subject.clone()) {
                continue;
            }
            let node = resource_to_oxigraph(&subject)?;
            for quad in self
                .store
                .quads_for_pattern(Some(node.as_ref()), None, None, None)
            {
                let quad = quad.map_err(|e| DataSourceError::store(e.to_string()))?;
                let triple = triple_from_quad(quad)?;
                if let Term::Blank(id) = &triple.object {
                    pending.push(Resource::Blank(id.clone()));
                }
                graph.insert(triple);
            }
        }
        Ok(graph)
    }
}

impl DataSource for MemoryDataSource {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), ConnectError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn select_query(&self, query: &str) -> Result<ResultSet, QueryError> {
        self.ensure_queryable()?;
        let results = SparqlEvaluator::new()
            .parse_query(query)
            .map_err(|e| QueryError::Parse(e.to_string()))?
            .on_store(&self.store)
            .execute()
            .map_err(|e| QueryError::Evaluation(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let variables: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| QueryError::Evaluation(e.to_string()))?;
                    let mut row = BindingSet::new();
                    for (variable, value) in solution.iter() {
                        row.insert(variable.as_str(), term_from_oxigraph(value.clone())?);
                    }
                    rows.push(row);
                }
                Ok(ResultSet::new(variables, rows))
            }
            QueryResults::Boolean(_) => Err(QueryError::UnexpectedForm {
                expected: "SELECT",
                found: "ASK",
            }),
            QueryResults::Graph(_) => Err(QueryError::UnexpectedForm {
                expected: "SELECT",
                found: "CONSTRUCT",
            }),
        }
    }

    fn graph_query(&self, query: &str) -> Result<Graph, QueryError> {
        self.ensure_queryable()?;
        let results = SparqlEvaluator::new()
            .parse_query(query)
            .map_err(|e| QueryError::Parse(e.to_string()))?
            .on_store(&self.store)
            .execute()
            .map_err(|e| QueryError::Evaluation(e.to_string()))?;

        match results {
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    let triple = triple.map_err(|e| QueryError::Evaluation(e.to_string()))?;
                    graph.insert(triple_from_oxigraph(triple)?);
                }
                Ok(graph)
            }
            QueryResults::Boolean(_) => Err(QueryError::UnexpectedForm {
                expected: "CONSTRUCT",
                found: "ASK",
            }),
            QueryResults::Solutions(_) => Err(QueryError::UnexpectedForm {
                expected: "CONSTRUCT",
                found: "SELECT",
            }),
        }
    }

    fn describe(&self, iri: &Iri) -> Result<Graph, DataSourceError> {
        self.ensure_connected()?;
        self.concise_description(Resource::Iri(iri.clone()))
    }

    fn query_factory(&self) -> &QueryFactory {
        &self.query_factory
    }
}

impl MutableDataSource for MemoryDataSource {
    fn add(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        self.ensure_connected()?;
        self.insert_graph(graph)
    }

    fn remove(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        self.ensure_connected()?;
        self.remove_graph(graph)
    }
}

// ---------------------------------------------------------------------------
// MemoryDataSourceFactory
// ---------------------------------------------------------------------------

/// Builds [`MemoryDataSource`]s.
///
/// Keys:
/// - `type` = `memory` (required)
/// - `files` -- comma-separated RDF files to preload, format taken from each
///   file's extension
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryDataSourceFactory;

impl MemoryDataSourceFactory {
    pub const KIND: &'static str = "memory";
    pub const FILES_KEY: &'static str = "files";

    fn preload_files(
        config: &DataSourceConfig,
    ) -> Result<Vec<(PathBuf, GraphFormat)>, ConstructionError> {
        let Some(files) = config.get(Self::FILES_KEY) else {
            return Ok(Vec::new());
        };
        files
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| {
                let path = PathBuf::from(f);
                let format = GraphFormat::from_path(&path).ok_or_else(|| {
                    ConstructionError::invalid_value(
                        Self::FILES_KEY,
                        f,
                        "cannot determine RDF format from extension",
                    )
                })?;
                Ok((path, format))
            })
            .collect()
    }
}

impl DataSourceFactory for MemoryDataSourceFactory {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn can_create(&self, config: &DataSourceConfig) -> bool {
        config.is_kind(Self::KIND)
    }

    fn create(
        &self,
        config: &DataSourceConfig,
    ) -> Result<Box<dyn MutableDataSource>, ConstructionError> {
        if !self.can_create(config) {
            return Err(ConstructionError::NoFactory(config.to_string()));
        }
        let files = Self::preload_files(config)?;

        let source = MemoryDataSource::connected()?;
        for (path, format) in files {
            let graph = load_graph(&path, Some(format)).map_err(|source| ConnectError::Load {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), triples = graph.num_statements(), "preloading");
            source
                .insert_graph(&graph)
                .map_err(|e| ConnectError::Store(e.to_string()))?;
        }
        Ok(Box::new(source))
    }
}
