//! Data source persisted to a single RDF file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::DataSourceConfig;
use super::error::{ConnectError, ConstructionError, DataSourceError, QueryError};
use super::factory::DataSourceFactory;
use super::memory::MemoryDataSource;
use super::query::{QueryFactory, ResultSet};
use super::{DataSource, MutableDataSource};
use crate::emitter::write_graph;
use crate::loader::rdf_loader::{load_graph, GraphFormat};
use crate::model::{Graph, Iri};

/// A [`MemoryDataSource`] mirrored to a file.
///
/// `connect` reads the file if it exists. Each successful `add` or `remove`
/// rewrites the whole file, so the file always matches the store after a
/// mutation returns.
#[derive(Debug)]
pub struct FileDataSource {
    path: PathBuf,
    format: GraphFormat,
    inner: MemoryDataSource,
}

impl FileDataSource {
    pub fn new(path: impl Into<PathBuf>, format: GraphFormat) -> Result<Self, ConnectError> {
        Ok(Self {
            path: path.into(),
            format,
            inner: MemoryDataSource::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> GraphFormat {
        self.format
    }

    /// Write the current contents to the backing file.
    pub fn save(&self) -> Result<(), DataSourceError> {
        let graph = self.inner.snapshot()?;
        let persist = |source| DataSourceError::Persist {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(persist)?;
        let count = write_graph(BufWriter::new(file), &graph, self.format).map_err(persist)?;
        debug!(path = %self.path.display(), triples = count, "saved data source");
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ConnectError> {
        // Dropping the previous store discards anything not saved.
        self.inner = MemoryDataSource::new()?;
        if !self.path.exists() {
            return Ok(());
        }
        let graph = load_graph(&self.path, Some(self.format)).map_err(|source| {
            ConnectError::Load {
                path: self.path.clone(),
                source,
            }
        })?;
        self.inner
            .insert_graph(&graph)
            .map_err(|e| ConnectError::Store(e.to_string()))?;
        debug!(path = %self.path.display(), triples = graph.num_statements(), "loaded data source");
        Ok(())
    }
}

impl DataSource for FileDataSource {
    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn connect(&mut self) -> Result<(), ConnectError> {
        if self.inner.is_connected() {
            return Ok(());
        }
        self.reload()?;
        self.inner.connect()
    }

    fn disconnect(&mut self) {
        self.inner.disconnect()
    }

    fn select_query(&self, query: &str) -> Result<ResultSet, QueryError> {
        self.inner.select_query(query)
    }

    fn graph_query(&self, query: &str) -> Result<Graph, QueryError> {
        self.inner.graph_query(query)
    }

    fn describe(&self, iri: &Iri) -> Result<Graph, DataSourceError> {
        self.inner.describe(iri)
    }

    fn query_factory(&self) -> &QueryFactory {
        self.inner.query_factory()
    }
}

impl MutableDataSource for FileDataSource {
    fn add(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        self.inner.add(graph)?;
        self.save()
    }

    fn remove(&mut self, graph: &Graph) -> Result<(), DataSourceError> {
        self.inner.remove(graph)?;
        self.save()
    }
}

// ---------------------------------------------------------------------------
// FileDataSourceFactory
// ---------------------------------------------------------------------------

/// Builds [`FileDataSource`]s.
///
/// Keys:
/// - `type` = `file` (required)
/// - `file` -- path of the backing file (required; created on first write)
/// - `format` -- `ntriples` or `turtle`; defaults to the file extension,
///   then N-Triples
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDataSourceFactory;

impl FileDataSourceFactory {
    pub const KIND: &'static str = "file";
    pub const FILE_KEY: &'static str = "file";
    pub const FORMAT_KEY: &'static str = "format";
}

impl DataSourceFactory for FileDataSourceFactory {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn can_create(&self, config: &DataSourceConfig) -> bool {
        config.is_kind(Self::KIND) && config.get(Self::FILE_KEY).is_some()
    }

    fn create(
        &self,
        config: &DataSourceConfig,
    ) -> Result<Box<dyn MutableDataSource>, ConstructionError> {
        if !config.is_kind(Self::KIND) {
            return Err(ConstructionError::NoFactory(config.to_string()));
        }
        let path = PathBuf::from(config.require(Self::FILE_KEY)?);
        if path.as_os_str().is_empty() {
            return Err(ConstructionError::invalid_value(
                Self::FILE_KEY,
                "",
                "path must not be empty",
            ));
        }
        let format = match config.get(Self::FORMAT_KEY) {
            Some(name) => GraphFormat::from_name(name).ok_or_else(|| {
                ConstructionError::invalid_value(
                    Self::FORMAT_KEY,
                    name,
                    "expected `ntriples` or `turtle`",
                )
            })?,
            None => GraphFormat::from_path(&path).unwrap_or(GraphFormat::NTriples),
        };

        let mut source = FileDataSource::new(path, format)?;
        source.connect()?;
        Ok(Box::new(source))
    }
}
