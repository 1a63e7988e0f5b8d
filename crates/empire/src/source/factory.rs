//! Configuration-driven construction of data sources.
//!
//! A factory is a capability check ([`can_create`](DataSourceFactory::can_create))
//! plus a constructor ([`create`](DataSourceFactory::create)). Backends are
//! discovered by asking each registered factory in turn, so there is no
//! central list of backend kinds.

use tracing::{debug, warn};

use super::config::DataSourceConfig;
use super::error::ConstructionError;
use super::file::FileDataSourceFactory;
use super::memory::MemoryDataSourceFactory;
use super::MutableDataSource;

/// Builds one kind of data source.
pub trait DataSourceFactory {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether `config` names this backend and carries what it needs.
    /// Never performs I/O and never fails.
    fn can_create(&self, config: &DataSourceConfig) -> bool;

    /// Build and connect a data source.
    ///
    /// # Errors
    ///
    /// A configuration error ([`ConstructionError::is_config_error`]) when
    /// keys are missing or malformed; [`ConstructionError::Connection`] when
    /// the backend could not be opened.
    fn create(
        &self,
        config: &DataSourceConfig,
    ) -> Result<Box<dyn MutableDataSource>, ConstructionError>;
}

// ---------------------------------------------------------------------------
// FactoryRegistry
// ---------------------------------------------------------------------------

/// Ordered set of factories tried against a configuration.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: Vec<Box<dyn DataSourceFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in memory and file backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MemoryDataSourceFactory);
        registry.register(FileDataSourceFactory);
        registry
    }

    pub fn register<F: DataSourceFactory + 'static>(&mut self, factory: F) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// The first factory accepting `config`.
    pub fn find(&self, config: &DataSourceConfig) -> Option<&dyn DataSourceFactory> {
        self.factories
            .iter()
            .find(|f| f.can_create(config))
            .map(|f| f.as_ref())
    }

    /// Create a data source with the first accepting factory.
    ///
    /// A factory that accepts the configuration but then rejects it as
    /// malformed is skipped in favour of the next accepting one. A
    /// connection failure ends the scan: the configuration was understood,
    /// the backend was not reachable.
    pub fn create(
        &self,
        config: &DataSourceConfig,
    ) -> Result<Box<dyn MutableDataSource>, ConstructionError> {
        let mut rejection = None;
        for factory in self.factories.iter().filter(|f| f.can_create(config)) {
            debug!(factory = factory.name(), "creating data source");
            match factory.create(config) {
                Ok(source) => return Ok(source),
                Err(e) if e.is_config_error() => {
                    warn!(factory = factory.name(), error = %e, "factory rejected configuration");
                    rejection = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(rejection.unwrap_or_else(|| ConstructionError::NoFactory(config.to_string())))
    }
}
