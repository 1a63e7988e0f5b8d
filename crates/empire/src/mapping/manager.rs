//! Persist, find, merge and remove entities through a data source.

use tracing::{debug, warn};

use super::mapper::{from_graph, subject_for, to_graph, RdfEntity};
use super::MappingError;
use crate::model::ontology::standard;
use crate::model::{Iri, Resource, Triple};
use crate::source::{MutableDataSource, SupportsTransactions};

/// Entity-level operations over a [`MutableDataSource`].
pub struct EntityManager<S: MutableDataSource> {
    source: S,
}

impl<S: MutableDataSource> EntityManager<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Whether any triple has `iri` as its subject.
    pub fn contains(&self, iri: &Iri) -> Result<bool, MappingError> {
        Ok(!self.source.describe(iri)?.is_empty())
    }

    /// Store a new entity and assign its IRI.
    ///
    /// # Errors
    ///
    /// [`MappingError::AlreadyPersisted`] if the IRI is already described.
    pub fn persist<T: RdfEntity>(&mut self, entity: &mut T) -> Result<Iri, MappingError> {
        let descriptor = T::descriptor()?;
        let subject = subject_for(entity, &descriptor);
        if self.contains(&subject)? {
            return Err(MappingError::AlreadyPersisted(subject));
        }
        let graph = to_graph(entity, &descriptor, &subject);
        self.source.add(&graph)?;
        debug!(subject = %subject, triples = graph.num_statements(), "persisted entity");
        entity.set_rdf_id(subject.clone());
        Ok(subject)
    }

    /// Replace the stored description of `entity` with its current state.
    ///
    /// Only the difference is written: triples that are both stored and
    /// still current are left alone, so a transactional source records
    /// just the change.
    pub fn merge<T: RdfEntity>(&mut self, entity: &T) -> Result<(), MappingError> {
        let descriptor = T::descriptor()?;
        let subject = entity.rdf_id().ok_or(MappingError::MissingIdentifier)?;
        let existing = self.source.describe(subject)?;
        if existing.is_empty() {
            return Err(MappingError::NotFound(subject.clone()));
        }
        let current = to_graph(entity, &descriptor, subject);

        let mut stale = existing.clone();
        stale.remove(&current);
        let mut fresh = current;
        fresh.remove(&existing);

        if !stale.is_empty() {
            self.source.remove(&stale)?;
        }
        if !fresh.is_empty() {
            self.source.add(&fresh)?;
        }
        debug!(
            subject = %subject,
            removed = stale.num_statements(),
            added = fresh.num_statements(),
            "merged entity"
        );
        Ok(())
    }

    /// Delete everything describing `entity`.
    pub fn remove<T: RdfEntity>(&mut self, entity: &T) -> Result<(), MappingError> {
        let subject = entity.rdf_id().ok_or(MappingError::MissingIdentifier)?;
        let existing = self.source.describe(subject)?;
        if existing.is_empty() {
            return Err(MappingError::NotFound(subject.clone()));
        }
        self.source.remove(&existing)?;
        Ok(())
    }

    /// Load the entity stored under `iri`, `None` if nothing of type `T` is
    /// stored there.
    pub fn find<T: RdfEntity>(&self, iri: &Iri) -> Result<Option<T>, MappingError> {
        let descriptor = T::descriptor()?;
        let graph = self.source.describe(iri)?;
        let typed = Triple::new(
            Resource::Iri(iri.clone()),
            standard::RDF_TYPE,
            descriptor.class.clone(),
        );
        if !graph.contains(&typed) {
            return Ok(None);
        }
        from_graph(iri, &graph, &descriptor).map(Some)
    }
}

impl<S: MutableDataSource + SupportsTransactions> EntityManager<S> {
    /// Run `work` in a transaction: commit on success, roll back on error.
    ///
    /// If the rollback itself fails, that failure is returned and the
    /// original error is only logged.
    pub fn transaction<R, F>(&mut self, work: F) -> Result<R, MappingError>
    where
        F: FnOnce(&mut Self) -> Result<R, MappingError>,
    {
        self.source.begin()?;
        match work(self) {
            Ok(value) => {
                self.source.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.source.rollback() {
                    warn!(error = %e, "transaction failed and could not be rolled back");
                    return Err(rollback.into());
                }
                Err(e)
            }
        }
    }
}
