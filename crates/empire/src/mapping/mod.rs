//! Descriptor-driven mapping between typed values and RDF.
//!
//! A [`TypeDescriptor`] is a table built once per type: the RDF class, the
//! identifier field and an ordered list of `(field, predicate, cardinality,
//! collection)` entries. Types expose their fields through [`RdfEntity`] and
//! the generic functions in [`mapper`] do the rest, so no per-field code is
//! generated or dispatched.

pub mod descriptor;
pub mod manager;
pub mod mapper;

pub use descriptor::{
    Cardinality, Collection, Namespaces, PropertyDescriptor, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use manager::EntityManager;
pub use mapper::{from_graph, subject_for, to_graph, RdfEntity};

use thiserror::Error;

use crate::model::{Iri, ModelError};
use crate::source::DataSourceError;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("unknown namespace prefix in `{0}`")]
    UnknownPrefix(String),

    #[error("`{0}` has no prefix and no default namespace is declared")]
    NoDefaultNamespace(String),

    #[error("field `{0}` is mapped more than once")]
    DuplicateField(String),

    #[error("entity has no RDF identifier")]
    MissingIdentifier,

    #[error("{0} is already persisted")]
    AlreadyPersisted(Iri),

    #[error("{0} not found")]
    NotFound(Iri),

    #[error("malformed rdf:List at {node}: {reason}")]
    MalformedList { node: String, reason: &'static str },

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
