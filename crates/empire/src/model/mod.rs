//! RDF data model: terms, triples, graphs, vocabulary and IRI minting.

pub mod convert;
pub mod graph;
pub mod iri;
pub mod ontology;
pub mod term;

pub use graph::Graph;
pub use term::{Iri, Literal, ModelError, Resource, Term, Triple};
