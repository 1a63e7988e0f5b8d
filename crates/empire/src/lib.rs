//! Map typed values onto RDF triple stores.
//!
//! - [`model`] - terms, triples, graphs and vocabulary
//! - [`source`] - data sources, factories and best-effort transactions
//! - [`mapping`] - descriptor-driven entity mapping
//! - [`loader`] / [`emitter`] - reading and writing RDF documents

pub mod emitter;
pub mod loader;
pub mod mapping;
pub mod model;
pub mod source;
