pub mod ntriples;
pub mod turtle;

use std::io::{self, Write};

use crate::loader::rdf_loader::GraphFormat;
use crate::model::ontology::WELL_KNOWN_PREFIXES;
use crate::model::{Graph, Triple};

use self::ntriples::NTriplesEmitter;
use self::turtle::TurtleEmitter;

/// Trait for emitting RDF triples in different serialization formats.
pub trait TriplesEmitter {
    /// Emit a single triple.
    fn emit(&mut self, triple: &Triple) -> io::Result<()>;
    /// Register a namespace prefix (used by Turtle format).
    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()>;
    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;
    /// Return the number of triples emitted so far.
    fn triple_count(&self) -> u64;
}

/// Emit every triple of `graph`.
pub fn emit_graph<E: TriplesEmitter + ?Sized>(emitter: &mut E, graph: &Graph) -> io::Result<()> {
    for triple in graph {
        emitter.emit(triple)?;
    }
    Ok(())
}

/// Serialize `graph` to `writer` and return the number of triples written.
///
/// Turtle output declares the well-known prefixes.
pub fn write_graph<W: Write>(writer: W, graph: &Graph, format: GraphFormat) -> io::Result<u64> {
    match format {
        GraphFormat::NTriples => {
            let mut emitter = NTriplesEmitter::new(writer);
            emit_graph(&mut emitter, graph)?;
            emitter.flush()?;
            Ok(emitter.triple_count())
        }
        GraphFormat::Turtle => {
            let mut emitter = TurtleEmitter::new(writer);
            for (prefix, iri) in WELL_KNOWN_PREFIXES {
                emitter.add_prefix(prefix, iri)?;
            }
            emit_graph(&mut emitter, graph)?;
            emitter.flush()?;
            Ok(emitter.triple_count())
        }
    }
}
