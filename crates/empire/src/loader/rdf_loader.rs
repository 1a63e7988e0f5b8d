//! Parse RDF documents into [`Graph`]s.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};

use super::LoadError;
use crate::model::convert::triple_from_quad;
use crate::model::Graph;

/// Serialization formats understood by the loader and the emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    NTriples,
    Turtle,
}

impl GraphFormat {
    /// Parse a format name: `ntriples`/`nt` or `turtle`/`ttl`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ntriples" | "n-triples" | "nt" => Some(GraphFormat::NTriples),
            "turtle" | "ttl" => Some(GraphFormat::Turtle),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    pub fn name(self) -> &'static str {
        match self {
            GraphFormat::NTriples => "ntriples",
            GraphFormat::Turtle => "turtle",
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            GraphFormat::NTriples => RdfFormat::NTriples,
            GraphFormat::Turtle => RdfFormat::Turtle,
        }
    }
}

/// Parse a document. Quads in named graphs are flattened into triples.
pub fn parse_graph<R: Read>(reader: R, format: GraphFormat) -> Result<Graph, LoadError> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(format.rdf_format()).for_reader(reader) {
        let quad = quad.map_err(|e| LoadError::Parse(e.to_string()))?;
        graph.insert(triple_from_quad(quad)?);
    }
    Ok(graph)
}

/// Load an RDF file, taking the format from its extension when not given.
pub fn load_graph(path: &Path, format: Option<GraphFormat>) -> Result<Graph, LoadError> {
    let format = match format.or_else(|| GraphFormat::from_path(path)) {
        Some(format) => format,
        None => return Err(LoadError::UnknownFormat(path.display().to_string())),
    };
    let reader = BufReader::new(File::open(path)?);
    parse_graph(reader, format)
}
