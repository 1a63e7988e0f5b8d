//! Conversions between this crate's RDF model and `oxigraph`'s.
//!
//! The store and the parser speak `oxigraph` types; everything above them
//! speaks [`Triple`] and [`Graph`](super::graph::Graph).

use oxigraph::model as ox;
use oxigraph::model::vocab::xsd;

use super::term::{Iri, Literal, ModelError, Resource, Term, Triple};

pub fn named_node(iri: &Iri) -> Result<ox::NamedNode, ModelError> {
    ox::NamedNode::new(iri.as_str()).map_err(|e| ModelError::InvalidIri {
        iri: iri.as_str().to_string(),
        reason: e.to_string(),
    })
}

fn blank_node(id: &str) -> Result<ox::BlankNode, ModelError> {
    ox::BlankNode::new(id).map_err(|_| ModelError::InvalidBlankNode(id.to_string()))
}

pub fn resource_to_oxigraph(resource: &Resource) -> Result<ox::NamedOrBlankNode, ModelError> {
    Ok(match resource {
        Resource::Iri(iri) => named_node(iri)?.into(),
        Resource::Blank(id) => blank_node(id)?.into(),
    })
}

pub fn term_to_oxigraph(term: &Term) -> Result<ox::Term, ModelError> {
    Ok(match term {
        Term::Iri(iri) => named_node(iri)?.into(),
        Term::Blank(id) => blank_node(id)?.into(),
        Term::Literal(literal) => literal_to_oxigraph(literal)?.into(),
    })
}

fn literal_to_oxigraph(literal: &Literal) -> Result<ox::Literal, ModelError> {
    if let Some(language) = literal.language() {
        return ox::Literal::new_language_tagged_literal(literal.value(), language)
            .map_err(|_| ModelError::InvalidLanguageTag(language.to_string()));
    }
    match literal.datatype() {
        Some(datatype) => Ok(ox::Literal::new_typed_literal(
            literal.value(),
            named_node(datatype)?,
        )),
        None => Ok(ox::Literal::new_simple_literal(literal.value())),
    }
}

/// Build a quad in the default graph.
pub fn triple_to_quad(triple: &Triple) -> Result<ox::Quad, ModelError> {
    Ok(ox::Quad::new(
        resource_to_oxigraph(&triple.subject)?,
        named_node(&triple.predicate)?,
        term_to_oxigraph(&triple.object)?,
        ox::GraphName::DefaultGraph,
    ))
}

pub fn resource_from_oxigraph(node: ox::NamedOrBlankNode) -> Result<Resource, ModelError> {
    match node {
        ox::NamedOrBlankNode::NamedNode(n) => Ok(Resource::Iri(Iri::new(n.into_string()))),
        ox::NamedOrBlankNode::BlankNode(b) => Ok(Resource::Blank(b.into_string())),
        #[allow(unreachable_patterns)]
        other => Err(ModelError::Unsupported(other.to_string())),
    }
}

pub fn term_from_oxigraph(term: ox::Term) -> Result<Term, ModelError> {
    match term {
        ox::Term::NamedNode(n) => Ok(Term::Iri(Iri::new(n.into_string()))),
        ox::Term::BlankNode(b) => Ok(Term::Blank(b.into_string())),
        ox::Term::Literal(l) => Ok(Term::Literal(literal_from_oxigraph(&l))),
        #[allow(unreachable_patterns)]
        other => Err(ModelError::Unsupported(other.to_string())),
    }
}

fn literal_from_oxigraph(literal: &ox::Literal) -> Literal {
    if let Some(language) = literal.language() {
        return Literal::language_tagged(literal.value(), language);
    }
    let datatype = literal.datatype();
    if datatype == xsd::STRING {
        Literal::simple(literal.value())
    } else {
        Literal::typed(literal.value(), datatype.as_str())
    }
}

pub fn triple_from_oxigraph(triple: ox::Triple) -> Result<Triple, ModelError> {
    Ok(Triple {
        subject: resource_from_oxigraph(triple.subject)?,
        predicate: Iri::new(triple.predicate.into_string()),
        object: term_from_oxigraph(triple.object)?,
    })
}

/// Drop the graph name of a quad.
pub fn triple_from_quad(quad: ox::Quad) -> Result<Triple, ModelError> {
    Ok(Triple {
        subject: resource_from_oxigraph(quad.subject)?,
        predicate: Iri::new(quad.predicate.into_string()),
        object: term_from_oxigraph(quad.object)?,
    })
}
