//! Generic conversion between [`RdfEntity`] values and graphs.

use std::collections::HashSet;

use super::descriptor::{Cardinality, Collection, TypeDescriptor};
use super::MappingError;
use crate::model::iri::IriMinter;
use crate::model::ontology::standard;
use crate::model::{Graph, Iri, Resource, Term, Triple};

/// A type that can be written to and read from RDF.
///
/// Field values are exchanged as [`Term`]s, keyed by the field names used in
/// the type's [`TypeDescriptor`].
pub trait RdfEntity: Default {
    fn descriptor() -> Result<TypeDescriptor, MappingError>;

    fn rdf_id(&self) -> Option<&Iri>;

    fn set_rdf_id(&mut self, id: Iri);

    /// Current values of `field`; empty when unset.
    fn field_values(&self, field: &str) -> Vec<Term>;

    fn set_field_values(&mut self, field: &str, values: Vec<Term>);
}

/// The IRI `entity` is (or will be) stored under.
///
/// Uses the entity's own IRI if it has one. Otherwise the identifier
/// field's value: an IRI value is used directly, a literal is minted into
/// `<namespace><Class>/<value>`. Without either, a random IRI is minted.
pub fn subject_for<T: RdfEntity>(entity: &T, descriptor: &TypeDescriptor) -> Iri {
    if let Some(id) = entity.rdf_id() {
        return id.clone();
    }
    let minter = IriMinter::new(descriptor.namespace());
    let key = descriptor
        .id_field
        .as_deref()
        .and_then(|field| entity.field_values(field).into_iter().next());
    match key {
        Some(Term::Iri(iri)) => iri,
        Some(Term::Literal(literal)) => minter.instance_iri(descriptor.class_name(), literal.value()),
        Some(Term::Blank(_)) | None => minter.random_iri(descriptor.class_name()),
    }
}

/// Describe `entity` as triples about `subject`.
pub fn to_graph<T: RdfEntity>(entity: &T, descriptor: &TypeDescriptor, subject: &Iri) -> Graph {
    let node = Resource::Iri(subject.clone());
    let mut graph = Graph::new();
    graph.insert(Triple::new(
        node.clone(),
        standard::RDF_TYPE,
        descriptor.class.clone(),
    ));

    for property in &descriptor.properties {
        let values = entity.field_values(&property.field);
        match (property.cardinality, property.collection) {
            (Cardinality::One, _) => {
                if let Some(value) = values.into_iter().next() {
                    graph.insert(Triple::new(node.clone(), property.predicate.clone(), value));
                }
            }
            (Cardinality::Many, Collection::Repeated) => {
                for value in values {
                    graph.insert(Triple::new(node.clone(), property.predicate.clone(), value));
                }
            }
            (Cardinality::Many, Collection::List) => {
                if values.is_empty() {
                    continue;
                }
                let head = write_list(&mut graph, values);
                graph.insert(Triple::new(node.clone(), property.predicate.clone(), head));
            }
        }
    }
    graph
}

/// Append an `rdf:List` of `values` and return its head node.
fn write_list(graph: &mut Graph, values: Vec<Term>) -> Term {
    let nodes: Vec<String> = values.iter().map(|_| IriMinter::blank_node_id()).collect();
    for (i, value) in values.into_iter().enumerate() {
        let cell = Resource::Blank(nodes[i].clone());
        let rest = match nodes.get(i + 1) {
            Some(next) => Term::Blank(next.clone()),
            None => Term::Iri(Iri::new(standard::RDF_NIL)),
        };
        graph.insert(Triple::new(cell.clone(), standard::RDF_FIRST, value));
        graph.insert(Triple::new(cell, standard::RDF_REST, rest));
    }
    Term::Blank(nodes[0].clone())
}

/// Read the members of the `rdf:List` starting at `head`.
fn read_list(graph: &Graph, head: &Term) -> Result<Vec<Term>, MappingError> {
    let first = Iri::new(standard::RDF_FIRST);
    let rest = Iri::new(standard::RDF_REST);
    let nil = Term::Iri(Iri::new(standard::RDF_NIL));

    let mut values = Vec::new();
    let mut visited = HashSet::new();
    let mut node = head.clone();
    while node != nil {
        let cell = Resource::try_from(node.clone())?;
        if !visited.insert(cell.clone()) {
            return Err(MappingError::MalformedList {
                node: cell.to_string(),
                reason: "cycle",
            });
        }
        let value = graph
            .objects(&cell, &first)
            .next()
            .ok_or_else(|| MappingError::MalformedList {
                node: cell.to_string(),
                reason: "missing rdf:first",
            })?;
        values.push(value.clone());
        node = graph
            .objects(&cell, &rest)
            .next()
            .cloned()
            .ok_or_else(|| MappingError::MalformedList {
                node: cell.to_string(),
                reason: "missing rdf:rest",
            })?;
    }
    Ok(values)
}

/// Rebuild an entity from the triples about `subject` in `graph`.
///
/// `graph` must contain the list cells of `List` properties, as returned
/// by [`DataSource::describe`](crate::source::DataSource::describe).
pub fn from_graph<T: RdfEntity>(
    subject: &Iri,
    graph: &Graph,
    descriptor: &TypeDescriptor,
) -> Result<T, MappingError> {
    let node = Resource::Iri(subject.clone());
    let mut entity = T::default();
    entity.set_rdf_id(subject.clone());

    for property in &descriptor.properties {
        let mut objects = graph.objects(&node, &property.predicate).cloned();
        let values = match (property.cardinality, property.collection) {
            (Cardinality::One, _) => objects.next().into_iter().collect(),
            (Cardinality::Many, Collection::Repeated) => objects.collect(),
            (Cardinality::Many, Collection::List) => match objects.next() {
                Some(head) => read_list(graph, &head)?,
                None => Vec::new(),
            },
        };
        entity.set_field_values(&property.field, values);
    }
    Ok(entity)
}
