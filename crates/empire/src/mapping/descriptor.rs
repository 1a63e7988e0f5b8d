//! Type and property descriptors.

use std::collections::{BTreeMap, HashSet};

use super::MappingError;
use crate::model::iri::local_name;
use crate::model::ontology::WELL_KNOWN_PREFIXES;
use crate::model::Iri;

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Prefix table used to expand qualified names such as `foaf:Image`.
#[derive(Debug, Clone)]
pub struct Namespaces {
    default: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// A table holding the well-known prefixes and no default namespace.
    pub fn new() -> Self {
        Self {
            default: None,
            prefixes: WELL_KNOWN_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
        }
    }

    /// Namespace for names without a prefix.
    pub fn with_default(mut self, namespace: &str) -> Self {
        self.default = Some(namespace.to_string());
        self
    }

    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes
            .insert(prefix.to_string(), namespace.to_string());
        self
    }

    /// Expand `name` into a full IRI.
    ///
    /// Absolute IRIs (`scheme://...`, `urn:...`) pass through unchanged,
    /// `prefix:local` is resolved against the table and a bare name against
    /// the default namespace.
    pub fn expand(&self, name: &str) -> Result<Iri, MappingError> {
        if name.contains("://") || name.starts_with("urn:") {
            return Ok(Iri::new(name));
        }
        if let Some((prefix, local)) = name.split_once(':') {
            return match self.prefixes.get(prefix) {
                Some(ns) => Ok(Iri::new(format!("{ns}{local}"))),
                None => Err(MappingError::UnknownPrefix(name.to_string())),
            };
        }
        match &self.default {
            Some(ns) => Ok(Iri::new(format!("{ns}{name}"))),
            None => Err(MappingError::NoDefaultNamespace(name.to_string())),
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one value; extra values in the graph are ignored on read.
    One,
    Many,
}

/// How a multi-valued field is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// One triple per value; order is not preserved.
    Repeated,
    /// A single `rdf:List`; order is preserved.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub field: String,
    pub predicate: Iri,
    pub cardinality: Cardinality,
    pub collection: Collection,
}

/// Mapping table for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub class: Iri,
    /// Field whose value identifies the instance when it has no IRI yet.
    pub id_field: Option<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    pub fn builder(namespaces: Namespaces, class: &str) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            namespaces,
            class: class.to_string(),
            id_field: None,
            properties: Vec::new(),
        }
    }

    pub fn property(&self, field: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.field == field)
    }

    /// Local name of the class, e.g. `Image` for `foaf:Image`.
    pub fn class_name(&self) -> &str {
        local_name(self.class.as_str())
    }

    /// The class IRI without its local name.
    pub fn namespace(&self) -> &str {
        let iri = self.class.as_str();
        &iri[..iri.len() - self.class_name().len()]
    }
}

/// Collects names first and expands them all in [`build`](Self::build).
pub struct TypeDescriptorBuilder {
    namespaces: Namespaces,
    class: String,
    id_field: Option<String>,
    properties: Vec<(String, String, Cardinality, Collection)>,
}

impl TypeDescriptorBuilder {
    pub fn id(mut self, field: &str) -> Self {
        self.id_field = Some(field.to_string());
        self
    }

    /// A single-valued property.
    pub fn one(self, field: &str, predicate: &str) -> Self {
        self.push(field, predicate, Cardinality::One, Collection::Repeated)
    }

    /// A multi-valued property written as repeated assertions.
    pub fn many(self, field: &str, predicate: &str) -> Self {
        self.push(field, predicate, Cardinality::Many, Collection::Repeated)
    }

    /// A multi-valued property written as an `rdf:List`.
    pub fn list(self, field: &str, predicate: &str) -> Self {
        self.push(field, predicate, Cardinality::Many, Collection::List)
    }

    fn push(
        mut self,
        field: &str,
        predicate: &str,
        cardinality: Cardinality,
        collection: Collection,
    ) -> Self {
        self.properties.push((
            field.to_string(),
            predicate.to_string(),
            cardinality,
            collection,
        ));
        self
    }

    pub fn build(self) -> Result<TypeDescriptor, MappingError> {
        let class = self.namespaces.expand(&self.class)?;
        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(self.properties.len());
        for (field, predicate, cardinality, collection) in self.properties {
            if !seen.insert(field.clone()) {
                return Err(MappingError::DuplicateField(field));
            }
            properties.push(PropertyDescriptor {
                predicate: self.namespaces.expand(&predicate)?,
                field,
                cardinality,
                collection,
            });
        }
        Ok(TypeDescriptor {
            class,
            id_field: self.id_field,
            properties,
        })
    }
}
