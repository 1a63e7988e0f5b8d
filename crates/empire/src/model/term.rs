//! RDF terms and triples.
//!
//! Subjects are [`Resource`]s (IRI or blank node), predicates are [`Iri`]s and
//! objects are [`Term`]s. All values are immutable once built; ordering is
//! derived so that graphs iterate deterministically.

use std::fmt;

use thiserror::Error;

use super::ontology::standard;
use crate::emitter::ntriples::escape_literal;

/// Errors raised when building or converting RDF values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid IRI `{iri}`: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("invalid blank node identifier `{0}`")]
    InvalidBlankNode(String),

    #[error("invalid language tag `{0}`")]
    InvalidLanguageTag(String),

    #[error("a literal cannot be used as a subject: {0}")]
    LiteralSubject(String),

    #[error("unsupported RDF term: {0}")]
    Unsupported(String),
}

// ---------------------------------------------------------------------------
// Iri
// ---------------------------------------------------------------------------

/// An absolute IRI. Validation is left to the backend that stores it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Literal
// ---------------------------------------------------------------------------

/// A literal value: simple, datatyped, or language-tagged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    value: String,
    datatype: Option<Iri>,
    language: Option<String>,
}

impl Literal {
    /// A simple literal (implicitly `xsd:string`).
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        let datatype = datatype.into();
        if datatype.as_str() == standard::XSD_STRING {
            return Self::simple(value);
        }
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Language tags are normalized to lowercase.
    pub fn language_tagged(value: impl Into<String>, language: &str) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.to_ascii_lowercase()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), standard::XSD_INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, standard::XSD_BOOLEAN)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The explicit datatype, `None` for simple and language-tagged literals.
    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal(&self.value))?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^{datatype}")
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Resource / Term
// ---------------------------------------------------------------------------

/// A node that may appear in subject position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    Iri(Iri),
    Blank(String),
}

impl Resource {
    pub fn blank(id: impl Into<String>) -> Self {
        Resource::Blank(id.into())
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Resource::Iri(iri) => Some(iri),
            Resource::Blank(_) => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => iri.fmt(f),
            Resource::Blank(id) => write!(f, "_:{id}"),
        }
    }
}

impl From<Iri> for Resource {
    fn from(value: Iri) -> Self {
        Resource::Iri(value)
    }
}

impl From<&str> for Resource {
    fn from(value: &str) -> Self {
        Resource::Iri(Iri::new(value))
    }
}

/// Any RDF node: IRI, blank node, or literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::Blank(id) => write!(f, "_:{id}"),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<Iri> for Term {
    fn from(value: Iri) -> Self {
        Term::Iri(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl From<Resource> for Term {
    fn from(value: Resource) -> Self {
        match value {
            Resource::Iri(iri) => Term::Iri(iri),
            Resource::Blank(id) => Term::Blank(id),
        }
    }
}

impl TryFrom<Term> for Resource {
    type Error = ModelError;

    fn try_from(value: Term) -> Result<Self, Self::Error> {
        match value {
            Term::Iri(iri) => Ok(Resource::Iri(iri)),
            Term::Blank(id) => Ok(Resource::Blank(id)),
            Term::Literal(literal) => Err(ModelError::LiteralSubject(literal.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Triple
// ---------------------------------------------------------------------------

/// A single `(subject, predicate, object)` statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub subject: Resource,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(
        subject: impl Into<Resource>,
        predicate: impl Into<Iri>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Formats the triple as a single N-Triples statement, without a newline.
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
