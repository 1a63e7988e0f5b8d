//! Query results and query construction helpers.
//!
//! Query strings are opaque to this crate: they are handed to the backend
//! unchanged. [`QueryFactory`] only assembles the text of common queries.

use std::collections::BTreeMap;
use std::vec;

use crate::model::{Iri, Term};

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// One row of a SELECT result: variable name to bound term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    bindings: BTreeMap<String, Term>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: Term) {
        self.bindings.insert(variable.into(), value);
    }

    /// The value bound to `variable`, `None` if unbound in this row.
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The result of a SELECT query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    variables: Vec<String>,
    rows: Vec<BindingSet>,
}

impl ResultSet {
    pub fn new(variables: Vec<String>, rows: Vec<BindingSet>) -> Self {
        Self { variables, rows }
    }

    /// Projection variables, in query order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn rows(&self) -> &[BindingSet] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BindingSet> {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = BindingSet;
    type IntoIter = vec::IntoIter<BindingSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BindingSet;
    type IntoIter = std::slice::Iter<'a, BindingSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ---------------------------------------------------------------------------
// QueryFactory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDialect {
    Sparql,
}

/// The result shape a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    Select,
    Construct,
    Describe,
    Ask,
}

impl QueryForm {
    fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "select" => Some(Self::Select),
            "construct" => Some(Self::Construct),
            "describe" => Some(Self::Describe),
            "ask" => Some(Self::Ask),
            _ => None,
        }
    }

    /// Whether the query yields triples rather than rows or a boolean.
    pub fn is_graph(self) -> bool {
        matches!(self, Self::Construct | Self::Describe)
    }
}

/// Builds query text in the dialect a data source understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFactory {
    dialect: QueryDialect,
}

impl QueryFactory {
    pub fn sparql() -> Self {
        Self {
            dialect: QueryDialect::Sparql,
        }
    }

    pub fn dialect(&self) -> QueryDialect {
        self.dialect
    }

    /// `SELECT * WHERE { pattern }`
    pub fn select(&self, pattern: &str) -> String {
        format!("SELECT * WHERE {{ {pattern} }}")
    }

    /// `ASK { pattern }`
    pub fn ask(&self, pattern: &str) -> String {
        format!("ASK {{ {pattern} }}")
    }

    /// A CONSTRUCT query returning the triples whose subject is `iri`.
    pub fn describe(&self, iri: &Iri) -> String {
        format!("CONSTRUCT {{ {iri} ?p ?o }} WHERE {{ {iri} ?p ?o }}")
    }

    /// Every triple in the default graph.
    pub fn all_triples(&self) -> String {
        "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }".to_string()
    }

    /// The form of `query`, found by its first form keyword after the
    /// prologue. Comment lines are skipped and prefixed names such as
    /// `ask:` do not count. `None` if no keyword is found.
    pub fn form(&self, query: &str) -> Option<QueryForm> {
        query
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .flat_map(str::split_whitespace)
            .find_map(|token| {
                let end = token
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(token.len());
                let rest = &token[end..];
                if rest.starts_with(|c: char| c == ':' || c == '_' || c.is_alphanumeric()) {
                    return None;
                }
                QueryForm::from_keyword(&token[..end])
            })
    }

    /// Complete a bare `where { ... }` fragment into a SELECT projecting
    /// `?result`. Full queries are returned unchanged.
    pub fn complete(&self, query: &str) -> String {
        let trimmed = query.trim_start();
        let head = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if head.starts_with("where") || head.starts_with('{') {
            format!("SELECT DISTINCT ?result {trimmed}")
        } else {
            query.to_string()
        }
    }
}

impl Default for QueryFactory {
    fn default() -> Self {
        Self::sparql()
    }
}
