//! Set-of-triples graph.

use std::collections::btree_set;
use std::collections::BTreeSet;

use super::term::{Iri, Resource, Term, Triple};

/// An unordered collection of triples with set semantics.
///
/// Duplicate triples collapse on insert. Iteration is sorted, which keeps
/// serialized output stable, but callers should rely on membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Set union: every triple of `other` becomes a member of `self`.
    pub fn add(&mut self, other: &Graph) {
        self.triples.extend(other.triples.iter().cloned());
    }

    /// Set difference: every triple of `other` is removed from `self`.
    pub fn remove(&mut self, other: &Graph) {
        for triple in &other.triples {
            self.triples.remove(triple);
        }
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Remove every triple, keeping the graph itself.
    pub fn clear(&mut self) {
        self.triples.clear();
    }

    pub fn num_statements(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Objects of all triples matching `(subject, predicate, _)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Resource,
        predicate: &'a Iri,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// All triples whose subject is `subject`.
    pub fn about<'a>(&'a self, subject: &'a Resource) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| &t.subject == subject)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
