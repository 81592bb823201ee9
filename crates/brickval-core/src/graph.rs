//! In-memory graph with indexing for fast pattern queries

use crate::model::{Iri, Term, Triple};
use crate::vocab::rdf;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

type Postings = SmallVec<[usize; 8]>;

/// In-memory RDF graph.
///
/// A set of triples in insertion order. Inserting a triple that is already
/// present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    members: HashSet<Triple>,
    /// Subject index: subject -> list of triple indices
    subject_index: HashMap<Term, Postings>,
    /// Predicate index: predicate -> list of triple indices
    predicate_index: HashMap<Iri, Postings>,
    /// Object index: object -> list of triple indices
    object_index: HashMap<Term, Postings>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns false when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.members.contains(&triple) {
            return false;
        }

        let index = self.triples.len();
        self.subject_index.entry(triple.subject.clone()).or_default().push(index);
        self.predicate_index.entry(triple.predicate.clone()).or_default().push(index);
        self.object_index.entry(triple.object.clone()).or_default().push(index);
        self.members.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Add every triple from an iterator, returning how many were new.
    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) -> usize {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple) {
                added += 1;
            }
        }
        added
    }

    /// Merge another graph into this one.
    pub fn merge(&mut self, other: &Graph) -> usize {
        self.extend(other.iter().cloned())
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.members.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Find triples matching a pattern, using the most selective index.
    pub fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Triple> {
        let empty: &[usize] = &[];
        let s_idx = subject.map(|s| self.subject_index.get(s).map(|v| v.as_slice()).unwrap_or(empty));
        let p_idx = predicate.map(|p| self.predicate_index.get(p).map(|v| v.as_slice()).unwrap_or(empty));
        let o_idx = object.map(|o| self.object_index.get(o).map(|v| v.as_slice()).unwrap_or(empty));

        let candidates: Postings = match (s_idx, p_idx, o_idx) {
            (None, None, None) => (0..self.triples.len()).collect(),
            (Some(a), None, None) | (None, Some(a), None) | (None, None, Some(a)) => a.iter().copied().collect(),
            (Some(a), Some(b), None) | (Some(a), None, Some(b)) | (None, Some(a), Some(b)) => {
                intersect_indices(a, b)
            }
            (Some(a), Some(b), Some(c)) => {
                let ab = intersect_indices(a, b);
                intersect_indices(&ab, c)
            }
        };

        candidates
            .into_iter()
            .filter_map(|index| self.triples.get(index))
            .collect()
    }

    /// Objects of `subject predicate ?o`
    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<&Term> {
        let predicate = Iri::new(predicate);
        self.triples_matching(Some(subject), Some(&predicate), None)
            .into_iter()
            .map(|t| &t.object)
            .collect()
    }

    /// First object of `subject predicate ?o`, if any
    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// Subjects of `?s predicate object`
    pub fn subjects(&self, predicate: &str, object: &Term) -> Vec<&Term> {
        let predicate = Iri::new(predicate);
        self.triples_matching(None, Some(&predicate), Some(object))
            .into_iter()
            .map(|t| &t.subject)
            .collect()
    }

    /// All triples whose subject is `subject`
    pub fn outgoing(&self, subject: &Term) -> Vec<&Triple> {
        self.triples_matching(Some(subject), None, None)
    }

    /// All triples with the given predicate
    pub fn with_predicate(&self, predicate: &str) -> Vec<&Triple> {
        self.triples_matching(None, Some(&Iri::new(predicate)), None)
    }

    /// Asserted `rdf:type` check (no subclass reasoning)
    pub fn has_type(&self, subject: &Term, class: &str) -> bool {
        self.contains(&Triple::new(subject.clone(), Iri::new(rdf::TYPE), Iri::new(class)))
    }

    /// Read an RDF collection starting at `head`.
    ///
    /// Returns `None` for malformed lists (missing `rdf:first`, branching
    /// `rdf:rest`, or a cycle).
    pub fn list(&self, head: &Term) -> Option<Vec<Term>> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut current = head.clone();

        while !current.is(rdf::NIL) {
            if !visited.insert(current.clone()) {
                return None;
            }
            let firsts = self.objects(&current, rdf::FIRST);
            let rests = self.objects(&current, rdf::REST);
            if firsts.len() != 1 || rests.len() != 1 {
                return None;
            }
            items.push(firsts[0].clone());
            current = rests[0].clone();
        }

        Some(items)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for Graph {}

/// Intersect two sorted index vectors
fn intersect_indices(a: &[usize], b: &[usize]) -> Postings {
    let mut result = SmallVec::new();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }

    result
}
