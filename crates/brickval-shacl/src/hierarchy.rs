//! rdfs:subClassOf の推移的閉包

use brickval_core::vocab::rdfs;
use brickval_core::{Graph, Term};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

/// Transitive class hierarchy.
///
/// Both directions are precomputed: ancestors for `instance of` checks and
/// descendants for class-based target selection.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    /// 子クラス -> 直接の親クラス集合
    parents: HashMap<Term, BTreeSet<Term>>,
    ancestors: HashMap<Term, BTreeSet<Term>>,
    descendants: HashMap<Term, BTreeSet<Term>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy from the `rdfs:subClassOf` triples of a graph
    pub fn from_graph(graph: &Graph) -> Self {
        let mut hierarchy = Self::new();
        hierarchy.load_edges(graph);
        hierarchy.compute_closure();
        hierarchy
    }

    /// This hierarchy extended with the subclass edges of `graph`.
    ///
    /// Borrows when the graph declares no subclass edges of its own.
    pub fn extended_with(&self, graph: &Graph) -> Cow<'_, ClassHierarchy> {
        if graph.with_predicate(rdfs::SUB_CLASS_OF).is_empty() {
            return Cow::Borrowed(self);
        }
        let mut extended = self.clone();
        extended.load_edges(graph);
        extended.compute_closure();
        Cow::Owned(extended)
    }

    fn load_edges(&mut self, graph: &Graph) {
        for triple in graph.with_predicate(rdfs::SUB_CLASS_OF) {
            if triple.subject != triple.object {
                self.parents
                    .entry(triple.subject.clone())
                    .or_default()
                    .insert(triple.object.clone());
            }
        }
    }

    fn compute_closure(&mut self) {
        let mut ancestors: HashMap<Term, BTreeSet<Term>> = HashMap::new();
        for class in self.parents.keys() {
            let mut reached = BTreeSet::new();
            let mut stack: Vec<&Term> = self.parents[class].iter().collect();
            while let Some(next) = stack.pop() {
                // cycles terminate because each class is visited once
                if next != class && reached.insert(next.clone()) {
                    if let Some(grand) = self.parents.get(next) {
                        stack.extend(grand.iter());
                    }
                }
            }
            ancestors.insert(class.clone(), reached);
        }

        let mut descendants: HashMap<Term, BTreeSet<Term>> = HashMap::new();
        for (class, supers) in &ancestors {
            for sup in supers {
                descendants.entry(sup.clone()).or_default().insert(class.clone());
            }
        }

        self.ancestors = ancestors;
        self.descendants = descendants;
    }

    /// True when `class` is `ancestor` or a (transitive) subclass of it
    pub fn is_subclass_of(&self, class: &Term, ancestor: &Term) -> bool {
        class == ancestor
            || self
                .ancestors
                .get(class)
                .map(|set| set.contains(ancestor))
                .unwrap_or(false)
    }

    /// Strict superclasses of `class`
    pub fn superclasses(&self, class: &Term) -> impl Iterator<Item = &Term> {
        self.ancestors.get(class).into_iter().flatten()
    }

    /// `class` followed by all of its strict subclasses
    pub fn self_and_subclasses<'a>(&'a self, class: &'a Term) -> impl Iterator<Item = &'a Term> {
        std::iter::once(class).chain(self.descendants.get(class).into_iter().flatten())
    }

    pub fn class_count(&self) -> usize {
        self.parents.len()
    }
}
