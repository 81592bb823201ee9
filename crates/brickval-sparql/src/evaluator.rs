//! SPARQL 評価器
//!
//! Evaluates parsed queries over the union of one or more graphs. Solutions
//! flow through the pattern tree left to right, so variables bound before a
//! pattern (including the caller's initial bindings) constrain its matches.

use crate::parser::{
    Bindings, Expression, Function, GraphPattern, OrderCondition, PropertyPath, QueryType, SparqlQuery,
    TermPattern, TriplePattern, Variable, Verb,
};
use crate::SparqlError;
use brickval_core::vocab::xsd;
use brickval_core::{Graph, Iri, Literal, Term, Triple};
use regex::RegexBuilder;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use tracing::debug;

const DEFAULT_MAX_SOLUTIONS: usize = 100_000;

/// Query result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Select {
        variables: Vec<Variable>,
        bindings: Vec<Bindings>,
    },
    Construct {
        triples: Vec<Triple>,
    },
    Ask {
        result: bool,
    },
}

/// SPARQL Evaluator trait
pub trait SparqlEvaluator {
    /// Evaluate `query` over the union of `graphs`, starting from `initial`
    fn evaluate(&self, query: &SparqlQuery, graphs: &[&Graph], initial: &Bindings) -> Result<QueryResult, SparqlError>;
}

/// Default implementation
#[derive(Debug, Clone)]
pub struct DefaultSparqlEvaluator {
    max_solutions: usize,
}

impl Default for DefaultSparqlEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultSparqlEvaluator {
    pub fn new() -> Self {
        Self {
            max_solutions: DEFAULT_MAX_SOLUTIONS,
        }
    }

    /// Intermediate solution sequences larger than this abort evaluation
    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions;
        self
    }
}

impl SparqlEvaluator for DefaultSparqlEvaluator {
    fn evaluate(&self, query: &SparqlQuery, graphs: &[&Graph], initial: &Bindings) -> Result<QueryResult, SparqlError> {
        let evaluation = Evaluation {
            graphs,
            max_solutions: self.max_solutions,
        };

        let mut solutions = evaluation.pattern(&query.where_clause, vec![initial.clone()])?;
        let modifier = &query.solution_modifier;

        if !modifier.order.is_empty() {
            solutions.sort_by(|a, b| evaluation.order(&modifier.order, a, b));
        }

        let result = match &query.query_type {
            QueryType::Ask => QueryResult::Ask {
                result: !solutions.is_empty(),
            },
            QueryType::Select => {
                let variables = if query.variables.is_empty() {
                    solutions
                        .iter()
                        .flat_map(|solution| solution.keys())
                        .filter(|variable| !variable.is_blank())
                        .cloned()
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect()
                } else {
                    query.variables.clone()
                };

                let mut rows: Vec<Bindings> = solutions
                    .into_iter()
                    .map(|solution| {
                        solution
                            .into_iter()
                            .filter(|(variable, _)| variables.contains(variable))
                            .collect()
                    })
                    .collect();
                if modifier.distinct {
                    let mut seen = BTreeSet::new();
                    rows.retain(|row| seen.insert(row.clone()));
                }

                let bindings = rows
                    .into_iter()
                    .skip(modifier.offset.unwrap_or(0))
                    .take(modifier.limit.unwrap_or(usize::MAX))
                    .collect();
                QueryResult::Select { variables, bindings }
            }
            QueryType::Construct(template) => {
                let mut triples = BTreeSet::new();
                let rows = solutions
                    .iter()
                    .skip(modifier.offset.unwrap_or(0))
                    .take(modifier.limit.unwrap_or(usize::MAX));
                for solution in rows {
                    let seed = solution_seed(solution);
                    triples.extend(template.iter().filter_map(|pattern| instantiate(pattern, solution, seed)));
                }
                QueryResult::Construct {
                    triples: triples.into_iter().collect(),
                }
            }
        };

        let produced = match &result {
            QueryResult::Select { bindings, .. } => bindings.len(),
            QueryResult::Construct { triples } => triples.len(),
            QueryResult::Ask { result } => usize::from(*result),
        };
        debug!(graphs = graphs.len(), produced, "SPARQL query evaluated");
        Ok(result)
    }
}

struct Evaluation<'g> {
    graphs: &'g [&'g Graph],
    max_solutions: usize,
}

impl Evaluation<'_> {
    fn pattern(&self, pattern: &GraphPattern, input: Vec<Bindings>) -> Result<Vec<Bindings>, SparqlError> {
        let output = match pattern {
            GraphPattern::Group(elements) => {
                let mut current = input;
                let mut filters = Vec::new();
                for element in elements {
                    match element {
                        GraphPattern::Filter(expression) => filters.push(expression),
                        other => current = self.pattern(other, current)?,
                    }
                }
                current.retain(|solution| filters.iter().all(|filter| self.test(filter, solution)));
                current
            }
            GraphPattern::Bgp(patterns) => {
                let mut current = input;
                for triple in patterns {
                    let mut next = Vec::new();
                    for solution in &current {
                        next.extend(self.match_triple(triple, solution));
                    }
                    self.check(next.len())?;
                    current = next;
                }
                current
            }
            GraphPattern::Optional(inner) => {
                let mut output = Vec::new();
                for solution in input {
                    let extended = self.pattern(inner, vec![solution.clone()])?;
                    if extended.is_empty() {
                        output.push(solution);
                    } else {
                        output.extend(extended);
                    }
                }
                output
            }
            GraphPattern::Union(branches) => {
                let mut output = Vec::new();
                for branch in branches {
                    output.extend(self.pattern(branch, input.clone())?);
                }
                output
            }
            GraphPattern::Minus(inner) => {
                let removed = self.pattern(inner, vec![Bindings::new()])?;
                input
                    .into_iter()
                    .filter(|solution| {
                        !removed.iter().any(|other| {
                            compatible(solution, other) && other.keys().any(|variable| solution.contains_key(variable))
                        })
                    })
                    .collect()
            }
            GraphPattern::Filter(expression) => input
                .into_iter()
                .filter(|solution| self.test(expression, solution))
                .collect(),
            GraphPattern::Bind(expression, variable) => {
                let mut output = Vec::with_capacity(input.len());
                for mut solution in input {
                    if solution.contains_key(variable) {
                        return Err(SparqlError::EvaluationError(format!("BIND to already bound {}", variable)));
                    }
                    if let Some(value) = self.expression(expression, &solution) {
                        solution.insert(variable.clone(), value);
                    }
                    output.push(solution);
                }
                output
            }
        };

        self.check(output.len())?;
        Ok(output)
    }

    fn check(&self, solutions: usize) -> Result<(), SparqlError> {
        if solutions > self.max_solutions {
            Err(SparqlError::EvaluationError(format!(
                "more than {} intermediate solutions",
                self.max_solutions
            )))
        } else {
            Ok(())
        }
    }

    fn match_triple(&self, pattern: &TriplePattern, solution: &Bindings) -> Vec<Bindings> {
        let subject = resolve(&pattern.subject, solution);
        let object = resolve(&pattern.object, solution);

        let matches: Vec<(Term, Option<Iri>, Term)> = match &pattern.predicate {
            Verb::Variable(variable) => {
                let predicate = match solution.get(variable) {
                    Some(Term::Iri(iri)) => Some(iri),
                    Some(_) => return Vec::new(),
                    None => None,
                };
                self.triples(subject.as_ref(), predicate, object.as_ref())
                    .into_iter()
                    .map(|triple| (triple.subject, Some(triple.predicate), triple.object))
                    .collect()
            }
            Verb::Path(PropertyPath::Predicate(predicate)) => self
                .triples(subject.as_ref(), Some(predicate), object.as_ref())
                .into_iter()
                .map(|triple| (triple.subject, None, triple.object))
                .collect(),
            Verb::Path(path) => self
                .path_pairs(subject.as_ref(), path, object.as_ref())
                .into_iter()
                .map(|(s, o)| (s, None, o))
                .collect(),
        };

        matches
            .into_iter()
            .filter_map(|(s, p, o)| {
                let mut extended = solution.clone();
                if !bind(&mut extended, &pattern.subject, s) || !bind(&mut extended, &pattern.object, o) {
                    return None;
                }
                if let (Verb::Variable(variable), Some(p)) = (&pattern.predicate, p) {
                    if !bind_variable(&mut extended, variable, Term::Iri(p)) {
                        return None;
                    }
                }
                Some(extended)
            })
            .collect()
    }

    /// Triples of the graph union, each reported once
    fn triples(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> BTreeSet<Triple> {
        self.graphs
            .iter()
            .flat_map(|graph| graph.triples_matching(subject, predicate, object))
            .cloned()
            .collect()
    }

    fn path_pairs(&self, subject: Option<&Term>, path: &PropertyPath, object: Option<&Term>) -> Vec<(Term, Term)> {
        match (subject, object) {
            (Some(s), _) => self
                .step(s, path, true)
                .into_iter()
                .filter(|o| object.map_or(true, |bound| bound == o))
                .map(|o| (s.clone(), o))
                .collect(),
            (None, Some(o)) => self
                .step(o, path, false)
                .into_iter()
                .map(|s| (s, o.clone()))
                .collect(),
            (None, None) => self
                .nodes()
                .into_iter()
                .flat_map(|s| self.step(&s, path, true).into_iter().map(move |o| (s.clone(), o)))
                .collect(),
        }
    }

    fn nodes(&self) -> BTreeSet<Term> {
        self.graphs
            .iter()
            .flat_map(|graph| graph.iter())
            .flat_map(|triple| [triple.subject.clone(), triple.object.clone()])
            .collect()
    }

    fn step(&self, node: &Term, path: &PropertyPath, forward: bool) -> BTreeSet<Term> {
        match path {
            PropertyPath::Predicate(predicate) => {
                let triples = if forward {
                    self.triples(Some(node), Some(predicate), None)
                } else {
                    self.triples(None, Some(predicate), Some(node))
                };
                triples
                    .into_iter()
                    .map(|triple| if forward { triple.object } else { triple.subject })
                    .collect()
            }
            PropertyPath::Inverse(inner) => self.step(node, inner, !forward),
            PropertyPath::Sequence(steps) => {
                let ordered: Vec<&PropertyPath> = if forward {
                    steps.iter().collect()
                } else {
                    steps.iter().rev().collect()
                };
                let mut current = BTreeSet::from([node.clone()]);
                for step in ordered {
                    current = current.iter().flat_map(|n| self.step(n, step, forward)).collect();
                }
                current
            }
            PropertyPath::Alternative(alternatives) => alternatives
                .iter()
                .flat_map(|alternative| self.step(node, alternative, forward))
                .collect(),
            PropertyPath::ZeroOrMore(inner) => self.closure(node, inner, forward, true),
            PropertyPath::OneOrMore(inner) => self.closure(node, inner, forward, false),
            PropertyPath::ZeroOrOne(inner) => {
                let mut reached = self.step(node, inner, forward);
                reached.insert(node.clone());
                reached
            }
        }
    }

    fn closure(&self, start: &Term, inner: &PropertyPath, forward: bool, include_start: bool) -> BTreeSet<Term> {
        let mut reached = BTreeSet::new();
        if include_start {
            reached.insert(start.clone());
        }
        let mut frontier = vec![start.clone()];
        while let Some(node) = frontier.pop() {
            for next in self.step(&node, inner, forward) {
                if reached.insert(next.clone()) {
                    frontier.push(next);
                }
            }
        }
        reached
    }

    fn order(&self, conditions: &[OrderCondition], a: &Bindings, b: &Bindings) -> Ordering {
        for condition in conditions {
            let (expression, descending) = match condition {
                OrderCondition::Asc(expression) => (expression, false),
                OrderCondition::Desc(expression) => (expression, true),
            };
            let left = self.expression(expression, a);
            let right = self.expression(expression, b);
            let ordering = match (&left, &right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(l), Some(r)) => compare(l, r).unwrap_or_else(|| l.cmp(r)),
            };
            let ordering = if descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Filter test; errors count as false
    fn test(&self, expression: &Expression, solution: &Bindings) -> bool {
        self.truth(expression, solution) == Some(true)
    }

    fn truth(&self, expression: &Expression, solution: &Bindings) -> Option<bool> {
        self.expression(expression, solution).as_ref().and_then(effective_boolean)
    }

    /// Value of an expression; `None` is an expression error
    fn expression(&self, expression: &Expression, solution: &Bindings) -> Option<Term> {
        match expression {
            Expression::Variable(variable) => solution.get(variable).cloned(),
            Expression::Constant(term) => Some(term.clone()),
            Expression::Or(left, right) => {
                match (self.truth(left, solution), self.truth(right, solution)) {
                    (Some(true), _) | (_, Some(true)) => Some(boolean(true)),
                    (Some(false), Some(false)) => Some(boolean(false)),
                    _ => None,
                }
            }
            Expression::And(left, right) => {
                match (self.truth(left, solution), self.truth(right, solution)) {
                    (Some(false), _) | (_, Some(false)) => Some(boolean(false)),
                    (Some(true), Some(true)) => Some(boolean(true)),
                    _ => None,
                }
            }
            Expression::Not(inner) => self.truth(inner, solution).map(|value| boolean(!value)),
            Expression::Equal(left, right) => self.equality(left, right, solution).map(boolean),
            Expression::NotEqual(left, right) => self.equality(left, right, solution).map(|eq| boolean(!eq)),
            Expression::LessThan(left, right) => self.ordering(left, right, solution, |o| o.is_lt()),
            Expression::LessThanOrEqual(left, right) => self.ordering(left, right, solution, |o| o.is_le()),
            Expression::GreaterThan(left, right) => self.ordering(left, right, solution, |o| o.is_gt()),
            Expression::GreaterThanOrEqual(left, right) => self.ordering(left, right, solution, |o| o.is_ge()),
            Expression::In(left, list) => self.membership(left, list, solution).map(boolean),
            Expression::NotIn(left, list) => self.membership(left, list, solution).map(|found| boolean(!found)),
            Expression::Add(left, right) => self.arithmetic(left, right, solution, Arithmetic::Add),
            Expression::Subtract(left, right) => self.arithmetic(left, right, solution, Arithmetic::Subtract),
            Expression::Multiply(left, right) => self.arithmetic(left, right, solution, Arithmetic::Multiply),
            Expression::Divide(left, right) => self.arithmetic(left, right, solution, Arithmetic::Divide),
            Expression::Negate(inner) => {
                let value = self.expression(inner, solution)?;
                let literal = numeric_literal(&value)?;
                let lexical = match literal.lexical.trim().strip_prefix('-') {
                    Some(positive) => positive.to_string(),
                    None => format!("-{}", literal.lexical.trim().trim_start_matches('+')),
                };
                Some(Term::literal(Literal::typed(lexical, literal.datatype.clone())))
            }
            Expression::Call(function, arguments) => self.call(*function, arguments, solution),
            Expression::Exists(pattern) => self.exists(pattern, solution).map(boolean),
            Expression::NotExists(pattern) => self.exists(pattern, solution).map(|found| boolean(!found)),
        }
    }

    fn exists(&self, pattern: &GraphPattern, solution: &Bindings) -> Option<bool> {
        self.pattern(pattern, vec![solution.clone()])
            .ok()
            .map(|solutions| !solutions.is_empty())
    }

    fn equality(&self, left: &Expression, right: &Expression, solution: &Bindings) -> Option<bool> {
        let left = self.expression(left, solution)?;
        let right = self.expression(right, solution)?;
        Some(equal(&left, &right))
    }

    fn ordering(
        &self,
        left: &Expression,
        right: &Expression,
        solution: &Bindings,
        accept: fn(Ordering) -> bool,
    ) -> Option<Term> {
        let left = self.expression(left, solution)?;
        let right = self.expression(right, solution)?;
        compare(&left, &right).map(|ordering| boolean(accept(ordering)))
    }

    fn membership(&self, left: &Expression, list: &[Expression], solution: &Bindings) -> Option<bool> {
        let value = self.expression(left, solution)?;
        let mut errored = false;
        for item in list {
            match self.expression(item, solution) {
                Some(item) if equal(&value, &item) => return Some(true),
                Some(_) => {}
                None => errored = true,
            }
        }
        if errored {
            None
        } else {
            Some(false)
        }
    }

    fn arithmetic(&self, left: &Expression, right: &Expression, solution: &Bindings, op: Arithmetic) -> Option<Term> {
        let left = self.expression(left, solution)?;
        let right = self.expression(right, solution)?;
        let (left, right) = (numeric_literal(&left)?, numeric_literal(&right)?);
        let (ldt, rdt) = (left.datatype.as_str(), right.datatype.as_str());

        if xsd::is_integer(ldt) && xsd::is_integer(rdt) && op != Arithmetic::Divide {
            let a = left.lexical.trim().parse::<i128>().ok()?;
            let b = right.lexical.trim().parse::<i128>().ok()?;
            let value = match op {
                Arithmetic::Add => a.checked_add(b),
                Arithmetic::Subtract => a.checked_sub(b),
                _ => a.checked_mul(b),
            }?;
            return Some(Term::literal(Literal::typed(value.to_string(), Iri::new(xsd::INTEGER))));
        }

        let (a, b) = (left.as_f64()?, right.as_f64()?);
        let floating = [ldt, rdt].iter().any(|dt| *dt == xsd::DOUBLE || *dt == xsd::FLOAT);
        let value = match op {
            Arithmetic::Add => a + b,
            Arithmetic::Subtract => a - b,
            Arithmetic::Multiply => a * b,
            Arithmetic::Divide if b == 0.0 && !floating => return None,
            Arithmetic::Divide => a / b,
        };
        let datatype = if floating { xsd::DOUBLE } else { xsd::DECIMAL };
        Some(Term::literal(Literal::typed(value.to_string(), Iri::new(datatype))))
    }

    fn call(&self, function: Function, arguments: &[Expression], solution: &Bindings) -> Option<Term> {
        match function {
            Function::Bound => match arguments.first()? {
                Expression::Variable(variable) => Some(boolean(solution.contains_key(variable))),
                _ => None,
            },
            Function::If => {
                let branch = if self.truth(arguments.first()?, solution)? {
                    arguments.get(1)?
                } else {
                    arguments.get(2)?
                };
                self.expression(branch, solution)
            }
            Function::Coalesce => arguments.iter().find_map(|argument| self.expression(argument, solution)),
            _ => {
                let values = arguments
                    .iter()
                    .map(|argument| self.expression(argument, solution))
                    .collect::<Option<Vec<Term>>>()?;
                apply(function, &values)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arithmetic {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Built-ins over already evaluated arguments
fn apply(function: Function, values: &[Term]) -> Option<Term> {
    let first = values.first()?;
    let value = match function {
        Function::IsIri => boolean(first.is_iri()),
        Function::IsBlank => boolean(first.is_blank()),
        Function::IsLiteral => boolean(first.is_literal()),
        Function::IsNumeric => boolean(numeric_literal(first).is_some()),
        Function::Str => match first {
            Term::Iri(iri) => string(iri.as_str()),
            Term::Literal(literal) => string(&literal.lexical),
            Term::BlankNode(_) => return None,
        },
        Function::Lang => string(first.as_literal()?.language.as_deref().unwrap_or("")),
        Function::Datatype => Term::Iri(first.as_literal()?.datatype.clone()),
        Function::SameTerm => boolean(first == values.get(1)?),
        Function::LangMatches => boolean(lang_matches(text(first)?, text(values.get(1)?)?)),
        Function::Regex => {
            let flags = match values.get(2) {
                Some(flags) => text(flags)?,
                None => "",
            };
            let mut pattern = text(values.get(1)?)?.to_string();
            if flags.contains('q') {
                pattern = regex::escape(&pattern);
            }
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(flags.contains('i'))
                .dot_matches_new_line(flags.contains('s'))
                .multi_line(flags.contains('m'))
                .ignore_whitespace(flags.contains('x'))
                .build()
                .ok()?;
            boolean(regex.is_match(text(first)?))
        }
        Function::StrStarts => boolean(text(first)?.starts_with(text(values.get(1)?)?)),
        Function::StrEnds => boolean(text(first)?.ends_with(text(values.get(1)?)?)),
        Function::Contains => boolean(text(first)?.contains(text(values.get(1)?)?)),
        Function::StrLen => Term::literal(Literal::integer(text(first)?.chars().count() as i64)),
        Function::LCase | Function::UCase => {
            let literal = first.as_literal()?;
            let lexical = if function == Function::LCase {
                literal.lexical.to_lowercase()
            } else {
                literal.lexical.to_uppercase()
            };
            Term::literal(Literal {
                lexical,
                ..literal.clone()
            })
        }
        Function::Bound | Function::If | Function::Coalesce => return None,
    };
    Some(value)
}

fn boolean(value: bool) -> Term {
    Term::literal(Literal::boolean(value))
}

fn string(value: &str) -> Term {
    Term::literal(Literal::string(value))
}

/// Lexical form of a literal argument to a string function
fn text(term: &Term) -> Option<&str> {
    term.as_literal().map(|literal| literal.lexical.as_str())
}

fn numeric_literal(term: &Term) -> Option<&Literal> {
    term.as_literal()
        .filter(|literal| literal.language.is_none() && literal.as_f64().is_some())
}

fn effective_boolean(term: &Term) -> Option<bool> {
    let literal = term.as_literal()?;
    let datatype = literal.datatype.as_str();
    if datatype == xsd::BOOLEAN {
        literal.as_bool()
    } else if xsd::is_numeric(datatype) {
        literal.as_f64().map(|value| value != 0.0 && !value.is_nan())
    } else if datatype == xsd::STRING || literal.language.is_some() {
        Some(!literal.lexical.is_empty())
    } else {
        None
    }
}

fn equal(left: &Term, right: &Term) -> bool {
    match (numeric_literal(left), numeric_literal(right)) {
        (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
        _ => match (left.as_literal(), right.as_literal()) {
            (Some(a), Some(b)) if a.datatype.as_str() == xsd::BOOLEAN && b.datatype.as_str() == xsd::BOOLEAN => {
                a.as_bool().is_some() && a.as_bool() == b.as_bool()
            }
            _ => left == right,
        },
    }
}

/// Order of two comparable values; `None` when SPARQL leaves them unordered
fn compare(left: &Term, right: &Term) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (numeric_literal(left), numeric_literal(right)) {
        return a.as_f64()?.partial_cmp(&b.as_f64()?);
    }
    let (a, b) = (left.as_literal()?, right.as_literal()?);
    if a.datatype != b.datatype || a.language != b.language {
        return None;
    }
    if a.datatype.as_str() == xsd::BOOLEAN {
        return Some(a.as_bool()?.cmp(&b.as_bool()?));
    }
    Some(a.lexical.cmp(&b.lexical))
}

fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let (tag, range) = (tag.to_ascii_lowercase(), range.to_ascii_lowercase());
    tag == range || tag.starts_with(&format!("{}-", range))
}

fn resolve(pattern: &TermPattern, solution: &Bindings) -> Option<Term> {
    match pattern {
        TermPattern::Variable(variable) => solution.get(variable).cloned(),
        TermPattern::Constant(term) => Some(term.clone()),
    }
}

fn bind(solution: &mut Bindings, pattern: &TermPattern, term: Term) -> bool {
    match pattern {
        TermPattern::Variable(variable) => bind_variable(solution, variable, term),
        TermPattern::Constant(constant) => *constant == term,
    }
}

fn bind_variable(solution: &mut Bindings, variable: &Variable, term: Term) -> bool {
    match solution.get(variable) {
        Some(existing) => *existing == term,
        None => {
            solution.insert(variable.clone(), term);
            true
        }
    }
}

fn compatible(a: &Bindings, b: &Bindings) -> bool {
    a.iter()
        .all(|(variable, term)| b.get(variable).map_or(true, |other| other == term))
}

/// Template blank nodes are labelled from the solution, so the same solution
/// always yields the same blank node and different solutions never share one
fn solution_seed(solution: &Bindings) -> u64 {
    let mut hasher = DefaultHasher::new();
    solution.hash(&mut hasher);
    hasher.finish()
}

/// Template triple for one solution
fn instantiate(pattern: &TriplePattern, solution: &Bindings, seed: u64) -> Option<Triple> {
    let term = |pattern: &TermPattern| match pattern {
        TermPattern::Variable(variable) if variable.is_blank() => Some(Term::bnode(format!(
            "c{:016x}_{}",
            seed,
            variable.name().trim_start_matches("_:")
        ))),
        other => resolve(other, solution),
    };

    let subject = term(&pattern.subject)?;
    let predicate = match &pattern.predicate {
        Verb::Variable(variable) => solution.get(variable)?.as_iri()?.clone(),
        Verb::Path(PropertyPath::Predicate(iri)) => iri.clone(),
        Verb::Path(_) => return None,
    };
    let object = term(&pattern.object)?;

    if subject.is_literal() {
        return None;
    }
    Some(Triple::new(subject, predicate, object))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Term {
        Term::literal(Literal::integer(value))
    }

    #[test]
    fn test_equality_across_numeric_types() {
        let decimal = Term::literal(Literal::typed("2.0", Iri::new(xsd::DECIMAL)));
        assert!(equal(&int(2), &decimal));
        assert!(!equal(&int(2), &Term::literal(Literal::string("2"))));
    }

    #[test]
    fn test_compare_rejects_mixed_kinds() {
        assert_eq!(compare(&int(1), &int(2)), Some(Ordering::Less));
        assert_eq!(compare(&int(1), &Term::literal(Literal::string("a"))), None);
        assert_eq!(compare(&Term::iri("http://x/a"), &Term::iri("http://x/b")), None);
    }

    #[test]
    fn test_effective_boolean_value() {
        assert_eq!(effective_boolean(&int(0)), Some(false));
        assert_eq!(effective_boolean(&Term::literal(Literal::string("x"))), Some(true));
        assert_eq!(effective_boolean(&Term::iri("http://x/a")), None);
    }

    #[test]
    fn test_lang_matches() {
        assert!(lang_matches("en-US", "en"));
        assert!(lang_matches("EN", "en"));
        assert!(!lang_matches("eng", "en"));
        assert!(lang_matches("fr", "*"));
        assert!(!lang_matches("", "*"));
    }
}
