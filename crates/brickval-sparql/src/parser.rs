//! SPARQL 構文解析器
//!
//! A logos lexer feeding a recursive-descent parser. Keywords are lexed as
//! plain words and matched case-insensitively by the parser.

use crate::SparqlError;
use brickval_core::vocab::{rdf, xsd};
use brickval_core::{Iri, Literal, Term};
use logos::Logos;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Prefixes every query can use without declaring them
const STANDARD_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("sh", "http://www.w3.org/ns/shacl#"),
];

/// SPARQL トークン
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|#[^\r\n]*)")]
pub enum Token<'a> {
    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice())]
    Word(&'a str),

    #[regex(r"[?$][A-Za-z_][A-Za-z0-9_]*", |lex| &lex.slice()[1..])]
    Variable(&'a str),

    #[regex(r#"<[^<>"{}|^`\\\x00-\x20]*>"#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Iri(&'a str),

    #[regex(r"([A-Za-z][A-Za-z0-9_\-]*)?:[A-Za-z0-9_\-]*", |lex| lex.slice())]
    PrefixedName(&'a str),

    #[regex(r"_:[A-Za-z0-9_]+", |lex| &lex.slice()[2..])]
    BlankNode(&'a str),

    #[regex(r#""([^"\\\r\n]|\\.)*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    #[regex(r"'([^'\\\r\n]|\\.)*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    StringLiteral(&'a str),

    #[regex(r"@[A-Za-z]+(-[A-Za-z0-9]+)*", |lex| &lex.slice()[1..])]
    LangTag(&'a str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Integer(&'a str),

    #[regex(r"[0-9]*\.[0-9]+", |lex| lex.slice())]
    Decimal(&'a str),

    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)[eE][+-]?[0-9]+", |lex| lex.slice())]
    Double(&'a str),

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("^^")]
    DoubleCaret,

    #[token("^")]
    Caret,

    #[token("/")]
    Slash,

    #[token("|")]
    Pipe,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("-")]
    Dash,

    #[token("?")]
    Question,

    #[token("=")]
    Equals,

    #[token("!=")]
    NotEquals,

    #[token("<")]
    LessThan,

    #[token("<=")]
    LessEqual,

    #[token(">")]
    GreaterThan,

    #[token(">=")]
    GreaterEqual,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("!")]
    Bang,
}

/// Query variable, stored without its `?` or `$` sigil
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Variable(pub String);

impl Variable {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Blank nodes in a pattern act as variables that are never projected
    pub fn is_blank(&self) -> bool {
        self.0.starts_with("_:")
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Subject or object of a triple pattern
#[derive(Debug, Clone, PartialEq)]
pub enum TermPattern {
    Variable(Variable),
    Constant(Term),
}

/// Property Path
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyPath {
    Predicate(Iri),
    Inverse(Box<PropertyPath>),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
}

/// Predicate position of a triple pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Verb {
    Variable(Variable),
    Path(PropertyPath),
}

/// Triple Pattern
#[derive(Debug, Clone, PartialEq)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: Verb,
    pub object: TermPattern,
}

/// Graph Pattern
#[derive(Debug, Clone, PartialEq)]
pub enum GraphPattern {
    /// `{ ... }`; filters apply to the whole group
    Group(Vec<GraphPattern>),
    Bgp(Vec<TriplePattern>),
    Optional(Box<GraphPattern>),
    Union(Vec<GraphPattern>),
    Minus(Box<GraphPattern>),
    Filter(Expression),
    Bind(Expression, Variable),
}

/// Built-in function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Bound,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Str,
    Lang,
    Datatype,
    SameTerm,
    LangMatches,
    Regex,
    StrStarts,
    StrEnds,
    Contains,
    StrLen,
    LCase,
    UCase,
    If,
    Coalesce,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name.to_ascii_uppercase().as_str() {
            "BOUND" => Function::Bound,
            "ISIRI" | "ISURI" => Function::IsIri,
            "ISBLANK" => Function::IsBlank,
            "ISLITERAL" => Function::IsLiteral,
            "ISNUMERIC" => Function::IsNumeric,
            "STR" => Function::Str,
            "LANG" => Function::Lang,
            "DATATYPE" => Function::Datatype,
            "SAMETERM" => Function::SameTerm,
            "LANGMATCHES" => Function::LangMatches,
            "REGEX" => Function::Regex,
            "STRSTARTS" => Function::StrStarts,
            "STRENDS" => Function::StrEnds,
            "CONTAINS" => Function::Contains,
            "STRLEN" => Function::StrLen,
            "LCASE" => Function::LCase,
            "UCASE" => Function::UCase,
            "IF" => Function::If,
            "COALESCE" => Function::Coalesce,
            _ => return None,
        };
        Some(function)
    }

    fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Function::SameTerm | Function::LangMatches | Function::StrStarts | Function::StrEnds | Function::Contains => {
                2..=2
            }
            Function::Regex => 2..=3,
            Function::If => 3..=3,
            Function::Coalesce => 1..=usize::MAX,
            _ => 1..=1,
        }
    }
}

fn is_aggregate(name: &str) -> bool {
    matches!(
        name.to_ascii_uppercase().as_str(),
        "COUNT" | "SUM" | "AVG" | "MIN" | "MAX" | "SAMPLE" | "GROUP_CONCAT"
    )
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Variable(Variable),
    Constant(Term),
    // Logical
    Or(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    // Comparison
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    LessThan(Box<Expression>, Box<Expression>),
    LessThanOrEqual(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    In(Box<Expression>, Vec<Expression>),
    NotIn(Box<Expression>, Vec<Expression>),
    // Arithmetic
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),
    // Functions
    Call(Function, Vec<Expression>),
    // Exists
    Exists(Box<GraphPattern>),
    NotExists(Box<GraphPattern>),
}

/// Order condition
#[derive(Debug, Clone, PartialEq)]
pub enum OrderCondition {
    Asc(Expression),
    Desc(Expression),
}

/// Solution modifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionModifier {
    pub order: Vec<OrderCondition>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub distinct: bool,
}

/// Query Type
#[derive(Debug, Clone, PartialEq)]
pub enum QueryType {
    Select,
    Construct(Vec<TriplePattern>),
    Ask,
}

/// SPARQL Query
#[derive(Debug, Clone, PartialEq)]
pub struct SparqlQuery {
    pub query_type: QueryType,
    /// Projected variables; empty for `SELECT *`
    pub variables: Vec<Variable>,
    pub where_clause: GraphPattern,
    pub solution_modifier: SolutionModifier,
    pub prefixes: BTreeMap<String, String>,
}

impl SparqlQuery {
    pub fn is_select(&self) -> bool {
        matches!(self.query_type, QueryType::Select)
    }

    pub fn is_construct(&self) -> bool {
        matches!(self.query_type, QueryType::Construct(_))
    }
}

/// Bindings (variable -> term mapping)
pub type Bindings = BTreeMap<Variable, Term>;

/// SPARQL Parser trait
pub trait SparqlParser {
    fn parse(&self, query: &str) -> Result<SparqlQuery, SparqlError>;
}

/// Default implementation
#[derive(Debug, Clone)]
pub struct DefaultSparqlParser {
    prefixes: BTreeMap<String, String>,
}

impl Default for DefaultSparqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultSparqlParser {
    pub fn new() -> Self {
        Self {
            prefixes: STANDARD_PREFIXES
                .iter()
                .map(|(prefix, namespace)| (prefix.to_string(), namespace.to_string()))
                .collect(),
        }
    }

    /// Prefixes declared outside the query text; `PREFIX` lines still win
    pub fn with_prefixes<I: IntoIterator<Item = (String, String)>>(mut self, prefixes: I) -> Self {
        self.prefixes.extend(prefixes);
        self
    }
}

impl SparqlParser for DefaultSparqlParser {
    fn parse(&self, query: &str) -> Result<SparqlQuery, SparqlError> {
        let mut lexer = Token::lexer(query);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next() {
            match token {
                Ok(token) => tokens.push((token, lexer.span().start)),
                Err(()) => {
                    return Err(SparqlError::ParseError(format!(
                        "unexpected input {:?} at offset {}",
                        lexer.slice(),
                        lexer.span().start
                    )))
                }
            }
        }

        Parser {
            tokens,
            pos: 0,
            prefixes: self.prefixes.clone(),
        }
        .query()
    }
}

struct Parser<'a> {
    tokens: Vec<(Token<'a>, usize)>,
    pos: usize,
    prefixes: BTreeMap<String, String>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + n).map(|(token, _)| *token)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: Token<'a>) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token<'a>, what: &str) -> Result<(), SparqlError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), SparqlError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", keyword)))
        }
    }

    fn error<M: fmt::Display>(&self, message: M) -> SparqlError {
        match self.tokens.get(self.pos) {
            Some((token, offset)) => {
                SparqlError::ParseError(format!("{} at offset {} (found {:?})", message, offset, token))
            }
            None => SparqlError::ParseError(format!("{} at end of query", message)),
        }
    }

    fn unsupported(&self, feature: &str) -> SparqlError {
        SparqlError::UnsupportedFeature(feature.to_string())
    }

    fn query(mut self) -> Result<SparqlQuery, SparqlError> {
        self.prologue()?;

        let mut solution_modifier = SolutionModifier::default();
        let (query_type, variables) = if self.eat_keyword("SELECT") {
            solution_modifier.distinct = self.eat_keyword("DISTINCT") || self.eat_keyword("REDUCED");
            (QueryType::Select, self.projection()?)
        } else if self.eat_keyword("ASK") {
            (QueryType::Ask, Vec::new())
        } else if self.eat_keyword("CONSTRUCT") {
            if self.at_keyword("WHERE") {
                return Err(self.unsupported("CONSTRUCT WHERE"));
            }
            (QueryType::Construct(self.template()?), Vec::new())
        } else if self.at_keyword("DESCRIBE") {
            return Err(self.unsupported("DESCRIBE"));
        } else {
            return Err(self.error("expected SELECT, ASK or CONSTRUCT"));
        };

        if self.at_keyword("FROM") {
            return Err(self.unsupported("FROM"));
        }
        self.eat_keyword("WHERE");
        let where_clause = self.group()?;

        let modifier = self.solution_modifier()?;
        solution_modifier.order = modifier.order;
        solution_modifier.limit = modifier.limit;
        solution_modifier.offset = modifier.offset;

        if self.at_keyword("VALUES") {
            return Err(self.unsupported("VALUES"));
        }
        if self.peek().is_some() {
            return Err(self.error("unexpected trailing input"));
        }

        Ok(SparqlQuery {
            query_type,
            variables,
            where_clause,
            solution_modifier,
            prefixes: self.prefixes,
        })
    }

    fn prologue(&mut self) -> Result<(), SparqlError> {
        loop {
            if self.eat_keyword("PREFIX") {
                let prefix = match self.peek() {
                    Some(Token::PrefixedName(name)) if name.ends_with(':') => name.trim_end_matches(':'),
                    _ => return Err(self.error("expected a prefix declaration")),
                };
                self.pos += 1;
                let namespace = match self.peek() {
                    Some(Token::Iri(iri)) => iri,
                    _ => return Err(self.error("expected a namespace IRI")),
                };
                self.pos += 1;
                self.prefixes.insert(prefix.to_string(), namespace.to_string());
            } else if self.at_keyword("BASE") {
                return Err(self.unsupported("BASE"));
            } else {
                return Ok(());
            }
        }
    }

    fn projection(&mut self) -> Result<Vec<Variable>, SparqlError> {
        if self.eat(Token::Star) {
            return Ok(Vec::new());
        }

        let mut variables = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Variable(name)) => {
                    self.pos += 1;
                    variables.push(Variable::new(name));
                }
                Some(Token::LParen) => return Err(self.unsupported("SELECT expressions")),
                _ => break,
            }
        }

        if variables.is_empty() {
            return Err(self.error("expected projected variables"));
        }
        Ok(variables)
    }

    fn template(&mut self) -> Result<Vec<TriplePattern>, SparqlError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut patterns = Vec::new();
        while !self.eat(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.error("unterminated template"));
            }
            if self.eat(Token::Dot) {
                continue;
            }
            for pattern in self.triples_same_subject()? {
                if !matches!(pattern.predicate, Verb::Variable(_) | Verb::Path(PropertyPath::Predicate(_))) {
                    return Err(self.error("property paths are not allowed in a template"));
                }
                patterns.push(pattern);
            }
        }
        Ok(patterns)
    }

    fn group(&mut self) -> Result<GraphPattern, SparqlError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut elements: Vec<GraphPattern> = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.error("unterminated group")),
                Some(Token::RBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Dot) => self.pos += 1,
                Some(Token::LBrace) => {
                    let first = self.group()?;
                    if self.at_keyword("UNION") {
                        let mut branches = vec![first];
                        while self.eat_keyword("UNION") {
                            branches.push(self.group()?);
                        }
                        elements.push(GraphPattern::Union(branches));
                    } else {
                        elements.push(first);
                    }
                }
                _ if self.eat_keyword("OPTIONAL") => {
                    elements.push(GraphPattern::Optional(Box::new(self.group()?)));
                }
                _ if self.eat_keyword("MINUS") => {
                    elements.push(GraphPattern::Minus(Box::new(self.group()?)));
                }
                _ if self.eat_keyword("FILTER") => {
                    elements.push(GraphPattern::Filter(self.constraint()?));
                }
                _ if self.eat_keyword("BIND") => {
                    self.expect(Token::LParen, "'('")?;
                    let expression = self.expression()?;
                    self.expect_keyword("AS")?;
                    let variable = self.variable()?;
                    self.expect(Token::RParen, "')'")?;
                    elements.push(GraphPattern::Bind(expression, variable));
                }
                _ if self.at_keyword("VALUES") || self.at_keyword("GRAPH") || self.at_keyword("SERVICE") => {
                    return Err(self.unsupported("VALUES, GRAPH and SERVICE patterns"));
                }
                _ => {
                    let patterns = self.triples_same_subject()?;
                    match elements.last_mut() {
                        Some(GraphPattern::Bgp(existing)) => existing.extend(patterns),
                        _ => elements.push(GraphPattern::Bgp(patterns)),
                    }
                }
            }
        }

        Ok(GraphPattern::Group(elements))
    }

    fn triples_same_subject(&mut self) -> Result<Vec<TriplePattern>, SparqlError> {
        let subject = self.term_pattern()?;
        let mut patterns = Vec::new();

        loop {
            let predicate = self.verb()?;
            loop {
                let object = self.term_pattern()?;
                patterns.push(TriplePattern {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });
                if !self.eat(Token::Comma) {
                    break;
                }
            }

            if !self.eat(Token::Semicolon) {
                break;
            }
            while self.eat(Token::Semicolon) {}
            if matches!(self.peek(), None | Some(Token::Dot) | Some(Token::RBrace)) {
                break;
            }
        }

        Ok(patterns)
    }

    fn verb(&mut self) -> Result<Verb, SparqlError> {
        if let Some(Token::Variable(name)) = self.peek() {
            self.pos += 1;
            return Ok(Verb::Variable(Variable::new(name)));
        }
        Ok(Verb::Path(self.path()?))
    }

    fn path(&mut self) -> Result<PropertyPath, SparqlError> {
        let mut alternatives = vec![self.path_sequence()?];
        while self.eat(Token::Pipe) {
            alternatives.push(self.path_sequence()?);
        }
        Ok(if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            PropertyPath::Alternative(alternatives)
        })
    }

    fn path_sequence(&mut self) -> Result<PropertyPath, SparqlError> {
        let mut steps = vec![self.path_element()?];
        while self.eat(Token::Slash) {
            steps.push(self.path_element()?);
        }
        Ok(if steps.len() == 1 {
            steps.remove(0)
        } else {
            PropertyPath::Sequence(steps)
        })
    }

    fn path_element(&mut self) -> Result<PropertyPath, SparqlError> {
        let inverse = self.eat(Token::Caret);

        let primary = match self.peek() {
            Some(Token::Word("a")) => {
                self.pos += 1;
                PropertyPath::Predicate(Iri::new(rdf::TYPE))
            }
            Some(Token::Iri(iri)) => {
                self.pos += 1;
                PropertyPath::Predicate(Iri::new(iri))
            }
            Some(Token::PrefixedName(name)) => {
                let iri = self.resolve(name)?;
                self.pos += 1;
                PropertyPath::Predicate(iri)
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.path()?;
                self.expect(Token::RParen, "')'")?;
                inner
            }
            Some(Token::Bang) => return Err(self.unsupported("negated property sets")),
            _ => return Err(self.error("expected a predicate or property path")),
        };

        let path = match self.peek() {
            Some(Token::Star) => PropertyPath::ZeroOrMore(Box::new(primary)),
            Some(Token::Plus) => PropertyPath::OneOrMore(Box::new(primary)),
            Some(Token::Question) => PropertyPath::ZeroOrOne(Box::new(primary)),
            _ => return Ok(invert(primary, inverse)),
        };
        self.pos += 1;
        Ok(invert(path, inverse))
    }

    fn term_pattern(&mut self) -> Result<TermPattern, SparqlError> {
        match self.peek() {
            Some(Token::Variable(name)) => {
                self.pos += 1;
                Ok(TermPattern::Variable(Variable::new(name)))
            }
            Some(Token::BlankNode(label)) => {
                self.pos += 1;
                Ok(TermPattern::Variable(Variable::new(format!("_:{}", label))))
            }
            Some(Token::LBracket) => Err(self.unsupported("blank node property lists")),
            _ => Ok(TermPattern::Constant(self.constant()?)),
        }
    }

    fn variable(&mut self) -> Result<Variable, SparqlError> {
        match self.peek() {
            Some(Token::Variable(name)) => {
                self.pos += 1;
                Ok(Variable::new(name))
            }
            _ => Err(self.error("expected a variable")),
        }
    }

    fn constant(&mut self) -> Result<Term, SparqlError> {
        match self.peek() {
            Some(Token::Iri(iri)) => {
                self.pos += 1;
                Ok(Term::iri(iri))
            }
            Some(Token::PrefixedName(name)) => {
                let iri = self.resolve(name)?;
                self.pos += 1;
                Ok(Term::Iri(iri))
            }
            Some(Token::StringLiteral(raw)) => {
                self.pos += 1;
                self.string_literal(raw)
            }
            Some(Token::Integer(_) | Token::Decimal(_) | Token::Double(_)) => self.number(false),
            Some(sign @ (Token::Dash | Token::Plus))
                if matches!(
                    self.peek_nth(1),
                    Some(Token::Integer(_) | Token::Decimal(_) | Token::Double(_))
                ) =>
            {
                self.pos += 1;
                self.number(sign == Token::Dash)
            }
            Some(Token::Word(word)) if word == "true" || word == "false" => {
                self.pos += 1;
                Ok(Term::literal(Literal::boolean(word == "true")))
            }
            _ => Err(self.error("expected an RDF term")),
        }
    }

    fn number(&mut self, negative: bool) -> Result<Term, SparqlError> {
        let (lexical, datatype) = match self.peek() {
            Some(Token::Integer(n)) => (n, xsd::INTEGER),
            Some(Token::Decimal(n)) => (n, xsd::DECIMAL),
            Some(Token::Double(n)) => (n, xsd::DOUBLE),
            _ => return Err(self.error("expected a number")),
        };
        self.pos += 1;
        let lexical = if negative {
            format!("-{}", lexical)
        } else {
            lexical.to_string()
        };
        Ok(Term::literal(Literal::typed(lexical, Iri::new(datatype))))
    }

    fn string_literal(&mut self, raw: &str) -> Result<Term, SparqlError> {
        let lexical = unescape(raw).ok_or_else(|| self.error("invalid escape sequence in string"))?;

        if let Some(Token::LangTag(tag)) = self.peek() {
            self.pos += 1;
            return Ok(Term::literal(Literal::lang(lexical, tag)));
        }
        if self.eat(Token::DoubleCaret) {
            let datatype = match self.peek() {
                Some(Token::Iri(iri)) => Iri::new(iri),
                Some(Token::PrefixedName(name)) => self.resolve(name)?,
                _ => return Err(self.error("expected a datatype IRI")),
            };
            self.pos += 1;
            return Ok(Term::literal(Literal::typed(lexical, datatype)));
        }
        Ok(Term::literal(Literal::string(lexical)))
    }

    fn resolve(&self, name: &str) -> Result<Iri, SparqlError> {
        let (prefix, local) = name
            .split_once(':')
            .ok_or_else(|| self.error("malformed prefixed name"))?;
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, local))),
            None => Err(self.error(format!("undeclared prefix {:?}", prefix))),
        }
    }

    /// FILTER argument: a bracketed expression, a function call or EXISTS
    fn constraint(&mut self) -> Result<Expression, SparqlError> {
        match self.peek() {
            Some(Token::LParen) | Some(Token::Word(_)) => self.primary(),
            _ => Err(self.error("expected a filter constraint")),
        }
    }

    fn expression(&mut self) -> Result<Expression, SparqlError> {
        let mut left = self.and_expression()?;
        while self.eat(Token::Or) {
            let right = self.and_expression()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expression(&mut self) -> Result<Expression, SparqlError> {
        let mut left = self.relational()?;
        while self.eat(Token::And) {
            let right = self.relational()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expression, SparqlError> {
        let left = self.additive()?;

        let operator: Option<fn(Box<Expression>, Box<Expression>) -> Expression> = match self.peek() {
            Some(Token::Equals) => Some(Expression::Equal),
            Some(Token::NotEquals) => Some(Expression::NotEqual),
            Some(Token::LessThan) => Some(Expression::LessThan),
            Some(Token::LessEqual) => Some(Expression::LessThanOrEqual),
            Some(Token::GreaterThan) => Some(Expression::GreaterThan),
            Some(Token::GreaterEqual) => Some(Expression::GreaterThanOrEqual),
            _ => None,
        };
        if let Some(operator) = operator {
            self.pos += 1;
            let right = self.additive()?;
            return Ok(operator(Box::new(left), Box::new(right)));
        }

        if self.eat_keyword("IN") {
            return Ok(Expression::In(Box::new(left), self.expression_list()?));
        }
        if self.at_keyword("NOT") && matches!(self.peek_nth(1), Some(Token::Word(word)) if word.eq_ignore_ascii_case("IN"))
        {
            self.pos += 2;
            return Ok(Expression::NotIn(Box::new(left), self.expression_list()?));
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expression, SparqlError> {
        let mut left = self.multiplicative()?;
        loop {
            if self.eat(Token::Plus) {
                left = Expression::Add(Box::new(left), Box::new(self.multiplicative()?));
            } else if self.eat(Token::Dash) {
                left = Expression::Subtract(Box::new(left), Box::new(self.multiplicative()?));
            } else {
                return Ok(left);
            }
        }
    }

    fn multiplicative(&mut self) -> Result<Expression, SparqlError> {
        let mut left = self.unary()?;
        loop {
            if self.eat(Token::Star) {
                left = Expression::Multiply(Box::new(left), Box::new(self.unary()?));
            } else if self.eat(Token::Slash) {
                left = Expression::Divide(Box::new(left), Box::new(self.unary()?));
            } else {
                return Ok(left);
            }
        }
    }

    fn unary(&mut self) -> Result<Expression, SparqlError> {
        if self.eat(Token::Bang) {
            return Ok(Expression::Not(Box::new(self.unary()?)));
        }
        if self.eat(Token::Dash) {
            return Ok(Expression::Negate(Box::new(self.unary()?)));
        }
        if self.eat(Token::Plus) {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expression, SparqlError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.pos += 1;
                let expression = self.expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expression)
            }
            Some(Token::Variable(name)) => {
                self.pos += 1;
                Ok(Expression::Variable(Variable::new(name)))
            }
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("EXISTS") => {
                self.pos += 1;
                Ok(Expression::Exists(Box::new(self.group()?)))
            }
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("NOT") => {
                self.pos += 1;
                self.expect_keyword("EXISTS")?;
                Ok(Expression::NotExists(Box::new(self.group()?)))
            }
            Some(Token::Word(word)) if word != "true" && word != "false" => self.function_call(word),
            Some(Token::Iri(_) | Token::PrefixedName(_)) if self.peek_nth(1) == Some(Token::LParen) => {
                Err(self.unsupported("casts and extension functions"))
            }
            _ => Ok(Expression::Constant(self.constant()?)),
        }
    }

    fn function_call(&mut self, name: &str) -> Result<Expression, SparqlError> {
        let function = match Function::from_name(name) {
            Some(function) => function,
            None if is_aggregate(name) => return Err(self.unsupported("aggregates")),
            None => return Err(self.error(format!("unknown function {}", name))),
        };
        self.pos += 1;

        let arguments = self.expression_list()?;
        if !function.arity().contains(&arguments.len()) {
            return Err(self.error(format!("wrong number of arguments to {}", name)));
        }
        if function == Function::Bound && !matches!(arguments.first(), Some(Expression::Variable(_))) {
            return Err(self.error("BOUND expects a variable"));
        }
        Ok(Expression::Call(function, arguments))
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>, SparqlError> {
        self.expect(Token::LParen, "'('")?;
        let mut list = Vec::new();
        if self.eat(Token::RParen) {
            return Ok(list);
        }
        loop {
            list.push(self.expression()?);
            if self.eat(Token::RParen) {
                return Ok(list);
            }
            self.expect(Token::Comma, "',' or ')'")?;
        }
    }

    fn solution_modifier(&mut self) -> Result<SolutionModifier, SparqlError> {
        let mut modifier = SolutionModifier::default();

        if self.at_keyword("GROUP") || self.at_keyword("HAVING") {
            return Err(self.unsupported("GROUP BY and HAVING"));
        }

        if self.eat_keyword("ORDER") {
            self.expect_keyword("BY")?;
            loop {
                let condition = if self.eat_keyword("ASC") {
                    OrderCondition::Asc(self.primary()?)
                } else if self.eat_keyword("DESC") {
                    OrderCondition::Desc(self.primary()?)
                } else {
                    match self.peek() {
                        Some(Token::Variable(_)) | Some(Token::LParen) => OrderCondition::Asc(self.primary()?),
                        Some(Token::Word(word)) if Function::from_name(word).is_some() => {
                            OrderCondition::Asc(self.primary()?)
                        }
                        _ => break,
                    }
                };
                modifier.order.push(condition);
            }
            if modifier.order.is_empty() {
                return Err(self.error("expected an order condition"));
            }
        }

        loop {
            if self.eat_keyword("LIMIT") {
                modifier.limit = Some(self.count()?);
            } else if self.eat_keyword("OFFSET") {
                modifier.offset = Some(self.count()?);
            } else {
                return Ok(modifier);
            }
        }
    }

    fn count(&mut self) -> Result<usize, SparqlError> {
        let value = match self.peek() {
            Some(Token::Integer(n)) => n.parse::<usize>().ok(),
            _ => None,
        };
        match value {
            Some(value) => {
                self.pos += 1;
                Ok(value)
            }
            None => Err(self.error("expected a non-negative integer")),
        }
    }
}

fn invert(path: PropertyPath, inverse: bool) -> PropertyPath {
    if inverse {
        PropertyPath::Inverse(Box::new(path))
    } else {
        path
    }
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            _ => return None,
        });
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        Token::lexer(source).map(|token| token.unwrap()).collect()
    }

    #[test]
    fn test_lexer_separates_names_and_punctuation() {
        assert_eq!(
            tokens("$this ex:a ?b . 2.5 ex:"),
            vec![
                Token::Variable("this"),
                Token::PrefixedName("ex:a"),
                Token::Variable("b"),
                Token::Dot,
                Token::Decimal("2.5"),
                Token::PrefixedName("ex:"),
            ]
        );
    }

    #[test]
    fn test_lexer_operators_and_iris() {
        assert_eq!(
            tokens("?a <= ?b && <http://x/y> != \"s\"@en-GB # trailing comment"),
            vec![
                Token::Variable("a"),
                Token::LessEqual,
                Token::Variable("b"),
                Token::And,
                Token::Iri("http://x/y"),
                Token::NotEquals,
                Token::StringLiteral("s"),
                Token::LangTag("en-GB"),
            ]
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b\n"#).as_deref(), Some("a\"b\n"));
        assert_eq!(unescape(r"\q"), None);
    }
}
