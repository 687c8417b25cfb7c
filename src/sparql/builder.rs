//! A small structured SPARQL `SELECT` builder.
//!
//! Queries are assembled from typed clauses and rendered once by
//! [`fmt::Display`]. Every value coming from a caller enters through a
//! validating constructor: IRIs are checked by `oxrdf`, prefixed-name local
//! parts must be plain identifiers, and literals are escaped. Nothing is
//! spliced into query text unchecked.

use std::fmt;

use lazy_static::lazy_static;
use oxrdf::NamedNode;
use regex::Regex;

use crate::error::{GettyError, Result};

lazy_static! {
    static ref LOCAL_NAME: Regex = Regex::new(r"^[A-Za-z0-9_-]*$").expect("valid regex");
    static ref PREFIX_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid regex");
}

/// Returns true if `value` can be used as the local part of a prefixed name.
#[must_use]
pub fn is_local_name(value: &str) -> bool {
    LOCAL_NAME.is_match(value)
}

/// A term in a triple pattern, a `VALUES` row or a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `?name`
    Var(String),
    /// `<iri>`
    Iri(String),
    /// `prefix:local`
    Prefixed {
        /// Declared prefix.
        prefix: String,
        /// Local part, possibly empty.
        local: String,
    },
    /// `"escaped"`
    Literal(String),
}

impl Term {
    /// A variable. Names are chosen by this crate, never by callers.
    #[must_use]
    pub fn var(name: &str) -> Self {
        Self::Var(name.to_string())
    }

    /// An absolute IRI.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::InvalidArgument`] if `iri` is not a valid IRI.
    pub fn iri(iri: &str) -> Result<Self> {
        NamedNode::new(iri)
            .map(|node| Self::Iri(node.into_string()))
            .map_err(|e| GettyError::InvalidArgument(format!("invalid IRI '{iri}': {e}")))
    }

    /// A prefixed name such as `aat:300007466` or `aat:`.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::InvalidArgument`] if either part contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn prefixed(prefix: &str, local: &str) -> Result<Self> {
        if !PREFIX_NAME.is_match(prefix) {
            return Err(GettyError::InvalidArgument(format!(
                "invalid prefix '{prefix}'"
            )));
        }
        if !is_local_name(local) {
            return Err(GettyError::InvalidArgument(format!(
                "invalid identifier '{local}'"
            )));
        }
        Ok(Self::Prefixed {
            prefix: prefix.to_string(),
            local: local.to_string(),
        })
    }

    /// A string literal.
    #[must_use]
    pub fn literal(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "?{name}"),
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Prefixed { prefix, local } => write!(f, "{prefix}:{local}"),
            Self::Literal(value) => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            },
        }
    }
}

/// `subject predicate object`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject term.
    pub subject: Term,
    /// Predicate term.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl TriplePattern {
    /// Creates a triple pattern.
    #[must_use]
    pub const fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// A boolean filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `(a = b)`
    Equals(Term, Term),
    /// `(e1 || e2 || ...)`
    Or(Vec<Expression>),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(a, b) => write!(f, "({a} = {b})"),
            Self::Or(operands) => {
                f.write_str("(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" || ")?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            },
        }
    }
}

/// An element of a group graph pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A basic triple pattern.
    Triple(TriplePattern),
    /// `OPTIONAL { ... }`
    Optional(Vec<Pattern>),
    /// `{ ... } UNION { ... }`
    Union(Vec<Vec<Pattern>>),
    /// `VALUES ?var { ... }`
    Values {
        /// Bound variable name.
        var: String,
        /// Allowed values.
        values: Vec<Term>,
    },
    /// `FILTER(...)`
    Filter(Expression),
}

impl Pattern {
    /// Shorthand for [`Pattern::Triple`].
    #[must_use]
    pub const fn triple(subject: Term, predicate: Term, object: Term) -> Self {
        Self::Triple(TriplePattern::new(subject, predicate, object))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            Self::Triple(t) => writeln!(f, "{pad}{} {} {} .", t.subject, t.predicate, t.object),
            Self::Optional(patterns) => {
                writeln!(f, "{pad}OPTIONAL {{")?;
                render_group(f, patterns, indent + 1)?;
                writeln!(f, "{pad}}}")
            },
            Self::Union(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        writeln!(f, "{pad}UNION")?;
                    }
                    writeln!(f, "{pad}{{")?;
                    render_group(f, branch, indent + 1)?;
                    writeln!(f, "{pad}}}")?;
                }
                Ok(())
            },
            Self::Values { var, values } => {
                write!(f, "{pad}VALUES ?{var} {{")?;
                for value in values {
                    write!(f, " {value}")?;
                }
                writeln!(f, " }}")
            },
            Self::Filter(expr) => writeln!(f, "{pad}FILTER{expr}"),
        }
    }
}

fn render_group(f: &mut fmt::Formatter<'_>, patterns: &[Pattern], indent: usize) -> fmt::Result {
    patterns.iter().try_for_each(|p| p.render(f, indent))
}

/// One entry of the `SELECT` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `?name`
    Var(String),
    /// `(lang(?of) AS ?alias)`
    Lang {
        /// Variable whose language tag is projected.
        of: String,
        /// Result variable name.
        alias: String,
    },
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "?{name}"),
            Self::Lang { of, alias } => write!(f, "(lang(?{of}) AS ?{alias})"),
        }
    }
}

/// A complete `SELECT` query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    prefixes: Vec<(String, String)>,
    distinct: bool,
    projection: Vec<Projection>,
    patterns: Vec<Pattern>,
}

impl SelectQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `PREFIX name: <iri>`.
    #[must_use]
    pub fn prefix(mut self, name: &str, iri: &str) -> Self {
        self.prefixes.push((name.to_string(), iri.to_string()));
        self
    }

    /// Makes the query `SELECT DISTINCT`.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a projected variable.
    #[must_use]
    pub fn select(mut self, var: &str) -> Self {
        self.projection.push(Projection::Var(var.to_string()));
        self
    }

    /// Adds `(lang(?of) AS ?alias)` to the projection.
    #[must_use]
    pub fn select_lang(mut self, of: &str, alias: &str) -> Self {
        self.projection.push(Projection::Lang {
            of: of.to_string(),
            alias: alias.to_string(),
        });
        self
    }

    /// Appends a pattern to the `WHERE` group.
    #[must_use]
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Appends several patterns to the `WHERE` group.
    #[must_use]
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// Appends a `FILTER`.
    #[must_use]
    pub fn filter(self, expr: Expression) -> Self {
        self.pattern(Pattern::Filter(expr))
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, iri) in &self.prefixes {
            writeln!(f, "PREFIX {name}: <{iri}>")?;
        }
        f.write_str("SELECT")?;
        if self.distinct {
            f.write_str(" DISTINCT")?;
        }
        if self.projection.is_empty() {
            f.write_str(" *")?;
        }
        for projection in &self.projection {
            write!(f, " {projection}")?;
        }
        writeln!(f, " WHERE {{")?;
        render_group(f, &self.patterns, 1)?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escaping() {
        let term = Term::literal("say \"hi\"\\ now\n");
        assert_eq!(term.to_string(), r#""say \"hi\"\\ now\n""#);
    }

    #[test]
    fn test_iri_validation() {
        assert_eq!(
            Term::iri("http://vocab.getty.edu/aat/300007466")
                .unwrap()
                .to_string(),
            "<http://vocab.getty.edu/aat/300007466>"
        );
        assert!(Term::iri("http://x.org/a> } DROP ALL {").is_err());
        assert!(Term::iri("not an iri").is_err());
    }

    #[test]
    fn test_prefixed_validation() {
        assert_eq!(Term::prefixed("aat", "").unwrap().to_string(), "aat:");
        assert_eq!(
            Term::prefixed("aat", "300007466").unwrap().to_string(),
            "aat:300007466"
        );
        assert!(Term::prefixed("aat", "1 . ?s ?p ?o").is_err());
        assert!(Term::prefixed("a at", "1").is_err());
    }

    #[test]
    fn test_render_select() {
        let query = SelectQuery::new()
            .prefix("skos", "http://www.w3.org/2004/02/skos/core#")
            .distinct()
            .select("Subject")
            .select_lang("Term", "Lang")
            .pattern(Pattern::triple(
                Term::var("Subject"),
                Term::prefixed("skos", "prefLabel").unwrap(),
                Term::var("Term"),
            ))
            .pattern(Pattern::Optional(vec![Pattern::triple(
                Term::var("Subject"),
                Term::prefixed("skos", "note").unwrap(),
                Term::var("Note"),
            )]))
            .filter(Expression::Or(vec![
                Expression::Equals(Term::var("Term"), Term::literal("a")),
                Expression::Equals(Term::var("Term"), Term::literal("b")),
            ]));

        let expected = "PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
SELECT DISTINCT ?Subject (lang(?Term) AS ?Lang) WHERE {
  ?Subject skos:prefLabel ?Term .
  OPTIONAL {
    ?Subject skos:note ?Note .
  }
  FILTER((?Term = \"a\") || (?Term = \"b\"))
}";
        assert_eq!(query.to_string(), expected);
    }

    #[test]
    fn test_render_union_and_values() {
        let query = SelectQuery::new().select("Id").pattern(Pattern::Union(vec![
            vec![Pattern::triple(
                Term::var("S"),
                Term::prefixed("dc", "identifier").unwrap(),
                Term::var("Id"),
            )],
            vec![Pattern::Values {
                var: "Id".into(),
                values: vec![Term::literal("1")],
            }],
        ]));
        let text = query.to_string();
        assert!(text.contains("  {\n    ?S dc:identifier ?Id .\n  }\n  UNION\n  {\n"));
        assert!(text.contains("VALUES ?Id { \"1\" }"));
    }
}
