//! In-memory RDF graphs for Getty documents and ontologies.
//!
//! Documents are small (one entity plus its notes and revisions), so a graph
//! is a flat triple list in document order with two position indexes: by
//! subject for `(s, p, ?)` lookups from the mapper and by predicate for the
//! `rdf:type` and `rdfs:subClassOf` scans. Parsing is delegated to `oxrdfio`.

use std::collections::HashMap;

use oxrdf::{NamedOrBlankNode, Term};
use oxrdfio::{RdfFormat, RdfParser};
use tracing::debug;

use crate::error::{GettyError, Result};

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Media type sent in `Accept` headers; vocab.getty.edu serves RDF/XML.
pub const RDF_XML_MIME: &str = "application/rdf+xml";

/// Suffix of Getty RDF/XML document URLs.
pub const RDF_XML_EXTENSION: &str = "rdf";

/// A subject or object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// A named resource.
    Iri(String),
    /// A document-local blank node label.
    Blank(String),
    /// A literal. `datatype` is only kept for non-string, untagged literals.
    Literal {
        /// Lexical form.
        value: String,
        /// Language tag as written in the document.
        language: Option<String>,
        /// Datatype IRI.
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// A named resource.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// A blank node.
    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// An untagged string literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal.
    #[must_use]
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Returns true for literals.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// The IRI of a named resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Blank(_) | Self::Literal { .. } => None,
        }
    }

    /// The IRI, blank node label or literal value.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Self::Iri(s) | Self::Blank(s) | Self::Literal { value: s, .. } => s,
        }
    }

    /// The language tag of a tagged literal.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        if let Self::Literal { language, .. } = self {
            language.as_deref()
        } else {
            None
        }
    }
}

impl From<&NamedOrBlankNode> for RdfNode {
    fn from(node: &NamedOrBlankNode) -> Self {
        match node {
            NamedOrBlankNode::NamedNode(n) => Self::iri(n.as_str()),
            NamedOrBlankNode::BlankNode(b) => Self::blank(b.as_str()),
        }
    }
}

impl TryFrom<&Term> for RdfNode {
    type Error = GettyError;

    fn try_from(term: &Term) -> Result<Self> {
        match term {
            Term::NamedNode(n) => Ok(Self::iri(n.as_str())),
            Term::BlankNode(b) => Ok(Self::blank(b.as_str())),
            Term::Literal(literal) => {
                let language = literal.language().map(str::to_string);
                let datatype = literal.datatype().as_str();
                Ok(Self::Literal {
                    value: literal.value().to_string(),
                    datatype: (language.is_none() && datatype != XSD_STRING)
                        .then(|| datatype.to_string()),
                    language,
                })
            },
            #[allow(unreachable_patterns)]
            other => Err(GettyError::MalformedData(format!(
                "unsupported RDF term: {other}"
            ))),
        }
    }
}

/// One statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfTriple {
    /// Subject.
    pub subject: RdfNode,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: RdfNode,
}

/// Triples in document order, indexed by subject and predicate.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    triples: Vec<RdfTriple>,
    by_subject: HashMap<RdfNode, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
}

impl RdfGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole RDF/XML document.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::MalformedData`] on the first syntax error.
    pub fn parse(input: &str) -> Result<Self> {
        let mut graph = Self::new();
        for quad in RdfParser::from_format(RdfFormat::RdfXml).for_reader(input.as_bytes()) {
            let quad = quad.map_err(|e| GettyError::MalformedData(format!("RDF/XML: {e}")))?;
            let object = RdfNode::try_from(&quad.object)?;
            graph.insert(
                RdfNode::from(&quad.subject),
                quad.predicate.as_str(),
                object,
            );
        }
        debug!(triples = graph.len(), "parsed RDF document");
        Ok(graph)
    }

    /// Appends a statement.
    pub fn insert(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) {
        let position = self.triples.len();
        let predicate = predicate.into();
        self.by_subject
            .entry(subject.clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(predicate.clone())
            .or_default()
            .push(position);
        self.triples.push(RdfTriple {
            subject,
            predicate,
            object,
        });
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if the graph has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Statements using `predicate`, in document order.
    pub fn triples_with_predicate<'a>(
        &'a self,
        predicate: &str,
    ) -> impl Iterator<Item = &'a RdfTriple> + 'a {
        self.positions(self.by_predicate.get(predicate).map(Vec::as_slice))
    }

    /// Objects of `(subject, predicate, ?)`, in document order.
    pub fn objects<'a, 'p>(
        &'a self,
        subject: &RdfNode,
        predicate: &'p str,
    ) -> impl Iterator<Item = &'a RdfNode> + 'p
    where
        'a: 'p,
    {
        self.positions(self.by_subject.get(subject).map(Vec::as_slice))
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    fn positions<'a>(
        &'a self,
        positions: Option<&'a [usize]>,
    ) -> impl Iterator<Item = &'a RdfTriple> + 'a {
        positions
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.triples[i])
    }
}
