//! The SPARQL queries a provider sends to the Getty endpoint.
//!
//! Display queries (find, top-level, children) share one shape: every
//! candidate `?Subject` with its `?Type`, `?Id` and optional preferred-label
//! `?Term`, one row per label language. The bindings are reduced afterwards
//! by [`super::ranking`].

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::namespaces::{gvp, skos, DC, GVP, ISO_THES, LUC, RDF, SKOS, SKOSXL};
use crate::query::{CollectionDepth, FindQuery, TypeFilter};

use super::builder::{Expression, Pattern, SelectQuery, Term};

/// Result variable names shared by the display queries.
pub mod vars {
    /// Entity IRI.
    pub const SUBJECT: &str = "Subject";
    /// Entity identifier (`dc:identifier`).
    pub const ID: &str = "Id";
    /// `skos:Concept` or `skos:Collection`.
    pub const TYPE: &str = "Type";
    /// Preferred label literal.
    pub const TERM: &str = "Term";
    /// Language of `Term`.
    pub const LANG: &str = "Lang";
    /// Intermediate SKOS-XL label resource.
    pub const PREF_LABEL: &str = "PrefLabel";
}

/// Which entities the top-level query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevel {
    /// Top-level concepts only.
    Concepts,
    /// Top-level concepts and collections.
    All,
}

fn base_query(config: &ProviderConfig) -> SelectQuery {
    SelectQuery::new()
        .prefix("rdf", RDF)
        .prefix("skos", SKOS)
        .prefix("skosxl", SKOSXL)
        .prefix("xl", SKOSXL)
        .prefix("dc", DC)
        .prefix("gvp", GVP)
        .prefix("luc", LUC)
        .prefix("iso", ISO_THES)
        .prefix(config.vocab_id(), &config.scheme_uri())
}

fn rdf_type() -> Result<Term> {
    Term::prefixed("rdf", "type")
}

fn scheme_term(config: &ProviderConfig) -> Result<Term> {
    Term::prefixed(config.vocab_id(), "")
}

fn entity_term(config: &ProviderConfig, id: &str) -> Result<Term> {
    Term::prefixed(config.vocab_id(), id)
}

/// `FILTER` on `?Type` for the requested entity kinds.
fn type_filter(filter: TypeFilter) -> Result<Expression> {
    let is = |local: &str| -> Result<Expression> {
        Ok(Expression::Equals(
            Term::var(vars::TYPE),
            Term::prefixed("skos", local)?,
        ))
    };
    Ok(match filter {
        TypeFilter::Concept => is("Concept")?,
        TypeFilter::Collection => is("Collection")?,
        TypeFilter::All => Expression::Or(vec![is("Concept")?, is("Collection")?]),
    })
}

/// The common display query: `extra` patterns narrow the candidate subjects.
fn display_query(
    config: &ProviderConfig,
    extra: Vec<Pattern>,
    filter: TypeFilter,
) -> Result<SelectQuery> {
    let subject = || Term::var(vars::SUBJECT);
    Ok(base_query(config)
        .select(vars::SUBJECT)
        .select(vars::ID)
        .select(vars::TYPE)
        .select(vars::TERM)
        .select_lang(vars::TERM, vars::LANG)
        .pattern(Pattern::triple(subject(), rdf_type()?, Term::var(vars::TYPE)))
        .pattern(Pattern::triple(
            subject(),
            Term::prefixed("dc", "identifier")?,
            Term::var(vars::ID),
        ))
        .pattern(Pattern::triple(
            subject(),
            Term::prefixed("skos", skos::IN_SCHEME)?,
            scheme_term(config)?,
        ))
        .patterns(extra)
        .pattern(Pattern::Optional(vec![
            Pattern::triple(
                subject(),
                Term::prefixed("xl", skos::PREF_LABEL)?,
                Term::var(vars::PREF_LABEL),
            ),
            Pattern::triple(
                Term::var(vars::PREF_LABEL),
                Term::prefixed("skosxl", "literalForm")?,
                Term::var(vars::TERM),
            ),
        ]))
        .filter(type_filter(filter)?))
}

/// Builds the search query for `query`.
///
/// Keywords are AND-ed into one Lucene expression. A collection filter follows
/// `gvp:broader` for direct members or `gvp:broaderExtended` for the whole
/// subtree; a match filter follows `skos:mappingRelation` or the requested
/// `skos:<kind>Match`.
///
/// # Errors
///
/// Returns [`crate::GettyError::InvalidArgument`] if the collection id or
/// match URI cannot be expressed safely.
pub fn find(config: &ProviderConfig, query: &FindQuery) -> Result<SelectQuery> {
    let subject = || Term::var(vars::SUBJECT);
    let mut extra = Vec::new();

    let keywords = query.keywords();
    if !keywords.is_empty() {
        extra.push(Pattern::triple(
            subject(),
            Term::prefixed("luc", "term")?,
            Term::literal(&keywords.join(" AND ")),
        ));
    }

    if let Some(collection) = &query.collection {
        let relation = match collection.depth {
            CollectionDepth::Members => gvp::BROADER,
            CollectionDepth::All => gvp::BROADER_EXTENDED,
        };
        extra.push(Pattern::triple(
            subject(),
            Term::prefixed("gvp", relation)?,
            entity_term(config, &collection.id)?,
        ));
    }

    if let Some(matches) = &query.matches {
        let predicate = match matches.match_type {
            Some(kind) => kind.property(),
            None => skos::MAPPING_RELATION.to_string(),
        };
        extra.push(Pattern::triple(
            subject(),
            Term::prefixed("skos", &predicate)?,
            Term::iri(&matches.uri)?,
        ));
    }

    display_query(config, extra, query.type_filter)
}

/// Builds the query for the vocabulary's top-level facets.
///
/// # Errors
///
/// Only fails if the configuration holds an unusable vocabulary prefix.
pub fn top_level(config: &ProviderConfig, which: TopLevel) -> Result<SelectQuery> {
    let facet = Pattern::triple(
        Term::var(vars::SUBJECT),
        rdf_type()?,
        Term::prefixed("gvp", gvp::FACET)?,
    );
    let filter = match which {
        TopLevel::Concepts => TypeFilter::Concept,
        TopLevel::All => TypeFilter::All,
    };
    display_query(config, vec![facet], filter)
}

/// Builds the query for the direct children (`gvp:broader`) of `id`.
///
/// # Errors
///
/// Returns [`crate::GettyError::InvalidArgument`] if `id` is not a plain identifier.
pub fn children(config: &ProviderConfig, id: &str) -> Result<SelectQuery> {
    let broader = Pattern::triple(
        Term::var(vars::SUBJECT),
        Term::prefixed("gvp", gvp::BROADER)?,
        entity_term(config, id)?,
    );
    display_query(config, vec![broader], TypeFilter::All)
}

/// Builds the expansion query for `id`: every entity with `id` among its
/// extended broader terms, plus `id` itself when it is a concept.
///
/// # Errors
///
/// Returns [`crate::GettyError::InvalidArgument`] if `id` is not a plain identifier.
pub fn expand(config: &ProviderConfig, id: &str) -> Result<SelectQuery> {
    let subject = || Term::var(vars::SUBJECT);
    let identified = || -> Result<Pattern> {
        Ok(Pattern::triple(
            subject(),
            Term::prefixed("dc", "identifier")?,
            Term::var(vars::ID),
        ))
    };
    let in_scheme = || -> Result<Pattern> {
        Ok(Pattern::triple(
            subject(),
            Term::prefixed("skos", skos::IN_SCHEME)?,
            scheme_term(config)?,
        ))
    };

    let descendants = vec![
        identified()?,
        in_scheme()?,
        Pattern::triple(
            subject(),
            Term::prefixed("gvp", gvp::BROADER_EXTENDED)?,
            entity_term(config, id)?,
        ),
    ];
    let itself = vec![
        Pattern::Values {
            var: vars::ID.to_string(),
            values: vec![Term::literal(id)],
        },
        identified()?,
        in_scheme()?,
        Pattern::triple(subject(), rdf_type()?, Term::prefixed("skos", "Concept")?),
    ];

    Ok(base_query(config)
        .distinct()
        .select(vars::ID)
        .pattern(Pattern::Union(vec![descendants, itself])))
}

/// Builds the query for the subjects that list `uri` as a subordinate array.
///
/// # Errors
///
/// Returns [`crate::GettyError::InvalidArgument`] if `uri` is not a valid IRI.
pub fn superordinates(config: &ProviderConfig, uri: &str) -> Result<SelectQuery> {
    Ok(base_query(config).select(vars::SUBJECT).pattern(Pattern::triple(
        Term::var(vars::SUBJECT),
        Term::prefixed("iso", "subordinateArray")?,
        Term::iri(uri)?,
    )))
}
