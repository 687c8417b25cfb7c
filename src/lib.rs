#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # getty-skos
//!
//! A SKOS vocabulary provider for the Getty Vocabularies: the Art &
//! Architecture Thesaurus (AAT), the Thesaurus of Geographic Names (TGN) and
//! the Union List of Artist Names (ULAN), as published at
//! <http://vocab.getty.edu/>.
//!
//! ## Quick Start
//!
//! ### Looking up a concept
//!
//! ```ignore
//! use getty_skos::{GettyProvider, VocabularyProvider};
//!
//! # fn main() -> getty_skos::Result<()> {
//! let aat = GettyProvider::aat()?;
//! if let Some(churches) = aat.get_by_id("300007466", false)? {
//!     let concept = churches.as_concept().unwrap();
//!     println!("{} broader: {:?}", concept.uri, concept.broader);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Searching
//!
//! ```ignore
//! use getty_skos::{FindQuery, GettyProvider, QueryOptions, SortKey, SortOrder, VocabularyProvider};
//!
//! # fn main() -> getty_skos::Result<()> {
//! let tgn = GettyProvider::tgn()?;
//! let query = FindQuery::from_json(&serde_json::json!({"label": "Brugge", "type": "concept"}))?;
//! let options = QueryOptions::new()
//!     .with_language("nl")
//!     .sorted_by(SortKey::Label, SortOrder::Asc);
//! for record in tgn.find(&query, &options)? {
//!     println!("{} {} ({})", record.id, record.label, record.lang);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`provider`]: the [`VocabularyProvider`] trait and [`GettyProvider`]
//! - [`mapper`]: RDF graph to [`Concept`] / [`Collection`] mapping
//! - [`subclasses`]: discovery of Getty classes that count as concepts or collections
//! - [`sparql`]: query builder, queries, endpoint, results and ranking
//! - [`query`]: search queries, options and result records
//! - [`scheme`]: concept scheme resolution
//! - [`skos`]: the SKOS domain model
//! - [`rdf`]: in-memory RDF graphs parsed with `oxrdfio`
//! - [`http`]: the [`HttpFetch`] seam and its `reqwest` implementation
//! - [`config`]: provider configuration
//! - [`language`]: language tag handling
//! - [`namespaces`]: RDF namespace constants
//! - [`error`]: error types
//!
//! ## Logging
//!
//! The crate emits `tracing` events (requests and queries at DEBUG, degraded
//! data at WARN) and never installs a subscriber itself.

pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod mapper;
pub mod namespaces;
pub mod provider;
pub mod query;
pub mod rdf;
pub mod scheme;
pub mod skos;
pub mod sparql;
pub mod subclasses;

pub use config::{ProviderConfig, Vocabulary};
pub use error::{GettyError, Result};
pub use http::{FetchResponse, HttpFetch, ReqwestFetcher};
pub use mapper::{uri_to_id, GraphMapper, SuperordinateSource};
pub use provider::{GettyProvider, GettyProviderBuilder, VocabularyProvider};
pub use query::{
    CollectionDepth, CollectionFilter, FindQuery, MatchFilter, QueryOptions, ResultRecord,
    ResultType, SortKey, SortOrder, TypeFilter,
};
pub use rdf::{RdfGraph, RdfNode, RdfTriple};
pub use scheme::conceptscheme_from_uri;
pub use skos::{
    Collection, Concept, ConceptScheme, Label, LabelType, MatchType, Note, NoteType, Thing,
};
pub use subclasses::{HttpOntologySource, OntologySource, SubclassCollector, SubclassSets};
