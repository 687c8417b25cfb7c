//! The vocabulary provider façade.
//!
//! [`GettyProvider`] serves one Getty vocabulary. Lookups fetch the entity's
//! RDF/XML document and map it with [`GraphMapper`]; searches and hierarchy
//! listings go through the SPARQL endpoint and are ranked by language.
//!
//! # Examples
//!
//! ```ignore
//! use getty_skos::{FindQuery, GettyProvider, QueryOptions, TypeFilter, VocabularyProvider};
//!
//! let aat = GettyProvider::aat()?;
//! let churches = aat.get_by_id("300007466", false)?.expect("known concept");
//! println!("{}", churches.label("nl").map_or("", |l| l.label.as_str()));
//!
//! let query = FindQuery::new().with_label("church").with_type(TypeFilter::Concept);
//! for record in aat.find(&query, &QueryOptions::new().with_language("en"))? {
//!     println!("{} {}", record.id, record.label);
//! }
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::{authority, ProviderConfig, Vocabulary};
use crate::error::{GettyError, Result};
use crate::http::{FetchResponse, HttpFetch, ReqwestFetcher};
use crate::mapper::{uri_to_id, GraphMapper};
use crate::namespaces::skos;
use crate::query::{FindQuery, QueryOptions, ResultRecord};
use crate::rdf::{RdfGraph, RDF_XML_MIME};
use crate::scheme::conceptscheme_from_uri;
use crate::skos::{ConceptScheme, Thing};
use crate::sparql::builder::{is_local_name, SelectQuery};
use crate::sparql::queries::{self, vars, TopLevel};
use crate::sparql::{ranking, SparqlEndpoint};
use crate::subclasses::SubclassCollector;

/// Operations a SKOS vocabulary provider offers.
pub trait VocabularyProvider {
    /// Returns the scheme every entity of this provider belongs to.
    ///
    /// # Errors
    ///
    /// Fails if the scheme document cannot be fetched or parsed.
    fn concept_scheme(&self) -> Result<Arc<ConceptScheme>>;

    /// Looks up a concept or collection by id; `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the service is unavailable or answers with unusable data.
    fn get_by_id(&self, id: &str, include_change_notes: bool) -> Result<Option<Thing>>;

    /// Looks up a concept or collection by URI; `Ok(None)` for unknown or foreign URIs.
    ///
    /// # Errors
    ///
    /// Fails if the service is unavailable or answers with unusable data.
    fn get_by_uri(&self, uri: &str, include_change_notes: bool) -> Result<Option<Thing>>;

    /// Searches the vocabulary.
    ///
    /// # Errors
    ///
    /// Fails if the query cannot be expressed or the service is unavailable.
    fn find(&self, query: &FindQuery, options: &QueryOptions) -> Result<Vec<ResultRecord>>;

    /// Returns the ids of `id` (if it is a concept) and everything below it,
    /// or `Ok(None)` if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the service is unavailable.
    fn expand(&self, id: &str) -> Result<Option<Vec<String>>>;

    /// Returns the top-level concepts.
    ///
    /// # Errors
    ///
    /// Fails if the service is unavailable.
    fn get_top_concepts(&self, options: &QueryOptions) -> Result<Vec<ResultRecord>>;

    /// Returns the top-level concepts and collections.
    ///
    /// # Errors
    ///
    /// Fails if the service is unavailable.
    fn get_top_display(&self, options: &QueryOptions) -> Result<Vec<ResultRecord>>;

    /// Returns what should be displayed directly under `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not a plain identifier or the service is unavailable.
    fn get_children_display(&self, id: &str, options: &QueryOptions) -> Result<Vec<ResultRecord>>;

    /// Lists every entity of the vocabulary.
    ///
    /// # Errors
    ///
    /// Providers over very large vocabularies return [`GettyError::Unsupported`].
    fn get_all(&self, options: &QueryOptions) -> Result<Vec<ResultRecord>>;
}

/// A provider for one Getty vocabulary.
#[derive(Debug)]
pub struct GettyProvider {
    config: ProviderConfig,
    fetcher: Arc<dyn HttpFetch>,
    subclasses: Arc<SubclassCollector>,
    sparql: SparqlEndpoint,
    scheme: RwLock<Option<Arc<ConceptScheme>>>,
}

impl GettyProvider {
    /// Creates a provider with a `reqwest` client and a GVP subclass collector.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Starts a builder for injecting a fetcher or subclass collector.
    #[must_use]
    pub fn builder(config: ProviderConfig) -> GettyProviderBuilder {
        GettyProviderBuilder {
            config,
            fetcher: None,
            subclasses: None,
        }
    }

    /// The Art & Architecture Thesaurus.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if the HTTP client cannot be built.
    pub fn aat() -> Result<Self> {
        Self::new(ProviderConfig::new(Vocabulary::Aat))
    }

    /// The Thesaurus of Geographic Names.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if the HTTP client cannot be built.
    pub fn tgn() -> Result<Self> {
        Self::new(ProviderConfig::new(Vocabulary::Tgn))
    }

    /// The Union List of Artist Names.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if the HTTP client cannot be built.
    pub fn ulan() -> Result<Self> {
        Self::new(ProviderConfig::new(Vocabulary::Ulan))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the subclass collector used to recognise entity types.
    #[must_use]
    pub fn subclasses(&self) -> &Arc<SubclassCollector> {
        &self.subclasses
    }

    /// Rediscovers the concept and collection subclasses from the live
    /// ontologies, replacing the pre-seeded tables.
    pub fn refresh_subclasses(&self) {
        self.subclasses.collect_subclasses(skos::CONCEPT);
        self.subclasses.collect_subclasses(skos::COLLECTION);
    }

    fn language<'a>(&'a self, options: &'a QueryOptions) -> &'a str {
        options
            .language
            .as_deref()
            .unwrap_or(&self.config.default_language)
    }

    /// Runs a display query and reduces it to ranked, sorted records.
    fn display(&self, query: &SelectQuery, options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        let records = self.sparql.select(query)?.records()?;
        let mut ranked = ranking::rank(records, self.language(options));
        ranking::sort(&mut ranked, options.sort, options.sort_order);
        Ok(ranked)
    }

    fn fetch_graph(&self, id: &str) -> Result<Option<RdfGraph>> {
        let url = self.config.entity_url(id);
        match self
            .fetcher
            .get(&url, &[], Some(RDF_XML_MIME))?
        {
            FetchResponse::NotFound => {
                debug!(%url, "no document for id");
                Ok(None)
            },
            FetchResponse::Found(body) => RdfGraph::parse(&body).map(Some),
        }
    }

    /// True if `uri` is served by the configured host (and port, if any).
    fn owns_uri(&self, uri: &str) -> bool {
        match (authority(uri), self.config.host()) {
            (Some(theirs), Some(ours)) => theirs == ours,
            _ => false,
        }
    }
}

fn is_identifier(id: &str) -> bool {
    !id.is_empty() && is_local_name(id)
}

impl VocabularyProvider for GettyProvider {
    fn concept_scheme(&self) -> Result<Arc<ConceptScheme>> {
        if let Some(scheme) = self
            .scheme
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(scheme));
        }

        let scheme = Arc::new(conceptscheme_from_uri(
            self.fetcher.as_ref(),
            &self.config.scheme_uri(),
        )?);
        let mut slot = self.scheme.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(slot.get_or_insert(scheme)))
    }

    fn get_by_id(&self, id: &str, include_change_notes: bool) -> Result<Option<Thing>> {
        if !is_identifier(id) {
            debug!(id, "not a vocabulary identifier");
            return Ok(None);
        }
        let Some(graph) = self.fetch_graph(id)? else {
            return Ok(None);
        };

        let sets = self.subclasses.sets();
        let mut things = GraphMapper::new(&sets, self.concept_scheme()?, &self.sparql)
            .include_change_notes(include_change_notes)
            .map(&graph)?;

        if things.is_empty() {
            debug!(id, "document describes no concept or collection");
            return Ok(None);
        }
        let index = things.iter().position(|t| t.id() == id).unwrap_or(0);
        Ok(Some(things.swap_remove(index)))
    }

    fn get_by_uri(&self, uri: &str, include_change_notes: bool) -> Result<Option<Thing>> {
        if !self.owns_uri(uri) {
            debug!(uri, host = ?self.config.host(), "URI outside the vocabulary host");
            return Ok(None);
        }
        self.get_by_id(uri_to_id(uri), include_change_notes)
    }

    fn find(&self, query: &FindQuery, options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        let sparql = queries::find(&self.config, query)?;
        self.display(&sparql, options)
    }

    fn expand(&self, id: &str) -> Result<Option<Vec<String>>> {
        if !is_identifier(id) {
            return Ok(None);
        }
        let query = queries::expand(&self.config, id)?;
        let ids: Vec<String> = self
            .sparql
            .select(&query)?
            .values(vars::ID)
            .map(String::from)
            .collect();

        if ids.is_empty() && self.get_by_id(id, false)?.is_none() {
            return Ok(None);
        }
        Ok(Some(ids))
    }

    fn get_top_concepts(&self, options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        self.display(&queries::top_level(&self.config, TopLevel::Concepts)?, options)
    }

    fn get_top_display(&self, options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        self.display(&queries::top_level(&self.config, TopLevel::All)?, options)
    }

    fn get_children_display(&self, id: &str, options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        self.display(&queries::children(&self.config, id)?, options)
    }

    fn get_all(&self, _options: &QueryOptions) -> Result<Vec<ResultRecord>> {
        Err(GettyError::Unsupported(format!(
            "listing all of {} is not supported, the result is too large",
            self.config.vocabulary.title()
        )))
    }
}

/// Builder for [`GettyProvider`].
#[derive(Debug)]
pub struct GettyProviderBuilder {
    config: ProviderConfig,
    fetcher: Option<Arc<dyn HttpFetch>>,
    subclasses: Option<Arc<SubclassCollector>>,
}

impl GettyProviderBuilder {
    /// Uses `fetcher` for every request instead of a fresh `reqwest` client.
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn HttpFetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Shares an existing subclass collector, e.g. between the three vocabularies.
    #[must_use]
    pub fn subclasses(mut self, subclasses: Arc<SubclassCollector>) -> Self {
        self.subclasses = Some(subclasses);
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if no fetcher was given and the default
    /// client cannot be built.
    pub fn build(self) -> Result<GettyProvider> {
        let fetcher: Arc<dyn HttpFetch> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(ReqwestFetcher::new(&self.config)?),
        };
        let subclasses = self
            .subclasses
            .unwrap_or_else(|| Arc::new(SubclassCollector::gvp(Arc::clone(&fetcher))));
        let sparql = SparqlEndpoint::new(self.config.clone(), Arc::clone(&fetcher));

        Ok(GettyProvider {
            config: self.config,
            fetcher,
            subclasses,
            sparql,
            scheme: RwLock::new(None),
        })
    }
}
