//! Common test helpers shared across the integration test suite.
//!
//! [`FakeGetty`] stands in for vocab.getty.edu: it serves canned RDF/XML
//! documents by URL and answers SPARQL queries by looking for distinctive
//! fragments in the query text.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use getty_skos::{
    FetchResponse, GettyError, GettyProvider, HttpFetch, ProviderConfig, Result, Vocabulary,
};

pub const SPARQL_URL: &str = "http://vocab.getty.edu/sparql.json";

const EMPTY_RESULTS: &str = r#"{"head": {"vars": []}, "results": {"bindings": []}}"#;

/// One request seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Option<String>,
    pub accept: Option<String>,
}

/// An in-memory Getty service.
#[derive(Debug, Default)]
pub struct FakeGetty {
    documents: HashMap<String, String>,
    sparql: Vec<(Vec<String>, String)>,
    down: bool,
    requests: Mutex<Vec<Request>>,
}

impl FakeGetty {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that refuses every connection.
    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    /// Serves `body` at `url`.
    pub fn with_document(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }

    /// Answers SPARQL queries containing every fragment in `needles` with `body`.
    /// Routes are tried in registration order; unmatched queries get no rows.
    pub fn with_sparql(mut self, needles: &[&str], body: &str) -> Self {
        self.sparql.push((
            needles.iter().map(|n| (*n).to_string()).collect(),
            body.to_string(),
        ));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Text of every SPARQL query received, in order.
    pub fn sparql_queries(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == SPARQL_URL)
            .filter_map(|r| r.query)
            .collect()
    }

    fn answer_sparql(&self, query: &str) -> String {
        self.sparql
            .iter()
            .find(|(needles, _)| needles.iter().all(|n| query.contains(n.as_str())))
            .map_or_else(|| EMPTY_RESULTS.to_string(), |(_, body)| body.clone())
    }
}

impl HttpFetch for FakeGetty {
    fn get(&self, url: &str, params: &[(&str, &str)], accept: Option<&str>) -> Result<FetchResponse> {
        let query = params
            .iter()
            .find(|(key, _)| *key == "query")
            .map(|(_, value)| (*value).to_string());
        self.requests.lock().unwrap().push(Request {
            url: url.to_string(),
            query: query.clone(),
            accept: accept.map(String::from),
        });

        if self.down {
            return Err(GettyError::unavailable(url, "connection refused"));
        }
        if url == SPARQL_URL {
            return Ok(FetchResponse::Found(
                self.answer_sparql(query.as_deref().unwrap_or_default()),
            ));
        }
        Ok(self
            .documents
            .get(url)
            .cloned()
            .map_or(FetchResponse::NotFound, FetchResponse::Found))
    }
}

/// The canned AAT service used by most tests.
pub fn aat_service() -> FakeGetty {
    FakeGetty::new()
        .with_document(
            "http://vocab.getty.edu/aat/300007466.rdf",
            include_str!("../fixtures/aat_300007466.rdf"),
        )
        .with_document(
            "http://vocab.getty.edu/aat/300007473.rdf",
            include_str!("../fixtures/aat_300007473.rdf"),
        )
        .with_document(
            "http://vocab.getty.edu/aat.rdf",
            include_str!("../fixtures/aat_scheme.rdf"),
        )
        .with_document(
            "http://vocab.getty.edu/ontology",
            include_str!("../fixtures/gvp_ontology.rdf"),
        )
        .with_document(
            "http://purl.org/iso25964/skos-thes",
            include_str!("../fixtures/iso_thes.rdf"),
        )
        .with_document(
            "http://www.w3.org/2004/02/skos/core",
            include_str!("../fixtures/skos_core.rdf"),
        )
        .with_sparql(
            &["iso:subordinateArray <http://vocab.getty.edu/aat/300007473>"],
            include_str!("../fixtures/sparql/superordinates_300007473.json"),
        )
        .with_sparql(
            &["SELECT DISTINCT ?Id", "gvp:broaderExtended aat:300007466 ."],
            include_str!("../fixtures/sparql/expand_300007466.json"),
        )
        .with_sparql(
            &["SELECT DISTINCT ?Id", "gvp:broaderExtended aat:300007473 ."],
            include_str!("../fixtures/sparql/expand_300007473.json"),
        )
        .with_sparql(
            &["luc:term \"church\""],
            include_str!("../fixtures/sparql/find_church.json"),
        )
        .with_sparql(
            &["gvp:broader aat:300007466 ."],
            include_str!("../fixtures/sparql/children_300007466.json"),
        )
        .with_sparql(
            &["gvp:Facet", "FILTER(?Type = skos:Concept)"],
            include_str!("../fixtures/sparql/top_concepts.json"),
        )
        .with_sparql(
            &["gvp:Facet"],
            include_str!("../fixtures/sparql/top_display.json"),
        )
}

/// Builds an AAT provider on top of `service`.
pub fn aat_provider(service: &Arc<FakeGetty>) -> GettyProvider {
    provider(Vocabulary::Aat, service)
}

pub fn provider(vocabulary: Vocabulary, service: &Arc<FakeGetty>) -> GettyProvider {
    init_tracing();
    let fetcher: Arc<dyn HttpFetch> = service.clone();
    GettyProvider::builder(ProviderConfig::new(vocabulary))
        .fetcher(fetcher)
        .build()
        .expect("provider with injected fetcher")
}

/// Routes `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
