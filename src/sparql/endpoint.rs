//! Execution of queries against a `sparql.json` endpoint.

use std::sync::Arc;

use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{GettyError, Result};
use crate::http::{FetchResponse, HttpFetch};
use crate::mapper::{uri_to_id, SuperordinateSource};

use super::builder::SelectQuery;
use super::queries::{self, vars};
use super::results::SparqlResponse;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A SPARQL endpoint reached through an [`HttpFetch`].
///
/// A missing endpoint is not a routine outcome like a missing entity, so a
/// 404 is reported as [`GettyError::UpstreamUnavailable`].
#[derive(Debug, Clone)]
pub struct SparqlEndpoint {
    config: ProviderConfig,
    fetcher: Arc<dyn HttpFetch>,
}

impl SparqlEndpoint {
    /// Creates an endpoint at `config.sparql_url()`.
    #[must_use]
    pub fn new(config: ProviderConfig, fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { config, fetcher }
    }

    /// Runs `query` and parses the JSON results.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::UpstreamUnavailable`] if the endpoint cannot be
    /// reached or is missing, and [`GettyError::MalformedData`] if the answer
    /// is not a SPARQL JSON document.
    pub fn select(&self, query: &SelectQuery) -> Result<SparqlResponse> {
        let url = self.config.sparql_url();
        let text = query.to_string();
        debug!(%url, query = %text, "SPARQL query");

        match self
            .fetcher
            .get(&url, &[("query", text.as_str())], Some(SPARQL_RESULTS_JSON))?
        {
            FetchResponse::Found(body) => SparqlResponse::parse(&body),
            FetchResponse::NotFound => Err(GettyError::unavailable(
                url,
                "SPARQL endpoint not found (HTTP 404)",
            )),
        }
    }
}

impl SuperordinateSource for SparqlEndpoint {
    fn superordinates(&self, uri: &str) -> Result<Vec<String>> {
        let query = queries::superordinates(&self.config, uri)?;
        let response = self.select(&query)?;
        Ok(response
            .values(vars::SUBJECT)
            .map(|s| uri_to_id(s).to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Vocabulary;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        body: Option<String>,
        calls: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl HttpFetch for Recorder {
        fn get(&self, url: &str, params: &[(&str, &str)], accept: Option<&str>) -> Result<FetchResponse> {
            let query = params
                .iter()
                .find(|(k, _)| *k == "query")
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_default();
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), query, accept.map(String::from)));
            Ok(self
                .body
                .clone()
                .map_or(FetchResponse::NotFound, FetchResponse::Found))
        }
    }

    fn endpoint(body: Option<&str>) -> (SparqlEndpoint, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            body: body.map(String::from),
            ..Recorder::default()
        });
        let endpoint = SparqlEndpoint::new(ProviderConfig::new(Vocabulary::Aat), recorder.clone());
        (endpoint, recorder)
    }

    #[test]
    fn test_superordinates() {
        let body = r#"{"results": {"bindings": [
            {"Subject": {"type": "uri", "value": "http://vocab.getty.edu/aat/300007466"}}
        ]}}"#;
        let (endpoint, recorder) = endpoint(Some(body));

        let ids = endpoint
            .superordinates("http://vocab.getty.edu/aat/300007473")
            .unwrap();
        assert_eq!(ids, vec!["300007466"]);

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].0, "http://vocab.getty.edu/sparql.json");
        assert!(calls[0].1.contains("iso:subordinateArray <http://vocab.getty.edu/aat/300007473>"));
        assert_eq!(calls[0].2.as_deref(), Some(SPARQL_RESULTS_JSON));
    }

    #[test]
    fn test_missing_endpoint_is_unavailable() {
        let (endpoint, _) = endpoint(None);
        let err = endpoint
            .select(&SelectQuery::new().select("Subject"))
            .unwrap_err();
        assert!(matches!(err, GettyError::UpstreamUnavailable { .. }));
    }
}
