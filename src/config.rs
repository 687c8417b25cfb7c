//! Configuration options for a Getty provider.
//!
//! This module provides the [`ProviderConfig`] struct which selects the
//! vocabulary, the service location and the HTTP behaviour of a provider.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::error::GettyError;

/// Public Getty Linked Open Data service.
pub const DEFAULT_BASE_URL: &str = "http://vocab.getty.edu/";

/// Language used when a caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Upper bound for every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("getty-skos/", env!("CARGO_PKG_VERSION"));

/// The three Getty vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vocabulary {
    /// Art & Architecture Thesaurus
    #[default]
    Aat,
    /// Thesaurus of Geographic Names
    Tgn,
    /// Union List of Artist Names
    Ulan,
}

impl Vocabulary {
    /// Returns the vocabulary id used in URIs and as SPARQL prefix.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Aat => "aat",
            Self::Tgn => "tgn",
            Self::Ulan => "ulan",
        }
    }

    /// Returns the human-readable vocabulary name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Aat => "Art & Architecture Thesaurus",
            Self::Tgn => "Thesaurus of Geographic Names",
            Self::Ulan => "Union List of Artist Names",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Vocabulary {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aat" => Ok(Self::Aat),
            "tgn" => Ok(Self::Tgn),
            "ulan" => Ok(Self::Ulan),
            other => Err(GettyError::InvalidArgument(format!(
                "unknown vocabulary: {other}"
            ))),
        }
    }
}

/// Configuration for a Getty provider.
///
/// # Examples
///
/// ```ignore
/// use getty_skos::{ProviderConfig, Vocabulary};
///
/// let config = ProviderConfig::new(Vocabulary::Tgn).with_default_language("nl");
/// assert_eq!(config.scheme_uri(), "http://vocab.getty.edu/tgn/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Service root, always ending in `/`.
    pub base_url: String,

    /// Which vocabulary the provider serves.
    pub vocabulary: Vocabulary,

    /// Language used to rank search results when a call does not specify one.
    pub default_language: String,

    /// Timeout applied to each HTTP request.
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vocabulary: Vocabulary::default(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration for `vocabulary` with default values.
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            ..Self::default()
        }
    }

    /// Sets the service root. A trailing `/` is added when missing.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Sets the default ranking language.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the vocabulary id (`aat`, `tgn`, `ulan`).
    #[must_use]
    pub const fn vocab_id(&self) -> &'static str {
        self.vocabulary.id()
    }

    /// Returns `{base_url}{vocab_id}`, the prefix of every entity document.
    #[must_use]
    pub fn vocabulary_url(&self) -> String {
        format!("{}{}", self.base_url, self.vocab_id())
    }

    /// Returns the concept scheme URI, `{base_url}{vocab_id}/`.
    #[must_use]
    pub fn scheme_uri(&self) -> String {
        format!("{}/", self.vocabulary_url())
    }

    /// Returns the SPARQL JSON endpoint.
    #[must_use]
    pub fn sparql_url(&self) -> String {
        format!("{}sparql.json", self.base_url)
    }

    /// Returns the RDF/XML document URL for entity `id`.
    #[must_use]
    pub fn entity_url(&self, id: &str) -> String {
        format!("{}/{id}.rdf", self.vocabulary_url())
    }

    /// Returns the authority of the base URL, used to vet incoming URIs.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        authority(&self.base_url)
    }
}

/// Host of `uri`, followed by `:port` when the port is not the scheme default.
///
/// `None` if `uri` is not an absolute URL with a host.
#[must_use]
pub fn authority(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
