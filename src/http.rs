//! HTTP access to the Getty services.
//!
//! Every network call in the crate goes through the [`HttpFetch`] trait so a
//! provider can be driven by a canned fake in tests. [`ReqwestFetcher`] is the
//! production implementation on top of a blocking `reqwest` client.
//!
//! # Contract
//!
//! - HTTP 404 is a routine outcome and comes back as [`FetchResponse::NotFound`].
//! - Connection failures, timeouts and any other failure status surface as
//!   [`GettyError::UpstreamUnavailable`].
//! - Bodies are decoded as UTF-8 whatever the response claims.

use encoding_rs::UTF_8;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{GettyError, Result};

/// Outcome of a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// The resource exists; the decoded body.
    Found(String),
    /// The service answered 404.
    NotFound,
}

/// Anything that can perform a GET request.
///
/// Implementations must be safe to share between threads.
pub trait HttpFetch: Send + Sync + std::fmt::Debug {
    /// Fetches `url` with the given query parameters and optional `Accept` header.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::UpstreamUnavailable`] on connection failure,
    /// timeout, or any failure status other than 404.
    fn get(&self, url: &str, params: &[(&str, &str)], accept: Option<&str>) -> Result<FetchResponse>;
}

/// [`HttpFetch`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Builds a client honouring the timeout and user agent of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::Http`] if the TLS backend cannot be initialised.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&self, url: &str, params: &[(&str, &str)], accept: Option<&str>) -> Result<FetchResponse> {
        debug!(url, params = params.len(), "GET");
        let mut request = self.client.get(url).query(params);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .map_err(|e| GettyError::unavailable(url, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url, "resource not found");
            return Ok(FetchResponse::NotFound);
        }
        if !status.is_success() {
            return Err(GettyError::unavailable(url, format!("HTTP status {status}")));
        }

        let bytes = response
            .bytes()
            .map_err(|e| GettyError::unavailable(url, e.to_string()))?;
        Ok(FetchResponse::Found(decode_utf8(&bytes)))
    }
}

/// Decodes a body as UTF-8, dropping a BOM and replacing malformed sequences.
#[must_use]
pub fn decode_utf8(bytes: &[u8]) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        debug!("response body contained malformed UTF-8");
    }
    text.into_owned()
}
