//! The SPARQL 1.1 JSON results format, as returned by `sparql.json`.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::error::{GettyError, Result};
use crate::query::{ResultRecord, ResultType, LABEL_NOT_AVAILABLE};

use super::queries::vars;

/// Top-level response document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    /// Result rows.
    pub results: SparqlResults,
}

/// The `results` member.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    /// One map per solution, keyed by variable name.
    pub bindings: Vec<HashMap<String, BindingValue>>,
}

/// A single bound value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingValue {
    /// Lexical value.
    pub value: String,
    /// Language tag of a literal.
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
}

impl SparqlResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::MalformedData`] if `body` is not a SPARQL JSON
    /// results document.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| GettyError::MalformedData(format!("invalid SPARQL results: {e}")))
    }

    /// Returns the value of `var` in every row that binds it.
    pub fn values<'a>(&'a self, var: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.results
            .bindings
            .iter()
            .filter_map(move |row| row.get(var).map(|v| v.value.as_str()))
    }

    /// Converts display-query rows into result records, one per row.
    ///
    /// The label language is the `Lang` binding, else the `xml:lang` of the
    /// `Term` literal, else empty. Rows whose `Type` is neither a concept nor a collection are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::MalformedData`] if a row lacks `Subject`, `Id`
    /// or `Type`.
    pub fn records(&self) -> Result<Vec<ResultRecord>> {
        let mut records = Vec::with_capacity(self.results.bindings.len());
        for row in &self.results.bindings {
            let uri = required(row, vars::SUBJECT)?;
            let type_uri = required(row, vars::TYPE)?;
            let Some(result_type) = ResultType::from_type_uri(type_uri) else {
                warn!(uri, type_uri, "skipping result of unexpected type");
                continue;
            };
            let term = row.get(vars::TERM);
            records.push(ResultRecord {
                id: required(row, vars::ID)?.to_string(),
                uri: uri.to_string(),
                result_type,
                label: term
                    .map_or(LABEL_NOT_AVAILABLE, |t| t.value.as_str())
                    .to_string(),
                lang: row
                    .get(vars::LANG)
                    .map(|l| l.value.clone())
                    .or_else(|| term.and_then(|t| t.lang.clone()))
                    .unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

fn required<'a>(row: &'a HashMap<String, BindingValue>, var: &str) -> Result<&'a str> {
    row.get(var)
        .map(|v| v.value.as_str())
        .ok_or_else(|| GettyError::MalformedData(format!("SPARQL result row without ?{var}")))
}
