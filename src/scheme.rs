//! Resolution of a vocabulary's [`ConceptScheme`].

use tracing::{debug, warn};

use crate::error::Result;
use crate::http::{FetchResponse, HttpFetch};
use crate::namespaces::{iri, terms, SKOS};
use crate::rdf::{RdfGraph, RdfNode, RDF_XML_EXTENSION, RDF_XML_MIME};
use crate::skos::{ConceptScheme, Label, LabelType};

/// Language assumed for untagged scheme labels.
const DEFAULT_SCHEME_LANGUAGE: &str = "en";

/// Fetches `{uri}.rdf` and builds the scheme described there.
///
/// `uri` is the scheme URI, e.g. `http://vocab.getty.edu/aat/`; a trailing
/// slash is dropped before `.rdf` is appended. The scheme's `rdfs:label`s
/// and `skos:prefLabel`s become preferred labels. A missing document yields
/// a scheme without labels.
///
/// # Errors
///
/// Returns [`crate::GettyError::UpstreamUnavailable`] if the service cannot be
/// reached and [`crate::GettyError::MalformedData`] if the document is not
/// RDF/XML.
pub fn conceptscheme_from_uri(fetcher: &dyn HttpFetch, uri: &str) -> Result<ConceptScheme> {
    let url = format!("{}.{}", uri.trim_end_matches('/'), RDF_XML_EXTENSION);
    debug!(%url, "fetching concept scheme");

    let mut scheme = ConceptScheme::new(uri);
    match fetcher.get(&url, &[], Some(RDF_XML_MIME))? {
        FetchResponse::NotFound => {
            warn!(%url, "concept scheme document not found");
        },
        FetchResponse::Found(body) => {
            let graph = RdfGraph::parse(&body)?;
            scheme.labels = scheme_labels(&graph, uri);
        },
    }
    Ok(scheme)
}

fn scheme_labels(graph: &RdfGraph, uri: &str) -> Vec<Label> {
    let subject = RdfNode::iri(uri);
    let pref_label = iri(SKOS, LabelType::PrefLabel.local_name());

    let mut labels: Vec<Label> = Vec::new();
    for predicate in [terms::RDFS_LABEL, pref_label.as_str()] {
        for object in graph.objects(&subject, predicate).filter(|o| o.is_literal()) {
            let label = Label::new(
                object.lexical(),
                LabelType::PrefLabel,
                Some(object.language().unwrap_or(DEFAULT_SCHEME_LANGUAGE)),
            );
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    labels
}
