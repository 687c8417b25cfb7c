//! Namespace definitions and vocabulary terms.
//!
//! This module defines the RDF namespaces used by the Getty vocabularies and
//! their ontology, plus the local names of the SKOS terms the mapper reads.

/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDF Schema namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// SKOS core namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

/// SKOS eXtension for Labels namespace (`skosxl:` and `xl:` on the Getty endpoint).
pub const SKOSXL: &str = "http://www.w3.org/2008/05/skos-xl#";

/// Dublin Core elements namespace.
pub const DC: &str = "http://purl.org/dc/elements/1.1/";

/// W3C provenance namespace.
pub const PROV: &str = "http://www.w3.org/ns/prov#";

/// ISO 25964 SKOS extensions namespace.
pub const ISO_THES: &str = "http://purl.org/iso25964/skos-thes#";

/// Getty Vocabulary Program ontology namespace.
pub const GVP: &str = "http://vocab.getty.edu/ontology#";

/// GraphDB Lucene connector namespace used for full-text search.
pub const LUC: &str = "http://www.ontotext.com/owlim/lucene#";

/// Joins a namespace and a local name into a full IRI.
#[must_use]
pub fn iri(namespace: &str, local: &str) -> String {
    format!("{namespace}{local}")
}

/// Frequently used RDF, RDFS and provenance terms.
pub mod terms {
    /// `rdf:type`
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:value`
    pub const RDF_VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";
    /// `rdfs:label`
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:subClassOf`
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `dc:type`
    pub const DC_TYPE: &str = "http://purl.org/dc/elements/1.1/type";
    /// `dc:description`
    pub const DC_DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";
    /// `prov:startedAtTime`
    pub const PROV_STARTED_AT: &str = "http://www.w3.org/ns/prov#startedAtTime";
    /// `iso-thes:subordinateArray`
    pub const ISO_SUBORDINATE_ARRAY: &str = "http://purl.org/iso25964/skos-thes#subordinateArray";
}

/// SKOS class and property local names.
pub mod skos {
    /// `skos:Concept`
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    /// `skos:Collection`
    pub const COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";

    /// broader
    pub const BROADER: &str = "broader";
    /// narrower
    pub const NARROWER: &str = "narrower";
    /// related
    pub const RELATED: &str = "related";
    /// member
    pub const MEMBER: &str = "member";
    /// prefLabel
    pub const PREF_LABEL: &str = "prefLabel";
    /// inScheme
    pub const IN_SCHEME: &str = "inScheme";
    /// mappingRelation
    pub const MAPPING_RELATION: &str = "mappingRelation";
}

/// GVP ontology class and property local names.
pub mod gvp {
    /// `gvp:Facet` - top-level facets of a vocabulary.
    pub const FACET: &str = "Facet";
    /// `gvp:broader` - direct (preferred) parent.
    pub const BROADER: &str = "broader";
    /// `gvp:broaderExtended` - transitive closure of all parents.
    pub const BROADER_EXTENDED: &str = "broaderExtended";
}
