//! Mapping of Getty RDF graphs to SKOS entities.
//!
//! A per-id document (`{base}/aat/300007466.rdf`) describes one concept or
//! collection together with its notes and revision history. [`GraphMapper`]
//! finds every resource typed with a known Concept or Collection subclass and
//! builds the matching [`Thing`]s.
//!
//! # Notes
//!
//! Getty scope notes are typed both `skos:scopeNote` and the generic
//! `skos:note`. Note predicates are therefore visited with `skos:note` last,
//! and each note term is only turned into a [`Note`] the first time it is
//! seen, so the specific type wins. Literal notes count as the same term only
//! when both text and language tag match. Revision resources (a `/rev/` path
//! segment) are change notes and only kept when asked for.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::namespaces::{iri, skos, terms, SKOS};
use crate::rdf::{RdfGraph, RdfNode};
use crate::skos::{
    Collection, Concept, ConceptScheme, Label, LabelType, MatchType, Note, NoteType, Thing,
};
use crate::subclasses::SubclassSets;

/// Language given to assembled notes without a language of their own.
const DEFAULT_NOTE_LANGUAGE: &str = "en";

/// Path segment that marks revision (change note) resources.
const REVISION_SEGMENT: &str = "/rev/";

/// Resolves the superordinate concepts of a collection.
///
/// A collection's superordinates are stored on the concepts that point at it
/// (`iso-thes:subordinateArray`), so they are not part of the collection's own
/// document and need a separate lookup.
pub trait SuperordinateSource: Send + Sync + fmt::Debug {
    /// Returns the ids of the resources listing `uri` as a subordinate array.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails; the mapper propagates it.
    fn superordinates(&self, uri: &str) -> Result<Vec<String>>;
}

/// Returns the vocabulary-local id of `uri`: its last non-empty path segment.
///
/// ```ignore
/// assert_eq!(uri_to_id("http://vocab.getty.edu/aat/300007466"), "300007466");
/// assert_eq!(uri_to_id("http://vocab.getty.edu/aat/"), "aat");
/// ```
#[must_use]
pub fn uri_to_id(uri: &str) -> &str {
    let trimmed = uri.trim_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Note types in the order they are extracted: the generic `note` last.
#[must_use]
pub fn note_type_order() -> Vec<NoteType> {
    let mut order: Vec<NoteType> = NoteType::ALL
        .into_iter()
        .filter(|t| *t != NoteType::Note)
        .collect();
    order.push(NoteType::Note);
    order
}

/// Turns RDF graphs into [`Thing`]s.
pub struct GraphMapper<'a> {
    subclasses: &'a SubclassSets,
    scheme: Arc<ConceptScheme>,
    superordinates: &'a dyn SuperordinateSource,
    include_change_notes: bool,
}

impl fmt::Debug for GraphMapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphMapper")
            .field("scheme", &self.scheme.uri)
            .field("include_change_notes", &self.include_change_notes)
            .finish_non_exhaustive()
    }
}

impl<'a> GraphMapper<'a> {
    /// Creates a mapper that attaches `scheme` to every entity it builds.
    #[must_use]
    pub fn new(
        subclasses: &'a SubclassSets,
        scheme: Arc<ConceptScheme>,
        superordinates: &'a dyn SuperordinateSource,
    ) -> Self {
        Self {
            subclasses,
            scheme,
            superordinates,
            include_change_notes: false,
        }
    }

    /// Keeps `/rev/` change notes instead of dropping them.
    #[must_use]
    pub const fn include_change_notes(mut self, include: bool) -> Self {
        self.include_change_notes = include;
        self
    }

    /// Maps every concept and collection in `graph`, concepts first.
    ///
    /// A resource typed both as a concept and as a collection yields one
    /// entity of each kind. An empty result means the graph describes nothing
    /// this vocabulary knows.
    ///
    /// # Errors
    ///
    /// Propagates failures of the superordinate lookup.
    pub fn map(&self, graph: &RdfGraph) -> Result<Vec<Thing>> {
        let (concepts, collections) = self.partition(graph);
        debug!(
            concepts = concepts.len(),
            collections = collections.len(),
            "mapping graph"
        );

        let mut things = Vec::with_capacity(concepts.len() + collections.len());
        for subject in concepts {
            things.push(Thing::Concept(self.concept(graph, subject)));
        }
        for subject in collections {
            things.push(Thing::Collection(self.collection(graph, subject)?));
        }
        Ok(things)
    }

    /// Splits the typed resources of `graph` into concepts and collections,
    /// each deduplicated and in document order.
    fn partition<'g>(&self, graph: &'g RdfGraph) -> (Vec<&'g RdfNode>, Vec<&'g RdfNode>) {
        let mut concepts = Vec::new();
        let mut collections = Vec::new();
        let mut seen_concepts = HashSet::new();
        let mut seen_collections = HashSet::new();

        for triple in graph.triples_with_predicate(terms::RDF_TYPE) {
            let (Some(class), Some(subject)) = (triple.object.as_iri(), triple.subject.as_iri())
            else {
                continue;
            };
            if self.subclasses.is_concept(class) && seen_concepts.insert(subject) {
                concepts.push(&triple.subject);
            }
            if self.subclasses.is_collection(class) && seen_collections.insert(subject) {
                collections.push(&triple.subject);
            }
        }
        (concepts, collections)
    }

    fn concept(&self, graph: &RdfGraph, subject: &RdfNode) -> Concept {
        let uri = subject.lexical().to_string();
        let matches: IndexMap<MatchType, Vec<String>> = MatchType::ALL
            .into_iter()
            .map(|kind| (kind, ids(graph, subject, &iri(SKOS, &kind.property()))))
            .collect();

        Concept {
            id: uri_to_id(&uri).to_string(),
            concept_scheme: Arc::clone(&self.scheme),
            labels: labels(graph, subject),
            notes: self.notes(graph, subject),
            broader: ids(graph, subject, &iri(SKOS, skos::BROADER)),
            narrower: ids(graph, subject, &iri(SKOS, skos::NARROWER)),
            related: ids(graph, subject, &iri(SKOS, skos::RELATED)),
            matches,
            subordinate_arrays: ids(graph, subject, terms::ISO_SUBORDINATE_ARRAY),
            uri,
        }
    }

    fn collection(&self, graph: &RdfGraph, subject: &RdfNode) -> Result<Collection> {
        let uri = subject.lexical().to_string();
        let superordinates = self.superordinates.superordinates(&uri)?;

        Ok(Collection {
            id: uri_to_id(&uri).to_string(),
            concept_scheme: Arc::clone(&self.scheme),
            labels: labels(graph, subject),
            notes: self.notes(graph, subject),
            members: ids(graph, subject, &iri(SKOS, skos::MEMBER)),
            superordinates,
            uri,
        })
    }

    fn notes(&self, graph: &RdfGraph, subject: &RdfNode) -> Vec<Note> {
        let mut seen: HashSet<&RdfNode> = HashSet::new();
        let mut notes = Vec::new();

        for note_type in note_type_order() {
            let predicate = iri(SKOS, note_type.local_name());
            for object in graph.objects(subject, &predicate) {
                if !seen.insert(object) {
                    continue;
                }
                if let Some(note) = self.note(graph, object, note_type) {
                    notes.push(note);
                }
            }
        }
        notes
    }

    fn note(&self, graph: &RdfGraph, object: &RdfNode, note_type: NoteType) -> Option<Note> {
        if object.is_literal() {
            return Some(Note::new(object.lexical(), note_type, object.language()));
        }

        if object.lexical().contains(REVISION_SEGMENT) && !self.include_change_notes {
            return None;
        }

        let mut text = String::new();
        let mut language = DEFAULT_NOTE_LANGUAGE;
        for value in graph.objects(object, terms::RDF_VALUE) {
            text.push_str(value.lexical());
            if let Some(lang) = value.language() {
                language = lang;
            }
        }
        for kind in graph.objects(object, terms::DC_TYPE) {
            text.push_str(kind.lexical());
        }
        for description in graph.objects(object, terms::DC_DESCRIPTION) {
            text.push_str(": ");
            text.push_str(description.lexical());
        }
        for started in graph.objects(object, terms::PROV_STARTED_AT) {
            text.push_str(" at ");
            text.push_str(started.lexical());
            text.push(' ');
        }

        if text.is_empty() {
            debug!(note = object.lexical(), "skipping note resource without content");
            return None;
        }
        Some(Note::new(text, note_type, Some(language)))
    }
}

/// Literal labels of `subject` for every mapped label type.
fn labels(graph: &RdfGraph, subject: &RdfNode) -> Vec<Label> {
    LabelType::MAPPED
        .into_iter()
        .flat_map(|label_type| {
            let predicate = iri(SKOS, label_type.local_name());
            graph
                .objects(subject, &predicate)
                .filter(|o| o.is_literal())
                .map(|o| Label::new(o.lexical(), label_type, o.language()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Ids of the resources linked from `subject` through `predicate`.
fn ids(graph: &RdfGraph, subject: &RdfNode, predicate: &str) -> Vec<String> {
    graph
        .objects(subject, predicate)
        .filter_map(RdfNode::as_iri)
        .map(|uri| uri_to_id(uri).to_string())
        .collect()
}
