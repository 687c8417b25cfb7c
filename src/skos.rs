//! SKOS domain model.
//!
//! The types in this module are what the provider hands out: [`Concept`] and
//! [`Collection`] (wrapped in [`Thing`]), their [`Label`]s and [`Note`]s, and
//! the [`ConceptScheme`] they belong to. All of them are plain owned data,
//! built once from an RDF graph and never mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::GettyError;
use crate::language;

/// The kind of a SKOS label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelType {
    /// `skos:prefLabel`
    PrefLabel,
    /// `skos:altLabel`
    AltLabel,
    /// `skos:hiddenLabel`
    HiddenLabel,
    /// Sort key label; never read from Getty graphs.
    SortLabel,
}

impl LabelType {
    /// Label types read from a concept graph, in extraction order.
    pub const MAPPED: [Self; 3] = [Self::PrefLabel, Self::AltLabel, Self::HiddenLabel];

    /// Returns the SKOS local name of this label type.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::PrefLabel => "prefLabel",
            Self::AltLabel => "altLabel",
            Self::HiddenLabel => "hiddenLabel",
            Self::SortLabel => "sortLabel",
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// The kind of a SKOS note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteType {
    /// `skos:note`, the generic supertype of all others
    Note,
    /// `skos:changeNote`
    ChangeNote,
    /// `skos:definition`
    Definition,
    /// `skos:editorialNote`
    EditorialNote,
    /// `skos:example`
    Example,
    /// `skos:historyNote`
    HistoryNote,
    /// `skos:scopeNote`
    ScopeNote,
}

impl NoteType {
    /// All note types, generic `note` first.
    pub const ALL: [Self; 7] = [
        Self::Note,
        Self::ChangeNote,
        Self::Definition,
        Self::EditorialNote,
        Self::Example,
        Self::HistoryNote,
        Self::ScopeNote,
    ];

    /// Returns the SKOS local name of this note type.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::ChangeNote => "changeNote",
            Self::Definition => "definition",
            Self::EditorialNote => "editorialNote",
            Self::Example => "example",
            Self::HistoryNote => "historyNote",
            Self::ScopeNote => "scopeNote",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// The kind of a SKOS mapping relation (`skos:<kind>Match`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// `skos:closeMatch`
    Close,
    /// `skos:exactMatch`
    Exact,
    /// `skos:relatedMatch`
    Related,
    /// `skos:broadMatch`
    Broad,
    /// `skos:narrowMatch`
    Narrow,
}

impl MatchType {
    /// All match kinds.
    pub const ALL: [Self; 5] = [
        Self::Close,
        Self::Exact,
        Self::Related,
        Self::Broad,
        Self::Narrow,
    ];

    /// Returns the kind prefix, e.g. `exact`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Exact => "exact",
            Self::Related => "related",
            Self::Broad => "broad",
            Self::Narrow => "narrow",
        }
    }

    /// Returns the SKOS property local name, e.g. `exactMatch`.
    #[must_use]
    pub fn property(self) -> String {
        format!("{}Match", self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GettyError::InvalidArgument(format!("unknown match type: {s}")))
    }
}

/// A label of a concept, collection or scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    /// The label text.
    pub label: String,
    /// The label kind.
    #[serde(rename = "type")]
    pub label_type: LabelType,
    /// A valid BCP 47 tag, `und` when unknown.
    pub language: String,
}

impl Label {
    /// Creates a label, coercing a missing or malformed language to `und`.
    #[must_use]
    pub fn new(label: impl Into<String>, label_type: LabelType, language: Option<&str>) -> Self {
        Self {
            label: label.into(),
            label_type,
            language: language::normalize(language),
        }
    }
}

/// A note attached to a concept, collection or scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    /// The note text.
    pub note: String,
    /// The note kind.
    #[serde(rename = "type")]
    pub note_type: NoteType,
    /// A valid BCP 47 tag, `und` when unknown.
    pub language: String,
}

impl Note {
    /// Creates a note, coercing a missing or malformed language to `und`.
    #[must_use]
    pub fn new(note: impl Into<String>, note_type: NoteType, language: Option<&str>) -> Self {
        Self {
            note: note.into(),
            note_type,
            language: language::normalize(language),
        }
    }
}

/// A whole vocabulary (AAT, TGN or ULAN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptScheme {
    /// Scheme URI, e.g. `http://vocab.getty.edu/aat/`.
    pub uri: String,
    /// Scheme labels.
    pub labels: Vec<Label>,
    /// Scheme notes.
    pub notes: Vec<Note>,
}

impl ConceptScheme {
    /// Creates a scheme without labels or notes.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Returns the best label for `language`, see [`select_label`].
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(&self.labels, language, false)
    }
}

fn serialize_scheme<S: Serializer>(scheme: &Arc<ConceptScheme>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&scheme.uri)
}

/// A SKOS concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    /// Vocabulary-local identifier (last URI path segment).
    pub id: String,
    /// Concept URI.
    pub uri: String,
    /// Owning scheme, shared between all entities of a provider.
    #[serde(serialize_with = "serialize_scheme")]
    pub concept_scheme: Arc<ConceptScheme>,
    /// Labels in document order.
    pub labels: Vec<Label>,
    /// Notes, with generic duplicates of typed notes removed.
    pub notes: Vec<Note>,
    /// Ids of broader concepts.
    pub broader: Vec<String>,
    /// Ids of narrower concepts.
    pub narrower: Vec<String>,
    /// Ids of related concepts.
    pub related: Vec<String>,
    /// Mapping relations by kind; every kind is present, possibly empty.
    pub matches: IndexMap<MatchType, Vec<String>>,
    /// Ids of the ISO thesaurus arrays this concept organises its children into.
    pub subordinate_arrays: Vec<String>,
}

impl Concept {
    /// Returns the best label for `language`, see [`select_label`].
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(&self.labels, language, false)
    }
}

/// A SKOS collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    /// Vocabulary-local identifier (last URI path segment).
    pub id: String,
    /// Collection URI.
    pub uri: String,
    /// Owning scheme, shared between all entities of a provider.
    #[serde(serialize_with = "serialize_scheme")]
    pub concept_scheme: Arc<ConceptScheme>,
    /// Labels in document order.
    pub labels: Vec<Label>,
    /// Notes, with generic duplicates of typed notes removed.
    pub notes: Vec<Note>,
    /// Ids of direct members.
    pub members: Vec<String>,
    /// Ids of the concepts whose children this collection groups.
    pub superordinates: Vec<String>,
}

impl Collection {
    /// Returns the best label for `language`, see [`select_label`].
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(&self.labels, language, false)
    }
}

/// Either kind of entity a vocabulary lookup can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Thing {
    /// A concept.
    Concept(Concept),
    /// A collection.
    Collection(Collection),
}

impl Thing {
    /// Returns the vocabulary-local identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Concept(c) => &c.id,
            Self::Collection(c) => &c.id,
        }
    }

    /// Returns the URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Concept(c) => &c.uri,
            Self::Collection(c) => &c.uri,
        }
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        match self {
            Self::Concept(c) => &c.labels,
            Self::Collection(c) => &c.labels,
        }
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        match self {
            Self::Concept(c) => &c.notes,
            Self::Collection(c) => &c.notes,
        }
    }

    /// Returns the owning scheme.
    #[must_use]
    pub fn concept_scheme(&self) -> &Arc<ConceptScheme> {
        match self {
            Self::Concept(c) => &c.concept_scheme,
            Self::Collection(c) => &c.concept_scheme,
        }
    }

    /// Returns the best label for `language`, see [`select_label`].
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&Label> {
        select_label(self.labels(), language, false)
    }

    /// Returns the concept, if this is one.
    #[must_use]
    pub const fn as_concept(&self) -> Option<&Concept> {
        match self {
            Self::Concept(c) => Some(c),
            Self::Collection(_) => None,
        }
    }

    /// Returns the collection, if this is one.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            Self::Concept(_) => None,
        }
    }
}

/// Picks the label that best represents an entity in `language`.
///
/// Label types are tried in order (`sortLabel` only when `sort_label` is set,
/// then `prefLabel`, then `altLabel`). Within a type an exact language match
/// wins over a primary-language match. When nothing matches, the search is
/// repeated with `language = "any"`, which takes the first label of the type.
#[must_use]
pub fn select_label<'a>(labels: &'a [Label], language: &str, sort_label: bool) -> Option<&'a Label> {
    if labels.is_empty() {
        return None;
    }
    let language = if language.is_empty() {
        language::UNDETERMINED
    } else {
        language
    };

    let mut order = Vec::with_capacity(3);
    if sort_label {
        order.push(LabelType::SortLabel);
    }
    order.extend([LabelType::PrefLabel, LabelType::AltLabel]);

    let found = order
        .into_iter()
        .find_map(|label_type| best_for_type(labels, language, label_type));
    match found {
        Some(label) => Some(label),
        None if language != "any" => select_label(labels, "any", sort_label),
        None => None,
    }
}

fn best_for_type<'a>(labels: &'a [Label], language: &str, label_type: LabelType) -> Option<&'a Label> {
    let mut typed = labels.iter().filter(|l| l.label_type == label_type).peekable();
    typed.peek()?;
    if language == "any" {
        return typed.next();
    }
    let typed: Vec<&Label> = typed.collect();
    typed
        .iter()
        .find(|l| language::same_tag(&l.language, language))
        .or_else(|| typed.iter().find(|l| language::same_base(&l.language, language)))
        .copied()
}
