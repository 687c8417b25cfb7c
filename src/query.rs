//! Search query and result types.
//!
//! A [`FindQuery`] is validated when it is built, so a malformed query fails
//! with [`GettyError::InvalidArgument`] before any request goes out.
//! [`FindQuery::from_json`] accepts the loosely-typed dictionary shape used by
//! generic vocabulary front-ends:
//!
//! ```ignore
//! use serde_json::json;
//! use getty_skos::FindQuery;
//!
//! let query = FindQuery::from_json(&json!({
//!     "label": "church",
//!     "type": "concept",
//!     "collection": {"id": "300007466", "depth": "all"}
//! }))?;
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{GettyError, Result};
use crate::skos::MatchType;

/// Label shown for results that have no preferred label term.
pub const LABEL_NOT_AVAILABLE: &str = "<not available>";

/// Restricts a search to concepts, collections or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Concepts and collections.
    #[default]
    All,
    /// Concepts only.
    Concept,
    /// Collections only.
    Collection,
}

impl FromStr for TypeFilter {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "concept" => Ok(Self::Concept),
            "collection" => Ok(Self::Collection),
            other => Err(GettyError::InvalidArgument(format!(
                "type: only 'all', 'concept' or 'collection' are allowed, got '{other}'"
            ))),
        }
    }
}

/// How deep a collection filter reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionDepth {
    /// Direct members only (`gvp:broader`).
    #[default]
    Members,
    /// Members and everything below them (`gvp:broaderExtended`).
    All,
}

impl FromStr for CollectionDepth {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "members" => Ok(Self::Members),
            "all" => Ok(Self::All),
            other => Err(GettyError::InvalidArgument(format!(
                "collection depth: only 'members' or 'all' are allowed, got '{other}'"
            ))),
        }
    }
}

/// Restricts a search to the members of a collection (or descendants of a concept).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter {
    /// Id of the collection or concept.
    pub id: String,
    /// Direct members or the full subtree.
    pub depth: CollectionDepth,
}

impl CollectionFilter {
    /// Creates a collection filter.
    #[must_use]
    pub fn new(id: impl Into<String>, depth: CollectionDepth) -> Self {
        Self {
            id: id.into(),
            depth,
        }
    }
}

/// Restricts a search to entities mapped to an external URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFilter {
    /// The external URI.
    pub uri: String,
    /// A specific `skos:<kind>Match`; `None` means any `skos:mappingRelation`.
    pub match_type: Option<MatchType>,
}

impl MatchFilter {
    /// Creates a match filter.
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::InvalidArgument`] if `uri` is empty.
    pub fn new(uri: impl Into<String>, match_type: Option<MatchType>) -> Result<Self> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(GettyError::InvalidArgument(
                "matches: please provide a URI to match with".into(),
            ));
        }
        Ok(Self { uri, match_type })
    }
}

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindQuery {
    /// Full-text keywords; `None` matches everything.
    pub label: Option<String>,
    /// Concepts, collections or both.
    pub type_filter: TypeFilter,
    /// Optional collection restriction.
    pub collection: Option<CollectionFilter>,
    /// Optional mapping restriction.
    pub matches: Option<MatchFilter>,
}

impl FindQuery {
    /// Creates a query matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keywords. Blank input is ignored.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.trim().is_empty() {
            None
        } else {
            Some(label)
        };
        self
    }

    /// Sets the type filter.
    #[must_use]
    pub const fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    /// Sets the collection filter.
    #[must_use]
    pub fn in_collection(mut self, collection: CollectionFilter) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Sets the match filter.
    #[must_use]
    pub fn with_matches(mut self, matches: MatchFilter) -> Self {
        self.matches = Some(matches);
        self
    }

    /// Returns the whitespace-separated keywords of the label.
    #[must_use]
    pub fn keywords(&self) -> Vec<&str> {
        self.label
            .as_deref()
            .map(|l| l.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Builds a query from a JSON object with the keys `label`, `type`,
    /// `collection` (`id`, `depth`) and `matches` (`uri`, `type`).
    ///
    /// # Errors
    ///
    /// Returns [`GettyError::InvalidArgument`] for an unknown `type`, a
    /// `collection` without `id`, an unknown `depth`, `matches` without
    /// `uri`, or values of the wrong JSON type.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| GettyError::InvalidArgument("query must be a JSON object".into()))?;

        let mut query = Self::new();

        if let Some(label) = object.get("label") {
            query = query.with_label(string_field(label, "label")?);
        }

        if let Some(type_filter) = object.get("type") {
            query.type_filter = string_field(type_filter, "type")?.parse()?;
        }

        if let Some(collection) = object.get("collection") {
            let id = collection.get("id").ok_or_else(|| {
                GettyError::InvalidArgument(
                    "collection: 'id' is required if a collection filter is given".into(),
                )
            })?;
            let id = match id {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(GettyError::InvalidArgument(
                        "collection: 'id' must be a string or number".into(),
                    ))
                },
            };
            let depth = match collection.get("depth") {
                Some(depth) => string_field(depth, "collection depth")?.parse()?,
                None => CollectionDepth::default(),
            };
            query.collection = Some(CollectionFilter::new(id, depth));
        }

        if let Some(matches) = object.get("matches") {
            let uri = matches
                .get("uri")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let match_type = match matches.get("type") {
                Some(kind) => Some(string_field(kind, "matches type")?.parse()?),
                None => None,
            };
            query.matches = Some(MatchFilter::new(uri, match_type)?);
        }

        Ok(query)
    }
}

fn string_field<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| GettyError::InvalidArgument(format!("{name}: expected a string")))
}

/// Whether a search hit is a concept or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// A concept.
    Concept,
    /// A collection.
    Collection,
}

impl ResultType {
    /// Classifies a type IRI such as `skos:Concept` by its local name.
    #[must_use]
    pub fn from_type_uri(uri: &str) -> Option<Self> {
        let local = uri.rsplit(['#', '/']).next().unwrap_or_default();
        match local.to_ascii_lowercase().as_str() {
            "concept" => Some(Self::Concept),
            "collection" => Some(Self::Collection),
            _ => None,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept => f.write_str("concept"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// Vocabulary-local identifier.
    pub id: String,
    /// Entity URI.
    pub uri: String,
    /// Concept or collection.
    #[serde(rename = "type")]
    pub result_type: ResultType,
    /// Preferred label in the chosen language, or [`LABEL_NOT_AVAILABLE`].
    pub label: String,
    /// Language of `label`; empty when unknown.
    pub lang: String,
}

/// Field a result list is sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// The vocabulary-local id.
    #[default]
    Id,
    /// The label (`sortlabel` is accepted as an alias).
    Label,
}

impl SortKey {
    /// Compares two records on this key.
    #[must_use]
    pub fn compare(self, a: &ResultRecord, b: &ResultRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Label => a.label.cmp(&b.label),
        }
    }
}

impl FromStr for SortKey {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(Self::Id),
            "label" | "sortlabel" => Ok(Self::Label),
            other => Err(GettyError::InvalidArgument(format!(
                "sort: only 'id', 'label' or 'sortlabel' are allowed, got '{other}'"
            ))),
        }
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl FromStr for SortOrder {
    type Err = GettyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(GettyError::InvalidArgument(format!(
                "sort_order: only 'asc' or 'desc' are allowed, got '{other}'"
            ))),
        }
    }
}

/// Per-call presentation options for result lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// Preferred label language; the provider default when `None`.
    pub language: Option<String>,
    /// Sort key.
    pub sort: SortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl QueryOptions {
    /// Creates default options (provider language, ascending by id).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the sort key and direction.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey, order: SortOrder) -> Self {
        self.sort = sort;
        self.sort_order = order;
        self
    }
}
