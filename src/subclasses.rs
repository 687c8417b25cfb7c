//! Discovery of the RDF classes that count as SKOS concepts and collections.
//!
//! Getty resources are rarely typed `skos:Concept` directly; they carry GVP
//! ontology classes such as `gvp:PersonConcept` or `gvp:GuideTerm` that are
//! declared, possibly through several hops and across ontologies, as
//! `rdfs:subClassOf` a SKOS class. [`SubclassCollector`] answers "which
//! classes are (transitive) subclasses of X" by loading ontology documents
//! on demand and walking the `subClassOf` edges breadth-first.
//!
//! Pre-seeded tables for `skos:Concept` and `skos:Collection` make the
//! collector usable without any network access; [`SubclassCollector::collect_subclasses`]
//! recomputes a table from the live ontologies and replaces the default.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use tracing::{debug, warn};

use crate::error::{GettyError, Result};
use crate::http::{FetchResponse, HttpFetch};
use crate::namespaces::{iri, skos, terms, GVP, ISO_THES, SKOS};
use crate::rdf::{RdfGraph, RDF_XML_MIME};

lazy_static! {
    /// Known subclasses of `skos:Concept` in the GVP ontology, root first.
    pub static ref DEFAULT_CONCEPT_SUBCLASSES: Vec<String> = vec![
        skos::CONCEPT.to_string(),
        iri(GVP, "Concept"),
        iri(GVP, "PhysPlaceConcept"),
        iri(GVP, "PhysAdminPlaceConcept"),
        iri(GVP, "AdminPlaceConcept"),
        iri(GVP, "PersonConcept"),
        iri(GVP, "GroupConcept"),
        iri(GVP, "UnknownPersonConcept"),
    ];

    /// Known subclasses of `skos:Collection` in the GVP ontology, root first.
    pub static ref DEFAULT_COLLECTION_SUBCLASSES: Vec<String> = vec![
        skos::COLLECTION.to_string(),
        iri(SKOS, "OrderedCollection"),
        iri(ISO_THES, "ThesaurusArray"),
        iri(GVP, "Hierarchy"),
        iri(GVP, "Facet"),
        iri(GVP, "GuideTerm"),
    ];
}

/// Loads the ontology published at a namespace IRI.
pub trait OntologySource: Send + Sync + fmt::Debug {
    /// Loads and parses the ontology for `namespace` (e.g. `http://vocab.getty.edu/ontology#`).
    ///
    /// # Errors
    ///
    /// Any error makes the collector treat the namespace as unavailable.
    fn load(&self, namespace: &str) -> Result<RdfGraph>;
}

/// [`OntologySource`] that dereferences the namespace over HTTP as RDF/XML.
#[derive(Debug, Clone)]
pub struct HttpOntologySource {
    fetcher: Arc<dyn HttpFetch>,
}

impl HttpOntologySource {
    /// Creates a source that fetches through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }
}

impl OntologySource for HttpOntologySource {
    fn load(&self, namespace: &str) -> Result<RdfGraph> {
        let url = namespace.trim_end_matches('#');
        match self
            .fetcher
            .get(url, &[], Some(RDF_XML_MIME))?
        {
            FetchResponse::Found(body) => RdfGraph::parse(&body),
            FetchResponse::NotFound => Err(GettyError::unavailable(url, "ontology not found")),
        }
    }
}

/// The `subClassOf` edges of one ontology document.
#[derive(Debug, Default)]
struct ClassEdges {
    /// Subjects with at least one `subClassOf` edge, in document order.
    subjects: Vec<String>,
    /// child -> direct parents
    parents: HashMap<String, Vec<String>>,
}

impl ClassEdges {
    fn from_graph(graph: &RdfGraph) -> Self {
        let mut edges = Self::default();
        for triple in graph.triples_with_predicate(terms::RDFS_SUBCLASS_OF) {
            let (Some(child), Some(parent)) = (triple.subject.as_iri(), triple.object.as_iri())
            else {
                continue;
            };
            let parents = edges.parents.entry(child.to_string()).or_insert_with(|| {
                edges.subjects.push(child.to_string());
                Vec::new()
            });
            parents.push(parent.to_string());
        }
        edges
    }
}

/// A cached ontology, or the marker for one that could not be loaded.
#[derive(Debug)]
enum Ontology {
    Loaded(ClassEdges),
    Unavailable,
}

impl Ontology {
    fn parents(&self, class: &str) -> &[String] {
        match self {
            Self::Loaded(edges) => edges.parents.get(class).map(Vec::as_slice).unwrap_or(&[]),
            Self::Unavailable => &[],
        }
    }
}

/// Returns the namespace part of a class IRI: everything up to and including
/// the `#`, or up to the last `/` for slash namespaces.
#[must_use]
pub fn namespace_of(class: &str) -> &str {
    if let Some(pos) = class.find('#') {
        &class[..=pos]
    } else if let Some(pos) = class.rfind('/') {
        &class[..=pos]
    } else {
        class
    }
}

/// Membership sets for the two SKOS roots, as consumed by the graph mapper.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubclassSets {
    /// `skos:Concept` and everything below it.
    pub concept: HashSet<String>,
    /// `skos:Collection` and everything below it.
    pub collection: HashSet<String>,
}

impl SubclassSets {
    /// Returns true if `class` denotes a concept.
    #[must_use]
    pub fn is_concept(&self, class: &str) -> bool {
        self.concept.contains(class)
    }

    /// Returns true if `class` denotes a collection.
    #[must_use]
    pub fn is_collection(&self, class: &str) -> bool {
        self.collection.contains(class)
    }
}

/// Computes and caches the transitive subclasses of RDF classes.
///
/// Ontology documents are fetched once per namespace and kept for the life
/// of the collector, including the fact that a namespace is unreachable.
/// Concurrent first use may load the same namespace twice; the first stored
/// result wins.
pub struct SubclassCollector {
    namespace: String,
    source: Arc<dyn OntologySource>,
    ontologies: RwLock<HashMap<String, Arc<Ontology>>>,
    subclasses: RwLock<HashMap<String, Vec<String>>>,
}

impl fmt::Debug for SubclassCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubclassCollector")
            .field("namespace", &self.namespace)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SubclassCollector {
    /// Creates a collector rooted at `namespace`, pre-seeded with the default
    /// `skos:Concept` and `skos:Collection` tables.
    #[must_use]
    pub fn new(namespace: impl Into<String>, source: Arc<dyn OntologySource>) -> Self {
        let mut tables = HashMap::new();
        tables.insert(skos::CONCEPT.to_string(), DEFAULT_CONCEPT_SUBCLASSES.clone());
        tables.insert(
            skos::COLLECTION.to_string(),
            DEFAULT_COLLECTION_SUBCLASSES.clone(),
        );
        Self {
            namespace: namespace.into(),
            source,
            ontologies: RwLock::new(HashMap::new()),
            subclasses: RwLock::new(tables),
        }
    }

    /// Creates a collector for the GVP ontology that loads documents through `fetcher`.
    #[must_use]
    pub fn gvp(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self::new(GVP, Arc::new(HttpOntologySource::new(fetcher)))
    }

    /// Returns the root ontology namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the current table for `class` without touching the network.
    ///
    /// Classes that were never collected and have no default yield `[class]`.
    #[must_use]
    pub fn get_subclasses(&self, class: &str) -> Vec<String> {
        read_lock(&self.subclasses)
            .get(class)
            .cloned()
            .unwrap_or_else(|| vec![class.to_string()])
    }

    /// Returns membership sets for `skos:Concept` and `skos:Collection`.
    #[must_use]
    pub fn sets(&self) -> SubclassSets {
        SubclassSets {
            concept: self.get_subclasses(skos::CONCEPT).into_iter().collect(),
            collection: self.get_subclasses(skos::COLLECTION).into_iter().collect(),
        }
    }

    /// Recomputes the subclasses of `class` from the ontologies and stores the result.
    ///
    /// The result starts with `class` itself. Every class with a `subClassOf`
    /// edge in the root ontology is tested; when a chain of edges leads to a
    /// class already in the result, every class on that chain is added.
    /// Unreachable ontologies contribute nothing.
    pub fn collect_subclasses(&self, class: &str) -> Vec<String> {
        let mut found = vec![class.to_string()];
        let mut known: HashSet<String> = found.iter().cloned().collect();

        let root = self.ontology(&self.namespace);
        if let Ontology::Loaded(edges) = root.as_ref() {
            for subject in &edges.subjects {
                if known.contains(subject) {
                    continue;
                }
                if let Some(chain) = self.chain_to_known(subject, &known) {
                    for node in chain {
                        if known.insert(node.clone()) {
                            found.push(node);
                        }
                    }
                }
            }
        }

        debug!(class, count = found.len(), "collected subclasses");
        write_lock(&self.subclasses).insert(class.to_string(), found.clone());
        found
    }

    /// Breadth-first search from `start` along `subClassOf` edges.
    ///
    /// Returns the chain `start, ..., last` where `last` has a parent in
    /// `known`, or `None` if no known class is reachable. The `visited` set
    /// terminates cycles.
    fn chain_to_known(&self, start: &str, known: &HashSet<String>) -> Option<Vec<String>> {
        let mut previous: HashMap<String, String> = HashMap::new();
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut queue = VecDeque::from([start.to_string()]);

        while let Some(node) = queue.pop_front() {
            let ontology = self.ontology(namespace_of(&node));
            for parent in ontology.parents(&node) {
                if known.contains(parent) {
                    let mut chain = vec![node.clone()];
                    let mut cursor = &node;
                    while let Some(child) = previous.get(cursor) {
                        chain.push(child.clone());
                        cursor = child;
                    }
                    chain.reverse();
                    return Some(chain);
                }
                if visited.insert(parent.clone()) {
                    previous.insert(parent.clone(), node.clone());
                    queue.push_back(parent.clone());
                }
            }
        }
        None
    }

    /// Returns the cached ontology for `namespace`, loading it on first use.
    fn ontology(&self, namespace: &str) -> Arc<Ontology> {
        if let Some(cached) = read_lock(&self.ontologies).get(namespace) {
            return Arc::clone(cached);
        }

        let loaded = match self.source.load(namespace) {
            Ok(graph) => Ontology::Loaded(ClassEdges::from_graph(&graph)),
            Err(e) => {
                warn!(namespace, error = %e, "ontology unavailable, no subclasses from it");
                Ontology::Unavailable
            },
        };

        Arc::clone(
            write_lock(&self.ontologies)
                .entry(namespace.to_string())
                .or_insert_with(|| Arc::new(loaded)),
        )
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
