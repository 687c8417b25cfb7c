//! Provider integration tests against a canned Getty service.
//!
//! These tests drive `GettyProvider` end to end (HTTP seam, RDF parsing,
//! subclass tables, mapping, SPARQL construction and ranking) without any
//! network access.

mod common;

use std::sync::Arc;

use common::{aat_provider, aat_service, FakeGetty};
use getty_skos::namespaces::{iri, skos, GVP, ISO_THES, SKOS};
use getty_skos::{
    GettyError, GettyProvider, LabelType, MatchType, NoteType, ProviderConfig, QueryOptions,
    ResultType, SortKey, SortOrder, SubclassCollector, Vocabulary, VocabularyProvider,
};

fn service() -> Arc<FakeGetty> {
    Arc::new(aat_service())
}

// ============================================================================
// Lookup by id
// ============================================================================

#[test]
fn test_get_concept_by_id() {
    let service = service();
    let aat = aat_provider(&service);

    let thing = aat.get_by_id("300007466", false).unwrap().unwrap();
    let concept = thing.as_concept().expect("a concept");

    assert_eq!(concept.id, "300007466");
    assert!(concept.uri.ends_with("/300007466"));
    assert_eq!(concept.label("nl").unwrap().label, "kerken");
    assert!(concept
        .labels
        .iter()
        .any(|l| l.language == "de" && l.label.contains("Kirche")));
    assert_eq!(concept.broader, vec!["300007391"]);
    assert_eq!(concept.narrower, vec!["300007560"]);
    assert_eq!(concept.related, vec!["300007501", "300264493"]);
    assert_eq!(concept.subordinate_arrays, vec!["300007473"]);
    assert_eq!(concept.matches[&MatchType::Exact], vec!["Q16970"]);
    assert!(concept.matches[&MatchType::Broad].is_empty());
}

#[test]
fn test_match_uris_become_ids() {
    let service = service();
    let aat = aat_provider(&service);
    let thing = aat.get_by_id("300007466", false).unwrap().unwrap();
    let concept = thing.as_concept().unwrap();

    assert_eq!(concept.matches[&MatchType::Close], vec!["sh85026348"]);
    assert!(concept
        .matches
        .values()
        .flatten()
        .all(|id| !id.contains('/')));
}

#[test]
fn test_concept_labels_keep_document_order_and_languages() {
    let service = service();
    let aat = aat_provider(&service);
    let thing = aat.get_by_id("300007466", false).unwrap().unwrap();

    let labels = thing.labels();
    assert_eq!(labels.len(), 7);
    assert_eq!(labels[3].language, "zh-latn-pinyin");
    assert_eq!(labels[4].label_type, LabelType::AltLabel);
    assert_eq!(labels[6].label, "churches");
    assert_eq!(labels[6].language, "und");
}

#[test]
fn test_concept_scheme_is_attached_and_shared() {
    let service = service();
    let aat = aat_provider(&service);

    let first = aat.get_by_id("300007466", false).unwrap().unwrap();
    let second = aat.get_by_id("300007473", false).unwrap().unwrap();

    let scheme = first.concept_scheme();
    assert_eq!(scheme.uri, "http://vocab.getty.edu/aat/");
    assert_eq!(
        scheme.label("en").unwrap().label,
        "Art & Architecture Thesaurus"
    );
    assert!(Arc::ptr_eq(scheme, second.concept_scheme()));

    let scheme_fetches = service
        .requests()
        .iter()
        .filter(|r| r.url == "http://vocab.getty.edu/aat.rdf")
        .count();
    assert_eq!(scheme_fetches, 1);
}

#[test]
fn test_scope_notes_are_not_duplicated() {
    let service = service();
    let aat = aat_provider(&service);
    let thing = aat.get_by_id("300007466", false).unwrap().unwrap();

    let notes = thing.notes();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.note_type == NoteType::ScopeNote));
    assert_eq!(notes[0].language, "en");
    assert_eq!(notes[1].language, "nl");
    assert!(notes[1].note.starts_with("Gebouwen"));
}

#[test]
fn test_change_notes_on_request() {
    let service = service();
    let aat = aat_provider(&service);
    let thing = aat.get_by_id("300007466", true).unwrap().unwrap();

    let notes = thing.notes();
    assert_eq!(notes.len(), 3);
    let change = notes
        .iter()
        .find(|n| n.note_type == NoteType::ChangeNote)
        .unwrap();
    assert_eq!(change.note, "created: new term at 2004-06-01T00:00:00 ");
    assert_eq!(change.language, "en");
}

#[test]
fn test_get_collection_by_id() {
    let service = service();
    let aat = aat_provider(&service);

    let thing = aat.get_by_id("300007473", false).unwrap().unwrap();
    let collection = thing.as_collection().expect("a collection");

    assert_eq!(collection.id, "300007473");
    assert!(collection.notes.is_empty());
    assert_eq!(collection.label("nl").unwrap().label, "<kerken naar vorm>");
    assert_eq!(collection.members, vec!["300007501", "300007560"]);
    assert_eq!(collection.superordinates, vec!["300007466"]);

    let queries = service.sparql_queries();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("PREFIX iso: <http://purl.org/iso25964/skos-thes#>"));
}

#[test]
fn test_get_by_id_is_idempotent() {
    let service = service();
    let aat = aat_provider(&service);
    let first = aat.get_by_id("300007466", false).unwrap();
    let second = aat.get_by_id("300007466", false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_id_is_not_found() {
    let service = service();
    let aat = aat_provider(&service);
    assert_eq!(aat.get_by_id("300999999", false).unwrap(), None);
    assert_eq!(aat.get_by_id("not/an/id", false).unwrap(), None);
}

#[test]
fn test_document_without_known_types_is_not_found() {
    let service = Arc::new(FakeGetty::new().with_document(
        "http://vocab.getty.edu/aat/1.rdf",
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="http://vocab.getty.edu/aat/1">
    <rdf:type rdf:resource="http://vocab.getty.edu/ontology#Subject"/>
  </rdf:Description>
</rdf:RDF>"#,
    ));
    let aat = aat_provider(&service);
    assert_eq!(aat.get_by_id("1", false).unwrap(), None);
}

#[test]
fn test_malformed_document_is_an_error() {
    let service = Arc::new(
        FakeGetty::new().with_document("http://vocab.getty.edu/aat/1.rdf", "<rdf:RDF"),
    );
    let aat = aat_provider(&service);
    let err = aat.get_by_id("1", false).unwrap_err();
    assert!(matches!(err, GettyError::MalformedData(_)));
}

#[test]
fn test_service_down_is_unavailable() {
    let service = Arc::new(FakeGetty::down());
    let aat = aat_provider(&service);
    let err = aat.get_by_id("300007466", false).unwrap_err();
    assert!(matches!(err, GettyError::UpstreamUnavailable { .. }));
    assert!(err.is_transient());
}

// ============================================================================
// Lookup by URI
// ============================================================================

#[test]
fn test_get_by_uri() {
    let service = service();
    let aat = aat_provider(&service);

    let thing = aat
        .get_by_uri("http://vocab.getty.edu/aat/300007466", false)
        .unwrap()
        .unwrap();
    assert_eq!(thing.id(), "300007466");

    let thing = aat
        .get_by_uri("http://vocab.getty.edu/aat/300007473/", false)
        .unwrap()
        .unwrap();
    assert_eq!(thing.id(), "300007473");
}

#[test]
fn test_get_by_uri_outside_vocabulary_host() {
    let service = service();
    let aat = aat_provider(&service);

    assert_eq!(
        aat.get_by_uri("http://id.loc.gov/authorities/subjects/300007466", false)
            .unwrap(),
        None
    );
    assert_eq!(service.request_count(), 0);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_find_concepts_by_label() {
    let service = service();
    let aat = aat_provider(&service);
    let query = getty_skos::FindQuery::from_json(&serde_json::json!({
        "label": "church",
        "type": "concept"
    }))
    .unwrap();

    let records = aat.find(&query, &QueryOptions::new()).unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["300007466", "300007501", "300007560"]);
    assert!(records.iter().all(|r| r.result_type == ResultType::Concept));
    assert!(records
        .iter()
        .all(|r| r.label.to_lowercase().contains("church")));

    let sent = &service.sparql_queries()[0];
    assert!(sent.contains("FILTER(?Type = skos:Concept)"));
    assert!(sent.contains("?Subject skos:inScheme aat: ."));
}

#[test]
fn test_find_ranks_by_requested_language() {
    let service = service();
    let aat = aat_provider(&service);
    let query = getty_skos::FindQuery::new().with_label("church");

    let dutch = aat
        .find(&query, &QueryOptions::new().with_language("nl"))
        .unwrap();
    let labels: Vec<_> = dutch.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["kerken", "kathedralen", "hallenkerken"]);
    assert!(dutch.iter().all(|r| r.lang == "nl"));

    let french = aat
        .find(&query, &QueryOptions::new().with_language("fr"))
        .unwrap();
    assert!(french.iter().all(|r| r.lang == "en"));
}

#[test]
fn test_find_uses_default_language() {
    let service = service();
    let config = ProviderConfig::new(Vocabulary::Aat).with_default_language("nl");
    let aat = GettyProvider::builder(config)
        .fetcher(service.clone())
        .build()
        .unwrap();

    let records = aat
        .find(&getty_skos::FindQuery::new().with_label("church"), &QueryOptions::new())
        .unwrap();
    assert_eq!(records[0].label, "kerken");
}

#[test]
fn test_find_sorted_by_label_descending() {
    let service = service();
    let aat = aat_provider(&service);
    let options = QueryOptions::new()
        .with_language("en")
        .sorted_by("sortlabel".parse::<SortKey>().unwrap(), SortOrder::Desc);

    let records = aat
        .find(&getty_skos::FindQuery::new().with_label("church"), &options)
        .unwrap();
    let labels: Vec<_> = records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["hall churches", "churches (buildings)", "cathedrals (churches)"]
    );
}

#[test]
fn test_invalid_queries_fail_before_network() {
    let service = service();
    let _aat = aat_provider(&service);

    for bad in [
        serde_json::json!({"type": "collectie"}),
        serde_json::json!({"collection": {"depth": "all"}}),
        serde_json::json!({"collection": {"id": "300007466", "depth": "deep"}}),
        serde_json::json!({"matches": {"type": "close"}}),
    ] {
        let err = getty_skos::FindQuery::from_json(&bad).unwrap_err();
        assert!(matches!(err, GettyError::InvalidArgument(_)), "{bad}");
    }
    assert_eq!(service.request_count(), 0);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn test_top_concepts() {
    let service = service();
    let aat = aat_provider(&service);

    let records = aat.get_top_concepts(&QueryOptions::new()).unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["300264086", "300264088", "300264092"]);
    assert_eq!(records[1].label, "<not available>");
    assert_eq!(records[1].lang, "");

    let dutch = aat
        .get_top_concepts(&QueryOptions::new().with_language("nl"))
        .unwrap();
    assert_eq!(dutch[0].label, "Objecten");
}

#[test]
fn test_top_display_includes_collections() {
    let service = service();
    let aat = aat_provider(&service);

    let records = aat.get_top_display(&QueryOptions::new()).unwrap();
    assert_eq!(records.len(), 4);
    let brand_names = records.iter().find(|r| r.id == "300343372").unwrap();
    assert_eq!(brand_names.result_type, ResultType::Collection);
}

#[test]
fn test_children_display() {
    let service = service();
    let aat = aat_provider(&service);

    let records = aat
        .get_children_display("300007466", &QueryOptions::new().with_language("nl"))
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "300007473");
    assert_eq!(records[0].label, "<kerken naar vorm>");
    assert_eq!(records[1].label, "hall churches");
}

#[test]
fn test_expand_concept_includes_itself() {
    let service = service();
    let aat = aat_provider(&service);

    let ids = aat.expand("300007466").unwrap().unwrap();
    assert!(ids.contains(&"300007466".to_string()));
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_expand_collection_excludes_itself() {
    let service = service();
    let aat = aat_provider(&service);

    let ids = aat.expand("300007473").unwrap().unwrap();
    assert!(!ids.contains(&"300007473".to_string()));
    assert_eq!(ids, vec!["300007501", "300007560"]);
}

#[test]
fn test_expand_unknown_id() {
    let service = service();
    let aat = aat_provider(&service);

    assert_eq!(aat.expand("300999999").unwrap(), None);
    assert!(service
        .requests()
        .iter()
        .any(|r| r.url == "http://vocab.getty.edu/aat/300999999.rdf"));
    assert_eq!(aat.expand("'; DROP").unwrap(), None);
}

#[test]
fn test_get_all_is_unsupported() {
    let service = service();
    let aat = aat_provider(&service);
    assert!(matches!(
        aat.get_all(&QueryOptions::new()),
        Err(GettyError::Unsupported(_))
    ));
}

// ============================================================================
// Subclass discovery
// ============================================================================

#[test]
fn test_refresh_subclasses_from_ontologies() {
    let service = service();
    let aat = aat_provider(&service);
    aat.refresh_subclasses();

    let sets = aat.subclasses().sets();
    assert!(sets.is_concept(skos::CONCEPT));
    assert!(sets.is_concept(&iri(GVP, "Concept")));
    assert!(sets.is_concept(&iri(GVP, "PersonConcept")));
    assert!(!sets.is_concept(&iri(GVP, "PhysPlaceConcept")));

    assert!(sets.is_collection(skos::COLLECTION));
    assert!(sets.is_collection(&iri(GVP, "GuideTerm")));
    assert!(sets.is_collection(&iri(ISO_THES, "ThesaurusArray")));
    assert!(sets.is_collection(&iri(GVP, "Hierarchy")));
    assert!(sets.is_collection(&iri(SKOS, "OrderedCollection")));
    assert!(!sets.is_collection(&iri(GVP, "ScopeNote")));

    // every namespace is fetched at most once, the missing SKOS-XL one included
    let mut urls: Vec<_> = service.requests().into_iter().map(|r| r.url).collect();
    let total = urls.len();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), total);
    assert!(urls.contains(&"http://www.w3.org/2008/05/skos-xl".to_string()));

    let thing = aat.get_by_id("300007473", false).unwrap().unwrap();
    assert!(thing.as_collection().is_some());
}

#[test]
fn test_shared_subclass_collector() {
    let service = service();
    let collector = Arc::new(SubclassCollector::gvp(service.clone()));

    let aat = GettyProvider::builder(ProviderConfig::new(Vocabulary::Aat))
        .fetcher(service.clone())
        .subclasses(Arc::clone(&collector))
        .build()
        .unwrap();
    let tgn = GettyProvider::builder(ProviderConfig::new(Vocabulary::Tgn))
        .fetcher(service.clone())
        .subclasses(Arc::clone(&collector))
        .build()
        .unwrap();

    aat.refresh_subclasses();
    assert!(Arc::ptr_eq(aat.subclasses(), tgn.subclasses()));
    assert!(tgn
        .subclasses()
        .get_subclasses(skos::COLLECTION)
        .contains(&iri(GVP, "GuideTerm")));
}
