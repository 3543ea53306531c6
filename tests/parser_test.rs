//! Decoding tests: MI-JSON input and DAS documents through the classifier

mod common;

use common::FEATURES_XML;
use protanno::classifier::normalize;
use protanno::error::{Error, ErrorCategory, ProtannoErrorTrait};
use protanno::models::MISSING_SEQUENCE;
use protanno::parser::{load_entities, parse_features, read_entities};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const INTERACTORS: &str = r#"{
  "data": [
    {
      "object": "interactor",
      "id": 1,
      "label": "KIN1_HUMAN",
      "identifier": {"db": "uniprotkb", "id": "P12345"},
      "type": {"name": "protein"},
      "organism": {"scientific": "Homo sapiens", "common": "Human", "taxid": "9606"}
    },
    {
      "object": "interaction",
      "id": 7,
      "source": 1,
      "target": 2
    },
    {
      "object": "interactor",
      "id": 2,
      "identifier": {"db": "chebi", "id": "CHEBI:15422"},
      "type": {"name": "small molecule"}
    }
  ]
}"#;

#[test]
fn test_load_interactors_in_document_order() {
    let entities = load_entities(INTERACTORS).unwrap();
    assert_eq!(entities.len(), 2);

    let protein = &entities[0];
    assert_eq!(protein.id, "P12345");
    assert_eq!(protein.name, "KIN1_HUMAN");
    assert_eq!(protein.queryable_accession(), Some("P12345"));
    assert_eq!(
        protein.description.as_deref(),
        Some("protein, Homo sapiens(Human), P12345")
    );
    assert_eq!(protein.sequence, None);

    let molecule = &entities[1];
    assert_eq!(molecule.name, "CHEBI:15422");
    assert_eq!(molecule.queryable_accession(), None);
    assert_eq!(molecule.sequence.as_deref(), Some(MISSING_SEQUENCE));
}

#[test]
fn test_load_rejects_non_json() {
    assert!(load_entities("<xml/>").is_err());
}

#[test]
fn test_features_document_normalizes_into_bundle() {
    let response = parse_features(FEATURES_XML).unwrap();
    let normalized = normalize("UniProt", &response);

    assert_eq!(normalized.classified, 2);
    assert_eq!(normalized.ignored, 0);

    let bundle = normalized.bundle;
    let helices = &bundle.positional().unwrap()["Secondary structure"];
    assert_eq!(helices[0].name, "helix");
    assert_eq!((helices[0].start, helices[0].end), (10, 20));

    let function = &bundle.keywords().unwrap()["Function"];
    assert_eq!(function[0].name, "Kinase");
    assert_eq!(
        function[0].link.as_deref(),
        Some("http://example.org/kw/kinase")
    );
}

#[tokio::test]
async fn test_read_entities_reports_io_and_parse_failures() {
    let missing = read_entities(Path::new("/nonexistent/interactors.json"))
        .await
        .unwrap_err();
    assert!(matches!(missing, Error::Io(_)));
    assert_eq!(missing.category(), ErrorCategory::Storage);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"<xml/>").unwrap();
    let malformed = read_entities(file.path()).await.unwrap_err();
    assert!(matches!(malformed, Error::Parse(_)));
    assert_eq!(malformed.category(), ErrorCategory::Parsing);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(INTERACTORS.as_bytes()).unwrap();
    assert_eq!(read_entities(file.path()).await.unwrap().len(), 2);
}
