//! Common test utilities

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use protanno::crawler::AnnotationTransport;
use protanno::models::{
    AnnotationResponse, Entity, Link, RawRecord, Segment, SequenceRecord, Source,
};
use protanno::utils::error::FetchError;

/// Source name recorded for sequence lookups in [`MockTransport::calls`]
pub const SEQUENCE_CALL: &str = "sequence";

/// In-memory transport recording every request it receives
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<(String, String)>>,
    annotations: HashMap<(String, String), AnnotationResponse>,
    failing: HashSet<(String, String)>,
    sequences: HashMap<String, SequenceRecord>,
    delays: HashMap<String, Duration>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `source` lookups of `accession` with `response`
    pub fn with_annotations(
        mut self,
        source: &str,
        accession: &str,
        response: AnnotationResponse,
    ) -> Self {
        self.annotations
            .insert((source.to_string(), accession.to_string()), response);
        self
    }

    /// Fail `source` lookups of `accession` with a server error
    pub fn failing(mut self, source: &str, accession: &str) -> Self {
        self.failing
            .insert((source.to_string(), accession.to_string()));
        self
    }

    /// Answer sequence lookups of `accession`; unknown accessions get a 404
    pub fn with_sequence(mut self, accession: &str, sequence: &str, label: Option<&str>) -> Self {
        self.sequences.insert(
            accession.to_string(),
            SequenceRecord {
                id: accession.to_string(),
                sequence: sequence.to_string(),
                label: label.map(str::to_string),
            },
        );
        self
    }

    /// Delay sequence lookups of `accession`
    pub fn with_sequence_delay(mut self, accession: &str, delay: Duration) -> Self {
        self.delays.insert(accession.to_string(), delay);
        self
    }

    /// Every request so far as `(source, accession)`, in issue order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn annotation_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter(|(source, _)| source != SEQUENCE_CALL)
            .collect()
    }

    fn record(&self, source: &str, accession: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), accession.to_string()));
    }
}

#[async_trait]
impl AnnotationTransport for MockTransport {
    async fn fetch_annotations(
        &self,
        source: &Source,
        accession: &str,
    ) -> Result<AnnotationResponse, FetchError> {
        self.record(&source.name, accession);

        let key = (source.name.clone(), accession.to_string());
        if self.failing.contains(&key) {
            return Err(FetchError::ServerError(500));
        }
        Ok(self.annotations.get(&key).cloned().unwrap_or_default())
    }

    async fn fetch_sequence(&self, accession: &str) -> Result<SequenceRecord, FetchError> {
        self.record(SEQUENCE_CALL, accession);

        if let Some(delay) = self.delays.get(accession) {
            tokio::time::sleep(*delay).await;
        }
        self.sequences
            .get(accession)
            .cloned()
            .ok_or(FetchError::ServerError(404))
    }
}

/// Entity with an accession and a sequence already in place
#[allow(dead_code)]
pub fn sequenced_entity(accession: &str) -> Entity {
    Entity::new(accession, format!("{accession}_HUMAN"))
        .with_accession(accession)
        .with_sequence("MKTAYIAKQR")
}

/// Response holding one record for `segment`
#[allow(dead_code)]
pub fn single_record_response(segment: &str, record: RawRecord) -> AnnotationResponse {
    AnnotationResponse {
        segment: Segment {
            id: segment.to_string(),
            start: Some(1),
            stop: Some(350),
        },
        records: vec![record],
        malformed: 0,
    }
}

/// Positional record as SuperFamily reports it
#[allow(dead_code)]
pub fn superfamily_domain(category: &str, start: u32, end: u32) -> RawRecord {
    RawRecord {
        label: Some("SSF56112".to_string()),
        type_category: Some(category.to_string()),
        type_text: Some("Protein kinase-like (PK-like)".to_string()),
        method: Some("Domain".to_string()),
        start,
        end,
        notes: Vec::new(),
        links: vec![Link::new("http://supfam.org/SSF56112", "SSF56112")],
    }
}

/// Keyword record as UniProt reports it
#[allow(dead_code)]
pub fn uniprot_keyword(category: &str, name: &str) -> RawRecord {
    RawRecord {
        label: Some(name.to_string()),
        type_category: Some("Keyword".to_string()),
        type_text: Some(category.to_string()),
        method: Some("UniProt".to_string()),
        ..RawRecord::default()
    }
}

/// A DASGFF document with one positional and one keyword feature
#[allow(dead_code)]
pub const FEATURES_XML: &str = r#"<?xml version="1.0" standalone="no"?>
<DASGFF>
  <GFF href="http://example.org/das/features?segment=P12345">
    <SEGMENT id="P12345" start="1" stop="350" version="1">
      <FEATURE id="f1" label="HELIX_P12345_10_20">
        <TYPE id="helix" category="Secondary structure">helix</TYPE>
        <METHOD id="m">UniProt</METHOD>
        <START>10</START>
        <END>20</END>
      </FEATURE>
      <FEATURE id="f2" label="Kinase">
        <TYPE id="kw" category="Keyword">Function</TYPE>
        <START>0</START>
        <END>0</END>
        <LINK href="http://example.org/kw/kinase">Kinase</LINK>
      </FEATURE>
    </SEGMENT>
  </GFF>
</DASGFF>"#;

/// A DASSEQUENCE document for P12345
#[allow(dead_code)]
pub const SEQUENCE_XML: &str = r#"<?xml version="1.0" standalone="no"?>
<DASSEQUENCE>
  <SEQUENCE id="P12345" start="1" stop="20" version="1" label="KIN1_HUMAN">
    MKTAYIAKQR
    QISFVKSHFS
  </SEQUENCE>
</DASSEQUENCE>"#;
