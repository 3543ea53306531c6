// Core data structures for the protanno annotation pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accession sentinel meaning "several candidates matched, do not query"
pub const AMBIGUOUS_ACCESSION: &str = "__AMBIGUOUS__";

/// Placeholder used when no sequence could be obtained for an entity
pub const MISSING_SEQUENCE: &str = "MISSING";

/// Ordered category → entries mapping used by keyword and positional bins
pub type CategoryMap<T> = BTreeMap<String, Vec<T>>;

/// Outbound link attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

impl Link {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A remote annotation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name, also the key the classifier dispatches on
    pub name: String,

    /// DAS features endpoint
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Biological sequence record being annotated
#[derive(Debug, Clone, Default, Serialize)]
pub struct Entity {
    pub id: String,
    pub accession: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sequence: Option<String>,

    /// Manually curated positional features supplied with the input data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_annotations: Option<Vec<PositionalFeature>>,

    /// Positional features currently chosen for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed_features: Option<Vec<PositionalFeature>>,

    /// Normalized bundles keyed by source name
    pub bundles: BTreeMap<String, Bundle>,
}

impl Entity {
    /// Create an entity without accession or sequence
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Accession usable for remote queries
    ///
    /// Absent, empty and ambiguous accessions all yield `None`.
    pub fn queryable_accession(&self) -> Option<&str> {
        match self.accession.as_deref() {
            Some(acc) if !acc.is_empty() && acc != AMBIGUOUS_ACCESSION => Some(acc),
            _ => None,
        }
    }

    pub fn has_custom_annotations(&self) -> bool {
        self.custom_annotations.is_some()
    }

    /// Set the sequence, replacing the display name when a label is supplied
    pub fn init_sequence(&mut self, sequence: impl Into<String>, label: Option<&str>) {
        self.sequence = Some(sequence.into());
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            self.name = label.to_string();
        }
    }

    pub fn bundle(&self, source: &str) -> Option<&Bundle> {
        self.bundles.get(source)
    }
}

/// One feature of a source's response, as decoded from the wire
///
/// Coordinates are 0 when the record carries none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub label: Option<String>,
    pub type_category: Option<String>,
    pub type_text: Option<String>,
    pub method: Option<String>,
    pub start: u32,
    pub end: u32,
    pub notes: Vec<String>,
    pub links: Vec<Link>,
}

/// Segment header of an annotation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub start: Option<u32>,
    pub stop: Option<u32>,
}

/// Everything one source returned for one accession
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationResponse {
    pub segment: Segment,
    pub records: Vec<RawRecord>,

    /// Records whose coordinates were present but unreadable
    pub malformed: usize,
}

/// Result of a sequence lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
    pub label: Option<String>,
}

/// Keyword classified into a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Feature anchored to a 1-based inclusive residue range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalFeature {
    pub name: String,
    pub start: u32,
    pub end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// Free-text note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// Canonical name and description supplied by the general-knowledge source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProteinSummary {
    pub name: String,
    pub href: Option<String>,
    pub full: Option<String>,
    pub start: Option<u32>,
    pub stop: Option<u32>,
}

/// Normalized result for one entity and one source
///
/// A bin is `Some` only when at least one element was classified into it;
/// [`BundleBuilder`] is the only way to fill one, so an empty container is
/// never observable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<CategoryMap<KeywordEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    positional: Option<CategoryMap<PositionalFeature>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<Vec<NoteEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ProteinSummary>,
}

impl Bundle {
    pub fn keywords(&self) -> Option<&CategoryMap<KeywordEntry>> {
        self.keywords.as_ref()
    }

    pub fn positional(&self) -> Option<&CategoryMap<PositionalFeature>> {
        self.positional.as_ref()
    }

    pub fn notes(&self) -> Option<&[NoteEntry]> {
        self.notes.as_deref()
    }

    pub fn summary(&self) -> Option<&ProteinSummary> {
        self.summary.as_ref()
    }

    /// True when nothing at all was classified
    pub fn is_empty(&self) -> bool {
        self.keywords.is_none()
            && self.positional.is_none()
            && self.notes.is_none()
            && self.summary.is_none()
    }
}

/// Accumulates classified fragments into a [`Bundle`]
#[derive(Debug, Default)]
pub struct BundleBuilder {
    keywords: CategoryMap<KeywordEntry>,
    positional: CategoryMap<PositionalFeature>,
    notes: Vec<NoteEntry>,
    summary: Option<ProteinSummary>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_keyword(&mut self, category: impl Into<String>, entry: KeywordEntry) {
        self.keywords.entry(category.into()).or_default().push(entry);
    }

    pub fn push_positional(&mut self, bucket: impl Into<String>, feature: PositionalFeature) {
        self.positional.entry(bucket.into()).or_default().push(feature);
    }

    pub fn push_note(&mut self, note: NoteEntry) {
        self.notes.push(note);
    }

    /// Later summaries replace earlier ones
    pub fn set_summary(&mut self, summary: ProteinSummary) {
        self.summary = Some(summary);
    }

    pub fn build(self) -> Bundle {
        Bundle {
            keywords: (!self.keywords.is_empty()).then_some(self.keywords),
            positional: (!self.positional.is_empty()).then_some(self.positional),
            notes: (!self.notes.is_empty()).then_some(self.notes),
            summary: self.summary,
        }
    }
}
