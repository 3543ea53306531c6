//! Record classification
//!
//! Turns the heterogeneous records a source returns into keyword,
//! positional and note fragments. [`classify`] is pure: the same record
//! always yields the same fragment, and the caller owns bundle mutation.
//!
//! Dispatch order:
//!
//! 1. `Keyword` records, and everything from GO, become keywords
//! 2. Records with both coordinates positive become positional features,
//!    subject to the source's [`SourceStrategy`]
//! 3. UniProt `Protein name` records become the bundle summary; other
//!    sources' `Protein name` records are dropped
//! 4. `Taxonomy`, `Organism` and `Publication` are suppressed
//! 5. `Comment` records become notes
//! 6. Anything else becomes a synthesized note

pub mod strategy;

use crate::models::{
    AnnotationResponse, Bundle, BundleBuilder, KeywordEntry, NoteEntry, PositionalFeature,
    ProteinSummary, RawRecord, Segment,
};
use crate::parser::sanitize::{join_notes, strip_quotes};

pub use strategy::{RecordView, SourceStrategy};

const KEYWORD_CATEGORY: &str = "Keyword";
const TECHNICAL_TERM: &str = "technical_term";
const PROTEIN_NAME: &str = "Protein name";
const COMMENT: &str = "Comment";
const SUPPRESSED_CATEGORIES: [&str; 3] = ["Taxonomy", "Organism", "Publication"];

/// Why a record produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    TechnicalTerm,
    PositionalExcluded,
    Suppressed,
}

/// One classified unit of a source response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Keyword {
        category: String,
        entry: KeywordEntry,
    },
    Positional {
        bucket: String,
        feature: PositionalFeature,
    },
    Note(NoteEntry),
    Summary(ProteinSummary),
    Ignored(IgnoreReason),
}

impl Fragment {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Classify one record returned by `source` for `segment`
pub fn classify(source: &str, segment: &Segment, record: &RawRecord) -> Fragment {
    let category = record.type_category.as_deref().map(strip_quotes).unwrap_or_default();
    let type_text = record.type_text.as_deref().map(strip_quotes).unwrap_or_default();
    let label = record.label.as_deref().unwrap_or("");
    let first_link = record.links.first().map(|l| l.href.clone());

    if category == KEYWORD_CATEGORY || source == strategy::GO {
        let (category, name) = if source == strategy::GO {
            (category, type_text)
        } else {
            (type_text, label.to_string())
        };
        if category == TECHNICAL_TERM {
            return Fragment::Ignored(IgnoreReason::TechnicalTerm);
        }
        return Fragment::Keyword {
            category,
            entry: KeywordEntry {
                name,
                link: first_link,
            },
        };
    }

    if record.start > 0 && record.end > 0 {
        let policy = SourceStrategy::for_source(source);
        let view = RecordView::new(&segment.id, record, &category, &type_text);
        if !policy.include_positional(&view) {
            return Fragment::Ignored(IgnoreReason::PositionalExcluded);
        }
        return Fragment::Positional {
            bucket: policy.bucket_key(&view).to_string(),
            feature: PositionalFeature {
                name: policy.display_name(&view),
                start: record.start,
                end: record.end,
                notes: join_notes(&record.notes),
                links: record.links.clone(),
            },
        };
    }

    if category == PROTEIN_NAME {
        if source != strategy::UNIPROT {
            return Fragment::Ignored(IgnoreReason::Suppressed);
        }
        return Fragment::Summary(ProteinSummary {
            name: label.to_string(),
            href: first_link,
            full: join_notes(&record.notes),
            start: segment.start,
            stop: segment.stop,
        });
    }

    if SUPPRESSED_CATEGORIES.contains(&category.as_str()) {
        return Fragment::Ignored(IgnoreReason::Suppressed);
    }

    if category == COMMENT {
        return Fragment::Note(NoteEntry {
            text: join_notes(&record.notes).unwrap_or_default(),
            links: record.links.clone(),
        });
    }

    let method = record.method.as_deref().unwrap_or("");
    Fragment::Note(NoteEntry {
        text: format!("{type_text}, {category}, {label}, {method}"),
        links: record.links.clone(),
    })
}

/// Result of normalizing one response
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub bundle: Bundle,
    pub classified: usize,
    pub ignored: usize,
}

/// Classify every record of a response into one bundle
pub fn normalize(source: &str, response: &AnnotationResponse) -> Normalized {
    let mut builder = BundleBuilder::new();
    let mut ignored = 0;

    for record in &response.records {
        match classify(source, &response.segment, record) {
            Fragment::Keyword { category, entry } => builder.push_keyword(category, entry),
            Fragment::Positional { bucket, feature } => builder.push_positional(bucket, feature),
            Fragment::Note(note) => builder.push_note(note),
            Fragment::Summary(summary) => builder.set_summary(summary),
            Fragment::Ignored(_) => ignored += 1,
        }
    }

    Normalized {
        bundle: builder.build(),
        classified: response.records.len() - ignored,
        ignored,
    }
}
