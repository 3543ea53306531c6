//! Per-source positional feature policies
//!
//! Each known provider has its own idea of which positional records are
//! worth showing and how they should be grouped. The rules below are
//! curated data; they are kept literally rather than generalized.

use crate::models::RawRecord;

pub const SUPERFAMILY: &str = "SuperFamily 1.75";
pub const UNIPROT: &str = "UniProt";
pub const GO: &str = "GO";
pub const PFAM: &str = "Pfam";
pub const INTERPRO: &str = "InterPro";

/// SuperFamily method naming a component rather than a domain
const COMPONENT_METHOD: &str = "Component";

const SECONDARY_STRUCTURE: &str = "Secondary structure";

/// UniProt categories never shown as positional features
const UNIPROT_EXCLUDED_CATEGORIES: [&str; 6] = [
    "Molecule processing",
    "Sequence variation",
    "Sequence conflict",
    "Site",
    "Experimental information",
    "Amino acid modification",
];

const PFAM_METHODS: [&str; 2] = ["Pfam-A", "Pfam-B"];

const INTERPRO_METHOD: &str = "GENE3D";

/// Fields of a record after quote stripping, as seen by a strategy
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub segment_id: &'a str,
    pub label: &'a str,
    pub category: &'a str,
    pub type_text: &'a str,
    pub method: &'a str,
    pub start: u32,
    pub end: u32,
}

impl<'a> RecordView<'a> {
    pub fn new(
        segment_id: &'a str,
        record: &'a RawRecord,
        category: &'a str,
        type_text: &'a str,
    ) -> Self {
        Self {
            segment_id,
            label: record.label.as_deref().unwrap_or(""),
            category,
            type_text,
            method: record.method.as_deref().unwrap_or(""),
            start: record.start,
            end: record.end,
        }
    }
}

/// Positional policy of one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Structural domain assignments (SuperFamily)
    StructuralDomain,
    /// General protein knowledge (UniProt)
    ProteinKnowledge,
    /// Domain family models (Pfam)
    DomainFamily,
    /// Cross-reference aggregation (InterPro)
    CrossReference,
    /// Anything else: include everything, bucket by category
    Generic,
}

impl SourceStrategy {
    pub fn for_source(name: &str) -> Self {
        match name {
            SUPERFAMILY => Self::StructuralDomain,
            UNIPROT => Self::ProteinKnowledge,
            PFAM => Self::DomainFamily,
            INTERPRO => Self::CrossReference,
            _ => Self::Generic,
        }
    }

    pub fn include_positional(&self, record: &RecordView<'_>) -> bool {
        match self {
            Self::StructuralDomain => record.method != COMPONENT_METHOD,
            Self::ProteinKnowledge => {
                record.category == SECONDARY_STRUCTURE
                    || !UNIPROT_EXCLUDED_CATEGORIES.contains(&record.category)
            }
            Self::DomainFamily => PFAM_METHODS.contains(&record.method),
            Self::CrossReference => record.method == INTERPRO_METHOD,
            Self::Generic => true,
        }
    }

    pub fn bucket_key<'a>(&self, record: &RecordView<'a>) -> &'a str {
        match self {
            Self::DomainFamily | Self::CrossReference => record.method,
            Self::StructuralDomain | Self::ProteinKnowledge | Self::Generic => record.category,
        }
    }

    pub fn display_name(&self, record: &RecordView<'_>) -> String {
        match self {
            Self::StructuralDomain => record.type_text.to_string(),
            Self::ProteinKnowledge if record.category == SECONDARY_STRUCTURE => {
                record.type_text.to_string()
            }
            Self::ProteinKnowledge => {
                let range = format!("_{}_{}", record.start, record.end);
                let mut name = record.label.replace(&range, "");
                if !record.segment_id.is_empty() {
                    name = name.replace(&format!("_{}", record.segment_id), "");
                }
                format!("{name} ({})", record.type_text)
            }
            Self::DomainFamily => {
                // Without a colon the whole label is the family, never an empty name
                let family = record.label.split(':').next().unwrap_or(record.label);
                format!("{family} ({})", record.type_text)
            }
            Self::CrossReference | Self::Generic => {
                format!("{} ({})", record.label, record.type_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(label: &'a str, category: &'a str, type_text: &'a str, method: &'a str) -> RecordView<'a> {
        RecordView {
            segment_id: "P12345",
            label,
            category,
            type_text,
            method,
            start: 10,
            end: 20,
        }
    }

    #[test]
    fn test_for_source() {
        assert_eq!(SourceStrategy::for_source("SuperFamily 1.75"), SourceStrategy::StructuralDomain);
        assert_eq!(SourceStrategy::for_source("UniProt"), SourceStrategy::ProteinKnowledge);
        assert_eq!(SourceStrategy::for_source("Pfam"), SourceStrategy::DomainFamily);
        assert_eq!(SourceStrategy::for_source("InterPro"), SourceStrategy::CrossReference);
        assert_eq!(SourceStrategy::for_source("Elsewhere"), SourceStrategy::Generic);
    }

    #[test]
    fn test_uniprot_excluded_categories() {
        let strategy = SourceStrategy::ProteinKnowledge;
        assert!(!strategy.include_positional(&view("x", "Site", "t", "")));
        assert!(!strategy.include_positional(&view("x", "Sequence conflict", "t", "")));
        assert!(strategy.include_positional(&view("x", "Region", "t", "")));
        assert!(strategy.include_positional(&view("x", "Secondary structure", "helix", "")));
    }

    #[test]
    fn test_uniprot_name_strips_range_and_segment() {
        let strategy = SourceStrategy::ProteinKnowledge;
        let record = view("DOMAIN_P12345_10_20", "Domain", "kinase", "");
        assert_eq!(strategy.display_name(&record), "DOMAIN (kinase)");
    }

    #[test]
    fn test_pfam_name_truncated_at_colon() {
        let strategy = SourceStrategy::DomainFamily;
        let record = view("PF00069:Pkinase", "Domain", "Protein kinase", "Pfam-A");
        assert!(strategy.include_positional(&record));
        assert_eq!(strategy.bucket_key(&record), "Pfam-A");
        assert_eq!(strategy.display_name(&record), "PF00069 (Protein kinase)");

        assert!(!strategy.include_positional(&view("x", "Domain", "t", "HMMER")));
    }

    #[test]
    fn test_pfam_label_without_colon_is_kept_whole_not_emptied() {
        // Truncating at a missing colon would leave " (kinase)"; the full label is kept instead
        let strategy = SourceStrategy::DomainFamily;
        let record = view("Pkinase", "Domain", "kinase", "Pfam-B");
        assert_eq!(strategy.display_name(&record), "Pkinase (kinase)");
    }

    #[test]
    fn test_interpro_only_gene3d() {
        let strategy = SourceStrategy::CrossReference;
        let record = view("G3DSA:1.10", "Domain", "domain", "GENE3D");
        assert!(strategy.include_positional(&record));
        assert_eq!(strategy.bucket_key(&record), "GENE3D");
        assert!(!strategy.include_positional(&view("x", "Domain", "t", "PROSITE")));
    }
}
