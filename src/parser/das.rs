//! DAS document decoding
//!
//! Features come back as DASGFF documents and sequences as DASSEQUENCE
//! documents. Only the first segment of a features document is read; a
//! document without any segment is an empty response.

use serde::Deserialize;

use crate::models::{AnnotationResponse, Link, RawRecord, Segment, SequenceRecord};
use crate::utils::error::ParseError;
use crate::utils::strip_whitespace;

#[derive(Debug, Deserialize)]
#[serde(rename = "DASGFF")]
struct DasGffXml {
    #[serde(rename = "GFF", default)]
    gff: Option<GffXml>,
}

#[derive(Debug, Deserialize)]
struct GffXml {
    #[serde(rename = "SEGMENT", default)]
    segments: Vec<SegmentXml>,
}

#[derive(Debug, Deserialize)]
struct SegmentXml {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@start", default)]
    start: Option<String>,
    #[serde(rename = "@stop", default)]
    stop: Option<String>,
    #[serde(rename = "FEATURE", default)]
    features: Vec<FeatureXml>,
}

#[derive(Debug, Deserialize)]
struct FeatureXml {
    #[serde(rename = "@label", default)]
    label: Option<String>,
    #[serde(rename = "TYPE", default)]
    kind: Option<TypeXml>,
    #[serde(rename = "METHOD", default)]
    method: Option<TextXml>,
    #[serde(rename = "START", default)]
    start: Option<String>,
    #[serde(rename = "END", default)]
    end: Option<String>,
    #[serde(rename = "NOTE", default)]
    notes: Vec<String>,
    #[serde(rename = "LINK", default)]
    links: Vec<LinkXml>,
}

#[derive(Debug, Deserialize)]
struct TypeXml {
    #[serde(rename = "@category", default)]
    category: Option<String>,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextXml {
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkXml {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "DASSEQUENCE")]
struct DasSequenceXml {
    #[serde(rename = "SEQUENCE", default)]
    sequences: Vec<SequenceXml>,
}

#[derive(Debug, Deserialize)]
struct SequenceXml {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@label", default)]
    label: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

/// Outcome of reading one coordinate field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coordinate {
    Absent,
    Value(u32),
    Unreadable,
}

impl Coordinate {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Absent,
            Some(text) => text.parse().map(Self::Value).unwrap_or(Self::Unreadable),
        }
    }

    fn value(self) -> u32 {
        match self {
            Self::Value(v) => v,
            Self::Absent | Self::Unreadable => 0,
        }
    }

    fn value_opt(self) -> Option<u32> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Unreadable => None,
        }
    }
}

/// Decode a DASGFF features document
pub fn parse_features(xml: &str) -> Result<AnnotationResponse, ParseError> {
    let parsed: DasGffXml =
        quick_xml::de::from_str(xml).map_err(|e| ParseError::MalformedXml {
            document: "DASGFF",
            reason: e.to_string(),
        })?;

    let Some(segment) = parsed.gff.and_then(|gff| gff.segments.into_iter().next()) else {
        return Ok(AnnotationResponse::default());
    };

    let mut malformed = 0;
    let records = segment
        .features
        .into_iter()
        .map(|feature| {
            let start = Coordinate::parse(feature.start.as_deref());
            let end = Coordinate::parse(feature.end.as_deref());
            if start == Coordinate::Unreadable || end == Coordinate::Unreadable {
                malformed += 1;
            }

            let (type_category, type_text) = match feature.kind {
                Some(kind) => (kind.category, kind.text),
                None => (None, None),
            };

            RawRecord {
                label: feature.label,
                type_category,
                type_text,
                method: feature.method.and_then(|m| m.text),
                start: start.value(),
                end: end.value(),
                notes: feature.notes,
                links: feature
                    .links
                    .into_iter()
                    .map(|l| Link::new(l.href, l.text))
                    .collect(),
            }
        })
        .collect();

    Ok(AnnotationResponse {
        segment: Segment {
            id: segment.id,
            start: Coordinate::parse(segment.start.as_deref()).value_opt(),
            stop: Coordinate::parse(segment.stop.as_deref()).value_opt(),
        },
        records,
        malformed,
    })
}

/// Decode a DASSEQUENCE document, returning its first sequence
pub fn parse_sequence(xml: &str) -> Result<SequenceRecord, ParseError> {
    let parsed: DasSequenceXml =
        quick_xml::de::from_str(xml).map_err(|e| ParseError::MalformedXml {
            document: "DASSEQUENCE",
            reason: e.to_string(),
        })?;

    let sequence = parsed
        .sequences
        .into_iter()
        .next()
        .ok_or(ParseError::SequenceNotFound)?;

    Ok(SequenceRecord {
        id: sequence.id,
        sequence: strip_whitespace(&sequence.text),
        label: sequence.label,
    })
}
