//! Search-term highlighting for rendered annotation text
//!
//! Matches are collected as a span list over the plain text and turned into
//! markup in a single pass, so earlier insertions never shift later ones.
//!
//! Include patterns wrap every match in a highlight span. Exclude patterns
//! are only honoured inside an include span: such a match is additionally
//! wrapped in a `NOT` span, marking a hit the search filter rejects.
//!
//! ```
//! use protanno::highlight::Highlighter;
//!
//! let highlighter = Highlighter::new(&["b"], &[] as &[&str], false).unwrap();
//! assert_eq!(highlighter.highlight("abc"), "a<span class='highlight'>b</span>c");
//! ```

use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;

use crate::config::HighlightConfig;
use crate::error::Result;

pub const HIGHLIGHT_OPEN: &str = "<span class='highlight'>";
pub const EXCLUDE_OPEN: &str = "<span class='NOT'>";
pub const CLOSE: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpanKind {
    Include,
    Exclude,
}

impl SpanKind {
    fn open_tag(self) -> &'static str {
        match self {
            Self::Include => HIGHLIGHT_OPEN,
            Self::Exclude => EXCLUDE_OPEN,
        }
    }
}

/// Byte range `[start, end)` of the plain text to be wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl Span {
    fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Text field classes that can be highlighted independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Keyword,
    Positional,
    Note,
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    fields: HighlightConfig,
}

impl Highlighter {
    /// Compile include and exclude patterns
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::error::Error::Pattern) for the first
    /// pattern that fails to compile.
    pub fn new<I, E>(include: &[I], exclude: &[E], case_insensitive: bool) -> Result<Self>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
        };

        Ok(Self {
            include: include
                .iter()
                .map(|p| compile(p.as_ref()))
                .collect::<std::result::Result<_, _>>()?,
            exclude: exclude
                .iter()
                .map(|p| compile(p.as_ref()))
                .collect::<std::result::Result<_, _>>()?,
            fields: HighlightConfig {
                case_insensitive,
                ..HighlightConfig::default()
            },
        })
    }

    /// Build a highlighter honouring the configured field toggles
    pub fn from_config<I, E>(
        config: &HighlightConfig,
        include: &[I],
        exclude: &[E],
    ) -> Result<Self>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        let mut highlighter = Self::new(include, exclude, config.case_insensitive)?;
        highlighter.fields = config.clone();
        Ok(highlighter)
    }

    pub fn is_active(&self) -> bool {
        self.fields.enabled && !self.include.is_empty()
    }

    /// Collect the spans to be marked in `text`
    ///
    /// Include spans come first, in pattern order then occurrence order,
    /// followed by the exclude spans nested inside them.
    pub fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans: Vec<Span> = self
            .include
            .iter()
            .flat_map(|re| re.find_iter(text))
            .filter(|m| !m.is_empty())
            .map(|m| Span {
                start: m.start(),
                end: m.end(),
                kind: SpanKind::Include,
            })
            .collect();

        let included = spans.len();
        for re in &self.exclude {
            for m in re.find_iter(text).filter(|m| !m.is_empty()) {
                let candidate = Span {
                    start: m.start(),
                    end: m.end(),
                    kind: SpanKind::Exclude,
                };
                if spans[..included].iter().any(|s| s.contains(&candidate)) {
                    spans.push(candidate);
                }
            }
        }

        spans
    }

    /// Mark every match in `text`, or return it unchanged when inactive
    pub fn highlight(&self, text: &str) -> String {
        if !self.is_active() {
            return text.to_string();
        }
        materialize(text, &self.spans(text))
    }

    /// Highlight `text` if its field class is switched on
    pub fn highlight_field(&self, field: TextField, text: &str) -> String {
        let enabled = match field {
            TextField::Name => self.fields.names,
            TextField::Keyword => self.fields.keywords,
            TextField::Positional => self.fields.positional,
            TextField::Note => self.fields.notes,
        };
        if enabled {
            self.highlight(text)
        } else {
            text.to_string()
        }
    }
}

/// One-off highlight with case-insensitive patterns
pub fn highlight<I, E>(text: &str, include: &[I], exclude: &[E]) -> Result<String>
where
    I: AsRef<str>,
    E: AsRef<str>,
{
    Ok(Highlighter::new(include, exclude, true)?.highlight(text))
}

/// Insert the tags of every span into `text` in one pass
///
/// At a shared offset closing tags precede opening tags, and wider spans
/// open before the spans nested in them.
pub fn materialize(text: &str, spans: &[Span]) -> String {
    let mut tags: Vec<(usize, bool, Reverse<usize>, SpanKind, &'static str)> =
        Vec::with_capacity(spans.len() * 2);
    for span in spans {
        let width = Reverse(span.end - span.start);
        tags.push((span.start, true, width, span.kind, span.kind.open_tag()));
        tags.push((span.end, false, Reverse(0), span.kind, CLOSE));
    }
    tags.sort_by_key(|&(offset, opens, width, kind, _)| (offset, opens, width, kind));

    let markup: usize = tags.iter().map(|t| t.4.len()).sum();
    let mut marked = String::with_capacity(text.len() + markup);
    let mut cursor = 0;
    for (offset, _, _, _, tag) in tags {
        marked.push_str(&text[cursor..offset]);
        marked.push_str(tag);
        cursor = offset;
    }
    marked.push_str(&text[cursor..]);
    marked
}
