//! Annotation info rendering with Handlebars
//!
//! Produces the per-entity annotation panel: heading, UniProt summary,
//! then every source's notes, keywords and positional feature tables. Text
//! fields pass through the [`Highlighter`] according to its field toggles.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classifier::strategy::UNIPROT;
use crate::error::Result;
use crate::highlight::{Highlighter, TextField};
use crate::models::{Bundle, Entity, Link};

const ANNOTATION_TEMPLATE: &str = include_str!("../../templates/annotation.hbs");

#[derive(Debug, Serialize)]
struct AnnotationView {
    name: String,
    accession: Option<String>,
    accession_raw: Option<String>,
    description: Option<String>,
    summary: Option<SummaryView>,
    sources: Vec<SourceView>,
}

#[derive(Debug, Serialize)]
struct SummaryView {
    name: String,
    href: Option<String>,
    full: Option<String>,
    start: Option<u32>,
    stop: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SourceView {
    source: String,
    notes: Vec<NoteView>,
    keywords: Vec<KeywordCategoryView>,
    positional: Vec<PositionalCategoryView>,
}

#[derive(Debug, Serialize)]
struct NoteView {
    text: String,
    links: Vec<Link>,
}

#[derive(Debug, Serialize)]
struct KeywordCategoryView {
    category: String,
    entries: Vec<KeywordView>,
}

#[derive(Debug, Serialize)]
struct KeywordView {
    name: String,
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct PositionalCategoryView {
    category: String,
    features: Vec<FeatureView>,
}

#[derive(Debug, Serialize)]
struct FeatureView {
    name: String,
    start: u32,
    end: u32,
    notes: Option<String>,
    links: Vec<Link>,
}

pub struct AnnotationRenderer<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> AnnotationRenderer<'a> {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("annotation", ANNOTATION_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Render one entity's annotation panel
    pub fn render(&self, entity: &Entity, highlighter: &Highlighter) -> Result<String> {
        let view = build_view(entity, highlighter);
        Ok(self.handlebars.render("annotation", &view)?)
    }

    /// Render every entity into `<dir>/<id>.html`, creating `dir` if needed
    pub async fn write_panels(
        &self,
        entities: &[Entity],
        highlighter: &Highlighter,
        dir: &Path,
    ) -> Result<usize> {
        tokio::fs::create_dir_all(dir).await?;

        for entity in entities {
            let html = self.render(entity, highlighter)?;
            tokio::fs::write(panel_path(dir, &entity.id), html).await?;
        }

        tracing::info!(panels = entities.len(), dir = %dir.display(), "Annotation panels rendered");
        Ok(entities.len())
    }
}

/// Panel file for an entity, with path-unsafe id characters replaced
pub fn panel_path(dir: &Path, id: &str) -> PathBuf {
    let stem: String = id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    dir.join(format!("{stem}.html"))
}

fn build_view(entity: &Entity, highlighter: &Highlighter) -> AnnotationView {
    let names = |text: &str| highlighter.highlight_field(TextField::Name, text);

    let summary = entity
        .bundle(UNIPROT)
        .and_then(Bundle::summary)
        .map(|s| SummaryView {
            name: names(&s.name),
            href: s.href.clone(),
            full: s.full.as_deref().map(names),
            start: s.start,
            stop: s.stop,
        });

    // UniProt first, then the rest in name order
    let uniprot = entity.bundle(UNIPROT).map(|b| (UNIPROT, b));
    let others = entity
        .bundles
        .iter()
        .filter(|(source, _)| source.as_str() != UNIPROT)
        .map(|(source, bundle)| (source.as_str(), bundle));
    let sources = uniprot
        .into_iter()
        .chain(others)
        .map(|(source, bundle)| source_view(source, bundle, highlighter))
        .collect();

    AnnotationView {
        name: names(&entity.name),
        accession: entity.accession.as_deref().map(names),
        accession_raw: entity.accession.clone(),
        description: entity.description.as_deref().map(names),
        summary,
        sources,
    }
}

fn source_view(source: &str, bundle: &Bundle, highlighter: &Highlighter) -> SourceView {
    let notes = bundle
        .notes()
        .unwrap_or_default()
        .iter()
        .map(|n| NoteView {
            text: highlighter.highlight_field(TextField::Note, &n.text),
            links: n.links.clone(),
        })
        .collect();

    let keywords = bundle
        .keywords()
        .into_iter()
        .flatten()
        .map(|(category, entries)| KeywordCategoryView {
            category: category.clone(),
            entries: entries
                .iter()
                .map(|k| KeywordView {
                    name: highlighter.highlight_field(TextField::Keyword, &k.name),
                    link: k.link.clone(),
                })
                .collect(),
        })
        .collect();

    let positional = bundle
        .positional()
        .into_iter()
        .flatten()
        .map(|(category, features)| PositionalCategoryView {
            category: category.clone(),
            features: features
                .iter()
                .map(|f| FeatureView {
                    name: highlighter.highlight_field(TextField::Positional, &f.name),
                    start: f.start,
                    end: f.end,
                    notes: f.notes.clone(),
                    links: f.links.clone(),
                })
                .collect(),
        })
        .collect();

    SourceView {
        source: source.to_string(),
        notes,
        keywords,
        positional,
    }
}
