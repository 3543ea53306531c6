use anyhow::{Context, Result};
use std::path::PathBuf;

use protanno::config::{Config, HighlightConfig};
use protanno::crawler::{Pipeline, StatusSink};
use protanno::highlight::Highlighter;
use protanno::models::Entity;
use protanno::parser::read_entities;
use protanno::render::AnnotationRenderer;

/// Where and how to render annotation panels after a crawl
pub struct RenderOptions {
    pub dir: PathBuf,
    pub patterns: Vec<String>,
}

pub async fn crawl(
    config: Config,
    input: PathBuf,
    output: Option<PathBuf>,
    render: Option<RenderOptions>,
) -> Result<()> {
    let entities = read_entities(&input)
        .await
        .with_context(|| format!("Failed to load interactors from {}", input.display()))?;

    println!("Starting DAS annotation crawl");
    println!("=============================");
    println!("  Entities: {}", entities.len());
    println!("  Sources: {}", config.sources.len());

    let highlight_config = config.highlight.clone();
    let pipeline = Pipeline::connect(config).context("Failed to create DAS fetcher")?;

    let (status, mut events) = StatusSink::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{event}");
        }
    });

    let output_data = {
        let pipeline = pipeline.with_status(status);
        pipeline.run(entities).await
    };
    // Pipeline and its sinks are gone, so the printer drains and stops
    printer.await.context("Status printer failed")?;

    let report = output_data.to_json().context("Failed to encode report")?;
    match &output {
        Some(path) => {
            tokio::fs::write(path, report)
                .await
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
        }
        None => println!("{report}"),
    }

    let rendered = match &render {
        Some(options) => render_panels(&output_data.entities, &highlight_config, options).await?,
        None => 0,
    };

    let crawl = &output_data.crawl;
    let backfill = &output_data.backfill;
    println!("\nCrawl Summary");
    println!("=============");
    println!("  Sequences fetched: {}", backfill.fetched);
    println!("  Sequence fallbacks: {}", backfill.fallbacks + backfill.unqueryable);
    println!("  Lookups succeeded: {}", crawl.succeeded);
    println!("  Lookups failed: {}", crawl.failed);
    println!("  Lookups skipped: {}", crawl.skipped);
    println!("  Malformed records: {}", crawl.malformed);
    if let Some(path) = output {
        println!("  Report: {}", path.display());
    }
    if let Some(options) = render {
        println!("  Panels: {rendered} in {}", options.dir.display());
    }

    Ok(())
}

async fn render_panels(
    entities: &[Entity],
    config: &HighlightConfig,
    options: &RenderOptions,
) -> Result<usize> {
    let no_excludes: &[&str] = &[];
    let highlighter = Highlighter::from_config(config, options.patterns.as_slice(), no_excludes)
        .context("Invalid highlight pattern")?;
    let renderer = AnnotationRenderer::new().context("Failed to load annotation template")?;

    renderer
        .write_panels(entities, &highlighter, &options.dir)
        .await
        .with_context(|| format!("Failed to write panels to {}", options.dir.display()))
}
