use anyhow::{Context, Result};

use protanno::config::Config;
use protanno::highlight::Highlighter;

pub fn highlight(
    config: &Config,
    text: String,
    include: Vec<String>,
    exclude: Vec<String>,
) -> Result<()> {
    let highlighter =
        Highlighter::from_config(&config.highlight, include.as_slice(), exclude.as_slice())
            .context("Invalid highlight pattern")?;

    println!("{}", highlighter.highlight(&text));
    Ok(())
}
