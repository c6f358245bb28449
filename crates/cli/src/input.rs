use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use voyage_graph::{AnalyzerConfig, HiddenRows};
use voyage_itinerary::SailingOfferRow;

/// Read offer rows from a JSON array file, or stdin when the path is `-`
pub fn read_rows(path: &Path) -> Result<Vec<SailingOfferRow>> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read rows from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read rows from {}", path.display()))?
    };

    if raw.trim().is_empty() {
        anyhow::bail!("Row input is empty. Provide a JSON array of offer rows.");
    }

    let rows: Vec<SailingOfferRow> =
        serde_json::from_str(&raw).context("Rows must be a JSON array of offer rows")?;
    log::debug!("Read {} rows", rows.len());
    Ok(rows)
}

/// Hidden row keys, a JSON array of `OFFER|SHIP|DATE` strings
pub fn read_hidden(path: &Path) -> Result<HiddenRows> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hidden rows from {}", path.display()))?;
    let hidden: HiddenRows = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid hidden-row list in {}", path.display()))?;
    log::debug!("Loaded {} hidden rows", hidden.len());
    Ok(hidden)
}

pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    let config = match path {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    Ok(config.with_env_overrides())
}
