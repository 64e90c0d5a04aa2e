// Records file: computed DocumentRecords saved as JSON between CLI runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::DocumentRecord;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordsFile {
    pub records: Vec<DocumentRecord>,
}

pub fn save(path: &Path, records: &[DocumentRecord]) -> Result<()> {
    let file = RecordsFile {
        records: records.to_vec(),
    };
    let json = serde_json::to_string_pretty(&file).context("Failed to serialize records")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write records to {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "Saved records");
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<DocumentRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    let file: RecordsFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse records file {}", path.display()))?;
    Ok(file.records)
}
