// Manifest loading: turns a JSON list of text files plus metadata into
// RawDocuments.
//
// This stands in for the upload/parsing side of a full deployment: it reads
// UTF-8 text from disk and takes the file's modification time as the
// document timestamp unless the manifest gives one.
//
// {
//   "documents": [
//     { "path": "reports/ivanov-lab1.txt", "title": "Lab 1", "author": "Ivanov",
//       "group": 1304, "course": 2, "faculty": "FKTI", "department": "CS" }
//   ]
// }

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::models::{DocumentMetadata, RawDocument};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub documents: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    /// Text file path, relative to the manifest's directory.
    pub path: PathBuf,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid manifest JSON")
    }
}

/// Read the manifest at `path` and every text file it lists.
pub fn load(path: &Path) -> Result<Vec<RawDocument>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest = Manifest::from_json(&json)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let documents = manifest
        .documents
        .into_iter()
        .map(|entry| read_entry(base, entry))
        .collect::<Result<Vec<_>>>()?;

    info!(
        manifest = %path.display(),
        documents = documents.len(),
        "Loaded manifest"
    );
    Ok(documents)
}

fn read_entry(base: &Path, entry: ManifestEntry) -> Result<RawDocument> {
    let file = if entry.path.is_absolute() {
        entry.path
    } else {
        base.join(&entry.path)
    };
    let text = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read document {}", file.display()))?;

    let mut metadata = entry.metadata;
    if metadata.modified_at.is_none() {
        metadata.modified_at = fs::metadata(&file)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
    }

    Ok(RawDocument { text, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_flattens_metadata() {
        let manifest = Manifest::from_json(
            r#"{"documents": [
                {"path": "a.txt", "title": "Lab 1", "author": "Ivanov", "group": 1304, "course": 2}
            ]}"#,
        )
        .unwrap();
        let entry = &manifest.documents[0];
        assert_eq!(entry.path, PathBuf::from("a.txt"));
        assert_eq!(entry.metadata.author, "Ivanov");
        assert_eq!(entry.metadata.group, Some(1304));
        assert_eq!(entry.metadata.faculty, None);
    }

    #[test]
    fn test_missing_author_rejected() {
        assert!(Manifest::from_json(r#"{"documents": [{"path": "a.txt", "title": "x"}]}"#).is_err());
    }
}
