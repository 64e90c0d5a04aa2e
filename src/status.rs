// Records status display: file size, record count, distinct metadata values
// and the most recent modification time.

use anyhow::Result;
use std::path::Path;

use crate::document::{DocumentStore, MemoryStore};

/// Display a summary of the records file at `path`.
pub fn show(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("Records: not found at {}", path.display());
        println!("\nRun `wordprint ingest --manifest <manifest.json> --out <records.json>` first.");
        return Ok(());
    }

    let file_size = std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Records: {} ({})", path.display(), file_size);

    let records = crate::document::records::load(path)?;
    let latest = records
        .iter()
        .filter_map(|r| r.metadata.modified_at)
        .max();
    let fingerprinted = records.iter().filter(|r| r.fingerprint.is_some()).count();
    let store = MemoryStore::from_records(records)?;

    println!(
        "Documents: {} total, {} with fingerprints",
        store.len()?,
        fingerprinted
    );
    println!("Faculties: {}", list_or_none(&store.faculties()?));
    let courses: Vec<String> = store.courses()?.iter().map(u8::to_string).collect();
    println!("Courses: {}", list_or_none(&courses));
    println!("Departments: {}", list_or_none(&store.departments()?));

    match latest {
        Some(at) => println!("Last modified: {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Last modified: unknown"),
    }

    Ok(())
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
