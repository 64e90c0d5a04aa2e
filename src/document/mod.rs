// Documents: raw input, derived records, the store capability and the
// files the CLI reads and writes.

pub mod manifest;
pub mod models;
pub mod records;
pub mod store;

pub use models::{DocumentId, DocumentMetadata, DocumentRecord, RawDocument};
pub use store::{DocumentStore, MemoryStore};
