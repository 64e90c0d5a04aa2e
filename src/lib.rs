// wordprint: vocabulary statistics and reuse detection for text reports
//
// This is the library root. Text normalization lives in `text`, per-document
// statistics in `stats`, cohort reductions and comparisons in `cohort`.

pub mod cohort;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod stats;
pub mod status;
pub mod text;
