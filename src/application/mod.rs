pub mod clear;
pub mod find_similar;
pub mod ingest;
pub mod stats;
