// Library interface for Solis
// Exposes the row store, ingestion and host bridges to the binary and integration tests

pub mod config;
pub mod host;
pub mod ingest;
pub mod prefs;
pub mod store;
