//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - In-memory map for the DocumentStore port (tests, ephemeral use)
//! - DuckDB for the DocumentStore port (local persistence)
//! - Local filesystem for the BlobStore port

pub mod duckdb;
pub mod local_blob;
pub mod memory;
