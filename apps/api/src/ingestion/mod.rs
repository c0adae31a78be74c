//! Ingestion — per-request session storage and PDF text extraction.

pub mod extract;
pub mod session;
