//! Loading and saving discovery documents.
//!
//! `load` → `parse` → `extract_host_list` mirror the three ways a document
//! can be unusable: unreadable, not JSON, or missing `Detail.host_list`.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use sweepr_common::document::{DiscoveryDocument, HostEntry};
use sweepr_common::error::{DocumentError, DocumentResult};

/// Default name of the merged document.
pub const MERGED_DOCUMENT: &str = "discovery_new.json";

pub fn load(path: &Path) -> DocumentResult<Vec<u8>> {
    fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(bytes: &[u8]) -> DocumentResult<Value> {
    serde_json::from_slice(bytes).map_err(|source| DocumentError::Parse { source })
}

/// Checks the schema and returns the document alongside its host entries.
pub fn extract_host_list(tree: Value) -> DocumentResult<(DiscoveryDocument, Vec<HostEntry>)> {
    let document = DiscoveryDocument::from_value(tree)?;
    let hosts = document.hosts();
    Ok((document, hosts))
}

/// Reads, parses and schema-checks the document at `path`.
pub fn load_document(path: &Path) -> DocumentResult<DiscoveryDocument> {
    let bytes = load(path)?;
    let (document, hosts) = extract_host_list(parse(&bytes)?)?;
    debug!(path = %path.display(), hosts = hosts.len(), "document loaded");
    Ok(document)
}

/// Pretty-prints the document.
pub fn encode(document: &DiscoveryDocument) -> DocumentResult<String> {
    serde_json::to_string_pretty(document.as_value()).map_err(|source| DocumentError::Encode { source })
}

/// Encodes `document` and writes it to `path`, replacing any existing file.
pub fn save_document(document: &DiscoveryDocument, path: &Path) -> DocumentResult<()> {
    let encoded = encode(document)?;
    fs::write(path, encoded).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}
