//! Error taxonomy.
//!
//! Two families are kept apart on purpose:
//! * [`DocumentError`] makes the whole host list unusable and aborts the run
//!   before any host is touched.
//! * [`HostError`] concerns one host only. The orchestrator records it as a
//!   diagnostic and moves on to the next host.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot access document {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("document is not well-formed JSON: {source}")]
    Parse { source: serde_json::Error },

    #[error("document does not match the discovery schema: {0}")]
    Schema(String),

    #[error("cannot encode document: {source}")]
    Encode { source: serde_json::Error },
}

/// Failure to write or read one per-host artifact.
#[derive(Debug, Error)]
#[error("cannot access artifact {}: {source}", .path.display())]
pub struct ArtifactError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host entry has no host.ip_v4_address field")]
    MissingAddress,

    #[error("host.ip_v4_address is not a string")]
    AddressNotString,

    #[error("malformed IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("failed to launch `{command}` for {address}: {source}")]
    Launch {
        address: String,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("scan of {address} did not finish within {after:?}")]
    TimedOut { address: String, after: Duration },

    #[error(transparent)]
    Persist(#[from] ArtifactError),

    #[error("scan cancelled before it completed")]
    Cancelled,

    #[error("scan task ended abnormally: {0}")]
    Aborted(String),
}

impl HostError {
    /// Whether the host still produced a [`crate::document::ScanResult`].
    ///
    /// Only artifact persistence failures keep the in-memory result.
    pub fn keeps_result(&self) -> bool {
        matches!(self, HostError::Persist(_))
    }
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
