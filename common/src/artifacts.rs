use std::path::PathBuf;

use crate::document::ScanResult;
use crate::error::ArtifactError;

/// Persists per-host scan output.
pub trait ArtifactStore: Send + Sync {
    /// Writes `result.raw` byte for byte, replacing any earlier artifact for
    /// the same address. Returns where it was written.
    fn persist(&self, result: &ScanResult) -> Result<PathBuf, ArtifactError>;

    /// Reads a previously persisted artifact, `Ok(None)` if there is none.
    fn load(&self, address: &str) -> Result<Option<Vec<u8>>, ArtifactError>;
}

/// File name of the artifact holding the scan output of `address`.
pub fn artifact_name(address: &str) -> String {
    format!("{address}.txt")
}
