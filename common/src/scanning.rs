use async_trait::async_trait;

use crate::document::ScanResult;
use crate::error::HostError;

/// Runs the external scanning tool against one address.
///
/// Implementations block (asynchronously) until the tool exits and hand back
/// everything it wrote to standard output. An exit without output is still
/// a valid, if empty, [`ScanResult`].
#[async_trait]
pub trait HostScanner: Send + Sync {
    async fn scan(&self, address: &str) -> Result<ScanResult, HostError>;
}
