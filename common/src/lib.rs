//! # Sweepr Common
//!
//! Shared vocabulary for every `sweepr` crate: the discovery document model,
//! the per-host error taxonomy, the run configuration and the outbound
//! ports ([`scanning::HostScanner`], [`artifacts::ArtifactStore`]) that the
//! core implements and the tests fake.

pub mod address;
pub mod artifacts;
pub mod config;
pub mod document;
pub mod error;
pub mod scanning;

#[doc(hidden)]
pub use tracing;

/// Logs a success line. Rendered with the `[+]` symbol by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "sweepr::success", $($arg)*)
    };
}
