//! # Sweepr Core
//!
//! Use cases and concrete adapters of the scan-and-merge pipeline:
//!
//! * [`document`]: reading, schema-checking and writing discovery documents.
//! * [`executor`]: the [`HostScanner`](sweepr_common::scanning::HostScanner)
//!   backed by an external command.
//! * [`artifacts`]: the file-system [`ArtifactStore`](sweepr_common::artifacts::ArtifactStore).
//! * [`orchestrator`]: the per-host validate → scan → persist loop.
//! * [`merge`]: folding scan results back into a copy of the document.

pub mod artifacts;
pub mod document;
pub mod executor;
pub mod merge;
pub mod orchestrator;
