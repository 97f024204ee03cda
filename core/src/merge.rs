use tracing::{debug, warn};

use sweepr_common::address::is_valid_address;
use sweepr_common::artifacts::ArtifactStore;
use sweepr_common::document::{DiscoveryDocument, HostEntry, ScanResult};

/// Returns a copy of `original` with scan output folded into its host list.
///
/// Each result lands in the first entry (document order) whose
/// `host.ip_v4_address` equals the result address exactly. Entries without a
/// result, and every field other than `host.nmap_output`, are copied as is.
pub fn merge(original: &DiscoveryDocument, results: &[ScanResult]) -> DiscoveryDocument {
    let mut merged = original.clone();

    for result in results {
        if !merged.set_first_output(&result.address, &result.output) {
            debug!(address = %result.address, "no host entry matches scan result");
        }
    }

    merged
}

/// Rebuilds scan results from artifacts a previous run left behind.
///
/// Hosts without a valid address or without an artifact are ignored;
/// unreadable artifacts are logged and ignored.
pub fn results_from_artifacts(hosts: &[HostEntry], store: &dyn ArtifactStore) -> Vec<ScanResult> {
    let mut results = Vec::new();

    for address in hosts.iter().filter_map(|host| host.address().ok()) {
        if !is_valid_address(address) {
            continue;
        }
        match store.load(address) {
            Ok(Some(raw)) => results.push(ScanResult::from_bytes(address, raw)),
            Ok(None) => debug!(address, "no artifact"),
            Err(e) => warn!(address, "{e}"),
        }
    }

    results
}
