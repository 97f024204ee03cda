use std::sync::Arc;

use serde_json::json;
use sweepr_common::error::{DocumentError, HostError};
use sweepr_core::artifacts::FileArtifactStore;
use sweepr_core::document::{self, MERGED_DOCUMENT};
use sweepr_core::merge;
use sweepr_core::orchestrator::ScanOrchestrator;
use tempfile::TempDir;

use crate::utils::{ScriptedScanner, artifacts_in, read_json, write_json};

/// Load → scan → persist → merge → save over a mixed host list.
#[tokio::test]
async fn full_sweep_merges_successful_hosts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("discovery.json");
    let output = dir.path().join(MERGED_DOCUMENT);
    write_json(
        &input,
        &json!({
            "Scan": { "started": "2026-01-01T00:00:00Z" },
            "Detail": {
                "subnet": "10.0.0.0/24",
                "host_list": [
                    { "host": { "ip_v4_address": "10.0.0.1", "vendor": "acme" }, "ports": [22] },
                    { "host": { "ip_v4_address": "10.0.0" } },
                    { "host": { "hostname": "ghost" } },
                    { "host": { "ip_v4_address": "10.0.0.4", "nmap_output": "stale" } },
                    { "host": { "ip_v4_address": "10.0.0.5", "nmap_output": "untouched" } }
                ]
            }
        }),
    );

    let discovery = document::load_document(&input).unwrap();
    let hosts = discovery.hosts();
    let orchestrator = ScanOrchestrator::new(
        Arc::new(ScriptedScanner::new(&[
            ("10.0.0.1", "22/tcp open ssh\n"),
            ("10.0.0.4", "80/tcp open http\n"),
        ])),
        Arc::new(FileArtifactStore::new(dir.path())),
    );

    let report = orchestrator.run(&hosts).await;
    let merged = merge::merge(&discovery, &report.results);
    document::save_document(&merged, &output).unwrap();

    assert_eq!(report.total, 5);
    assert_eq!(report.results.len(), 2);
    let problems: Vec<_> = report.diagnostics.iter().map(|d| d.index).collect();
    assert_eq!(problems, vec![1, 2, 4]);
    assert!(matches!(report.diagnostics[2].error, HostError::Launch { .. }));

    assert_eq!(artifacts_in(dir.path()), vec!["10.0.0.1.txt", "10.0.0.4.txt"]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("10.0.0.4.txt")).unwrap(),
        "80/tcp open http\n"
    );

    assert_eq!(
        read_json(&output),
        json!({
            "Scan": { "started": "2026-01-01T00:00:00Z" },
            "Detail": {
                "subnet": "10.0.0.0/24",
                "host_list": [
                    { "host": { "ip_v4_address": "10.0.0.1", "vendor": "acme", "nmap_output": "22/tcp open ssh\n" }, "ports": [22] },
                    { "host": { "ip_v4_address": "10.0.0" } },
                    { "host": { "hostname": "ghost" } },
                    { "host": { "ip_v4_address": "10.0.0.4", "nmap_output": "80/tcp open http\n" } },
                    { "host": { "ip_v4_address": "10.0.0.5", "nmap_output": "untouched" } }
                ]
            }
        })
    );
    assert_eq!(read_json(&input)["Detail"]["host_list"][3]["host"]["nmap_output"], "stale");
}

#[tokio::test]
async fn duplicate_hosts_only_update_the_first_entry() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("discovery.json");
    write_json(
        &input,
        &json!({ "Detail": { "host_list": [
            { "host": { "ip_v4_address": "10.0.0.1" } },
            { "host": { "ip_v4_address": "10.0.0.1", "nmap_output": "earlier" } }
        ]}}),
    );

    let discovery = document::load_document(&input).unwrap();
    let orchestrator = ScanOrchestrator::new(
        Arc::new(ScriptedScanner::new(&[("10.0.0.1", "fresh")])),
        Arc::new(FileArtifactStore::new(dir.path())),
    );

    let report = orchestrator.run(&discovery.hosts()).await;
    let merged = merge::merge(&discovery, &report.results).into_value();

    assert_eq!(report.results.len(), 2);
    assert_eq!(merged["Detail"]["host_list"][0]["host"]["nmap_output"], "fresh");
    assert_eq!(merged["Detail"]["host_list"][1]["host"]["nmap_output"], "earlier");
}

#[test]
fn missing_host_list_aborts_before_any_scan() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("discovery.json");
    write_json(&input, &json!({ "Detail": { "hosts": [] } }));

    let err = document::load_document(&input).unwrap_err();

    assert!(matches!(err, DocumentError::Schema(_)));
    assert!(artifacts_in(dir.path()).is_empty());
}

#[test]
fn malformed_document_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("discovery.json");
    std::fs::write(&input, "{ not json").unwrap();

    assert!(matches!(
        document::load_document(&input),
        Err(DocumentError::Parse { .. })
    ));
}

#[test]
fn artifacts_from_an_earlier_run_can_be_merged_again() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("discovery.json");
    write_json(
        &input,
        &json!({ "Detail": { "host_list": [
            { "host": { "ip_v4_address": "192.168.1.10" } },
            { "host": { "ip_v4_address": "192.168.1.11" } }
        ]}}),
    );
    std::fs::write(dir.path().join("192.168.1.11.txt"), "cached").unwrap();

    let discovery = document::load_document(&input).unwrap();
    let store = FileArtifactStore::new(dir.path());
    let results = merge::results_from_artifacts(&discovery.hosts(), &store);
    let merged = merge::merge(&discovery, &results).into_value();

    assert!(merged["Detail"]["host_list"][0]["host"].get("nmap_output").is_none());
    assert_eq!(merged["Detail"]["host_list"][1]["host"]["nmap_output"], "cached");
}
