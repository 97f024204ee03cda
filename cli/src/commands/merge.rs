use std::path::Path;

use anyhow::Context;
use colored::*;

use crate::terminal::print;
use sweepr_common::success;
use sweepr_core::artifacts::FileArtifactStore;
use sweepr_core::document::{load_document, save_document};
use sweepr_core::merge::{merge as merge_results, results_from_artifacts};

const KEY_WIDTH: usize = 9;

pub fn merge(document: &Path, output: &Path, artifact_dir: &Path, quiet: u8) -> anyhow::Result<()> {
    let discovery = load_document(document)
        .with_context(|| format!("cannot use discovery document {}", document.display()))?;
    let hosts = discovery.hosts();

    let store = FileArtifactStore::new(artifact_dir);
    let results = results_from_artifacts(&hosts, &store);

    if quiet == 0 {
        let found = format!("{} of {}", results.len(), hosts.len());
        print::aligned_line("Document", KEY_WIDTH, document.display());
        print::aligned_line("Artifacts", KEY_WIDTH, store.dir().display());
        print::aligned_line("Found", KEY_WIDTH, found.green());
    }

    let merged = merge_results(&discovery, &results);
    save_document(&merged, output)
        .with_context(|| format!("cannot write merged document {}", output.display()))?;

    success!("merged {} artifacts into {}", results.len(), output.display());
    Ok(())
}
