use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio::sync::watch;
use tracing::{Instrument, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::mprint;
use crate::terminal::{colors, print, spinner};
use sweepr_common::config::Config;
use sweepr_common::success;
use sweepr_core::document::{load_document, save_document};
use sweepr_core::merge::merge;
use sweepr_core::orchestrator::{ScanOrchestrator, SweepReport};

const KEY_WIDTH: usize = 9;

pub async fn run(document: &Path, output: &Path, cfg: &Config) -> anyhow::Result<()> {
    let discovery = load_document(document)
        .with_context(|| format!("cannot use discovery document {}", document.display()))?;
    let hosts = discovery.hosts();

    if cfg.quiet == 0 {
        print_plan(document, hosts.len(), cfg);
    }

    let cancel = watch_ctrl_c();

    let span = info_span!("sweep");
    span.pb_set_style(&spinner::sweep_style());
    span.pb_set_length(hosts.len() as u64);
    span.pb_set_message("scanning");

    let progress = span.clone();
    let orchestrator = ScanOrchestrator::from_config(cfg)
        .with_cancellation(cancel)
        .on_host_done(move |_, _| progress.pb_inc(1));

    let start_time: Instant = Instant::now();
    let report: SweepReport = orchestrator.run(&hosts).instrument(span).await;

    let merged = merge(&discovery, &report.results);
    save_document(&merged, output)
        .with_context(|| format!("cannot write merged document {}", output.display()))?;

    sweep_ends(&report, start_time.elapsed(), output, cfg);
    Ok(())
}

/// Flips the returned flag on the first Ctrl-C.
fn watch_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, no further scans will be started");
            let _ = tx.send(true);
        }
    });
    rx
}

fn print_plan(document: &Path, hosts: usize, cfg: &Config) {
    let invocation = std::iter::once(cfg.scanner.as_str())
        .chain(cfg.scan_args.iter().map(String::as_str))
        .chain(std::iter::once("<address>"))
        .collect::<Vec<_>>()
        .join(" ");
    let timeout = cfg
        .timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    print::aligned_line("Document", KEY_WIDTH, document.display());
    print::aligned_line("Hosts", KEY_WIDTH, hosts.to_string().color(colors::ACCENT));
    print::aligned_line("Command", KEY_WIDTH, invocation.color(colors::ADDRESS));
    print::aligned_line("Artifacts", KEY_WIDTH, cfg.artifact_dir.display());
    print::aligned_line("Jobs", KEY_WIDTH, cfg.workers().to_string().color(colors::ACCENT));
    print::aligned_line("Timeout", KEY_WIDTH, timeout.color(colors::ACCENT));
    mprint!();
}

fn sweep_ends(report: &SweepReport, total_time: Duration, output: &Path, cfg: &Config) {
    if cfg.quiet == 0 && !report.diagnostics.is_empty() {
        print::header("host problems", cfg.quiet);
        for diagnostic in &report.diagnostics {
            let name = diagnostic.address.as_deref().unwrap_or("<no address>");
            print::tree_head(diagnostic.index, name);
            print::as_tree_one_level(vec![(
                "Error".to_string(),
                diagnostic.error.to_string().color(colors::FAILURE),
            )]);
        }
    }

    let scanned: ColoredString = format!("{} scanned", report.results.len()).bold().green();
    let skipped: ColoredString = format!("{} skipped", report.skipped()).bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let summary: String = format!(
        "Sweep Complete: {scanned}, {skipped} of {} hosts in {total_time}",
        report.total
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&summary);
            success!("merged document written to {}", output.display());
        }
        _ => success!("{summary}, merged into {}", output.display()),
    }
}
