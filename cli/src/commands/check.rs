use std::path::Path;

use anyhow::Context;
use colored::*;

use crate::mprint;
use crate::terminal::{colors, print};
use sweepr_common::address::is_valid_address;
use sweepr_common::document::HostEntry;
use sweepr_common::success;
use sweepr_core::document::load_document;

type Detail = (String, ColoredString);

pub fn check(document: &Path, quiet: u8) -> anyhow::Result<()> {
    let discovery = load_document(document)
        .with_context(|| format!("cannot use discovery document {}", document.display()))?;
    let hosts = discovery.hosts();

    let mut scannable: usize = 0;
    for (idx, host) in hosts.iter().enumerate() {
        let valid = host.address().is_ok_and(is_valid_address);
        scannable += usize::from(valid);

        if quiet == 0 {
            print_host_tree(idx, host);
            if idx + 1 != hosts.len() {
                mprint!();
            }
        }
    }

    success!(
        "{} of {} hosts would be scanned",
        scannable.to_string().bold().green(),
        hosts.len()
    );
    Ok(())
}

fn print_host_tree(idx: usize, host: &HostEntry) {
    let (name, status): (&str, ColoredString) = match host.address() {
        Ok(address) if is_valid_address(address) => (address, "ready".green()),
        Ok(address) => (address, "malformed address".color(colors::FAILURE)),
        Err(e) => ("<no address>", e.to_string().color(colors::FAILURE)),
    };

    print::tree_head(idx, name);

    let mut details: Vec<Detail> = vec![("Status".to_string(), status)];
    if let Some(output) = host.nmap_output() {
        let summary = format!("{} lines", output.lines().count());
        details.push(("Previous".to_string(), summary.color(colors::ADDRESS)));
    }

    print::as_tree_one_level(details);
}
