pub mod check;
pub mod merge;
pub mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use sweepr_common::config::{Config, DEFAULT_SCANNER};
use sweepr_core::document::MERGED_DOCUMENT;

#[derive(Parser)]
#[command(name = "sweepr", version)]
#[command(about = "Scan every host of a discovery document and merge the output back.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less terminal output (-q plain, -qq warnings only)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every host and write the merged document
    #[command(alias = "r")]
    Run {
        /// Discovery document to read
        document: PathBuf,
        /// Where to write the merged document
        #[arg(short, long, default_value = MERGED_DOCUMENT)]
        output: PathBuf,
        #[command(flatten)]
        scan: ScanOptions,
    },
    /// List the hosts of a document without scanning them
    #[command(alias = "c")]
    Check { document: PathBuf },
    /// Merge artifacts of an earlier run without scanning again
    #[command(alias = "m")]
    Merge {
        document: PathBuf,
        #[arg(short, long, default_value = MERGED_DOCUMENT)]
        output: PathBuf,
        /// Directory holding the `<address>.txt` artifacts
        #[arg(long, default_value = ".")]
        artifact_dir: PathBuf,
    },
}

#[derive(Args)]
pub struct ScanOptions {
    /// Scanning tool to launch for each host
    #[arg(long, default_value = DEFAULT_SCANNER)]
    pub scanner: String,
    /// Extra argument passed to the scanner before the address (repeatable)
    #[arg(long = "scan-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub scan_args: Vec<String>,
    /// Directory receiving the `<address>.txt` artifacts
    #[arg(long, default_value = ".")]
    pub artifact_dir: PathBuf,
    /// Number of scans running at once
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
    /// Kill a scan after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ScanOptions {
    pub fn into_config(self, quiet: u8) -> Config {
        Config {
            scanner: self.scanner,
            scan_args: self.scan_args,
            artifact_dir: self.artifact_dir,
            jobs: self.jobs,
            timeout: self.timeout.map(Duration::from_secs),
            quiet,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
