use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SCANNER: &str = "nmap";

pub struct Config {
    /// External scanning tool, resolved through `PATH`.
    pub scanner: String,
    /// Extra arguments placed between the tool name and the address.
    pub scan_args: Vec<String>,
    /// Directory receiving the `<address>.txt` artifacts.
    pub artifact_dir: PathBuf,
    /// Upper bound on concurrently running scans. `1` scans hosts one by one.
    pub jobs: usize,
    /// Per-scan deadline. The child is killed once it elapses.
    ///
    /// `None` waits for the tool however long it takes.
    pub timeout: Option<Duration>,
    /// 0 prints everything, 1 drops decorations, 2 prints warnings only.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scanner: DEFAULT_SCANNER.to_string(),
            scan_args: Vec::new(),
            artifact_dir: PathBuf::from("."),
            jobs: 1,
            timeout: None,
            quiet: 0,
        }
    }
}

impl Config {
    /// Jobs clamped to at least one worker.
    pub fn workers(&self) -> usize {
        self.jobs.max(1)
    }
}
