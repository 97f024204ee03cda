//! External-command scanner.
//!
//! The invocation is `<scanner> [scan_args..] <address>`. The exit status is
//! logged but never turns a finished run into an error: only a failure to
//! launch (or an elapsed timeout) does.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use sweepr_common::config::Config;
use sweepr_common::document::ScanResult;
use sweepr_common::error::HostError;
use sweepr_common::scanning::HostScanner;

pub struct CommandScanner {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandScanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.scanner.clone())
            .with_args(cfg.scan_args.iter().cloned())
            .with_timeout(cfg.timeout)
    }

    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.args.extend(args);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, address: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(address)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl HostScanner for CommandScanner {
    async fn scan(&self, address: &str) -> Result<ScanResult, HostError> {
        debug!(address, program = %self.program, args = ?self.args, "launching scanner");

        let launch_error = |source| HostError::Launch {
            address: address.to_string(),
            command: self.program.clone(),
            source,
        };

        let child = self.command(address).spawn().map_err(launch_error)?;

        let output = match self.timeout {
            // Dropping the pending future drops the child, which kills it.
            Some(after) => tokio::time::timeout(after, child.wait_with_output())
                .await
                .map_err(|_| HostError::TimedOut {
                    address: address.to_string(),
                    after,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(launch_error)?;

        debug!(address, status = %output.status, bytes = output.stdout.len(), "scanner exited");
        if !output.stderr.is_empty() {
            trace!(address, stderr = %String::from_utf8_lossy(&output.stderr));
        }

        Ok(ScanResult::from_bytes(address, output.stdout))
    }
}
