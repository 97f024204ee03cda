use std::collections::HashMap;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use sweepr_common::document::ScanResult;
use sweepr_common::error::HostError;
use sweepr_common::scanning::HostScanner;

/// Answers from a fixed table; unknown addresses fail to launch.
pub struct ScriptedScanner {
    outputs: HashMap<String, String>,
}

impl ScriptedScanner {
    pub fn new(outputs: &[(&str, &str)]) -> Self {
        Self {
            outputs: outputs
                .iter()
                .map(|(address, output)| (address.to_string(), output.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl HostScanner for ScriptedScanner {
    async fn scan(&self, address: &str) -> Result<ScanResult, HostError> {
        match self.outputs.get(address) {
            Some(output) => Ok(ScanResult::new(address, output.clone())),
            None => Err(HostError::Launch {
                address: address.to_string(),
                command: "scripted".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

/// Names of the `.txt` artifacts in `dir`, sorted.
pub fn artifacts_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".txt"))
        .collect();
    names.sort();
    names
}
