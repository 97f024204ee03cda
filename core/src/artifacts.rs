use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use sweepr_common::artifacts::{ArtifactStore, artifact_name};
use sweepr_common::document::ScanResult;
use sweepr_common::error::ArtifactError;

/// Stores artifacts as `<dir>/<address>.txt`.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(artifact_name(address))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn persist(&self, result: &ScanResult) -> Result<PathBuf, ArtifactError> {
        let path = self.path_for(&result.address);

        match fs::write(&path, &result.raw) {
            Ok(()) => {
                debug!(path = %path.display(), bytes = result.raw.len(), "artifact written");
                Ok(path)
            }
            Err(source) => Err(ArtifactError { path, source }),
        }
    }

    fn load(&self, address: &str) -> Result<Option<Vec<u8>>, ArtifactError> {
        let path = self.path_for(address);

        match fs::read(&path) {
            Ok(output) => Ok(Some(output)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ArtifactError { path, source }),
        }
    }
}
