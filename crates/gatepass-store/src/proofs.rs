use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// On-disk storage for uploaded proof-of-payment files.
///
/// Each proof is a single flat file at `{dir}/{filename}`; filenames are
/// generated by intake and collision resistant, so there is no overwrite
/// handling.
pub struct ProofStorage {
    dir: PathBuf,
}

impl ProofStorage {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("Proof storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Write a proof file to disk.
    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(filename);
        fs::write(&path, bytes).await?;
        Ok(())
    }

    /// Delete a proof file. A file that is already gone is tolerated.
    pub async fn remove(&self, filename: &str) -> Result<()> {
        let path = self.path_of(filename);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted proof file {}", filename);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Proof file {} already gone", filename);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
