//! One JSON document per learner under a directory

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::error::Result;
use crate::core::types::LearnerId;
use crate::persistence::{PlacementRecord, PlacementStore};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, learner: LearnerId) -> PathBuf {
        self.root.join(format!("{}.json", learner))
    }
}

#[async_trait]
impl PlacementStore for JsonFileStore {
    async fn save(&self, record: &PlacementRecord) -> Result<()> {
        let path = self.path_for(record.learner);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(record)?;
        // Write then rename so readers never see a half-written record
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!(learner = %record.learner, path = %path.display(), "Saved placement");
        Ok(())
    }

    async fn load(&self, learner: LearnerId) -> Result<Option<PlacementRecord>> {
        let path = self.path_for(learner);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
