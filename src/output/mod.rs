use crate::error::{AppError, Result};
use crate::models::FeatureCollection;
use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

/// Sink for generated route documents.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Persist a feature collection, returning the stored path.
    async fn save_geojson(&self, collection: &FeatureCollection) -> Result<String>;

    /// True when the sink is writable.
    async fn health_check(&self) -> bool;
}

/// Writes GeoJSON documents into the generated-output directory.
pub struct FsOutputSink {
    generated_dir: PathBuf,
}

impl FsOutputSink {
    pub fn new(generated_dir: PathBuf) -> Self {
        FsOutputSink { generated_dir }
    }
}

#[async_trait]
impl OutputSink for FsOutputSink {
    async fn save_geojson(&self, collection: &FeatureCollection) -> Result<String> {
        let path = self
            .generated_dir
            .join(format!("route_{}.geojson", Uuid::new_v4()));
        let body = serde_json::to_vec_pretty(collection)
            .map_err(|e| AppError::Internal(format!("geojson serialization failed: {e}")))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| AppError::OutputUnavailable(format!("{}: {e}", path.display())))?;
        tracing::info!("Saved route to {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn health_check(&self) -> bool {
        self.generated_dir.is_dir()
    }
}
