use crate::error::{AppError, Result};
use crate::graph::{GraphDocument, RoadGraph};
use crate::models::Coordinates;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Opaque road-graph source. Implementations own the persisted format.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    async fn get_graph(&self, center: Coordinates, radius_m: f64) -> Result<Arc<RoadGraph>>;

    /// True when the backing source is reachable.
    async fn health_check(&self) -> bool;
}

/// Provider reading pre-extracted graphs from the cache directory, keyed by
/// rounded center coordinates and radius.
pub struct FsGraphProvider {
    cache_dir: PathBuf,
}

impl FsGraphProvider {
    pub fn new(cache_dir: PathBuf) -> Self {
        FsGraphProvider { cache_dir }
    }

    fn file_name(center: &Coordinates, radius_m: f64) -> String {
        let rounded = center.round(3);
        format!(
            "graph_{:.3}_{:.3}_{:.0}.json",
            rounded.lat, rounded.lng, radius_m
        )
    }
}

#[async_trait]
impl GraphProvider for FsGraphProvider {
    async fn get_graph(&self, center: Coordinates, radius_m: f64) -> Result<Arc<RoadGraph>> {
        let path = self.cache_dir.join(Self::file_name(&center, radius_m));
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            AppError::GraphUnavailable(format!(
                "no graph for ({:.3}, {:.3}) radius {:.0}m: {e}",
                center.lat, center.lng, radius_m
            ))
        })?;
        let doc: GraphDocument = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::GraphUnavailable(format!("graph file corrupt: {e}")))?;
        let graph = RoadGraph::from_document(doc)
            .map_err(|e| AppError::GraphUnavailable(format!("graph invalid: {e}")))?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Loaded road graph from {}",
            path.display()
        );
        Ok(Arc::new(graph))
    }

    async fn health_check(&self) -> bool {
        self.cache_dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_rounds_coordinates() {
        let center = Coordinates::new(33.49961, 126.53118).unwrap();
        assert_eq!(
            FsGraphProvider::file_name(&center, 3000.0),
            "graph_33.500_126.531_3000.json"
        );
    }

    #[tokio::test]
    async fn missing_graph_is_unavailable() {
        let provider = FsGraphProvider::new(std::env::temp_dir());
        let center = Coordinates::new(0.0, 0.0).unwrap();
        let err = provider.get_graph(center, 1000.0).await.unwrap_err();
        assert_eq!(err.kind(), "GraphUnavailable");
    }
}
