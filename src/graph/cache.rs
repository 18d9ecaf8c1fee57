use crate::constants::{GRAPH_CACHE_MAX_ENTRIES, GRAPH_KEY_COORD_DECIMALS};
use crate::error::{AppError, Result};
use crate::graph::{GraphProvider, RoadGraph};
use crate::models::Coordinates;
use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache key: start coordinates rounded to 3 decimals plus the graph radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GraphKey {
    lat_milli: i64,
    lng_milli: i64,
    radius_m: u64,
}

impl GraphKey {
    fn new(center: &Coordinates, radius_m: f64) -> Self {
        let rounded = center.round(GRAPH_KEY_COORD_DECIMALS);
        GraphKey {
            lat_milli: (rounded.lat * 1000.0).round() as i64,
            lng_milli: (rounded.lng * 1000.0).round() as i64,
            radius_m: radius_m.round() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// Process-wide, read-mostly cache over the graph provider.
///
/// `try_get_with` coalesces concurrent loads for the same key, so one load
/// happens per geographic key; entries are immutable after construction and
/// the bounded capacity evicts the least recently used graphs.
pub struct GraphCache {
    provider: Arc<dyn GraphProvider>,
    graphs: Cache<GraphKey, Arc<RoadGraph>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GraphCache {
    pub fn new(provider: Arc<dyn GraphProvider>) -> Self {
        GraphCache {
            provider,
            graphs: Cache::builder().max_capacity(GRAPH_CACHE_MAX_ENTRIES).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, center: Coordinates, radius_m: f64) -> Result<Arc<RoadGraph>> {
        let key = GraphKey::new(&center, radius_m);

        if let Some(graph) = self.graphs.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?key, "Graph cache hit");
            return Ok(graph);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?key, "Graph cache miss");

        let provider = self.provider.clone();
        self.graphs
            .try_get_with(key, async move { provider.get_graph(center, radius_m).await })
            .await
            .map_err(|e: Arc<AppError>| AppError::GraphUnavailable(e.to_string()))
    }

    pub async fn stats(&self) -> GraphCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };
        GraphCacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.graphs.entry_count(),
        }
    }

    pub async fn provider_healthy(&self) -> bool {
        self.provider.health_check().await
    }
}
