use async_trait::async_trait;
use shaperoute::error::{AppError, Result};
use shaperoute::geometry::{LocalProjection, Vec2};
use shaperoute::graph::{
    GraphCache, GraphDocument, GraphEdge, GraphNode, GraphProvider, RoadGraph,
};
use shaperoute::models::{Coordinates, FeatureCollection};
use shaperoute::output::OutputSink;
use shaperoute::services::RouteGenerator;
use shaperoute::template::TemplateStore;
use shaperoute::AppState;
use std::collections::HashMap;
use std::sync::Arc;

pub const START: Coordinates = Coordinates {
    lat: 33.4996,
    lng: 126.5312,
};

pub const SQUARE_SVG: &str = "M 0 0 L 100 0 L 100 100 L 0 100 Z";
pub const LINE_SVG: &str = "M 0 0 L 100 0";

/// Manhattan grid centered on START: `half` nodes in each direction at
/// `spacing_m`, bidirectional edges with haversine-accurate lengths.
#[allow(dead_code)]
pub fn grid_graph(half: i64, spacing_m: f64) -> Arc<RoadGraph> {
    let projection = LocalProjection::new(START);
    let side = 2 * half + 1;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let id_of = |row: i64, col: i64| ((row + half) * side + (col + half)) as u64;
    let at = |row: i64, col: i64| {
        projection.to_wgs84(&Vec2::new(col as f64 * spacing_m, row as f64 * spacing_m))
    };

    for row in -half..=half {
        for col in -half..=half {
            let c = at(row, col);
            nodes.push(GraphNode {
                id: id_of(row, col),
                lat: c.lat,
                lng: c.lng,
            });
            for (orow, ocol) in [
                (row, col - 1),
                (row, col + 1),
                (row - 1, col),
                (row + 1, col),
            ] {
                if orow.abs() > half || ocol.abs() > half {
                    continue;
                }
                edges.push(GraphEdge {
                    u: id_of(row, col),
                    v: id_of(orow, ocol),
                    length_m: c.distance_m(&at(orow, ocol)),
                    geometry: None,
                });
            }
        }
    }
    Arc::new(RoadGraph::from_document(GraphDocument { nodes, edges }).unwrap())
}

/// Straight east-west road through START: nodes at multiples of `spacing_m`
/// from `-half` to `half`.
#[allow(dead_code)]
pub fn line_graph(half: i64, spacing_m: f64) -> Arc<RoadGraph> {
    let projection = LocalProjection::new(START);
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let at = |i: i64| projection.to_wgs84(&Vec2::new(i as f64 * spacing_m, 0.0));
    for i in -half..=half {
        let c = at(i);
        let id = (i + half) as u64;
        nodes.push(GraphNode {
            id,
            lat: c.lat,
            lng: c.lng,
        });
        if i > -half {
            let d = at(i - 1).distance_m(&c);
            edges.push(GraphEdge {
                u: id - 1,
                v: id,
                length_m: d,
                geometry: None,
            });
            edges.push(GraphEdge {
                u: id,
                v: id - 1,
                length_m: d,
                geometry: None,
            });
        }
    }
    Arc::new(RoadGraph::from_document(GraphDocument { nodes, edges }).unwrap())
}

/// Graph provider serving one pre-built graph for every request.
pub struct FixedGraphProvider {
    graph: Arc<RoadGraph>,
}

#[async_trait]
impl GraphProvider for FixedGraphProvider {
    async fn get_graph(&self, _center: Coordinates, _radius_m: f64) -> Result<Arc<RoadGraph>> {
        Ok(self.graph.clone())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory template store.
pub struct MemoryTemplateStore {
    templates: HashMap<String, String>,
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn load(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::TemplateNotFound(name.to_string()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Output sink that pretends to save without touching disk.
pub struct MemoryOutputSink;

#[async_trait]
impl OutputSink for MemoryOutputSink {
    async fn save_geojson(&self, _collection: &FeatureCollection) -> Result<String> {
        Ok("memory://route.geojson".to_string())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Generator wired entirely to in-memory collaborators.
pub fn test_generator(graph: Arc<RoadGraph>) -> RouteGenerator {
    let mut templates = HashMap::new();
    templates.insert("square.svg".to_string(), SQUARE_SVG.to_string());
    templates.insert("line.svg".to_string(), LINE_SVG.to_string());

    RouteGenerator::new(
        Arc::new(MemoryTemplateStore { templates }),
        Arc::new(GraphCache::new(Arc::new(FixedGraphProvider { graph }))),
        Arc::new(MemoryOutputSink),
    )
}

#[allow(dead_code)]
pub fn test_app(graph: Arc<RoadGraph>) -> axum::Router {
    let state = Arc::new(AppState {
        generator: test_generator(graph),
    });
    shaperoute::routes::create_router(state)
}
