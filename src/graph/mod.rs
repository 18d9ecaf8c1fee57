pub mod cache;
pub mod provider;

pub use cache::{GraphCache, GraphCacheStats};
pub use provider::{FsGraphProvider, GraphProvider};

use crate::error::{AppError, Result};
use crate::geometry::LocalProjection;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

pub type NodeId = u64;

// Provider-owned wire format for a loaded graph.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub u: NodeId,
    pub v: NodeId,
    pub length_m: f64,
    /// Optional per-edge polyline as [lat, lng] pairs, endpoints included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone)]
struct Adjacency {
    to: NodeId,
    length_m: f64,
    geometry: Option<Vec<Coordinates>>,
}

/// Directed road graph with id-indexed nodes and sorted adjacency lists.
///
/// Adjacency order plus smaller-id tie-breaking in [`RoadGraph::shortest_path`]
/// makes routing deterministic for identical inputs.
#[derive(Debug)]
pub struct RoadGraph {
    /// (id, coords), ascending by id.
    nodes: Vec<(NodeId, Coordinates)>,
    index: HashMap<NodeId, usize>,
    adjacency: HashMap<NodeId, Vec<Adjacency>>,
    edge_count: usize,
}

impl RoadGraph {
    /// Build and validate a graph from the provider document.
    pub fn from_document(doc: GraphDocument) -> std::result::Result<Self, String> {
        if doc.nodes.is_empty() {
            return Err("graph has no nodes".to_string());
        }

        let mut nodes: Vec<(NodeId, Coordinates)> = Vec::with_capacity(doc.nodes.len());
        for n in &doc.nodes {
            let coords = Coordinates::new(n.lat, n.lng)
                .map_err(|e| format!("node {}: {}", n.id, e))?;
            nodes.push((n.id, coords));
        }
        nodes.sort_by_key(|(id, _)| *id);
        nodes.dedup_by_key(|(id, _)| *id);

        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (*id, i))
            .collect();

        let mut adjacency: HashMap<NodeId, Vec<Adjacency>> = HashMap::new();
        for e in &doc.edges {
            if !e.length_m.is_finite() || e.length_m < 0.0 {
                return Err(format!(
                    "edge {}->{}: length_m must be finite and non-negative",
                    e.u, e.v
                ));
            }
            if !index.contains_key(&e.u) || !index.contains_key(&e.v) {
                return Err(format!("edge {}->{} references unknown node", e.u, e.v));
            }
            let geometry = match &e.geometry {
                Some(pairs) => {
                    let mut line = Vec::with_capacity(pairs.len());
                    for [lat, lng] in pairs {
                        line.push(
                            Coordinates::new(*lat, *lng)
                                .map_err(|err| format!("edge {}->{}: {}", e.u, e.v, err))?,
                        );
                    }
                    Some(line)
                }
                None => None,
            };
            adjacency.entry(e.u).or_default().push(Adjacency {
                to: e.v,
                length_m: e.length_m,
                geometry,
            });
        }
        for list in adjacency.values_mut() {
            list.sort_by(|a, b| {
                a.to.cmp(&b.to)
                    .then_with(|| a.length_m.total_cmp(&b.length_m))
            });
        }

        Ok(RoadGraph {
            nodes,
            index,
            adjacency,
            edge_count: doc.edges.len(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn coords(&self, node: NodeId) -> Option<Coordinates> {
        self.index.get(&node).map(|&i| self.nodes[i].1)
    }

    /// Nearest node to a geographic point under the request projection.
    /// Ties go to the smaller node id (nodes are scanned in id order).
    pub fn nearest_node(&self, projection: &LocalProjection, point: &Coordinates) -> NodeId {
        let mut best = self.nodes[0].0;
        let mut best_d = f64::INFINITY;
        for (id, coords) in &self.nodes {
            let d = projection.distance_sq_m(point, coords);
            if d < best_d {
                best_d = d;
                best = *id;
            }
        }
        best
    }

    /// Length of the (shortest) directed edge u -> v, if present.
    pub fn edge_length(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.adjacency
            .get(&u)?
            .iter()
            .filter(|a| a.to == v)
            .map(|a| a.length_m)
            .min_by(|a, b| a.total_cmp(b))
    }

    fn edge(&self, u: NodeId, v: NodeId) -> Option<&Adjacency> {
        // Adjacency is sorted by (to, length), so the first match is shortest
        self.adjacency.get(&u)?.iter().find(|a| a.to == v)
    }

    /// Dijkstra under a pluggable non-negative edge cost. Equal-cost frontier
    /// entries pop in ascending node id order.
    pub fn shortest_path<F>(&self, from: NodeId, to: NodeId, cost_fn: F) -> Result<Vec<NodeId>>
    where
        F: Fn(NodeId, NodeId) -> f64,
    {
        if !self.index.contains_key(&from) || !self.index.contains_key(&to) {
            return Err(AppError::NoPath { from, to });
        }
        if from == to {
            return Ok(vec![from]);
        }

        #[derive(Debug)]
        struct Frontier {
            cost: f64,
            node: NodeId,
        }
        impl PartialEq for Frontier {
            fn eq(&self, other: &Self) -> bool {
                self.cost == other.cost && self.node == other.node
            }
        }
        impl Eq for Frontier {}
        impl PartialOrd for Frontier {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Frontier {
            fn cmp(&self, other: &Self) -> Ordering {
                // Min-heap on cost; smaller node id wins ties
                other
                    .cost
                    .total_cmp(&self.cost)
                    .then_with(|| other.node.cmp(&self.node))
            }
        }

        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
        let mut heap = BinaryHeap::new();

        dist.insert(from, 0.0);
        heap.push(Frontier {
            cost: 0.0,
            node: from,
        });

        while let Some(Frontier { cost, node }) = heap.pop() {
            if node == to {
                break;
            }
            match dist.get(&node) {
                Some(&d) if cost > d => continue,
                _ => {}
            }
            let Some(neighbors) = self.adjacency.get(&node) else {
                continue;
            };
            for adj in neighbors {
                let step = cost_fn(node, adj.to).max(0.0);
                let next_cost = cost + step;
                let better = match dist.get(&adj.to) {
                    Some(&d) => next_cost < d,
                    None => true,
                };
                if better {
                    dist.insert(adj.to, next_cost);
                    prev.insert(adj.to, node);
                    heap.push(Frontier {
                        cost: next_cost,
                        node: adj.to,
                    });
                }
            }
        }

        if !prev.contains_key(&to) {
            return Err(AppError::NoPath { from, to });
        }

        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = prev[&current];
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }

    /// Shortest path weighted by edge length alone.
    pub fn shortest_path_by_length(&self, from: NodeId, to: NodeId) -> Result<Vec<NodeId>> {
        self.shortest_path(from, to, |u, v| {
            self.edge_length(u, v).unwrap_or(f64::INFINITY)
        })
    }

    /// Sum of traversed edge lengths along a node sequence.
    pub fn path_length_m(&self, nodes: &[NodeId]) -> f64 {
        nodes
            .windows(2)
            .map(|w| match self.edge_length(w[0], w[1]) {
                Some(len) => len,
                // Contract: consecutive nodes are connected; fall back to
                // straight-line distance if a caller hands us a gap
                None => match (self.coords(w[0]), self.coords(w[1])) {
                    (Some(a), Some(b)) => a.distance_m(&b),
                    _ => 0.0,
                },
            })
            .sum()
    }

    /// Geographic polyline of a node sequence: per-edge geometry where
    /// stored, straight segments otherwise, deduplicated at joints.
    pub fn path_coords(&self, nodes: &[NodeId]) -> Vec<Coordinates> {
        let mut out: Vec<Coordinates> = Vec::new();
        let mut push = |c: Coordinates, out: &mut Vec<Coordinates>| {
            match out.last() {
                Some(last) if last.distance_m(&c) < 1e-6 => {}
                _ => out.push(c),
            }
        };
        if let Some(&first) = nodes.first() {
            if let Some(c) = self.coords(first) {
                push(c, &mut out);
            }
        }
        for w in nodes.windows(2) {
            match self.edge(w[0], w[1]) {
                Some(adj) => {
                    if let Some(geom) = &adj.geometry {
                        for c in geom {
                            push(*c, &mut out);
                        }
                    }
                    if let Some(c) = self.coords(w[1]) {
                        push(c, &mut out);
                    }
                }
                None => {
                    if let Some(c) = self.coords(w[1]) {
                        push(c, &mut out);
                    }
                }
            }
        }
        out
    }

    /// Median edge length, used by loop-closure checks.
    pub fn median_edge_length_m(&self) -> f64 {
        let mut lengths: Vec<f64> = self
            .adjacency
            .values()
            .flatten()
            .map(|a| a.length_m)
            .collect();
        if lengths.is_empty() {
            return 0.0;
        }
        lengths.sort_by(|a, b| a.total_cmp(b));
        lengths[lengths.len() / 2]
    }
}
