use crate::error::{AppError, Result};
use crate::geometry::{self, LocalProjection, Vec2};
use crate::graph::{NodeId, RoadGraph};
use crate::models::{Coordinates, RouteOptions};
use crate::services::CancelToken;

/// A continuous node path on the road graph plus its rendered geometry.
#[derive(Debug, Clone)]
pub struct RoutedPath {
    pub nodes: Vec<NodeId>,
    pub coords: Vec<Coordinates>,
    pub length_m: f64,
}

/// Route the placed template onto the road graph.
///
/// Densifies and thins the meter-space template into the ideal trajectory,
/// snaps anchors to graph nodes, and stitches consecutive anchors with
/// shortest paths under a shape-biased edge cost. Optionally prepends a
/// connector from the start and closes the loop back to it.
pub fn route_shape(
    graph: &RoadGraph,
    projection: &LocalProjection,
    placed: &[Vec2],
    start: &Coordinates,
    opts: &RouteOptions,
    cancel: &CancelToken,
) -> Result<RoutedPath> {
    let trajectory = geometry::thin(
        &geometry::densify(placed, opts.sample_step_m),
        opts.min_wp_gap_m,
    );
    if trajectory.len() < 2 {
        return Err(AppError::TemplateTooSparse(format!(
            "{} waypoint(s) after densify/thin",
            trajectory.len()
        )));
    }

    let anchor_points = select_anchors(&trajectory, opts);

    // Snap anchors to nodes, collapsing consecutive duplicates
    let mut anchor_nodes: Vec<NodeId> = Vec::with_capacity(anchor_points.len());
    for p in &anchor_points {
        let geo = projection.to_wgs84(p);
        let node = graph.nearest_node(projection, &geo);
        if anchor_nodes.last() != Some(&node) {
            anchor_nodes.push(node);
        }
    }

    let start_node = graph.nearest_node(projection, start);
    let mut route: Vec<NodeId> = Vec::new();

    if opts.connect_from_start {
        let first = anchor_nodes[0];
        if start_node != first {
            let connector = graph
                .shortest_path(start_node, first, |u, v| {
                    biased_cost(graph, projection, &trajectory, opts, start_node, first, u, v)
                })
                .map_err(|e| match e {
                    // Unreachable first anchor reads as an unbounded connector
                    AppError::NoPath { .. } => AppError::ConnectorTooLong {
                        length_m: f64::INFINITY,
                        max_m: opts.max_connector_m,
                    },
                    other => other,
                })?;
            let length_m = graph.path_length_m(&connector);
            if length_m > opts.max_connector_m {
                return Err(AppError::ConnectorTooLong {
                    length_m,
                    max_m: opts.max_connector_m,
                });
            }
            extend_route(&mut route, connector);
        } else {
            extend_route(&mut route, vec![start_node]);
        }
    }

    for pair in anchor_nodes.windows(2) {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            extend_route(&mut route, vec![a]);
            continue;
        }
        let leg = graph.shortest_path(a, b, |u, v| {
            biased_cost(graph, projection, &trajectory, opts, a, b, u, v)
        })?;
        extend_route(&mut route, leg);
    }
    if route.is_empty() {
        // Single anchor without connector or loop close
        extend_route(&mut route, vec![anchor_nodes[0]]);
    }

    if opts.return_to_start {
        let last = *route.last().expect("route is non-empty");
        if last != start_node {
            let back = graph.shortest_path(last, start_node, |u, v| {
                biased_cost(graph, projection, &trajectory, opts, last, start_node, u, v)
            })?;
            extend_route(&mut route, back);
        }
    }

    let coords = graph.path_coords(&route);
    let length_m = graph.path_length_m(&route);
    Ok(RoutedPath {
        nodes: route,
        coords,
        length_m,
    })
}

/// Evenly spaced anchor points by arclength, or the trajectory endpoints
/// when the anchor constraint is off.
fn select_anchors(trajectory: &[Vec2], opts: &RouteOptions) -> Vec<Vec2> {
    if !opts.use_anchors {
        return vec![trajectory[0], *trajectory.last().expect("len >= 2")];
    }
    let n = opts.anchor_count as usize;
    let denom = (n.saturating_sub(1)).max(1) as f64;
    (0..n)
        .map(|i| {
            geometry::point_at_fraction(trajectory, i as f64 / denom)
                .expect("trajectory is non-empty")
        })
        .collect()
}

/// Edge cost `length * (1 + lambda * dev)`: deviation is the mean distance of
/// the edge's endpoints and midpoint from the ideal trajectory, normalized by
/// the current anchor pair's straight-line distance.
#[allow(clippy::too_many_arguments)]
fn biased_cost(
    graph: &RoadGraph,
    projection: &LocalProjection,
    trajectory: &[Vec2],
    opts: &RouteOptions,
    pair_a: NodeId,
    pair_b: NodeId,
    u: NodeId,
    v: NodeId,
) -> f64 {
    let length = match graph.edge_length(u, v) {
        Some(len) => len,
        None => return f64::INFINITY,
    };
    if opts.shape_bias_lambda == 0.0 {
        return length;
    }

    let ref_dist = match (graph.coords(pair_a), graph.coords(pair_b)) {
        (Some(a), Some(b)) => {
            let pa = projection.to_meters(&a);
            let pb = projection.to_meters(&b);
            pa.distance(&pb).max(1.0)
        }
        _ => 1.0,
    };

    let (Some(cu), Some(cv)) = (graph.coords(u), graph.coords(v)) else {
        return length;
    };
    let pu = projection.to_meters(&cu);
    let pv = projection.to_meters(&cv);
    let mid = Vec2::new((pu.x + pv.x) / 2.0, (pu.y + pv.y) / 2.0);
    let dev = (geometry::point_polyline_distance(pu, trajectory)
        + geometry::point_polyline_distance(mid, trajectory)
        + geometry::point_polyline_distance(pv, trajectory))
        / 3.0
        / ref_dist;

    length * (1.0 + opts.shape_bias_lambda * dev)
}

/// Append a leg, dropping the duplicated joint node.
fn extend_route(route: &mut Vec<NodeId>, leg: Vec<NodeId>) {
    let skip = match (route.last(), leg.first()) {
        (Some(last), Some(first)) if last == first => 1,
        _ => 0,
    };
    route.extend(leg.into_iter().skip(skip));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphDocument, GraphEdge, GraphNode};

    const BASE: Coordinates = Coordinates {
        lat: 33.4996,
        lng: 126.5312,
    };

    /// Square grid with `size` nodes per side and ~100m spacing,
    /// bidirectional edges. Node id = row * size + col.
    fn grid(size: u64) -> RoadGraph {
        let projection = LocalProjection::new(BASE);
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let at = |row: u64, col: u64| {
            projection.to_wgs84(&Vec2::new(col as f64 * 100.0, row as f64 * 100.0))
        };
        for row in 0..size {
            for col in 0..size {
                let id = row * size + col;
                let c = at(row, col);
                nodes.push(GraphNode {
                    id,
                    lat: c.lat,
                    lng: c.lng,
                });
                let mut link = |other: u64| {
                    let (orow, ocol) = (other / size, other % size);
                    let d = at(row, col).distance_m(&at(orow, ocol));
                    edges.push(GraphEdge {
                        u: id,
                        v: other,
                        length_m: d,
                        geometry: None,
                    });
                };
                if col + 1 < size {
                    link(id + 1);
                }
                if col > 0 {
                    link(id - 1);
                }
                if row + 1 < size {
                    link(id + size);
                }
                if row > 0 {
                    link(id - size);
                }
            }
        }
        RoadGraph::from_document(GraphDocument { nodes, edges }).unwrap()
    }

    fn square_template(side_m: f64) -> Vec<Vec2> {
        // Centered roughly on the grid interior
        let half = side_m / 2.0;
        let c = Vec2::new(200.0, 200.0);
        vec![
            Vec2::new(c.x - half, c.y - half),
            Vec2::new(c.x + half, c.y - half),
            Vec2::new(c.x + half, c.y + half),
            Vec2::new(c.x - half, c.y + half),
            Vec2::new(c.x - half, c.y - half),
        ]
    }

    fn opts() -> RouteOptions {
        RouteOptions {
            sample_step_m: 50.0,
            min_wp_gap_m: 10.0,
            anchor_count: 8,
            use_anchors: true,
            connect_from_start: false,
            return_to_start: false,
            shape_bias_lambda: 4.0,
            ..RouteOptions::default()
        }
    }

    #[test]
    fn routes_square_template_on_grid() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let routed = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &opts(),
            &CancelToken::new(),
        )
        .unwrap();

        assert!(routed.nodes.len() >= 4);
        assert!(routed.length_m > 0.0);
        // Every consecutive pair must be a real edge
        for w in routed.nodes.windows(2) {
            assert!(
                graph.edge_length(w[0], w[1]).is_some(),
                "gap between {} and {}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn polyline_length_agrees_with_edge_sum() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let routed = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &opts(),
            &CancelToken::new(),
        )
        .unwrap();

        let haversine = crate::models::polyline_length_m(&routed.coords);
        let deviation = (haversine - routed.length_m).abs() / routed.length_m.max(1.0);
        assert!(deviation < 0.005, "deviation {deviation}");
    }

    #[test]
    fn return_to_start_closes_the_loop() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.return_to_start = true;
        o.connect_from_start = true;
        o.max_connector_m = 1000.0;
        let routed = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &o,
            &CancelToken::new(),
        )
        .unwrap();

        let start_node = graph.nearest_node(&projection, &BASE);
        assert_eq!(routed.nodes.first(), Some(&start_node));
        assert_eq!(routed.nodes.last(), Some(&start_node));
    }

    #[test]
    fn connector_limit_is_enforced() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.connect_from_start = true;
        o.max_connector_m = 50.0; // template corner is ~140m+ away from origin
        let err = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &o,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "ConnectorTooLong");
    }

    #[test]
    fn sparse_template_is_rejected() {
        let graph = grid(3);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.min_wp_gap_m = 10_000.0; // thins everything but the first point
        let err = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &o,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "TemplateTooSparse");
    }

    #[test]
    fn cancellation_is_honored() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &opts(),
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "Cancelled");
    }

    #[test]
    fn identical_inputs_give_identical_routes() {
        let graph = grid(6);
        let projection = LocalProjection::new(BASE);
        let a = route_shape(
            &graph,
            &projection,
            &square_template(250.0),
            &BASE,
            &opts(),
            &CancelToken::new(),
        )
        .unwrap();
        let b = route_shape(
            &graph,
            &projection,
            &square_template(250.0),
            &BASE,
            &opts(),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn single_anchor_degenerates_to_out_and_back() {
        let graph = grid(5);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.anchor_count = 1;
        o.connect_from_start = true;
        o.return_to_start = true;
        o.max_connector_m = 2000.0;
        let routed = route_shape(
            &graph,
            &projection,
            &square_template(200.0),
            &BASE,
            &o,
            &CancelToken::new(),
        )
        .unwrap();

        let start_node = graph.nearest_node(&projection, &BASE);
        assert_eq!(routed.nodes.first(), Some(&start_node));
        assert_eq!(routed.nodes.last(), Some(&start_node));
        assert!(routed.nodes.len() >= 3);
    }
}
