use crate::constants::{FIT_SCALE_HI, FIT_SCALE_LO};
use crate::error::{AppError, Result};
use crate::geometry::{LocalProjection, Vec2};
use crate::graph::RoadGraph;
use crate::models::{Coordinates, RouteOptions};
use crate::services::placement::place_template;
use crate::services::router::{route_shape, RoutedPath};
use crate::services::CancelToken;

/// Outcome of the distance fit.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub routed: RoutedPath,
    pub scale_used: f64,
    pub matched: bool,
}

/// One scale evaluation. Recoverable routing failures are mapped to an
/// effective length so the search can keep contracting the bracket.
enum Iterate {
    Feasible(RoutedPath),
    /// Anchors unreachable from the start; treated as length 0.
    TooShort,
    /// A sub-segment had no path; treated as infinite length.
    TooLong,
}

impl Iterate {
    fn effective_length_m(&self) -> f64 {
        match self {
            Iterate::Feasible(r) => r.length_m,
            Iterate::TooShort => 0.0,
            Iterate::TooLong => f64::INFINITY,
        }
    }
}

/// Binary search over the template scale until the routed length lands
/// within `tol_ratio` of the target. Returns the closest iterate with
/// `matched = false` when the tolerance is never met, and `FitFailed` when
/// every iterate was infeasible.
pub fn fit_to_target(
    graph: &RoadGraph,
    projection: &LocalProjection,
    unit: &[Vec2],
    start: &Coordinates,
    opts: &RouteOptions,
    target_km: f64,
    cancel: &CancelToken,
) -> Result<FitResult> {
    let target_m = target_km * 1000.0;
    let tol_m = opts.tol_ratio * target_m;

    let mut lo = FIT_SCALE_LO;
    let mut hi = FIT_SCALE_HI;
    let mut best: Option<(f64, RoutedPath, f64)> = None;

    let mut evaluate = |scale: f64, best: &mut Option<(f64, RoutedPath, f64)>| -> Result<Iterate> {
        let placed = place_template(unit, opts, scale);
        match route_shape(graph, projection, &placed, start, opts, cancel) {
            Ok(routed) => {
                let diff = (routed.length_m - target_m).abs();
                tracing::debug!(
                    scale,
                    length_m = routed.length_m,
                    target_m,
                    "Fit iterate"
                );
                let improves = best.as_ref().map(|(_, _, d)| diff < *d).unwrap_or(true);
                if improves {
                    *best = Some((scale, routed.clone(), diff));
                }
                Ok(Iterate::Feasible(routed))
            }
            Err(AppError::ConnectorTooLong { .. }) => {
                tracing::debug!(scale, "Fit iterate infeasible: connector too long");
                Ok(Iterate::TooShort)
            }
            Err(AppError::NoPath { .. }) => {
                tracing::debug!(scale, "Fit iterate infeasible: no path");
                Ok(Iterate::TooLong)
            }
            // Template, graph and cancellation errors abort the whole fit
            Err(e) => Err(e),
        }
    };

    // Bracket evaluations; each bound grows once if it fails to bracket
    let lo_len = evaluate(lo, &mut best)?.effective_length_m();
    if lo_len > target_m {
        lo /= 2.0;
    }
    let hi_len = evaluate(hi, &mut best)?.effective_length_m();
    if hi_len < target_m {
        hi *= 2.0;
    }

    if let Some((scale, routed, diff)) = &best {
        if *diff <= tol_m {
            return Ok(FitResult {
                routed: routed.clone(),
                scale_used: *scale,
                matched: true,
            });
        }
    }

    for _ in 0..opts.iters {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        let scale = 0.5 * (lo + hi);
        let iterate = evaluate(scale, &mut best)?;

        if let Iterate::Feasible(ref routed) = iterate {
            if (routed.length_m - target_m).abs() <= tol_m {
                return Ok(FitResult {
                    routed: routed.clone(),
                    scale_used: scale,
                    matched: true,
                });
            }
        }

        if iterate.effective_length_m() < target_m {
            lo = scale;
        } else {
            hi = scale;
        }
    }

    match best {
        Some((scale_used, routed, _)) => Ok(FitResult {
            routed,
            scale_used,
            matched: false,
        }),
        None => Err(AppError::FitFailed(format!(
            "no feasible route for any scale in [{lo:.3}, {hi:.3}]"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphDocument, GraphEdge, GraphNode};

    const BASE: Coordinates = Coordinates {
        lat: 33.4996,
        lng: 126.5312,
    };

    /// Straight east-west road: `count` nodes spaced ~100m, bidirectional.
    fn line_graph(count: u64) -> RoadGraph {
        let projection = LocalProjection::new(BASE);
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let at = |i: u64| projection.to_wgs84(&Vec2::new(i as f64 * 100.0 - 1000.0, 0.0));
        for i in 0..count {
            let c = at(i);
            nodes.push(GraphNode {
                id: i,
                lat: c.lat,
                lng: c.lng,
            });
            if i + 1 < count {
                let d = at(i).distance_m(&at(i + 1));
                edges.push(GraphEdge {
                    u: i,
                    v: i + 1,
                    length_m: d,
                    geometry: None,
                });
                edges.push(GraphEdge {
                    u: i + 1,
                    v: i,
                    length_m: d,
                    geometry: None,
                });
            }
        }
        RoadGraph::from_document(GraphDocument { nodes, edges }).unwrap()
    }

    fn horizontal_segment() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]
    }

    fn opts() -> RouteOptions {
        RouteOptions {
            graph_radius_m: 2000.0,
            canvas_box_frac: 0.75,
            sample_step_m: 50.0,
            min_wp_gap_m: 10.0,
            anchor_count: 6,
            use_anchors: true,
            connect_from_start: false,
            return_to_start: false,
            tol_ratio: 0.1,
            iters: 16,
            shape_bias_lambda: 0.0,
            ..RouteOptions::default()
        }
    }

    #[test]
    fn converges_on_a_straight_road() {
        let graph = line_graph(41); // ~4km of road
        let projection = LocalProjection::new(BASE);
        let fit = fit_to_target(
            &graph,
            &projection,
            &horizontal_segment(),
            &BASE,
            &opts(),
            1.0,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(fit.matched);
        assert!((fit.routed.length_m - 1000.0).abs() <= 100.0);
    }

    #[test]
    fn out_and_back_doubles_length() {
        let graph = line_graph(41);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.return_to_start = true;
        o.connect_from_start = true;
        o.max_connector_m = 2000.0;
        let fit = fit_to_target(
            &graph,
            &projection,
            &horizontal_segment(),
            &BASE,
            &o,
            2.0,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(fit.matched);
        let first = fit.routed.coords.first().unwrap();
        let last = fit.routed.coords.last().unwrap();
        assert!(first.distance_m(last) <= 2.0 * graph.median_edge_length_m());
    }

    #[test]
    fn unreachable_target_returns_best_effort() {
        let graph = line_graph(21); // ~2km of road, 4km out-and-back max
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.return_to_start = true;
        let fit = fit_to_target(
            &graph,
            &projection,
            &horizontal_segment(),
            &BASE,
            &o,
            100.0,
            &CancelToken::new(),
        )
        .unwrap();

        assert!(!fit.matched);
        assert!(fit.routed.length_m < 100_000.0);
    }

    #[test]
    fn length_is_weakly_monotone_in_scale() {
        let graph = line_graph(81);
        let projection = LocalProjection::new(BASE);
        let o = opts();
        let cancel = CancelToken::new();

        let mut last = 0.0;
        for scale in [0.3, 0.6, 0.9, 1.2, 1.5] {
            let placed = place_template(&horizontal_segment(), &o, scale);
            let routed =
                route_shape(&graph, &projection, &placed, &BASE, &o, &cancel).unwrap();
            // Allow a node-snapping wobble of one edge length
            assert!(
                routed.length_m >= last - 110.0,
                "length dropped from {last} to {} at scale {scale}",
                routed.length_m
            );
            last = routed.length_m;
        }
    }

    #[test]
    fn terminates_with_few_iterations() {
        let graph = line_graph(41);
        let projection = LocalProjection::new(BASE);
        let mut o = opts();
        o.iters = 4;
        let fit = fit_to_target(
            &graph,
            &projection,
            &horizontal_segment(),
            &BASE,
            &o,
            1.0,
            &CancelToken::new(),
        );
        assert!(fit.is_ok());
    }

    #[test]
    fn cancellation_stops_the_loop() {
        let graph = line_graph(41);
        let projection = LocalProjection::new(BASE);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = fit_to_target(
            &graph,
            &projection,
            &horizontal_segment(),
            &BASE,
            &opts(),
            1.0,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "Cancelled");
    }
}
