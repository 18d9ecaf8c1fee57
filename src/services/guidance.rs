use crate::constants::*;
use crate::geometry::{LocalProjection, Vec2};
use crate::models::{guidance_id, Coordinates, Direction, GuidancePlan, GuidancePoint, GuidanceType};

/// Convert the final geographic polyline into an ordered guidance plan:
/// a start record, classified turns, kilometer marks, and a finish record.
pub fn build_guidance(
    coords: &[Coordinates],
    projection: &LocalProjection,
    min_wp_gap_m: f64,
) -> GuidancePlan {
    if coords.len() < 2 {
        return GuidancePlan {
            guidance_points: Vec::new(),
            total_points: 0,
            total_distance_m: 0.0,
        };
    }

    let points: Vec<Vec2> = coords.iter().map(|c| projection.to_meters(c)).collect();
    let n = points.len();

    let mut cum = vec![0.0; n];
    for i in 1..n {
        cum[i] = cum[i - 1] + points[i - 1].distance(&points[i]);
    }
    let total = cum[n - 1];

    let bearings: Vec<f64> = points
        .windows(2)
        .map(|w| bearing_deg(&w[0], &w[1]))
        .collect();

    // Classified turns at interior vertices
    struct Turn {
        idx: usize,
        angle: f64,
    }
    let mut turns: Vec<Turn> = Vec::new();
    for i in 1..n - 1 {
        let angle = normalize_angle(bearings[i] - bearings[i - 1]);
        if angle.abs() < TURN_IGNORE_DEG {
            continue;
        }
        let candidate = Turn { idx: i, angle };
        // Same-sign turns within the waypoint gap merge into the stronger one
        let merges = turns.last().is_some_and(|prev| {
            prev.angle.signum() == candidate.angle.signum()
                && cum[candidate.idx] - cum[prev.idx] < min_wp_gap_m
        });
        if merges {
            let last = turns.len() - 1;
            if candidate.angle.abs() > turns[last].angle.abs() {
                turns[last] = candidate;
            }
        } else {
            turns.push(candidate);
        }
    }

    // Assemble in polyline order; sequence/distances fixed up at the end
    let mut entries: Vec<GuidancePoint> = Vec::new();

    entries.push(GuidancePoint {
        sequence: 0,
        kind: GuidanceType::Start,
        lat: coords[0].lat,
        lng: coords[0].lng,
        direction: Direction::Straight,
        angle_deg: 0.0,
        distance_from_start_m: 0.0,
        distance_to_next_m: 0.0,
        guidance_id: guidance_id::RUN_START.to_string(),
        trigger_distance_m: 0.0,
        km_mark: None,
        show_pace: false,
    });

    let mut prev_guidance_dist = 0.0;
    for turn in &turns {
        let direction = classify(turn.angle);
        let dist = cum[turn.idx];
        let gap = dist - prev_guidance_dist;
        let trigger = trigger_distance(direction, gap);
        entries.push(GuidancePoint {
            sequence: 0,
            kind: GuidanceType::Turn,
            lat: coords[turn.idx].lat,
            lng: coords[turn.idx].lng,
            direction,
            angle_deg: turn.angle,
            distance_from_start_m: dist,
            distance_to_next_m: 0.0,
            guidance_id: turn_guidance_id(direction, trigger).to_string(),
            trigger_distance_m: trigger,
            km_mark: None,
            show_pace: false,
        });
        prev_guidance_dist = dist;
    }

    // Kilometer marks by interpolation along the polyline
    let km_count = (total / 1000.0).floor() as u32;
    for k in 1..=km_count {
        let dist = k as f64 * 1000.0;
        let geo = projection.to_wgs84(&interpolate_at(&points, &cum, dist));
        entries.push(GuidancePoint {
            sequence: 0,
            kind: GuidanceType::Km,
            lat: geo.lat,
            lng: geo.lng,
            direction: Direction::Straight,
            angle_deg: 0.0,
            distance_from_start_m: dist,
            distance_to_next_m: 0.0,
            guidance_id: guidance_id::KM_MARK.to_string(),
            trigger_distance_m: 0.0,
            km_mark: Some(k),
            show_pace: true,
        });
    }

    entries.push(GuidancePoint {
        sequence: 0,
        kind: GuidanceType::Finish,
        lat: coords[n - 1].lat,
        lng: coords[n - 1].lng,
        direction: Direction::Straight,
        angle_deg: 0.0,
        distance_from_start_m: total,
        distance_to_next_m: 0.0,
        guidance_id: guidance_id::ROUTE_COMPLETE.to_string(),
        trigger_distance_m: 0.0,
        km_mark: None,
        show_pace: false,
    });

    entries.sort_by(|a, b| {
        a.distance_from_start_m
            .total_cmp(&b.distance_from_start_m)
            .then_with(|| type_rank(a.kind).cmp(&type_rank(b.kind)))
    });

    let count = entries.len();
    for i in 0..count {
        entries[i].sequence = (i + 1) as u32;
        entries[i].distance_to_next_m = if i + 1 < count {
            entries[i + 1].distance_from_start_m - entries[i].distance_from_start_m
        } else {
            0.0
        };
    }

    GuidancePlan {
        guidance_points: entries,
        total_points: count,
        total_distance_m: total,
    }
}

/// Compass-style bearing of the segment a -> b, degrees.
fn bearing_deg(a: &Vec2, b: &Vec2) -> f64 {
    (b.x - a.x).atan2(b.y - a.y).to_degrees()
}

/// Normalize an angle difference into (-180, 180].
fn normalize_angle(mut a: f64) -> f64 {
    while a <= -180.0 {
        a += 360.0;
    }
    while a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Negative angles turn left, positive turn right.
fn classify(angle: f64) -> Direction {
    let mag = angle.abs();
    let left = angle < 0.0;
    if mag >= TURN_U_TURN_DEG {
        Direction::UTurn
    } else if mag >= TURN_SHARP_DEG {
        if left {
            Direction::SharpLeft
        } else {
            Direction::SharpRight
        }
    } else if mag >= TURN_SLIGHT_DEG {
        if left {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if left {
        Direction::SlightLeft
    } else {
        Direction::SlightRight
    }
}

/// Largest standard trigger not exceeding the gap to the previous guidance;
/// u-turns use a fixed short trigger.
fn trigger_distance(direction: Direction, gap_m: f64) -> f64 {
    if direction == Direction::UTurn {
        return U_TURN_TRIGGER_M;
    }
    TURN_TRIGGER_STEPS_M
        .iter()
        .rev()
        .find(|&&step| step <= gap_m)
        .copied()
        .unwrap_or(TURN_TRIGGER_STEPS_M[0])
}

fn turn_guidance_id(direction: Direction, trigger_m: f64) -> &'static str {
    match direction {
        Direction::Left | Direction::Right => {
            let left = direction == Direction::Left;
            if trigger_m >= 50.0 {
                if left {
                    guidance_id::TURN_LEFT_50
                } else {
                    guidance_id::TURN_RIGHT_50
                }
            } else if trigger_m >= 30.0 {
                if left {
                    guidance_id::TURN_LEFT_30
                } else {
                    guidance_id::TURN_RIGHT_30
                }
            } else if left {
                guidance_id::TURN_LEFT_10
            } else {
                guidance_id::TURN_RIGHT_10
            }
        }
        Direction::SlightLeft => guidance_id::SLIGHT_LEFT,
        Direction::SlightRight => guidance_id::SLIGHT_RIGHT,
        Direction::SharpLeft => guidance_id::SHARP_LEFT,
        Direction::SharpRight => guidance_id::SHARP_RIGHT,
        Direction::UTurn => guidance_id::U_TURN,
        Direction::Straight => guidance_id::GO_STRAIGHT_50,
    }
}

fn type_rank(kind: GuidanceType) -> u8 {
    match kind {
        GuidanceType::Start => 0,
        GuidanceType::Turn => 1,
        GuidanceType::Checkpoint => 2,
        GuidanceType::Event => 3,
        GuidanceType::Km => 4,
        GuidanceType::Finish => 5,
    }
}

/// Point at a cumulative distance along the meter polyline.
fn interpolate_at(points: &[Vec2], cum: &[f64], dist: f64) -> Vec2 {
    if dist <= 0.0 {
        return points[0];
    }
    for i in 1..points.len() {
        if cum[i] >= dist {
            let seg = cum[i] - cum[i - 1];
            let t = if seg > 0.0 { (dist - cum[i - 1]) / seg } else { 0.0 };
            return Vec2 {
                x: points[i - 1].x + (points[i].x - points[i - 1].x) * t,
                y: points[i - 1].y + (points[i].y - points[i - 1].y) * t,
            };
        }
    }
    *points.last().expect("polyline is non-empty")
}
