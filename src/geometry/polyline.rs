use std::f64::consts::PI;

/// A point in planar meter space (or unit space before placement).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn distance(&self, other: &Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Total length of a polyline.
pub fn length(points: &[Vec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Arithmetic mean of the points.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::default();
    }
    let n = points.len() as f64;
    Vec2 {
        x: points.iter().map(|p| p.x).sum::<f64>() / n,
        y: points.iter().map(|p| p.y).sum::<f64>() / n,
    }
}

/// Axis-aligned bounding box as (min, max). None for an empty polyline.
pub fn bounding_box(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Translate every point by `offset`.
pub fn translate(points: &[Vec2], offset: Vec2) -> Vec<Vec2> {
    points
        .iter()
        .map(|p| Vec2::new(p.x + offset.x, p.y + offset.y))
        .collect()
}

/// Uniformly scale about a fixed origin.
pub fn scale_about(points: &[Vec2], origin: Vec2, factor: f64) -> Vec<Vec2> {
    points
        .iter()
        .map(|p| Vec2 {
            x: origin.x + (p.x - origin.x) * factor,
            y: origin.y + (p.y - origin.y) * factor,
        })
        .collect()
}

/// Rotate counter-clockwise about a fixed origin.
pub fn rotate_about(points: &[Vec2], origin: Vec2, angle_deg: f64) -> Vec<Vec2> {
    let angle = angle_deg * PI / 180.0;
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|p| {
            let dx = p.x - origin.x;
            let dy = p.y - origin.y;
            Vec2 {
                x: origin.x + dx * cos - dy * sin,
                y: origin.y + dx * sin + dy * cos,
            }
        })
        .collect()
}

/// Insert intermediate points so that consecutive samples are at most `step`
/// apart. Original vertices are preserved.
pub fn densify(points: &[Vec2], step: f64) -> Vec<Vec2> {
    if points.len() < 2 || step <= 0.0 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = a.distance(&b);
        if seg_len > step {
            let n = (seg_len / step).ceil() as usize;
            for i in 1..n {
                let t = i as f64 / n as f64;
                out.push(Vec2 {
                    x: a.x + (b.x - a.x) * t,
                    y: a.y + (b.y - a.y) * t,
                });
            }
        }
        out.push(b);
    }
    out
}

/// Drop points closer than `min_gap` to the previously kept point.
pub fn thin(points: &[Vec2], min_gap: f64) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::new();
    for p in points {
        match out.last() {
            Some(last) if p.distance(last) < min_gap => {}
            _ => out.push(*p),
        }
    }
    out
}

/// Perpendicular distance from `p` to the segment (a, b), clamped to the
/// segment's extent.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-18 {
        return p.distance(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj = Vec2 {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    p.distance(&proj)
}

/// Minimum distance from `p` to any segment of the polyline.
pub fn point_polyline_distance(p: Vec2, line: &[Vec2]) -> f64 {
    if line.is_empty() {
        return f64::INFINITY;
    }
    if line.len() == 1 {
        return p.distance(&line[0]);
    }
    line.windows(2)
        .map(|w| point_segment_distance(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Douglas–Peucker simplification with an absolute tolerance.
pub fn douglas_peucker(points: &[Vec2], tolerance: f64) -> Vec<Vec2> {
    if points.len() < 3 || tolerance <= 0.0 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    simplify_range(points, 0, points.len() - 1, tolerance, &mut keep);
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn simplify_range(points: &[Vec2], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut index = first;
    for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = point_segment_distance(*p, points[first], points[last]);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }
    if max_dist > tolerance {
        keep[index] = true;
        simplify_range(points, first, index, tolerance, keep);
        simplify_range(points, index, last, tolerance, keep);
    }
}

/// The point at arclength fraction `t` in [0, 1] along the polyline.
pub fn point_at_fraction(points: &[Vec2], t: f64) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    if points.len() == 1 {
        return Some(points[0]);
    }
    let total = length(points);
    if total <= 0.0 {
        return Some(points[0]);
    }
    let target = t.clamp(0.0, 1.0) * total;
    let mut walked = 0.0;
    for w in points.windows(2) {
        let seg = w[0].distance(&w[1]);
        if walked + seg >= target {
            let local = if seg > 0.0 { (target - walked) / seg } else { 0.0 };
            return Some(Vec2 {
                x: w[0].x + (w[1].x - w[0].x) * local,
                y: w[0].y + (w[1].y - w[0].y) * local,
            });
        }
        walked += seg;
    }
    points.last().copied()
}
