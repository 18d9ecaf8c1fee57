pub mod store;

pub use store::{FsTemplateStore, TemplateStore};

use crate::error::{AppError, Result};
use crate::geometry::{self, Vec2};
use crate::models::{PathSelect, RouteOptions};
use kurbo::{BezPath, ParamCurve, PathEl};

/// Parse a path-description string into a unit-square polyline.
///
/// The source may be a bare SVG path `d` string or a whole SVG document; in
/// the latter case every `d="…"` attribute is extracted in document order.
pub fn load_template(source: &str, opts: &RouteOptions) -> Result<Vec<Vec2>> {
    let data = extract_path_data(source);
    if data.trim().is_empty() {
        return Err(AppError::TemplateInvalid(
            "no path data in template".to_string(),
        ));
    }

    let path = BezPath::from_svg(&data)
        .map_err(|e| AppError::TemplateInvalid(format!("path parse error: {e}")))?;

    let sub_paths = split_sub_paths(&path);
    if sub_paths.is_empty() {
        return Err(AppError::TemplateInvalid(
            "template contains no sub-paths".to_string(),
        ));
    }

    let sampled: Vec<Vec<Vec2>> = sub_paths
        .iter()
        .map(|sp| sample_sub_path(sp, opts.svg_samples_per_seg))
        .filter(|pts| pts.len() >= 2)
        .collect();
    if sampled.is_empty() {
        return Err(AppError::TemplateInvalid(
            "template sampling produced no points".to_string(),
        ));
    }

    let mut points = match opts.svg_path_index {
        PathSelect::Index(i) => sampled
            .get(i as usize)
            .cloned()
            .ok_or_else(|| {
                AppError::TemplateInvalid(format!(
                    "svg_path_index {} out of range (template has {} sub-paths)",
                    i,
                    sampled.len()
                ))
            })?,
        PathSelect::Auto(_) => chain_sub_paths(sampled),
    };

    points = normalize_unit(&points)?;

    if opts.svg_flip_y {
        for p in &mut points {
            p.y = 1.0 - p.y;
        }
    }

    if opts.svg_simplify > 0.0 {
        points = geometry::douglas_peucker(&points, opts.svg_simplify);
    }

    Ok(points)
}

/// Pull every `d` attribute out of an SVG document. A source without markup
/// is returned unchanged.
fn extract_path_data(source: &str) -> String {
    if !source.contains('<') {
        return source.to_string();
    }
    let mut out = String::new();
    let mut rest = source;
    while let Some(pos) = rest.find("d=") {
        // Require attribute position: preceded by whitespace
        let preceded_ok = rest[..pos]
            .chars()
            .next_back()
            .map(|c| c.is_whitespace())
            .unwrap_or(false);
        let after = &rest[pos + 2..];
        let quote = after.chars().next();
        if preceded_ok && (quote == Some('"') || quote == Some('\'')) {
            let q = quote.unwrap();
            let body = &after[1..];
            if let Some(end) = body.find(q) {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&body[..end]);
                rest = &body[end + 1..];
                continue;
            }
        }
        rest = &rest[pos + 2..];
    }
    out
}

/// Split a parsed path at MoveTo boundaries.
fn split_sub_paths(path: &BezPath) -> Vec<BezPath> {
    let mut out: Vec<BezPath> = Vec::new();
    let mut current: Vec<PathEl> = Vec::new();
    for el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) && !current.is_empty() {
            out.push(BezPath::from_vec(std::mem::take(&mut current)));
        }
        current.push(*el);
    }
    if !current.is_empty() {
        out.push(BezPath::from_vec(current));
    }
    out
}

/// Evaluate every segment at `samples_per_seg + 1` parameter values,
/// dropping consecutive duplicates at segment joints.
fn sample_sub_path(path: &BezPath, samples_per_seg: u32) -> Vec<Vec2> {
    let mut points: Vec<Vec2> = Vec::new();
    for seg in path.segments() {
        for i in 0..=samples_per_seg {
            let t = i as f64 / samples_per_seg as f64;
            let p = seg.eval(t);
            let v = Vec2::new(p.x, p.y);
            match points.last() {
                Some(last) if last.distance(&v) < 1e-12 => {}
                _ => points.push(v),
            }
        }
    }
    points
}

/// Merge sub-paths by greedy endpoint chaining: starting from sub-path 0,
/// repeatedly append the remaining sub-path whose nearer endpoint is closest
/// to the current tail, reversing it when its end is the nearer endpoint.
/// Ties keep insertion order.
fn chain_sub_paths(mut parts: Vec<Vec<Vec2>>) -> Vec<Vec2> {
    let mut merged = parts.remove(0);
    while !parts.is_empty() {
        let tail = *merged.last().expect("merged polyline is non-empty");
        let mut best_idx = 0;
        let mut best_rev = false;
        let mut best_dist = f64::INFINITY;
        for (i, cand) in parts.iter().enumerate() {
            let head = cand[0];
            let end = *cand.last().expect("sub-paths have >= 2 points");
            let d_head = tail.distance(&head);
            let d_end = tail.distance(&end);
            if d_head < best_dist {
                best_dist = d_head;
                best_idx = i;
                best_rev = false;
            }
            if d_end < best_dist {
                best_dist = d_end;
                best_idx = i;
                best_rev = true;
            }
        }
        let mut next = parts.remove(best_idx);
        if best_rev {
            next.reverse();
        }
        merged.extend(next);
    }
    merged
}

/// Letterbox the polyline into [0,1]x[0,1] about the center, preserving
/// aspect ratio.
fn normalize_unit(points: &[Vec2]) -> Result<Vec<Vec2>> {
    let (min, max) = geometry::bounding_box(points).ok_or_else(|| {
        AppError::TemplateInvalid("template has no points".to_string())
    })?;
    let width = max.x - min.x;
    let height = max.y - min.y;
    let extent = width.max(height);
    if extent <= 1e-12 || !extent.is_finite() {
        return Err(AppError::TemplateInvalid(
            "template bounding box is degenerate".to_string(),
        ));
    }
    let scale = 1.0 / extent;
    let pad_x = (1.0 - width * scale) / 2.0;
    let pad_y = (1.0 - height * scale) / 2.0;
    Ok(points
        .iter()
        .map(|p| Vec2 {
            x: (p.x - min.x) * scale + pad_x,
            y: (p.y - min.y) * scale + pad_y,
        })
        .collect())
}
