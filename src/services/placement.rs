use crate::geometry::{self, Vec2};
use crate::models::RouteOptions;

/// Map the unit-square template into meter space around the start point.
///
/// The start sits at the meter-frame origin. The template is centered on its
/// centroid, scaled to `canvas_box_frac * graph_radius_m * scale`, rotated,
/// then shifted so its nearest sample is pulled toward the start by
/// `proximity_alpha`, capped at `proximity_max_shift_m`.
pub fn place_template(unit: &[Vec2], opts: &RouteOptions, scale: f64) -> Vec<Vec2> {
    let center = geometry::centroid(unit);
    let centered = geometry::translate(unit, Vec2::new(-center.x, -center.y));

    let side_m = opts.canvas_box_frac * opts.graph_radius_m * scale;
    let scaled = geometry::scale_about(&centered, Vec2::default(), side_m);

    let rotated = if opts.global_rot_deg.abs() > 0.0 {
        geometry::rotate_about(&scaled, Vec2::default(), opts.global_rot_deg)
    } else {
        scaled
    };

    let offset = proximity_offset(
        &rotated,
        opts.proximity_alpha,
        opts.proximity_max_shift_m,
    );
    geometry::translate(&rotated, offset)
}

/// Blend toward moving the template sample nearest to the origin onto the
/// origin, with a hard cap on the shift magnitude. Distance ties break on
/// coordinates so the choice does not depend on point order.
fn proximity_offset(points: &[Vec2], alpha: f64, max_shift_m: f64) -> Vec2 {
    let Some(nearest) = points.iter().copied().min_by(|a, b| {
        a.norm()
            .total_cmp(&b.norm())
            .then_with(|| a.x.total_cmp(&b.x))
            .then_with(|| a.y.total_cmp(&b.y))
    }) else {
        return Vec2::default();
    };

    let mut shift = Vec2::new(-nearest.x * alpha, -nearest.y * alpha);
    let mag = shift.norm();
    if mag > max_shift_m && mag > 0.0 {
        let f = max_shift_m / mag;
        shift.x *= f;
        shift.y *= f;
    }
    shift
}
