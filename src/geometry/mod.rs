pub mod polyline;
pub mod projection;

pub use polyline::{
    bounding_box, centroid, densify, douglas_peucker, length, point_at_fraction,
    point_polyline_distance, point_segment_distance, rotate_about, scale_about, thin, translate,
    Vec2,
};
pub use projection::LocalProjection;
