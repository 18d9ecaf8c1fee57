pub mod coordinates;
pub mod guidance;
pub mod options;
pub mod route;

pub use coordinates::{polyline_length_m, Coordinates};
pub use guidance::{guidance_id, Direction, GuidancePlan, GuidancePoint, GuidanceType};
pub use options::{PathSelect, RouteOptions};
pub use route::{
    FeatureCollection, GenerateRouteRequest, GenerateRouteResponse, RouteData, RouteMetrics,
    RouteProperties,
};
