use crate::constants::MAX_TARGET_KM;
use crate::models::{Coordinates, GuidancePlan, RouteOptions};
use serde::{Deserialize, Serialize};

// Request/response types for the generate endpoint

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRouteRequest {
    pub template_name: String,
    pub start_point: Coordinates,
    pub target_km: f64,
    #[serde(default)]
    pub options: RouteOptions,
    #[serde(default)]
    pub save_geojson: bool,
}

impl GenerateRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.template_name.is_empty() {
            return Err("template_name must not be empty".to_string());
        }
        Coordinates::new(self.start_point.lat, self.start_point.lng)?;
        if !self.target_km.is_finite() || self.target_km <= 0.0 {
            return Err("target_km must be positive".to_string());
        }
        if self.target_km > MAX_TARGET_KM {
            return Err(format!("target_km must be at most {}", MAX_TARGET_KM));
        }
        self.options.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteMetrics {
    pub nodes: usize,
    pub route_length_m: f64,
    pub target_km: f64,
}

// GeoJSON output. Only the LineString subset this service emits.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineStringGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// [lng, lat] pairs, GeoJSON axis order.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteProperties {
    pub template: String,
    pub align_mode: String,
    pub matched: bool,
    pub scale_used: f64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: LineStringGeometry,
    pub properties: RouteProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Wrap a geographic polyline and its properties as a single-feature
    /// collection.
    pub fn line_string(coords: &[Coordinates], properties: RouteProperties) -> Self {
        let coordinates = coords.iter().map(|c| [c.lng, c.lat]).collect();
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features: vec![Feature {
                kind: "Feature".to_string(),
                geometry: LineStringGeometry {
                    kind: "LineString".to_string(),
                    coordinates,
                },
                properties,
            }],
        }
    }
}

/// Payload of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct RouteData {
    pub metrics: RouteMetrics,
    pub geojson: FeatureCollection,
    pub guidance: GuidancePlan,
    pub saved: Option<String>,
}

/// The {ok, data} success envelope; errors use the AppError envelope.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRouteResponse {
    pub ok: bool,
    pub data: RouteData,
}
