use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Sub-path selection for the template loader: a concrete index, or `auto`
/// to merge all sub-paths by endpoint proximity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSelect {
    Index(u32),
    Auto(AutoKeyword),
}

/// The literal string `"auto"`. Any other string fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoKeyword {
    Auto,
}

impl Default for PathSelect {
    fn default() -> Self {
        PathSelect::Auto(AutoKeyword::Auto)
    }
}

impl PathSelect {
    pub fn is_auto(&self) -> bool {
        matches!(self, PathSelect::Auto(_))
    }
}

/// Per-request configuration bundle. Unknown keys are rejected; every field
/// is range-checked by [`RouteOptions::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RouteOptions {
    // Template
    pub svg_path_index: PathSelect,
    pub svg_samples_per_seg: u32,
    pub svg_simplify: f64,
    pub svg_flip_y: bool,

    // Placement
    pub canvas_box_frac: f64,
    pub global_rot_deg: f64,

    // Routing / graph
    pub sample_step_m: f64,
    pub min_wp_gap_m: f64,
    pub graph_radius_m: f64,
    pub return_to_start: bool,

    // Fitting
    pub tol_ratio: f64,
    pub iters: u32,

    // Shape preservation
    pub shape_bias_lambda: f64,
    pub anchor_count: u32,
    pub use_anchors: bool,

    // Start-near + connector
    pub connect_from_start: bool,
    pub max_connector_m: f64,
    pub proximity_alpha: f64,
    pub proximity_max_shift_m: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        RouteOptions {
            svg_path_index: PathSelect::default(),
            svg_samples_per_seg: DEFAULT_SVG_SAMPLES_PER_SEG,
            svg_simplify: DEFAULT_SVG_SIMPLIFY,
            svg_flip_y: DEFAULT_SVG_FLIP_Y,
            canvas_box_frac: DEFAULT_CANVAS_BOX_FRAC,
            global_rot_deg: DEFAULT_GLOBAL_ROT_DEG,
            sample_step_m: DEFAULT_SAMPLE_STEP_M,
            min_wp_gap_m: DEFAULT_MIN_WP_GAP_M,
            graph_radius_m: DEFAULT_GRAPH_RADIUS_M,
            return_to_start: DEFAULT_RETURN_TO_START,
            tol_ratio: DEFAULT_TOL_RATIO,
            iters: DEFAULT_FIT_ITERS,
            shape_bias_lambda: DEFAULT_SHAPE_BIAS_LAMBDA,
            anchor_count: DEFAULT_ANCHOR_COUNT,
            use_anchors: DEFAULT_USE_ANCHORS,
            connect_from_start: DEFAULT_CONNECT_FROM_START,
            max_connector_m: DEFAULT_MAX_CONNECTOR_M,
            proximity_alpha: DEFAULT_PROXIMITY_ALPHA,
            proximity_max_shift_m: DEFAULT_PROXIMITY_MAX_SHIFT_M,
        }
    }
}

impl RouteOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.svg_samples_per_seg == 0 {
            return Err("svg_samples_per_seg must be positive".to_string());
        }
        if !self.svg_simplify.is_finite() || self.svg_simplify < 0.0 {
            return Err("svg_simplify must be >= 0".to_string());
        }
        if !self.canvas_box_frac.is_finite() || !(0.0..=1.0).contains(&self.canvas_box_frac) {
            return Err("canvas_box_frac must be between 0 and 1".to_string());
        }
        if !self.global_rot_deg.is_finite() {
            return Err("global_rot_deg must be finite".to_string());
        }
        if !self.sample_step_m.is_finite() || self.sample_step_m <= 0.0 {
            return Err("sample_step_m must be positive".to_string());
        }
        if !self.min_wp_gap_m.is_finite() || self.min_wp_gap_m <= 0.0 {
            return Err("min_wp_gap_m must be positive".to_string());
        }
        if !self.graph_radius_m.is_finite() || self.graph_radius_m <= 0.0 {
            return Err("graph_radius_m must be positive".to_string());
        }
        if !self.tol_ratio.is_finite() || !(0.0..=1.0).contains(&self.tol_ratio) {
            return Err("tol_ratio must be between 0 and 1".to_string());
        }
        if self.iters == 0 {
            return Err("iters must be positive".to_string());
        }
        if !self.shape_bias_lambda.is_finite() || self.shape_bias_lambda < 0.0 {
            return Err("shape_bias_lambda must be >= 0".to_string());
        }
        if self.anchor_count == 0 {
            return Err("anchor_count must be positive".to_string());
        }
        if !self.max_connector_m.is_finite() || self.max_connector_m <= 0.0 {
            return Err("max_connector_m must be positive".to_string());
        }
        if !self.proximity_alpha.is_finite() || !(0.0..=1.0).contains(&self.proximity_alpha) {
            return Err("proximity_alpha must be between 0 and 1".to_string());
        }
        if !self.proximity_max_shift_m.is_finite() || self.proximity_max_shift_m <= 0.0 {
            return Err("proximity_max_shift_m must be positive".to_string());
        }
        Ok(())
    }
}
