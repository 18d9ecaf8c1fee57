// Application-wide constants
// This module centralizes all magic numbers and hardcoded values for better maintainability

// Server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";

// Data layout defaults (relative to the process working directory)
pub const DEFAULT_DATA_DIR: &str = "data";
pub const SVG_SUBDIR: &str = "svg";
pub const CACHE_SUBDIR: &str = "cache";
pub const GENERATED_SUBDIR: &str = "generated";

// Road-graph cache
pub const GRAPH_CACHE_MAX_ENTRIES: u64 = 4;
pub const GRAPH_KEY_COORD_DECIMALS: u32 = 3;

// Template loading defaults
pub const DEFAULT_SVG_SAMPLES_PER_SEG: u32 = 80;
pub const DEFAULT_SVG_SIMPLIFY: f64 = 0.0;
pub const DEFAULT_SVG_FLIP_Y: bool = true;

// Placement defaults
pub const DEFAULT_CANVAS_BOX_FRAC: f64 = 0.75;
pub const DEFAULT_GLOBAL_ROT_DEG: f64 = 0.0;
pub const DEFAULT_PROXIMITY_ALPHA: f64 = 0.75;
pub const DEFAULT_PROXIMITY_MAX_SHIFT_M: f64 = 2000.0;

// Routing defaults
pub const DEFAULT_SAMPLE_STEP_M: f64 = 60.0;
pub const DEFAULT_MIN_WP_GAP_M: f64 = 12.0;
pub const DEFAULT_GRAPH_RADIUS_M: f64 = 7000.0;
pub const DEFAULT_RETURN_TO_START: bool = true;
pub const DEFAULT_SHAPE_BIAS_LAMBDA: f64 = 4.0;
pub const DEFAULT_ANCHOR_COUNT: u32 = 10;
pub const DEFAULT_USE_ANCHORS: bool = true;
pub const DEFAULT_CONNECT_FROM_START: bool = true;
pub const DEFAULT_MAX_CONNECTOR_M: f64 = 450.0;

// Distance fitting
pub const DEFAULT_TOL_RATIO: f64 = 0.08;
pub const DEFAULT_FIT_ITERS: u32 = 16;
pub const FIT_SCALE_LO: f64 = 0.2;
pub const FIT_SCALE_HI: f64 = 3.0;
pub const MAX_TARGET_KM: f64 = 100.0;

// Guidance extraction
pub const TURN_IGNORE_DEG: f64 = 15.0;
pub const TURN_SLIGHT_DEG: f64 = 30.0;
pub const TURN_SHARP_DEG: f64 = 60.0;
pub const TURN_U_TURN_DEG: f64 = 150.0;
pub const TURN_TRIGGER_STEPS_M: [f64; 3] = [10.0, 30.0, 50.0];
pub const U_TURN_TRIGGER_M: f64 = 15.0;
