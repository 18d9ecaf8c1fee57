use serde::{Deserialize, Serialize};
use std::fmt;

/// Turn direction relative to the direction of travel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Straight,
    UTurn,
    SlightLeft,
    SlightRight,
    SharpLeft,
    SharpRight,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Straight => "straight",
            Direction::UTurn => "u_turn",
            Direction::SlightLeft => "slight_left",
            Direction::SlightRight => "slight_right",
            Direction::SharpLeft => "sharp_left",
            Direction::SharpRight => "sharp_right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceType {
    Start,
    Turn,
    Km,
    Finish,
    Checkpoint,
    Event,
}

/// Stable guidance id vocabulary. The builder emits a subset; checkpoint and
/// event ids are carried for clients that extend the plan.
pub mod guidance_id {
    pub const RUN_START: &str = "RUN_START";
    pub const TURN_LEFT_10: &str = "TURN_LEFT_10";
    pub const TURN_LEFT_30: &str = "TURN_LEFT_30";
    pub const TURN_LEFT_50: &str = "TURN_LEFT_50";
    pub const TURN_RIGHT_10: &str = "TURN_RIGHT_10";
    pub const TURN_RIGHT_30: &str = "TURN_RIGHT_30";
    pub const TURN_RIGHT_50: &str = "TURN_RIGHT_50";
    pub const SLIGHT_LEFT: &str = "SLIGHT_LEFT";
    pub const SLIGHT_RIGHT: &str = "SLIGHT_RIGHT";
    pub const SHARP_LEFT: &str = "SHARP_LEFT";
    pub const SHARP_RIGHT: &str = "SHARP_RIGHT";
    pub const U_TURN: &str = "U_TURN";
    pub const GO_STRAIGHT_50: &str = "GO_STRAIGHT_50";
    pub const GO_STRAIGHT_100: &str = "GO_STRAIGHT_100";
    pub const GO_STRAIGHT_LONG: &str = "GO_STRAIGHT_LONG";
    pub const KM_MARK: &str = "KM_MARK";
    pub const CHECKPOINT_ARRIVED: &str = "CHECKPOINT_ARRIVED";
    pub const ROUTE_COMPLETE: &str = "ROUTE_COMPLETE";
    pub const OFF_ROUTE: &str = "OFF_ROUTE";
}

/// A single waypoint instruction on the final polyline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuidancePoint {
    pub sequence: u32,
    #[serde(rename = "type")]
    pub kind: GuidanceType,
    pub lat: f64,
    pub lng: f64,
    pub direction: Direction,
    pub angle_deg: f64,
    pub distance_from_start_m: f64,
    pub distance_to_next_m: f64,
    pub guidance_id: String,
    pub trigger_distance_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_mark: Option<u32>,
    pub show_pace: bool,
}

/// The full guidance plan for a route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuidancePlan {
    pub guidance_points: Vec<GuidancePoint>,
    pub total_points: usize,
    pub total_distance_m: f64,
}
