//! Floor-field resolution and wall-avoidance settings.

/// Per-router floor-field settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FloorFieldConfig {
    /// Grid spacing in metres.  Default: 0.0625.
    pub delta_h: f64,
    /// Margin added around the room's bounding box.  Default: 0.5.
    pub padding: f64,
    /// Slow the wavefront near walls so routes keep clear of them.
    pub use_wall_avoidance: bool,
    /// Distance from a wall at which speed recovers to 1.  Default: 0.8.
    pub wall_avoid_distance: f64,
}

impl Default for FloorFieldConfig {
    fn default() -> Self {
        Self {
            delta_h:             0.0625,
            padding:             0.5,
            use_wall_avoidance:  false,
            wall_avoid_distance: 0.8,
        }
    }
}
