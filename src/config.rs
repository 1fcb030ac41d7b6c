// Fixed viewer settings. None of these are part of the persisted session.

pub const DEFAULT_MILES_PER_DAY: f64 = 24.0;
pub const DEFAULT_DISTANCE_INPUT: &str = "100";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    // applied for a wheel tick with positive / non-positive `delta_y`
    pub wheel_out_factor: f64,
    pub wheel_in_factor: f64,
    // applied by the zoom buttons
    pub button_in_factor: f64,
    pub button_out_factor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 15.0,
            wheel_out_factor: 0.9,
            wheel_in_factor: 1.1,
            button_in_factor: 1.2,
            button_out_factor: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// The overlay is rasterized this many times larger than its on-screen
    /// size so strokes stay crisp when the view is zoomed in.
    pub supersample: u32,
    pub line_width: f32,
    pub dash: [f32; 2],
    pub calibration_guide_color: &'static str,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            supersample: 4,
            line_width: 1.5,
            dash: [2.0, 2.0],
            calibration_guide_color: "blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewerConfig {
    pub zoom: ZoomConfig,
    pub render: RenderConfig,
}
