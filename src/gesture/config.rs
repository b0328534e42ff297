/// Surface extent and the named zone thresholds the region classifier reads.
///
/// Percentages are of `height`; the middle-button rectangle is centred on
/// `width / 2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceGeometry {
    pub width: i32,
    pub height: i32,
    pub vert_scroll_width: i32,
    pub horiz_scroll_width: i32,
    pub modifier_radius: i32,
    pub middle_button_half_width: i32,
    pub middle_button_top_pct: i32,
    pub middle_button_bottom_pct: i32,
    pub buttons_row_pct: i32,
}

impl SurfaceGeometry {
    /// Same zones on a surface of a different size.
    pub const fn with_surface(self, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    pub modifier_scale: f64,
    pub repoll_delay_ms: u32,
    pub max_read_retries: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    pub geometry: SurfaceGeometry,
    pub motion: MotionConfig,
}

include!(concat!(env!("OUT_DIR"), "/gesture_config.rs"));

pub fn active_config() -> &'static GestureConfig {
    &GESTURE_CONFIG
}
