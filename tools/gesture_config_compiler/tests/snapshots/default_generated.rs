// @generated by gesture_config_compiler; do not edit.

pub const GESTURE_CONFIG: GestureConfig = GestureConfig {
    geometry: SurfaceGeometry {
        width: 2033,
        height: 1332,
        vert_scroll_width: 100,
        horiz_scroll_width: 100,
        modifier_radius: 200,
        middle_button_half_width: 100,
        middle_button_top_pct: 70,
        middle_button_bottom_pct: 85,
        buttons_row_pct: 75,
    },
    motion: MotionConfig {
        modifier_scale: 0.5,
        repoll_delay_ms: 100000,
        max_read_retries: 4,
    },
};
