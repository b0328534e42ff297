//! Compiles `config/gesture.toml` into the Rust constant consumed by the
//! `padzone` build script.

use std::{fmt, fs, path::Path};

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GestureFile {
    pub geometry: GeometrySection,
    pub motion: MotionSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeometrySection {
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

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MotionSection {
    pub modifier_scale: f64,
    pub repoll_delay_ms: u32,
    pub max_read_retries: u8,
}

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

pub fn parse_config_file(path: &Path) -> Result<GestureFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_config_str(&raw)
}

pub fn parse_config_str(raw: &str) -> Result<GestureFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn validate_config(config: &GestureFile) -> Result<(), ConfigCompilerError> {
    let g = &config.geometry;
    let m = &config.motion;

    if g.width <= 0 || g.height <= 0 {
        return invalid("geometry.width and geometry.height must be positive");
    }
    if g.vert_scroll_width <= 0 || g.vert_scroll_width >= g.width {
        return invalid("geometry.vert_scroll_width must be > 0 and < geometry.width");
    }
    if g.horiz_scroll_width <= 0 || g.horiz_scroll_width >= g.height {
        return invalid("geometry.horiz_scroll_width must be > 0 and < geometry.height");
    }
    if g.modifier_radius <= 0 || g.modifier_radius >= g.width.min(g.height) {
        return invalid("geometry.modifier_radius must be > 0 and smaller than the surface");
    }
    if g.middle_button_half_width <= 0 || g.middle_button_half_width > g.width / 2 {
        return invalid("geometry.middle_button_half_width must be > 0 and <= geometry.width / 2");
    }

    let pcts = [
        g.middle_button_top_pct,
        g.middle_button_bottom_pct,
        g.buttons_row_pct,
    ];
    if pcts.iter().any(|pct| !(0..=100).contains(pct)) {
        return invalid("geometry percentages must be within 0..=100");
    }
    if g.middle_button_top_pct >= g.middle_button_bottom_pct {
        return invalid(
            "geometry.middle_button_top_pct must be < geometry.middle_button_bottom_pct",
        );
    }

    if !(m.modifier_scale > 0.0 && m.modifier_scale <= 1.0) {
        return invalid("motion.modifier_scale must be > 0 and <= 1");
    }
    if m.repoll_delay_ms == 0 {
        return invalid("motion.repoll_delay_ms must be > 0");
    }
    if m.max_read_retries == 0 {
        return invalid("motion.max_read_retries must be >= 1");
    }

    Ok(())
}

fn invalid(msg: &str) -> Result<(), ConfigCompilerError> {
    Err(ConfigCompilerError::Validation(msg.to_string()))
}

pub fn render_generated_config(config: &GestureFile) -> String {
    let g = &config.geometry;
    let m = &config.motion;
    let mut out = String::new();

    out.push_str("// @generated by gesture_config_compiler; do not edit.\n\n");
    out.push_str("pub const GESTURE_CONFIG: GestureConfig = GestureConfig {\n");
    out.push_str("    geometry: SurfaceGeometry {\n");
    push_field(&mut out, "width", g.width);
    push_field(&mut out, "height", g.height);
    push_field(&mut out, "vert_scroll_width", g.vert_scroll_width);
    push_field(&mut out, "horiz_scroll_width", g.horiz_scroll_width);
    push_field(&mut out, "modifier_radius", g.modifier_radius);
    push_field(&mut out, "middle_button_half_width", g.middle_button_half_width);
    push_field(&mut out, "middle_button_top_pct", g.middle_button_top_pct);
    push_field(&mut out, "middle_button_bottom_pct", g.middle_button_bottom_pct);
    push_field(&mut out, "buttons_row_pct", g.buttons_row_pct);
    out.push_str("    },\n");
    out.push_str("    motion: MotionConfig {\n");
    out.push_str(&format!("        modifier_scale: {:?},\n", m.modifier_scale));
    push_field(&mut out, "repoll_delay_ms", m.repoll_delay_ms);
    push_field(&mut out, "max_read_retries", m.max_read_retries);
    out.push_str("    },\n");
    out.push_str("};\n");
    out
}

fn push_field(out: &mut String, name: &str, value: impl fmt::Display) {
    out.push_str(&format!("        {name}: {value},\n"));
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_config_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
