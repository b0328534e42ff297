use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use gesture_config_compiler::{parse_config_file, validate_config, GestureFile};
use log::{info, warn};
use padzone::{
    active_config,
    backend::ScriptStep,
    gesture::{MotionConfig, SurfaceGeometry},
    Action, ActionSink, EvdevBackend, EventTime, GestureConfig, RawEvent, ScriptedDevice,
    ScrollAxis, TouchpadError, TouchpadSession,
};

/// Replays a recorded raw-event trace through the reducer and gesture engine.
#[derive(Parser, Debug)]
#[command(name = "pad_replay")]
struct Args {
    /// Trace with `ev,<sec>,<usec>,<type>,<code>,<value>` lines plus
    /// `resync,...`, `dropped`, `pause` and `gone` markers.
    trace: PathBuf,

    /// Expected action kinds, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,

    /// Gesture config TOML to use instead of the compiled default.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Steps up to and including one `pause`, read in a single pass.
#[derive(Default)]
struct Batch {
    steps: Vec<ScriptStep>,
    resync: Vec<RawEvent>,
    now_ms: u32,
}

#[derive(Default)]
struct Recorder {
    now_ms: u32,
    rows: Vec<(u32, Action)>,
}

impl ActionSink for Recorder {
    fn post(&mut self, action: Action) {
        self.rows.push((self.now_ms, action));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => *active_config(),
    };
    let batches = parse_trace(&args.trace)?;
    info!("replaying {} batches from {}", batches.len(), args.trace.display());

    let rows = replay(&config, batches)?;

    println!("action,ms,kind,a,b");
    for (ms, action) in &rows {
        let (a, b) = action_values(action);
        println!("action,{ms},{},{a},{b}", kind_label(action));
    }

    if let Some(expect_path) = &args.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = rows.iter().map(|(_, a)| kind_label(a)).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("action sequence mismatch");
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<GestureConfig> {
    let file = parse_config_file(path)?;
    validate_config(&file)?;
    Ok(to_gesture_config(&file))
}

fn to_gesture_config(file: &GestureFile) -> GestureConfig {
    let g = &file.geometry;
    let m = &file.motion;
    GestureConfig {
        geometry: SurfaceGeometry {
            width: g.width,
            height: g.height,
            vert_scroll_width: g.vert_scroll_width,
            horiz_scroll_width: g.horiz_scroll_width,
            modifier_radius: g.modifier_radius,
            middle_button_half_width: g.middle_button_half_width,
            middle_button_top_pct: g.middle_button_top_pct,
            middle_button_bottom_pct: g.middle_button_bottom_pct,
            buttons_row_pct: g.buttons_row_pct,
        },
        motion: MotionConfig {
            modifier_scale: m.modifier_scale,
            repoll_delay_ms: m.repoll_delay_ms,
            max_read_retries: m.max_read_retries,
        },
    }
}

fn replay(config: &GestureConfig, batches: Vec<Batch>) -> Result<Vec<(u32, Action)>> {
    let device = ScriptedDevice::touchpad(config.geometry.width, config.geometry.height);
    let backend = EvdevBackend::new(device, config, Arc::new(|| 0u32)).with_grab(false);
    let mut session = TouchpadSession::new(backend, config);
    session.device_on().context("device on")?;

    let mut recorder = Recorder::default();
    for batch in batches {
        let device = session.backend_mut().device_mut();
        device.push_resync(batch.resync);
        for step in batch.steps {
            device.push(step);
        }

        recorder.now_ms = batch.now_ms;
        match session.read_input(batch.now_ms, &mut recorder) {
            Ok(_) => {}
            Err(TouchpadError::DeviceGone) => {
                warn!("device gone at {} ms, stopping replay", batch.now_ms);
                break;
            }
            Err(err) => return Err(anyhow!(err)),
        }
    }

    session
        .device_close(&mut recorder)
        .context("device close")?;
    Ok(recorder.rows)
}

fn parse_trace(path: &Path) -> Result<Vec<Batch>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut batches = Vec::new();
    let mut batch = Batch::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        match parts[0] {
            "ev" | "resync" => {
                let event = parse_event(&parts, path, line_no)?;
                if parts[0] == "ev" {
                    batch.now_ms = batch.now_ms.max(event.time.as_millis());
                    batch.steps.push(ScriptStep::Event(event));
                } else {
                    batch.resync.push(event);
                }
            }
            "dropped" => batch.steps.push(ScriptStep::Dropped),
            "gone" => batch.steps.push(ScriptStep::Gone),
            "pause" => {
                let now_ms = batch.now_ms;
                batch.steps.push(ScriptStep::Pause);
                batches.push(std::mem::take(&mut batch));
                batch.now_ms = now_ms;
            }
            other => bail!("{}:{line_no} unknown trace record '{other}'", path.display()),
        }
    }
    if !batch.steps.is_empty() || !batch.resync.is_empty() {
        batches.push(batch);
    }
    Ok(batches)
}

fn parse_event(parts: &[&str], path: &Path, line_no: usize) -> Result<RawEvent> {
    if parts.len() != 6 {
        bail!(
            "{}:{line_no} expected <kind>,<sec>,<usec>,<type>,<code>,<value>",
            path.display()
        );
    }
    let field = |idx: usize, name: &str| -> Result<i64> {
        parts[idx]
            .parse::<i64>()
            .with_context(|| format!("{}:{line_no} invalid {name} '{}'", path.display(), parts[idx]))
    };

    let time = EventTime::new(field(1, "sec")?, field(2, "usec")?);
    let event_type = u16::try_from(field(3, "type")?)
        .with_context(|| format!("{}:{line_no} type out of range", path.display()))?;
    let code = u16::try_from(field(4, "code")?)
        .with_context(|| format!("{}:{line_no} code out of range", path.display()))?;
    let value = i32::try_from(field(5, "value")?)
        .with_context(|| format!("{}:{line_no} value out of range", path.display()))?;
    Ok(RawEvent::new(event_type, code, value, time))
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let kind = normalize_kind(token).ok_or_else(|| {
            anyhow!(
                "{}:{line_no} invalid expected action kind: {token}",
                path.display()
            )
        })?;
        kinds.push(kind);
    }
    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.to_ascii_lowercase().as_str() {
        "motion" => Some("motion"),
        "scroll_h" => Some("scroll_h"),
        "scroll_v" => Some("scroll_v"),
        "press" => Some("press"),
        "release" => Some("release"),
        _ => None,
    }
}

fn kind_label(action: &Action) -> &'static str {
    match action {
        Action::Motion { .. } => "motion",
        Action::Scroll {
            axis: ScrollAxis::Horizontal,
            ..
        } => "scroll_h",
        Action::Scroll {
            axis: ScrollAxis::Vertical,
            ..
        } => "scroll_v",
        Action::Button { pressed: true, .. } => "press",
        Action::Button { pressed: false, .. } => "release",
    }
}

fn action_values(action: &Action) -> (i32, i32) {
    match action {
        Action::Motion { dx, dy } => (*dx, *dy),
        Action::Scroll { amount, .. } => (*amount, 0),
        Action::Button { button, .. } => (i32::from(button.id()), 0),
    }
}
