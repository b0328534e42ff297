use log::debug;

use crate::{
    error::TouchpadError,
    hw::codes::{
        ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_SLOT, ABS_PRESSURE, ABS_X, ABS_Y,
        BTN_TOOL_FINGER, BTN_TOOL_PEN, BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN,
    },
};

pub const INPUT_DEV_DIR: &str = "/dev/input";
const EVENT_NODE_PREFIX: &str = "event";

/// Range of one absolute axis as reported by the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbsInfo {
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub resolution: i32,
}

impl AbsInfo {
    pub const fn range(minimum: i32, maximum: i32) -> Self {
        Self {
            minimum,
            maximum,
            fuzz: 0,
            resolution: 0,
        }
    }

    pub const fn span(&self) -> i32 {
        self.maximum - self.minimum
    }
}

/// What a device node says it can report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub name: String,
    pub event_types: Vec<u16>,
    pub keys: Vec<u16>,
    pub abs: Vec<(u16, AbsInfo)>,
    pub num_slots: Option<u16>,
}

impl DeviceCapabilities {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_event_type(mut self, event_type: u16) -> Self {
        if !self.event_types.contains(&event_type) {
            self.event_types.push(event_type);
        }
        self
    }

    pub fn with_key(mut self, code: u16) -> Self {
        if !self.keys.contains(&code) {
            self.keys.push(code);
        }
        self
    }

    pub fn with_abs(mut self, code: u16, info: AbsInfo) -> Self {
        self.abs.retain(|(c, _)| *c != code);
        self.abs.push((code, info));
        self
    }

    pub fn with_slots(mut self, count: u16) -> Self {
        self.num_slots = Some(count);
        self
    }

    pub fn has_event_type(&self, event_type: u16) -> bool {
        self.event_types.contains(&event_type)
    }

    pub fn has_key(&self, code: u16) -> bool {
        self.keys.contains(&code)
    }

    pub fn has_abs(&self, code: u16) -> bool {
        self.abs_info(code).is_some()
    }

    pub fn abs_info(&self, code: u16) -> Option<AbsInfo> {
        self.abs
            .iter()
            .find_map(|(c, info)| (*c == code).then_some(*info))
    }

    /// A finger-driven absolute pointing surface. Pen tablets are rejected;
    /// multitouch devices must also report slot count and per-slot
    /// positions.
    pub fn is_touchpad(&self) -> bool {
        if ![EV_SYN, EV_ABS, EV_KEY]
            .iter()
            .all(|t| self.has_event_type(*t))
        {
            return false;
        }
        if !self.has_abs(ABS_X) || !self.has_abs(ABS_Y) {
            return false;
        }
        if !self.has_key(BTN_TOUCH) && !self.has_abs(ABS_PRESSURE) {
            return false;
        }
        if !self.has_key(BTN_TOOL_FINGER) || self.has_key(BTN_TOOL_PEN) {
            return false;
        }
        if self.has_abs(ABS_MT_SLOT) {
            return self.num_slots.is_some()
                && self.has_abs(ABS_MT_POSITION_X)
                && self.has_abs(ABS_MT_POSITION_Y);
        }
        true
    }
}

/// Lists device nodes and reads their capabilities.
pub trait DeviceEnumerator {
    /// File names in `dir`, unsorted.
    fn entries(&self, dir: &str) -> Result<Vec<String>, TouchpadError>;

    fn capabilities(&self, path: &str) -> Result<DeviceCapabilities, TouchpadError>;
}

/// Finds the touchpad node. An explicit `device` is the only candidate;
/// otherwise `event*` nodes are tried from the highest number down.
pub fn auto_dev_probe(
    enumerator: &dyn DeviceEnumerator,
    device: Option<&str>,
) -> Result<String, TouchpadError> {
    if let Some(path) = device {
        return if probe_path(enumerator, path) {
            Ok(path.to_string())
        } else {
            Err(TouchpadError::NotATouchpad)
        };
    }

    let mut names: Vec<String> = enumerator
        .entries(INPUT_DEV_DIR)?
        .into_iter()
        .filter(|name| name.starts_with(EVENT_NODE_PREFIX))
        .collect();
    if names.is_empty() {
        return Err(TouchpadError::DeviceOpen(format!(
            "no event devices under {INPUT_DEV_DIR}"
        )));
    }
    names.sort();

    names
        .iter()
        .rev()
        .map(|name| format!("{INPUT_DEV_DIR}/{name}"))
        .find(|path| probe_path(enumerator, path))
        .ok_or(TouchpadError::NotATouchpad)
}

fn probe_path(enumerator: &dyn DeviceEnumerator, path: &str) -> bool {
    match enumerator.capabilities(path) {
        Ok(caps) => {
            let found = caps.is_touchpad();
            debug!("probe {path} ({}): touchpad={found}", caps.name);
            found
        }
        Err(err) => {
            debug!("probe {path}: {err}");
            false
        }
    }
}
