pub mod evdev;
pub mod probe;
pub mod reader;
pub mod scripted;
pub mod source;

use crate::{error::TouchpadError, gesture::SurfaceGeometry, hw::HardwareState};

pub use evdev::EvdevBackend;
pub use probe::{auto_dev_probe, AbsInfo, DeviceCapabilities, DeviceEnumerator, INPUT_DEV_DIR};
pub use reader::{EventReader, ReadOutcome};
pub use scripted::{ScriptStep, ScriptedDevice};
pub use source::{EventDevice, EventSource, ReadMode, SourceError, SourceEvent};

/// Operations a device protocol provides to the session.
pub trait ProtocolBackend {
    /// Bring-up: prepares the device for reading.
    fn device_on(&mut self) -> Result<(), TouchpadError>;

    /// Tear-down: releases the device and drops reduction state.
    fn device_off(&mut self) -> Result<(), TouchpadError>;

    /// Whether the opened device is a usable touchpad.
    fn query_hardware(&self) -> bool;

    /// Next completed snapshot, or `None` when no full frame is queued.
    fn read_hw_state(&mut self) -> Result<Option<HardwareState>, TouchpadError>;

    fn auto_dev_probe(
        &self,
        enumerator: &dyn DeviceEnumerator,
        device: Option<&str>,
    ) -> Result<String, TouchpadError>;

    fn read_geometry(&self) -> SurfaceGeometry;
}
