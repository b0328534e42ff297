use std::sync::Arc;

use log::{debug, error, warn};

use crate::{
    error::TouchpadError,
    gesture::{GestureConfig, SurfaceGeometry},
    hw::{
        codes::{ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_X, ABS_Y},
        HardwareState, HostClock, HwStateReducer, ReducerStats, TimestampSource,
    },
};

use super::{
    probe::{self, DeviceEnumerator},
    reader::{EventReader, ReadOutcome},
    source::{EventDevice, ReadMode, SourceError},
    ProtocolBackend,
};

const MAX_RESYNC_DRAIN: usize = 4_096;

/// Multitouch protocol backend over an evdev-style event device.
pub struct EvdevBackend<D: EventDevice> {
    device: D,
    config: GestureConfig,
    host_clock: Arc<dyn HostClock + Send + Sync>,
    grab: bool,
    reader: EventReader,
    reducer: Option<HwStateReducer>,
}

impl<D: EventDevice> EvdevBackend<D> {
    pub fn new(
        device: D,
        config: &GestureConfig,
        host_clock: Arc<dyn HostClock + Send + Sync>,
    ) -> Self {
        Self {
            device,
            config: *config,
            host_clock,
            grab: true,
            reader: EventReader::new(config.motion.max_read_retries),
            reducer: None,
        }
    }

    /// Whether bring-up takes the device exclusively.
    pub fn with_grab(mut self, grab: bool) -> Self {
        self.grab = grab;
        self
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn stats(&self) -> Option<ReducerStats> {
        self.reducer.as_ref().map(HwStateReducer::stats)
    }

    pub fn timestamp_source(&self) -> Option<&TimestampSource> {
        self.reducer.as_ref().map(HwStateReducer::source)
    }

    fn drain_resync(&mut self) -> Result<usize, TouchpadError> {
        let mut drained = 0;
        while drained < MAX_RESYNC_DRAIN {
            match self.device.next_event(ReadMode::Sync) {
                Ok(_) => drained += 1,
                Err(SourceError::WouldBlock) => break,
                Err(SourceError::Gone) => return Err(TouchpadError::DeviceGone),
            }
        }
        Ok(drained)
    }
}

impl<D: EventDevice> ProtocolBackend for EvdevBackend<D> {
    fn device_on(&mut self) -> Result<(), TouchpadError> {
        let drained = self.drain_resync()?;
        if self.grab {
            self.device.grab(true)?;
        }

        let source = if self.device.enable_monotonic_clock() {
            TimestampSource::Monotonic
        } else {
            TimestampSource::Host(Arc::clone(&self.host_clock))
        };
        debug!(
            "device on: drained {drained} resync events, grab={}, clock={source:?}",
            self.grab
        );

        self.reader = EventReader::new(self.config.motion.max_read_retries);
        self.reducer = Some(HwStateReducer::new(source));
        Ok(())
    }

    fn device_off(&mut self) -> Result<(), TouchpadError> {
        self.reducer = None;
        if self.grab {
            if let Err(err) = self.device.grab(false) {
                warn!("ungrab failed: {err}");
                return Err(err);
            }
        }
        debug!("device off");
        Ok(())
    }

    fn query_hardware(&self) -> bool {
        self.device.capabilities().is_touchpad()
    }

    fn read_hw_state(&mut self) -> Result<Option<HardwareState>, TouchpadError> {
        let Some(reducer) = self.reducer.as_mut() else {
            return Err(TouchpadError::InvalidState("backend is off"));
        };

        loop {
            match self.reader.read(&mut self.device) {
                ReadOutcome::Event(event) => {
                    if let Some(snapshot) = reducer.feed(&event) {
                        return Ok(Some(snapshot));
                    }
                }
                ReadOutcome::Overrun => return Ok(Some(reducer.synthesize_frame())),
                ReadOutcome::NoData => return Ok(None),
                ReadOutcome::Gone => {
                    error!("input device gone");
                    return Err(TouchpadError::DeviceGone);
                }
            }
        }
    }

    fn auto_dev_probe(
        &self,
        enumerator: &dyn DeviceEnumerator,
        device: Option<&str>,
    ) -> Result<String, TouchpadError> {
        probe::auto_dev_probe(enumerator, device)
    }

    fn read_geometry(&self) -> SurfaceGeometry {
        let caps = self.device.capabilities();
        let fallback = self.config.geometry;
        let axes = [(ABS_MT_POSITION_X, ABS_MT_POSITION_Y), (ABS_X, ABS_Y)];

        axes.iter()
            .find_map(|(x, y)| match (caps.abs_info(*x), caps.abs_info(*y)) {
                (Some(x), Some(y)) if x.span() > 0 && y.span() > 0 => {
                    Some(fallback.with_surface(x.span(), y.span()))
                }
                _ => None,
            })
            .unwrap_or(fallback)
    }
}
