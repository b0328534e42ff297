use log::{debug, warn};

use crate::{
    backend::ProtocolBackend,
    error::TouchpadError,
    gesture::{ActionSink, GestureConfig, GestureEngine},
    hw::HardwareState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Off,
    On,
    /// The device vanished; only tear-down is possible.
    Gone,
    Closed,
}

/// Fallback timer that re-evaluates the last snapshot between hardware
/// reports. The host owns the actual scheduling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepollTimer {
    pub armed: bool,
    pub armed_at_ms: u32,
    pub delay_ms: u32,
}

impl RepollTimer {
    fn arm(&mut self, now_ms: u32, delay_ms: u32) {
        *self = Self {
            armed: true,
            armed_at_ms: now_ms,
            delay_ms,
        };
    }

    fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn deadline_ms(&self) -> Option<u32> {
        self.armed
            .then(|| self.armed_at_ms.wrapping_add(self.delay_ms))
    }
}

/// One device session: the backend, the gesture engine and the snapshot
/// they share. Calls must be serialized by the host.
pub struct TouchpadSession<B: ProtocolBackend> {
    backend: B,
    engine: GestureEngine,
    state: SessionState,
    hw: HardwareState,
    timer: RepollTimer,
}

impl<B: ProtocolBackend> TouchpadSession<B> {
    pub fn new(backend: B, config: &GestureConfig) -> Self {
        Self {
            backend,
            engine: GestureEngine::new(config),
            state: SessionState::Off,
            hw: HardwareState::empty(),
            timer: RepollTimer::default(),
        }
    }

    /// Brings the device up and checks it is a touchpad. On failure the
    /// session stays off.
    pub fn device_on(&mut self) -> Result<(), TouchpadError> {
        match self.state {
            SessionState::On => return Ok(()),
            SessionState::Gone => return Err(TouchpadError::InvalidState("device is gone")),
            SessionState::Closed => return Err(TouchpadError::InvalidState("session is closed")),
            SessionState::Off => {}
        }

        self.backend.device_on()?;
        if !self.backend.query_hardware() {
            if let Err(err) = self.backend.device_off() {
                warn!("tear-down after failed probe: {err}");
            }
            return Err(TouchpadError::NotATouchpad);
        }

        let geometry = self.backend.read_geometry();
        debug!("session on: {}x{}", geometry.width, geometry.height);
        self.engine.set_geometry(geometry);
        self.hw = HardwareState::empty();
        self.state = SessionState::On;
        Ok(())
    }

    /// Consumes every snapshot the backend has ready. Returns the re-poll
    /// delay when at least one snapshot was evaluated; the timer is armed
    /// from `now_ms` in that case.
    pub fn read_input(
        &mut self,
        now_ms: u32,
        sink: &mut dyn ActionSink,
    ) -> Result<Option<u32>, TouchpadError> {
        if self.state != SessionState::On {
            return Err(TouchpadError::InvalidState("session is not on"));
        }

        let mut delay = None;
        loop {
            match self.backend.read_hw_state() {
                Ok(Some(mut snapshot)) => {
                    // A timer tick may have pushed the stored time ahead.
                    snapshot.timestamp_ms = snapshot.timestamp_ms.max(self.hw.timestamp_ms);
                    self.hw = snapshot;
                    let output = self.engine.evaluate(&self.hw);
                    output.actions.drain_into(sink);
                    delay = Some(output.delay_ms);
                }
                Ok(None) => break,
                Err(TouchpadError::DeviceGone) => {
                    self.timer.cancel();
                    self.state = SessionState::Gone;
                    return Err(TouchpadError::DeviceGone);
                }
                Err(err) => return Err(err),
            }
        }

        if let Some(delay_ms) = delay {
            self.timer.arm(now_ms, delay_ms);
        }
        Ok(delay)
    }

    /// Re-evaluates the stored snapshot with its time advanced by the time
    /// since the timer was armed. Ignored unless the timer is armed.
    pub fn timer_tick(&mut self, now_ms: u32, sink: &mut dyn ActionSink) -> Option<u32> {
        if !self.timer.armed || self.state != SessionState::On {
            return None;
        }

        let elapsed = now_ms.wrapping_sub(self.timer.armed_at_ms);
        self.hw.timestamp_ms = self.hw.timestamp_ms.wrapping_add(elapsed);
        let snapshot = self.hw;
        let output = self.engine.evaluate(&snapshot);
        output.actions.drain_into(sink);

        self.timer.arm(now_ms, output.delay_ms);
        Some(output.delay_ms)
    }

    /// Cancels the timer, releases any held button into `sink` and tears
    /// the device down.
    pub fn device_off(&mut self, sink: &mut dyn ActionSink) -> Result<(), TouchpadError> {
        match self.state {
            SessionState::Off => return Ok(()),
            SessionState::Closed => return Err(TouchpadError::InvalidState("session is closed")),
            SessionState::On | SessionState::Gone => {}
        }

        self.timer.cancel();
        if let Some(release) = self.engine.reset() {
            sink.post(release);
        }
        self.hw = HardwareState::empty();

        if self.state == SessionState::Gone {
            return Ok(());
        }
        self.state = SessionState::Off;
        self.backend.device_off()
    }

    pub fn device_close(&mut self, sink: &mut dyn ActionSink) -> Result<(), TouchpadError> {
        let result = match self.state {
            SessionState::Closed => return Ok(()),
            _ => self.device_off(sink),
        };
        self.timer = RepollTimer::default();
        self.state = SessionState::Closed;
        debug!("session closed");
        result
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn hw_state(&self) -> &HardwareState {
        &self.hw
    }

    pub fn timer(&self) -> &RepollTimer {
        &self.timer
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
