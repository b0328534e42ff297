use std::collections::VecDeque;

use crate::{
    error::TouchpadError,
    hw::{
        codes::{
            ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_PRESSURE, ABS_MT_SLOT,
            ABS_MT_TRACKING_ID, ABS_PRESSURE, ABS_X, ABS_Y, BTN_MOUSE, BTN_TOOL_FINGER, BTN_TOUCH,
            EV_ABS, EV_KEY, EV_SYN,
        },
        RawEvent, SLOT_COUNT,
    },
};

use super::{
    probe::{AbsInfo, DeviceCapabilities},
    source::{EventDevice, EventSource, ReadMode, SourceError, SourceEvent},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    Event(RawEvent),
    /// The kernel queue overflowed at this point.
    Dropped,
    /// One read that finds nothing queued.
    Pause,
    /// The device disappears; every later read fails.
    Gone,
}

/// In-memory device that plays back a prepared event script.
///
/// Resync reads are served from a separate queue filled with
/// [`ScriptedDevice::push_resync`].
#[derive(Clone, Debug)]
pub struct ScriptedDevice {
    capabilities: DeviceCapabilities,
    steps: VecDeque<ScriptStep>,
    resync: VecDeque<RawEvent>,
    monotonic: bool,
    grabbed: bool,
    gone: bool,
}

impl ScriptedDevice {
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            steps: VecDeque::new(),
            resync: VecDeque::new(),
            monotonic: true,
            grabbed: false,
            gone: false,
        }
    }

    /// A five-slot multitouch pad with one physical button.
    pub fn touchpad(width: i32, height: i32) -> Self {
        let capabilities = DeviceCapabilities::new("scripted touchpad")
            .with_event_type(EV_SYN)
            .with_event_type(EV_KEY)
            .with_event_type(EV_ABS)
            .with_key(BTN_MOUSE)
            .with_key(BTN_TOUCH)
            .with_key(BTN_TOOL_FINGER)
            .with_abs(ABS_X, AbsInfo::range(0, width))
            .with_abs(ABS_Y, AbsInfo::range(0, height))
            .with_abs(ABS_PRESSURE, AbsInfo::range(0, 255))
            .with_abs(ABS_MT_SLOT, AbsInfo::range(0, SLOT_COUNT as i32 - 1))
            .with_abs(ABS_MT_TRACKING_ID, AbsInfo::range(0, 65_535))
            .with_abs(ABS_MT_POSITION_X, AbsInfo::range(0, width))
            .with_abs(ABS_MT_POSITION_Y, AbsInfo::range(0, height))
            .with_abs(ABS_MT_PRESSURE, AbsInfo::range(0, 255))
            .with_slots(SLOT_COUNT as u16);
        Self::new(capabilities)
    }

    pub fn with_monotonic_clock(mut self, available: bool) -> Self {
        self.monotonic = available;
        self
    }

    pub fn push(&mut self, step: ScriptStep) {
        self.steps.push_back(step);
    }

    pub fn push_events<I: IntoIterator<Item = RawEvent>>(&mut self, events: I) {
        self.steps
            .extend(events.into_iter().map(ScriptStep::Event));
    }

    pub fn push_resync<I: IntoIterator<Item = RawEvent>>(&mut self, events: I) {
        self.resync.extend(events);
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn pending(&self) -> usize {
        self.steps.len()
    }

    pub fn pending_resync(&self) -> usize {
        self.resync.len()
    }
}

impl EventSource for ScriptedDevice {
    fn next_event(&mut self, mode: ReadMode) -> Result<SourceEvent, SourceError> {
        if self.gone {
            return Err(SourceError::Gone);
        }
        if mode == ReadMode::Sync {
            return self
                .resync
                .pop_front()
                .map(SourceEvent::Resync)
                .ok_or(SourceError::WouldBlock);
        }
        match self.steps.pop_front() {
            Some(ScriptStep::Event(event)) => Ok(SourceEvent::Event(event)),
            Some(ScriptStep::Dropped) => Ok(SourceEvent::Dropped),
            Some(ScriptStep::Pause) | None => Err(SourceError::WouldBlock),
            Some(ScriptStep::Gone) => {
                self.gone = true;
                Err(SourceError::Gone)
            }
        }
    }
}

impl EventDevice for ScriptedDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities.clone()
    }

    fn grab(&mut self, grab: bool) -> Result<(), TouchpadError> {
        if self.gone {
            return Err(TouchpadError::DeviceGone);
        }
        self.grabbed = grab;
        Ok(())
    }

    fn enable_monotonic_clock(&mut self) -> bool {
        self.monotonic
    }
}
