use std::sync::Arc;

use log::{trace, warn};

use crate::error::TouchpadError;

use super::{
    codes::{
        ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_PRESSURE, ABS_MT_SLOT, ABS_MT_TRACKING_ID,
        BTN_MOUSE, SYN_REPORT,
    },
    event::{EventKind, EventTime, RawEvent},
    state::{HardwareState, SLOT_COUNT},
};

/// Wall-clock milliseconds supplied by the host when the device cannot
/// stamp events with a monotonic clock.
pub trait HostClock {
    fn millis(&self) -> u32;
}

impl<F> HostClock for F
where
    F: Fn() -> u32,
{
    fn millis(&self) -> u32 {
        self()
    }
}

/// Where snapshot timestamps come from. Fixed for the lifetime of a reducer.
#[derive(Clone)]
pub enum TimestampSource {
    Monotonic,
    Host(Arc<dyn HostClock + Send + Sync>),
}

impl core::fmt::Debug for TimestampSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Monotonic => f.write_str("Monotonic"),
            Self::Host(_) => f.write_str("Host"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReducerStats {
    pub frames: u32,
    pub synthesized_frames: u32,
    pub malformed_events: u32,
    pub ignored_events: u32,
}

/// Folds one report's worth of raw events into a [`HardwareState`].
///
/// Slot fields are sticky across frames: a position persists until a later
/// event overwrites it or the slot's tracking id is invalidated.
#[derive(Debug)]
pub struct HwStateReducer {
    state: HardwareState,
    active_slot: i32,
    source: TimestampSource,
    last_sync_time: EventTime,
    stats: ReducerStats,
}

impl HwStateReducer {
    pub fn new(source: TimestampSource) -> Self {
        Self {
            state: HardwareState::empty(),
            active_slot: 0,
            source,
            last_sync_time: EventTime::default(),
            stats: ReducerStats::default(),
        }
    }

    /// Folds `event` into the in-progress state. Returns a copy of the
    /// completed snapshot when `event` terminates the frame.
    ///
    /// Events addressed to a malformed slot are logged, counted, and dropped.
    pub fn feed(&mut self, event: &RawEvent) -> Option<HardwareState> {
        match self.try_feed(event) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.stats.malformed_events += 1;
                warn!(
                    "discarding abs code {:#x}={}: {err}",
                    event.code, event.value
                );
                None
            }
        }
    }

    pub fn try_feed(&mut self, event: &RawEvent) -> Result<Option<HardwareState>, TouchpadError> {
        match event.kind {
            EventKind::Sync => {
                self.last_sync_time = event.time;
                if event.code == SYN_REPORT {
                    return Ok(Some(self.complete_frame(event.time)));
                }
            }
            EventKind::Key => {
                if event.code == BTN_MOUSE {
                    self.state.pressed = event.value != 0;
                } else {
                    self.stats.ignored_events += 1;
                }
            }
            EventKind::AbsAxis => self.fold_axis(event)?,
            EventKind::Other(_) => self.stats.ignored_events += 1,
        }
        Ok(None)
    }

    /// Closes the current partial frame after the source lost events.
    /// The snapshot carries the time of the last sync event seen.
    pub fn synthesize_frame(&mut self) -> HardwareState {
        self.stats.synthesized_frames += 1;
        self.complete_frame(self.last_sync_time)
    }

    pub fn current(&self) -> &HardwareState {
        &self.state
    }

    pub fn stats(&self) -> ReducerStats {
        self.stats
    }

    pub fn source(&self) -> &TimestampSource {
        &self.source
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.active_slot = 0;
        self.last_sync_time = EventTime::default();
    }

    fn complete_frame(&mut self, time: EventTime) -> HardwareState {
        self.state.timestamp_ms = match &self.source {
            TimestampSource::Monotonic => time.as_millis(),
            TimestampSource::Host(clock) => clock.millis(),
        };
        self.stats.frames += 1;
        self.state
    }

    fn fold_axis(&mut self, event: &RawEvent) -> Result<(), TouchpadError> {
        match event.code {
            ABS_MT_SLOT => {
                self.active_slot = event.value;
                if self.slot_index().is_err() {
                    warn!("slot select {} outside 0..{SLOT_COUNT}", event.value);
                }
            }
            ABS_MT_TRACKING_ID => {
                let slot = self.slot_index()?;
                if event.value < 0 {
                    self.release_slot(slot);
                } else if !self.state.finger[slot] {
                    self.state.finger[slot] = true;
                    self.state.fingers_count += 1;
                    trace!("slot {slot}: tracking id {}", event.value);
                }
            }
            ABS_MT_POSITION_X => {
                let slot = self.slot_index()?;
                self.state.x[slot] = event.value;
            }
            ABS_MT_POSITION_Y => {
                let slot = self.slot_index()?;
                self.state.y[slot] = event.value;
            }
            ABS_MT_PRESSURE => {
                let slot = self.slot_index()?;
                self.state.z[slot] = event.value;
            }
            _ => self.stats.ignored_events += 1,
        }
        Ok(())
    }

    fn release_slot(&mut self, slot: usize) {
        if self.state.finger[slot] {
            self.state.fingers_count -= 1;
        } else {
            warn!("slot {slot}: tracking id released on an empty slot");
        }
        self.state.clear_slot(slot);
    }

    fn slot_index(&self) -> Result<usize, TouchpadError> {
        usize::try_from(self.active_slot)
            .ok()
            .filter(|slot| *slot < SLOT_COUNT)
            .ok_or(TouchpadError::MalformedSlot {
                slot: self.active_slot,
            })
    }
}

#[cfg(test)]
mod tests;
