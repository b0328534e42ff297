use crate::{error::TouchpadError, hw::RawEvent};

use super::probe::DeviceCapabilities;

/// Which queue the next read is served from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadMode {
    #[default]
    Normal,
    /// Replaying the device state after the kernel queue overflowed.
    Sync,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEvent {
    Event(RawEvent),
    /// An event from the resync replay; only produced in [`ReadMode::Sync`].
    Resync(RawEvent),
    /// The kernel dropped events since the last read.
    Dropped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing queued for the requested mode.
    WouldBlock,
    Gone,
}

/// Non-blocking raw event stream.
pub trait EventSource {
    fn next_event(&mut self, mode: ReadMode) -> Result<SourceEvent, SourceError>;
}

/// An opened input device node.
pub trait EventDevice: EventSource {
    fn capabilities(&self) -> DeviceCapabilities;

    fn grab(&mut self, grab: bool) -> Result<(), TouchpadError>;

    /// Asks the device to stamp events with the monotonic clock. Returns
    /// `false` when the device keeps realtime stamps.
    fn enable_monotonic_clock(&mut self) -> bool;
}
