use log::debug;

use crate::hw::RawEvent;

use super::source::{EventSource, ReadMode, SourceError, SourceEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Event(RawEvent),
    /// Events were lost; the caller closes the partial frame.
    Overrun,
    NoData,
    Gone,
}

/// Pulls events from a source, tracking overrun recovery.
///
/// After an overrun the reader switches to [`ReadMode::Sync`] and only
/// forwards resync events until the source runs dry, then returns to
/// normal reads.
#[derive(Clone, Copy, Debug)]
pub struct EventReader {
    mode: ReadMode,
    max_attempts: u8,
}

impl EventReader {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            mode: ReadMode::Normal,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    pub fn force_resync(&mut self) {
        self.mode = ReadMode::Sync;
    }

    pub fn read<S: EventSource + ?Sized>(&mut self, source: &mut S) -> ReadOutcome {
        let mut attempts = 0u8;
        while attempts < self.max_attempts {
            attempts += 1;
            match (self.mode, source.next_event(self.mode)) {
                (_, Err(SourceError::Gone)) => return ReadOutcome::Gone,
                (ReadMode::Normal, Err(SourceError::WouldBlock)) => return ReadOutcome::NoData,
                (ReadMode::Sync, Err(SourceError::WouldBlock)) => {
                    debug!("resync complete");
                    self.mode = ReadMode::Normal;
                }
                (ReadMode::Normal, Ok(SourceEvent::Dropped)) => {
                    debug!("event queue overrun, resyncing");
                    self.mode = ReadMode::Sync;
                    return ReadOutcome::Overrun;
                }
                (ReadMode::Normal, Ok(SourceEvent::Event(event))) => {
                    if event.is_dropped() {
                        debug!("event queue overrun, resyncing");
                        self.mode = ReadMode::Sync;
                        return ReadOutcome::Overrun;
                    }
                    return ReadOutcome::Event(event);
                }
                (_, Ok(SourceEvent::Resync(event))) => return ReadOutcome::Event(event),
                (ReadMode::Sync, Ok(_)) => {}
            }
        }
        ReadOutcome::NoData
    }
}
