use super::codes::{EV_ABS, EV_KEY, EV_SYN, SYN_DROPPED, SYN_REPORT};

/// Kernel event timestamp (`struct timeval`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventTime {
    pub sec: i64,
    pub usec: i64,
}

impl EventTime {
    pub const fn new(sec: i64, usec: i64) -> Self {
        Self { sec, usec }
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self {
            sec: (ms / 1_000) as i64,
            usec: ((ms % 1_000) * 1_000) as i64,
        }
    }

    /// Milliseconds, wrapping like the 32-bit server time it feeds.
    pub fn as_millis(self) -> u32 {
        self.sec
            .wrapping_mul(1_000)
            .wrapping_add(self.usec / 1_000) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Sync,
    Key,
    AbsAxis,
    Other(u16),
}

impl EventKind {
    pub const fn from_type(event_type: u16) -> Self {
        match event_type {
            EV_SYN => Self::Sync,
            EV_KEY => Self::Key,
            EV_ABS => Self::AbsAxis,
            other => Self::Other(other),
        }
    }

    pub const fn type_code(self) -> u16 {
        match self {
            Self::Sync => EV_SYN,
            Self::Key => EV_KEY,
            Self::AbsAxis => EV_ABS,
            Self::Other(code) => code,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
    pub time: EventTime,
}

impl RawEvent {
    pub const fn new(event_type: u16, code: u16, value: i32, time: EventTime) -> Self {
        Self {
            kind: EventKind::from_type(event_type),
            code,
            value,
            time,
        }
    }

    pub const fn report(time: EventTime) -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0, time)
    }

    pub const fn abs(code: u16, value: i32, time: EventTime) -> Self {
        Self::new(EV_ABS, code, value, time)
    }

    pub const fn key(code: u16, pressed: bool, time: EventTime) -> Self {
        Self::new(EV_KEY, code, pressed as i32, time)
    }

    pub fn is_report(&self) -> bool {
        self.kind == EventKind::Sync && self.code == SYN_REPORT
    }

    pub fn is_dropped(&self) -> bool {
        self.kind == EventKind::Sync && self.code == SYN_DROPPED
    }
}
