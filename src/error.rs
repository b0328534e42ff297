use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TouchpadError {
    /// The event source has nothing ready; retry on the next readiness signal.
    TransientNoData,
    /// The kernel event queue overflowed and events were lost.
    BufferOverrun,
    /// A per-slot event addressed a slot outside the tracked range.
    MalformedSlot { slot: i32 },
    /// The event source is permanently unavailable.
    DeviceGone,
    DeviceOpen(String),
    NotATouchpad,
    InvalidState(&'static str),
}

impl fmt::Display for TouchpadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientNoData => f.write_str("no event data available"),
            Self::BufferOverrun => f.write_str("event buffer overrun"),
            Self::MalformedSlot { slot } => write!(f, "malformed slot index {slot}"),
            Self::DeviceGone => f.write_str("input device gone"),
            Self::DeviceOpen(msg) => write!(f, "cannot open input device: {msg}"),
            Self::NotATouchpad => f.write_str("device is not a touchpad"),
            Self::InvalidState(msg) => write!(f, "invalid session state: {msg}"),
        }
    }
}

impl std::error::Error for TouchpadError {}
