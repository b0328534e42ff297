pub mod codes;
pub mod event;
pub mod reducer;
pub mod state;

pub use event::{EventKind, EventTime, RawEvent};
pub use reducer::{HostClock, HwStateReducer, ReducerStats, TimestampSource};
pub use state::{Contact, HardwareState, NO_CONTACT, SLOT_COUNT};
