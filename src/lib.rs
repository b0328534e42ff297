//! Multitouch touchpad driver core.
//!
//! Raw evdev-style events are folded into [`HardwareState`] snapshots by
//! [`HwStateReducer`]; [`GestureEngine`] turns successive snapshots into
//! pointer motion, edge scrolling and soft-button clicks. [`TouchpadSession`]
//! drives both for one device through a [`ProtocolBackend`].

pub mod backend;
pub mod error;
pub mod gesture;
pub mod hw;
pub mod session;

pub use backend::{EvdevBackend, EventDevice, ProtocolBackend, ScriptedDevice};
pub use error::TouchpadError;
pub use gesture::{
    active_config, Action, ActionSink, GestureConfig, GestureEngine, MouseButton, ScrollAxis,
};
pub use hw::{EventTime, HardwareState, HwStateReducer, RawEvent};
pub use session::{SessionState, TouchpadSession};
