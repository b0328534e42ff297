pub mod config;
pub mod engine;
pub mod region;
pub mod slot_hsm;
pub mod types;

pub use config::{active_config, GestureConfig, MotionConfig, SurfaceGeometry};
pub use engine::{EngineOutput, GestureContext, GestureEngine};
pub use region::classify;
pub use slot_hsm::{SlotMachine, SlotStep};
pub use types::{
    Action, ActionBuffer, ActionSink, EngineTrace, FingerMode, MouseButton, Region, ScrollAxis,
};
