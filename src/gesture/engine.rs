use core::array;

use log::warn;

use crate::hw::{HardwareState, SLOT_COUNT};

use super::{
    config::{active_config, GestureConfig, SurfaceGeometry},
    region::classify,
    slot_hsm::SlotMachine,
    types::{Action, ActionBuffer, EngineTrace, FingerMode, MouseButton, ScrollAxis},
};

/// State carried between evaluations of one device session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureContext {
    pub last_x: [i32; SLOT_COUNT],
    pub last_y: [i32; SLOT_COUNT],
    pub frac_x: f64,
    pub frac_y: f64,
    pub ongoing_button: Option<MouseButton>,
}

impl Default for GestureContext {
    fn default() -> Self {
        Self {
            last_x: [0; SLOT_COUNT],
            last_y: [0; SLOT_COUNT],
            frac_x: 0.0,
            frac_y: 0.0,
            ongoing_button: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineOutput {
    pub actions: ActionBuffer,
    /// How long the caller should wait before re-evaluating the last
    /// snapshot if no new hardware report arrives.
    pub delay_ms: u32,
    pub trace: EngineTrace,
}

#[derive(Clone, Copy, Debug, Default)]
struct Deltas {
    dx: i32,
    dy: i32,
    scroll_h: i32,
    scroll_v: i32,
    moving_fingers: u8,
}

/// Turns successive hardware snapshots into pointer motion, scrolling and
/// button transitions.
pub struct GestureEngine {
    config: GestureConfig,
    slots: [SlotMachine; SLOT_COUNT],
    context: GestureContext,
    last_trace: EngineTrace,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl GestureEngine {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            config: *config,
            slots: array::from_fn(SlotMachine::new),
            context: GestureContext::default(),
            last_trace: EngineTrace::default(),
        }
    }

    pub fn evaluate(&mut self, hw: &HardwareState) -> EngineOutput {
        let modes = self.advance_slots(hw);
        let modifier_active = modes.contains(&FingerMode::Modifier);
        let deltas = self.collect_deltas(hw, &modes);

        let mut actions = ActionBuffer::new();
        self.emit_motion(&mut actions, deltas, modifier_active);

        self.context.last_x = hw.x;
        self.context.last_y = hw.y;

        self.emit_button(&mut actions, hw.pressed, &modes);

        self.last_trace = EngineTrace {
            timestamp_ms: hw.timestamp_ms,
            modes,
            modifier_active,
            moving_fingers: deltas.moving_fingers,
            raw_dx: deltas.dx,
            raw_dy: deltas.dy,
            raw_scroll_h: deltas.scroll_h,
            raw_scroll_v: deltas.scroll_v,
            ongoing_button: self.context.ongoing_button,
        };

        EngineOutput {
            actions,
            delay_ms: self.config.motion.repoll_delay_ms,
            trace: self.last_trace,
        }
    }

    /// Drops all carried state. Returns the release for a button press that
    /// was still held.
    pub fn reset(&mut self) -> Option<Action> {
        let released = self.context.ongoing_button.map(|button| {
            warn!("force-releasing button {}", button.id());
            Action::Button {
                button,
                pressed: false,
            }
        });
        for slot in &mut self.slots {
            slot.reset();
        }
        self.context = GestureContext::default();
        self.last_trace = EngineTrace::default();
        released
    }

    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.config.geometry = geometry;
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn context(&self) -> &GestureContext {
        &self.context
    }

    pub fn last_trace(&self) -> &EngineTrace {
        &self.last_trace
    }

    pub fn finger_modes(&self) -> [FingerMode; SLOT_COUNT] {
        array::from_fn(|slot| self.slots[slot].mode())
    }

    fn advance_slots(&mut self, hw: &HardwareState) -> [FingerMode; SLOT_COUNT] {
        let mut modes = [FingerMode::Null; SLOT_COUNT];
        for (slot, machine) in self.slots.iter_mut().enumerate() {
            let region = classify(&self.config.geometry, hw.x[slot], hw.y[slot]);
            let step = machine.advance(region);
            if step.latch_position {
                self.context.last_x[slot] = hw.x[slot];
                self.context.last_y[slot] = hw.y[slot];
            }
            modes[slot] = step.mode;
        }
        modes
    }

    fn collect_deltas(&self, hw: &HardwareState, modes: &[FingerMode; SLOT_COUNT]) -> Deltas {
        let mut deltas = Deltas::default();
        // Only moving and scrolling slots are guaranteed non-negative
        // positions on both sides of the subtraction.
        let dx = |slot: usize| hw.x[slot] - self.context.last_x[slot];
        let dy = |slot: usize| hw.y[slot] - self.context.last_y[slot];
        for (slot, mode) in modes.iter().enumerate() {
            match mode {
                FingerMode::Move => {
                    deltas.dx += dx(slot);
                    deltas.dy += dy(slot);
                    deltas.moving_fingers += 1;
                }
                FingerMode::VertScroll => deltas.scroll_v += dy(slot),
                FingerMode::HorizScroll => deltas.scroll_h += dx(slot),
                _ => {}
            }
        }
        deltas
    }

    fn emit_motion(&mut self, actions: &mut ActionBuffer, deltas: Deltas, modifier_active: bool) {
        let factor = if modifier_active {
            self.config.motion.modifier_scale
        } else {
            1.0
        };

        let dx = f64::from(deltas.dx) * factor + self.context.frac_x;
        let dy = f64::from(deltas.dy) * factor + self.context.frac_y;
        let out_x = dx.floor();
        let out_y = dy.floor();
        self.context.frac_x = dx - out_x;
        self.context.frac_y = dy - out_y;

        if out_x != 0.0 || out_y != 0.0 {
            actions.push(Action::Motion {
                dx: out_x as i32,
                dy: out_y as i32,
            });
        }

        let scroll_h = f64::from(deltas.scroll_h) * factor;
        if scroll_h != 0.0 {
            actions.push(Action::Scroll {
                axis: ScrollAxis::Horizontal,
                amount: scroll_h as i32,
            });
        }
        let scroll_v = f64::from(deltas.scroll_v) * factor;
        if scroll_v != 0.0 {
            actions.push(Action::Scroll {
                axis: ScrollAxis::Vertical,
                amount: scroll_v as i32,
            });
        }
    }

    fn emit_button(
        &mut self,
        actions: &mut ActionBuffer,
        pressed: bool,
        modes: &[FingerMode; SLOT_COUNT],
    ) {
        match self.context.ongoing_button {
            Some(button) if !pressed => {
                actions.push(Action::Button {
                    button,
                    pressed: false,
                });
                self.context.ongoing_button = None;
            }
            None if pressed => {
                if let Some(button) = pick_button(modes) {
                    actions.push(Action::Button {
                        button,
                        pressed: true,
                    });
                    self.context.ongoing_button = Some(button);
                }
            }
            _ => {}
        }
    }
}

/// Logical button for a physical click given the slots resting in button
/// zones. Mixed zones pick nothing.
fn pick_button(modes: &[FingerMode; SLOT_COUNT]) -> Option<MouseButton> {
    let left = modes.contains(&FingerMode::LeftBtn);
    let middle = modes.contains(&FingerMode::MiddleBtn);
    let right = modes.contains(&FingerMode::RightBtn);

    match (left, middle, right) {
        (_, false, false) => Some(MouseButton::Left),
        (false, true, false) => Some(MouseButton::Middle),
        (false, false, true) => Some(MouseButton::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
