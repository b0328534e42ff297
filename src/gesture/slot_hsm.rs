use log::debug;
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::types::{FingerMode, Region};

#[derive(Clone, Copy, Debug)]
enum SlotHsmEvent {
    Sample { region: Region },
}

#[derive(Default)]
struct DispatchContext {
    latch_position: bool,
}

/// Result of advancing one slot by one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotStep {
    pub mode: FingerMode,
    /// The slot just entered a tracking mode and its current position must
    /// become the delta origin.
    pub latch_position: bool,
}

/// Mode machine for a single contact slot.
///
/// Motion and scroll modes only leave through `Null`; button modes may
/// hand over to one another while the contact stays on the surface.
pub struct SlotMachine {
    slot: usize,
    machine: statig::blocking::StateMachine<SlotHsm>,
}

impl SlotMachine {
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            machine: SlotHsm::new(slot).state_machine(),
        }
    }

    pub fn advance(&mut self, region: Region) -> SlotStep {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&SlotHsmEvent::Sample { region }, &mut context);
        SlotStep {
            mode: self.mode(),
            latch_position: context.latch_position,
        }
    }

    pub fn mode(&self) -> FingerMode {
        self.machine.inner().mode
    }

    pub fn reset(&mut self) {
        self.machine = SlotHsm::new(self.slot).state_machine();
    }
}

struct SlotHsm {
    slot: usize,
    mode: FingerMode,
}

impl SlotHsm {
    fn new(slot: usize) -> Self {
        Self {
            slot,
            mode: FingerMode::Null,
        }
    }

    fn enter(&mut self, mode: FingerMode, next: State) -> Outcome<State> {
        debug!("slot {}: {:?} -> {:?}", self.slot, self.mode, mode);
        self.mode = mode;
        Transition(next)
    }
}

#[state_machine(initial = "State::null()")]
impl SlotHsm {
    #[state]
    fn null(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        match event {
            SlotHsmEvent::Sample { region } => match region {
                Region::Null => Handled,
                Region::Move => {
                    context.latch_position = true;
                    self.enter(FingerMode::Move, State::moving())
                }
                Region::VertScroll => {
                    context.latch_position = true;
                    self.enter(FingerMode::VertScroll, State::vert_scroll())
                }
                Region::HorizScroll => {
                    context.latch_position = true;
                    self.enter(FingerMode::HorizScroll, State::horiz_scroll())
                }
                Region::Modifier => self.enter(FingerMode::Modifier, State::modifier()),
                Region::LeftBtn => self.enter(FingerMode::LeftBtn, State::left_btn()),
                Region::RightBtn => self.enter(FingerMode::RightBtn, State::right_btn()),
                Region::MiddleBtn => self.enter(FingerMode::MiddleBtn, State::middle_btn()),
            },
        }
    }

    #[state(superstate = "contact")]
    fn moving(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        let _ = (context, event);
        Super
    }

    #[state(superstate = "contact")]
    fn vert_scroll(
        &mut self,
        context: &mut DispatchContext,
        event: &SlotHsmEvent,
    ) -> Outcome<State> {
        let _ = (context, event);
        Super
    }

    #[state(superstate = "contact")]
    fn horiz_scroll(
        &mut self,
        context: &mut DispatchContext,
        event: &SlotHsmEvent,
    ) -> Outcome<State> {
        let _ = (context, event);
        Super
    }

    #[state(superstate = "contact")]
    fn modifier(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        let _ = (context, event);
        Super
    }

    #[state(superstate = "contact")]
    fn left_btn(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SlotHsmEvent::Sample { region } => match region {
                Region::RightBtn => self.enter(FingerMode::RightBtn, State::right_btn()),
                Region::MiddleBtn => self.enter(FingerMode::MiddleBtn, State::middle_btn()),
                _ => Super,
            },
        }
    }

    #[state(superstate = "contact")]
    fn right_btn(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SlotHsmEvent::Sample { region } => match region {
                Region::LeftBtn => self.enter(FingerMode::LeftBtn, State::left_btn()),
                Region::MiddleBtn => self.enter(FingerMode::MiddleBtn, State::middle_btn()),
                _ => Super,
            },
        }
    }

    #[state(superstate = "contact")]
    fn middle_btn(
        &mut self,
        context: &mut DispatchContext,
        event: &SlotHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            SlotHsmEvent::Sample { region } => match region {
                Region::LeftBtn => self.enter(FingerMode::LeftBtn, State::left_btn()),
                Region::RightBtn => self.enter(FingerMode::RightBtn, State::right_btn()),
                _ => Super,
            },
        }
    }

    /// A live contact keeps its mode until the slot reports no position.
    #[superstate]
    fn contact(&mut self, context: &mut DispatchContext, event: &SlotHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SlotHsmEvent::Sample {
                region: Region::Null,
            } => self.enter(FingerMode::Null, State::null()),
            SlotHsmEvent::Sample { .. } => Handled,
        }
    }
}
