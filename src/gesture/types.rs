use heapless::Vec;

const MAX_ACTIONS: usize = 4;

/// Functional zone of the touch surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Null,
    Move,
    LeftBtn,
    RightBtn,
    MiddleBtn,
    HorizScroll,
    VertScroll,
    Modifier,
}

/// Sticky per-slot interpretation of a contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum FingerMode {
    #[default]
    Null = 0,
    Move = 1,
    LeftBtn = 2,
    RightBtn = 3,
    MiddleBtn = 4,
    HorizScroll = 5,
    VertScroll = 6,
    Modifier = 7,
}

impl FingerMode {
    pub const fn is_button(self) -> bool {
        matches!(self, Self::LeftBtn | Self::RightBtn | Self::MiddleBtn)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
}

impl MouseButton {
    pub const fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Motion { dx: i32, dy: i32 },
    Scroll { axis: ScrollAxis, amount: i32 },
    Button { button: MouseButton, pressed: bool },
}

/// Receives the actions synthesized by one evaluation.
pub trait ActionSink {
    fn post(&mut self, action: Action);
}

impl ActionSink for std::vec::Vec<Action> {
    fn post(&mut self, action: Action) {
        self.push(action);
    }
}

/// Actions from a single evaluation: at most one motion, two scrolls and
/// one button transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionBuffer {
    actions: Vec<Action, MAX_ACTIONS>,
}

impl ActionBuffer {
    pub const MAX: usize = MAX_ACTIONS;

    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: Action) {
        if self.actions.push(action).is_err() {
            log::warn!("action buffer full, dropping {action:?}");
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn motion(&self) -> Option<(i32, i32)> {
        self.iter().find_map(|action| match action {
            Action::Motion { dx, dy } => Some((*dx, *dy)),
            _ => None,
        })
    }

    pub fn scroll(&self, axis: ScrollAxis) -> Option<i32> {
        self.iter().find_map(|action| match action {
            Action::Scroll { axis: a, amount } if *a == axis => Some(*amount),
            _ => None,
        })
    }

    pub fn button(&self) -> Option<(MouseButton, bool)> {
        self.iter().find_map(|action| match action {
            Action::Button { button, pressed } => Some((*button, *pressed)),
            _ => None,
        })
    }

    pub fn drain_into(&self, sink: &mut dyn ActionSink) {
        for action in self.iter() {
            sink.post(*action);
        }
    }
}

/// Snapshot of the engine's view after one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineTrace {
    pub timestamp_ms: u32,
    pub modes: [FingerMode; crate::hw::SLOT_COUNT],
    pub modifier_active: bool,
    pub moving_fingers: u8,
    pub raw_dx: i32,
    pub raw_dy: i32,
    pub raw_scroll_h: i32,
    pub raw_scroll_v: i32,
    pub ongoing_button: Option<MouseButton>,
}
