pub const SLOT_COUNT: usize = 5;
pub const NO_CONTACT: i32 = -1;

/// Contact state of the touchpad at one report boundary.
///
/// An empty slot carries `x == y == z == NO_CONTACT` and `finger == false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HardwareState {
    pub timestamp_ms: u32,
    pub pressed: bool,
    pub x: [i32; SLOT_COUNT],
    pub y: [i32; SLOT_COUNT],
    pub z: [i32; SLOT_COUNT],
    pub finger: [bool; SLOT_COUNT],
    pub fingers_count: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for HardwareState {
    fn default() -> Self {
        Self::empty()
    }
}

impl HardwareState {
    pub const fn empty() -> Self {
        Self {
            timestamp_ms: 0,
            pressed: false,
            x: [NO_CONTACT; SLOT_COUNT],
            y: [NO_CONTACT; SLOT_COUNT],
            z: [NO_CONTACT; SLOT_COUNT],
            finger: [false; SLOT_COUNT],
            fingers_count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    pub fn clear_slot(&mut self, slot: usize) {
        self.finger[slot] = false;
        self.x[slot] = NO_CONTACT;
        self.y[slot] = NO_CONTACT;
        self.z[slot] = NO_CONTACT;
    }

    pub fn live_slots(&self) -> usize {
        self.finger.iter().filter(|live| **live).count()
    }

    pub fn slot(&self, slot: usize) -> Option<Contact> {
        if slot >= SLOT_COUNT || !self.finger[slot] {
            return None;
        }
        Some(Contact {
            x: self.x[slot],
            y: self.y[slot],
            z: self.z[slot],
        })
    }
}
