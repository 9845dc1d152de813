//! Platform-agnostic input values
//!
//! The platform shim translates native events into these types before
//! handing them to [`crate::BackendState`].

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Virtual key codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Key(pub u32);

impl Key {
    // Alphanumeric keys
    pub const A: Key = Key(0x41);
    pub const B: Key = Key(0x42);
    pub const C: Key = Key(0x43);
    pub const D: Key = Key(0x44);
    pub const E: Key = Key(0x45);
    pub const F: Key = Key(0x46);
    pub const G: Key = Key(0x47);
    pub const H: Key = Key(0x48);
    pub const I: Key = Key(0x49);
    pub const J: Key = Key(0x4A);
    pub const K: Key = Key(0x4B);
    pub const L: Key = Key(0x4C);
    pub const M: Key = Key(0x4D);
    pub const N: Key = Key(0x4E);
    pub const O: Key = Key(0x4F);
    pub const P: Key = Key(0x50);
    pub const Q: Key = Key(0x51);
    pub const R: Key = Key(0x52);
    pub const S: Key = Key(0x53);
    pub const T: Key = Key(0x54);
    pub const U: Key = Key(0x55);
    pub const V: Key = Key(0x56);
    pub const W: Key = Key(0x57);
    pub const X: Key = Key(0x58);
    pub const Y: Key = Key(0x59);
    pub const Z: Key = Key(0x5A);

    // Number row
    pub const KEY_0: Key = Key(0x30);
    pub const KEY_1: Key = Key(0x31);
    pub const KEY_2: Key = Key(0x32);
    pub const KEY_3: Key = Key(0x33);
    pub const KEY_4: Key = Key(0x34);
    pub const KEY_5: Key = Key(0x35);
    pub const KEY_6: Key = Key(0x36);
    pub const KEY_7: Key = Key(0x37);
    pub const KEY_8: Key = Key(0x38);
    pub const KEY_9: Key = Key(0x39);

    // Editing keys
    pub const BACKSPACE: Key = Key(0x08);
    pub const TAB: Key = Key(0x09);
    pub const ENTER: Key = Key(0x0D);
    pub const ESCAPE: Key = Key(0x1B);
    pub const SPACE: Key = Key(0x20);
    pub const DELETE: Key = Key(0x7F);
    pub const INSERT: Key = Key(0x2D);

    // Arrows
    pub const LEFT: Key = Key(0x25);
    pub const UP: Key = Key(0x26);
    pub const RIGHT: Key = Key(0x27);
    pub const DOWN: Key = Key(0x28);

    // Navigation
    pub const HOME: Key = Key(0x24);
    pub const END: Key = Key(0x23);
    pub const PAGE_UP: Key = Key(0x21);
    pub const PAGE_DOWN: Key = Key(0x22);

    // Function keys
    pub const F1: Key = Key(0x70);
    pub const F2: Key = Key(0x71);
    pub const F3: Key = Key(0x72);
    pub const F4: Key = Key(0x73);
    pub const F5: Key = Key(0x74);
    pub const F6: Key = Key(0x75);
    pub const F7: Key = Key(0x76);
    pub const F8: Key = Key(0x77);
    pub const F9: Key = Key(0x78);
    pub const F10: Key = Key(0x79);
    pub const F11: Key = Key(0x7A);
    pub const F12: Key = Key(0x7B);

    pub const UNKNOWN: Key = Key(0);
}

/// Keyboard modifier set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: Modifiers = Modifiers { bits: 1 << 0 };
    pub const CONTROL: Modifiers = Modifiers { bits: 1 << 1 };
    pub const ALT: Modifiers = Modifiers { bits: 1 << 2 };
    /// Cmd on macOS, Win on Windows
    pub const SUPER: Modifiers = Modifiers { bits: 1 << 3 };
    pub const CAPS_LOCK: Modifiers = Modifiers { bits: 1 << 4 };
    pub const NUM_LOCK: Modifiers = Modifiers { bits: 1 << 5 };

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Check that every modifier in `other` is active
    pub const fn contains(self, other: Modifiers) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub const fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub const fn ctrl(self) -> bool {
        self.contains(Self::CONTROL)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers::from_bits(self.bits | rhs.bits)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.bits |= rhs.bits;
    }
}

/// Set of mouse buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons {
    bits: u8,
}

impl MouseButtons {
    pub const NONE: MouseButtons = MouseButtons { bits: 0 };
    pub const LEFT: MouseButtons = MouseButtons { bits: 1 << 0 };
    pub const MIDDLE: MouseButtons = MouseButtons { bits: 1 << 1 };
    pub const RIGHT: MouseButtons = MouseButtons { bits: 1 << 2 };
    pub const FORWARD: MouseButtons = MouseButtons { bits: 1 << 3 };
    pub const BACK: MouseButtons = MouseButtons { bits: 1 << 4 };

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub const fn contains(self, other: MouseButtons) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn intersects(self, other: MouseButtons) -> bool {
        self.bits & other.bits != 0
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn insert(&mut self, other: MouseButtons) {
        self.bits |= other.bits;
    }

    pub fn remove(&mut self, other: MouseButtons) {
        self.bits &= !other.bits;
    }
}

impl BitOr for MouseButtons {
    type Output = MouseButtons;

    fn bitor(self, rhs: MouseButtons) -> MouseButtons {
        MouseButtons::from_bits(self.bits | rhs.bits)
    }
}

impl BitAnd for MouseButtons {
    type Output = MouseButtons;

    fn bitand(self, rhs: MouseButtons) -> MouseButtons {
        MouseButtons::from_bits(self.bits & rhs.bits)
    }
}

/// Mouse cursor style requested by the hovered component
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    #[default]
    Normal,
    Text,
    Hand,
    Crosshair,
    Disabled,
    Wait,
    WaitBackground,
    Move,
    ResizeHorizontal,
    ResizeVertical,
    /// Top-left to bottom-right
    ResizeDiagonal,
    /// Top-right to bottom-left
    ResizeDiagonal2,
}
