//! Raw host events and the input vocabulary shared with widget messages.
//!
//! The host converts whatever its platform layer produces into [`RawEvent`]s
//! and hands them to [`WidgetTree::dispatch_event`](crate::widget::WidgetTree::dispatch_event).
//! The engine never forwards a raw event to a widget verbatim; the
//! dispatcher translates it into typed [`Message`](crate::widget::Message)s.

use horizon_trellis_core::{Rect, TimerId};

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt && !self.meta
    }
}

/// Keyboard keys the engine distinguishes.
///
/// Only navigation keys carry meaning for the engine itself; everything else
/// passes through to widgets untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    /// A printable key, identified by the character it produces unshifted.
    Char(char),
    /// Function key F1..F24.
    F(u8),
    /// A platform keycode with no dedicated variant.
    Other(u32),
}

/// Mouse buttons known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a host button number (1 = left, 2 = right, 3 = middle).
    ///
    /// Any other number is not a button the engine routes.
    pub fn from_raw(button: u32) -> Option<Self> {
        match button {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Middle),
            _ => None,
        }
    }
}

/// A raw event from the host's input, timer and display sources.
///
/// Pointer coordinates are absolute (screen space). `z` and `w` are the
/// vertical and horizontal wheel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// A key was pressed.
    KeyDown {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// A key was released.
    KeyUp {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// A character was typed (possibly by auto-repeat).
    KeyChar {
        key: Key,
        character: Option<char>,
        modifiers: KeyboardModifiers,
        repeat: bool,
    },
    /// The pointer moved or a wheel turned.
    MouseAxes {
        x: i32,
        y: i32,
        z: i32,
        w: i32,
        dx: i32,
        dy: i32,
        dz: i32,
        dw: i32,
    },
    /// A pointer button was pressed.
    MouseButtonDown {
        x: i32,
        y: i32,
        z: i32,
        w: i32,
        button: u32,
    },
    /// A pointer button was released.
    MouseButtonUp {
        x: i32,
        y: i32,
        z: i32,
        w: i32,
        button: u32,
    },
    /// A timer expired.
    Timer { timer: TimerId },
    /// Part of the display needs repainting (screen coordinates).
    DisplayExpose { rect: Rect },
    /// The display changed size.
    DisplayResize { rect: Rect },
    /// The display gained input focus.
    DisplaySwitchIn,
    /// The display lost input focus.
    DisplaySwitchOut,
    /// The user asked to close the display.
    DisplayClose,
}
