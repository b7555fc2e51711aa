//! Input event types routed through the desktop.
//!
//! Key events are plain crossterm `KeyEvent`s. Mouse events are richer than
//! crossterm's: they arrive pre-classified into press/release/click/double
//! click (see `drivers::mouse::ClickClassifier`) and carry the full set of
//! held buttons, which is what the drag and caption logic keys off.

pub use crossterm::event::KeyEvent;

use crate::window::FloatRect;

/// Set of mouse buttons held while an event was generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(1 << 1);
    pub const MIDDLE: Self = Self(1 << 2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

/// Classified mouse action, in the vocabulary of the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Move,
    LeftDown,
    LeftUp,
    LeftClick,
    LeftDoubleClick,
    MiddleDown,
    MiddleUp,
    MiddleClick,
    MiddleDoubleClick,
    RightDown,
    RightUp,
    RightClick,
    RightDoubleClick,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

impl MouseAction {
    pub fn is_press(self) -> bool {
        matches!(self, Self::LeftDown | Self::MiddleDown | Self::RightDown)
    }

    pub fn is_release(self) -> bool {
        matches!(self, Self::LeftUp | Self::MiddleUp | Self::RightUp)
    }

    pub fn is_double_click(self) -> bool {
        matches!(
            self,
            Self::LeftDoubleClick | Self::MiddleDoubleClick | Self::RightDoubleClick
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub column: i32,
    pub row: i32,
    pub action: MouseAction,
    pub buttons: MouseButtons,
}

impl MouseEvent {
    pub fn new(action: MouseAction, column: i32, row: i32) -> Self {
        let buttons = match action {
            MouseAction::LeftDown => MouseButtons::PRIMARY,
            MouseAction::MiddleDown => MouseButtons::MIDDLE,
            MouseAction::RightDown => MouseButtons::SECONDARY,
            _ => MouseButtons::NONE,
        };
        Self {
            column,
            row,
            action,
            buttons,
        }
    }

    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn position(&self) -> (i32, i32) {
        (self.column, self.row)
    }

    pub fn is_within(&self, rect: FloatRect) -> bool {
        rect.contains(self.column, self.row)
    }
}

/// Result of offering a mouse event to a handler.
///
/// `capture` asks the desktop to route every following mouse event to the
/// same window, regardless of pointer position, until an outcome without
/// capture is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseOutcome {
    pub consumed: bool,
    pub capture: bool,
}

impl MouseOutcome {
    pub const IGNORED: Self = Self {
        consumed: false,
        capture: false,
    };
    pub const CONSUMED: Self = Self {
        consumed: true,
        capture: false,
    };
    pub const CAPTURED: Self = Self {
        consumed: true,
        capture: true,
    };
}
