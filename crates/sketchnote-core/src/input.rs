//! Input events delivered to the canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn platform(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse or pen event, positions in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down {
        position: Point,
        /// Reported pen pressure, if any.
        #[serde(default)]
        pressure: Option<f64>,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// Pointer left the canvas.
    Leave,
}

/// One finger on a touch surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub position: Point,
    /// Reported touch force, if any.
    #[serde(default)]
    pub force: Option<f64>,
}

impl Touch {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            force: None,
        }
    }
}

/// Touch event carrying every finger still on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum TouchEvent {
    Start { touches: Vec<Touch> },
    Move { touches: Vec<Touch> },
    End { touches: Vec<Touch> },
}

impl TouchEvent {
    pub fn touches(&self) -> &[Touch] {
        match self {
            TouchEvent::Start { touches } | TouchEvent::Move { touches } | TouchEvent::End { touches } => touches,
        }
    }
}

/// Where a key event was delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyTarget {
    /// The canvas or the surrounding document.
    #[default]
    Document,
    /// A text-entry field, including the text tool's own input.
    TextField,
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub target: KeyTarget,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            target: KeyTarget::Document,
        }
    }

    pub fn in_text_field(mut self) -> Self {
        self.target = KeyTarget::TextField;
        self
    }
}
