//! Recorded input scripts replayed against a canvas.

use kurbo::Point;
use serde::Deserialize;
use sketchnote_core::{
    Canvas, CssColor, KeyEvent, KeyboardShortcuts, PointerEvent, ToolKind, Touch, TouchEvent,
};

/// Phase of a scripted touch frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// One scripted input step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptEvent {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave,
    Touch {
        phase: TouchPhase,
        touches: Vec<Touch>,
    },
    /// Finish the open text entry with this content.
    Text {
        text: String,
    },
    CancelText,
    Key(KeyEvent),
    Undo,
    Redo,
    Clear,
    Tool {
        tool: ToolKind,
    },
    Color {
        color: String,
    },
    Fill {
        color: String,
    },
    Width {
        width: f64,
    },
    ZoomIn,
    ZoomOut,
    ResetView,
}

impl ScriptEvent {
    /// Apply this step to `canvas`. Key events go through `shortcuts`.
    pub fn apply(&self, canvas: &mut Canvas, shortcuts: &KeyboardShortcuts) {
        match self {
            ScriptEvent::Down { x, y, pressure } => canvas.handle_pointer(PointerEvent::Down {
                position: Point::new(*x, *y),
                pressure: *pressure,
            }),
            ScriptEvent::Move { x, y } => canvas.handle_pointer(PointerEvent::Move {
                position: Point::new(*x, *y),
            }),
            ScriptEvent::Up { x, y } => canvas.handle_pointer(PointerEvent::Up {
                position: Point::new(*x, *y),
            }),
            ScriptEvent::Leave => canvas.handle_pointer(PointerEvent::Leave),
            ScriptEvent::Touch { phase, touches } => {
                let touches = touches.clone();
                canvas.handle_touch(match phase {
                    TouchPhase::Start => TouchEvent::Start { touches },
                    TouchPhase::Move => TouchEvent::Move { touches },
                    TouchPhase::End => TouchEvent::End { touches },
                });
            }
            ScriptEvent::Text { text } => {
                if !canvas.commit_text(text) {
                    log::debug!("Text step did not create a label");
                }
            }
            ScriptEvent::CancelText => canvas.cancel_text(),
            ScriptEvent::Key(event) => {
                if !shortcuts.handle(event, canvas) {
                    log::debug!("Key {:?} not bound", event.key);
                }
            }
            ScriptEvent::Undo => {
                canvas.undo();
            }
            ScriptEvent::Redo => {
                canvas.redo();
            }
            ScriptEvent::Clear => canvas.clear(),
            ScriptEvent::Tool { tool } => canvas.set_tool(*tool),
            ScriptEvent::Color { color } => canvas.settings_mut().stroke_color = CssColor::new(color.as_str()),
            ScriptEvent::Fill { color } => canvas.settings_mut().fill_color = CssColor::new(color.as_str()),
            ScriptEvent::Width { width } => canvas.settings_mut().stroke_width = *width,
            ScriptEvent::ZoomIn => canvas.viewport_mut().zoom_in(),
            ScriptEvent::ZoomOut => canvas.viewport_mut().zoom_out(),
            ScriptEvent::ResetView => canvas.viewport_mut().reset(),
        }
    }
}

/// Parse a JSON array of steps.
pub fn parse_script(json: &str) -> Result<Vec<ScriptEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Replay `events` in order. Returns the number of steps applied.
pub fn replay(canvas: &mut Canvas, shortcuts: &KeyboardShortcuts, events: &[ScriptEvent]) -> usize {
    for event in events {
        event.apply(canvas, shortcuts);
    }
    log::debug!("Replayed {} script steps", events.len());
    events.len()
}
