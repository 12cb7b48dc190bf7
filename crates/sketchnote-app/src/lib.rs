//! Sketchnote Application
//!
//! Headless shell around the canvas core: loads stored state, replays
//! recorded input and writes the exported document and preview.

mod app;
mod script;

pub use app::{App, AppConfig, AppError, RunSummary, USAGE};
pub use script::{ScriptEvent, TouchPhase, parse_script, replay};
