//! Sketchnote Core Library
//!
//! Platform-agnostic drawing canvas: drawables, history, input handling,
//! viewport math and document export.

pub mod canvas;
pub mod config;
pub mod drawable;
pub mod export;
pub mod geometry;
pub mod history;
pub mod input;
pub mod migration;
pub mod shortcuts;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, InteractionState};
pub use config::{CanvasConfig, CanvasSize, ConfigError};
pub use drawable::{Blend, CssColor, Drawable, DrawableId, DrawableKind, DrawableStyle, PolygonKind, StrokeMode, WireError};
pub use export::{DocumentExport, RasterError, Rasterizer, export_document};
pub use history::{History, MAX_UNDO_HISTORY, Snapshot};
pub use input::{KeyEvent, KeyTarget, Modifiers, PointerEvent, Touch, TouchEvent};
pub use migration::{migrate, migrate_document};
pub use shortcuts::{HistoryCommands, KeyboardShortcuts, ShortcutAction, ShortcutRegistry};
pub use tools::{CommitRules, DrawableBuilder, ToolKind, ToolSettings};
pub use viewport::{PinchGesture, Viewport};
