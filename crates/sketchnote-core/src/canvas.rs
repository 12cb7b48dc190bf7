//! Canvas state: committed history, viewport and the input state machine.
//!
//! All transitions happen synchronously inside the event handlers. A drag
//! builds a transient drawable that only enters history on release, and
//! every gesture can be resolved back to [`InteractionState::Idle`].

use crate::config::{CanvasConfig, CanvasSize};
use crate::drawable::{Drawable, DrawableKind, DrawableStyle};
use crate::export::{DocumentExport, Rasterizer, export_document};
use crate::history::{History, Snapshot};
use crate::input::{PointerEvent, Touch, TouchEvent};
use crate::migration;
use crate::shortcuts::HistoryCommands;
use crate::tools::{CommitRules, DrawableBuilder, ToolKind, ToolSettings, is_meaningful};
use crate::viewport::{PinchGesture, Viewport};
use kurbo::Point;
use serde_json::Value;

/// What the canvas is doing with input right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A drag is building a transient drawable.
    Drawing { tool: ToolKind, builder: DrawableBuilder },
    /// Two fingers are zooming the viewport. Tool input is suspended.
    Pinching(PinchGesture),
    /// A text entry surface is open at `anchor` (canvas coordinates).
    TextEditing { anchor: Point },
}

/// The drawing canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    history: History,
    viewport: Viewport,
    state: InteractionState,
    settings: ToolSettings,
    config: CanvasConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new(config: CanvasConfig) -> Self {
        let settings = ToolSettings {
            stroke_width: config.default_stroke_width,
            ..Default::default()
        };
        Self {
            history: History::with_limit(Snapshot::empty(), config.history_limit),
            viewport: config.viewport(),
            state: InteractionState::Idle,
            settings,
            config,
        }
    }

    /// Create a canvas from stored state, migrating legacy data. The loaded
    /// drawables are not undoable.
    pub fn from_initial_state(raw: &Value, config: CanvasConfig) -> Self {
        let mut canvas = Self::new(config);
        let drawables = migration::migrate_document(raw);
        log::debug!("Loaded {} drawables", drawables.len());
        canvas.history.replace(Snapshot::from(drawables));
        canvas
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.config.canvas_size
    }

    /// Committed drawables, back to front.
    pub fn objects(&self) -> &Snapshot {
        self.history.present()
    }

    /// The drawable being dragged out, if any.
    pub fn transient(&self) -> Option<&Drawable> {
        match &self.state {
            InteractionState::Drawing { builder, .. } => Some(builder.preview()),
            _ => None,
        }
    }

    /// Everything to draw this frame: committed drawables, then the
    /// transient one on top.
    pub fn render_list(&self) -> impl Iterator<Item = &Drawable> {
        self.objects().iter().chain(self.transient())
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Whether a text label entry is open.
    pub fn is_text_editing(&self) -> bool {
        matches!(self.state, InteractionState::TextEditing { .. })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Current tool and style for new drawables.
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Style controls. Switch tools with [`Canvas::set_tool`] so an open
    /// gesture is resolved.
    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit_rules(&self) -> CommitRules {
        CommitRules {
            simplify_tolerance: self.config.simplify_tolerance,
            min_shape_size: self.config.min_shape_size,
        }
    }

    /// Switch tools. An in-progress drag is resolved first and an open text
    /// entry is cancelled.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.resolve_gesture();
        if matches!(self.state, InteractionState::TextEditing { .. }) {
            self.state = InteractionState::Idle;
        }
        self.settings.tool = tool;
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, pressure } => self.pointer_down(position, pressure),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.pointer_up(),
        }
    }

    /// Start a gesture at a screen position.
    pub fn pointer_down(&mut self, screen: Point, pressure: Option<f64>) {
        match self.state {
            InteractionState::Pinching(_) | InteractionState::TextEditing { .. } => return,
            InteractionState::Drawing { .. } => self.resolve_gesture(),
            InteractionState::Idle => {}
        }

        let position = self.viewport.screen_to_world(screen);
        let tool = self.settings.tool;
        if tool == ToolKind::Text {
            self.state = InteractionState::TextEditing { anchor: position };
            return;
        }
        if let Some(builder) = DrawableBuilder::begin(&self.settings, position, pressure) {
            self.state = InteractionState::Drawing { tool, builder };
        }
    }

    /// Extend the current drag.
    pub fn pointer_move(&mut self, screen: Point) {
        let position = self.viewport.screen_to_world(screen);
        if let InteractionState::Drawing { builder, .. } = &mut self.state {
            builder.update(position);
        }
    }

    /// Release: commit the transient drawable if it is meaningful.
    pub fn pointer_up(&mut self) {
        self.resolve_gesture();
    }

    /// Dispatch a touch event. Two or more fingers pinch-zoom; a single
    /// finger draws like a pointer.
    pub fn handle_touch(&mut self, event: TouchEvent) {
        let touches = event.touches();

        if touches.len() >= 2 {
            if matches!(self.state, InteractionState::TextEditing { .. }) {
                return;
            }
            self.resolve_gesture();
            if !matches!(self.state, InteractionState::Pinching(_)) {
                self.state = InteractionState::Pinching(PinchGesture::new());
            }
            if let InteractionState::Pinching(gesture) = &mut self.state {
                gesture.update(&mut self.viewport, touches[0].position, touches[1].position);
            }
            return;
        }

        if let InteractionState::Pinching(_) = self.state {
            // Fewer than two fingers ends the pinch; the remaining finger
            // does not start drawing until it is lifted and placed again.
            self.state = InteractionState::Idle;
            return;
        }

        match (&event, touches.first()) {
            (TouchEvent::Start { .. }, Some(Touch { position, force })) => self.pointer_down(*position, *force),
            (TouchEvent::Move { .. }, Some(touch)) => self.pointer_move(touch.position),
            (TouchEvent::End { .. }, _) | (_, None) => self.pointer_up(),
        }
    }

    /// Finish the open text entry. Blank text cancels. Returns true if a
    /// label was committed.
    pub fn commit_text(&mut self, text: &str) -> bool {
        let InteractionState::TextEditing { anchor } = self.state else {
            return false;
        };
        self.state = InteractionState::Idle;

        let kind = DrawableKind::TextLabel {
            x: anchor.x,
            y: anchor.y,
            text: text.to_string(),
            font_size: self.config.default_font_size,
        };
        if !is_meaningful(&kind, self.config.min_shape_size) {
            log::debug!("Discarding empty text entry");
            return false;
        }

        let style = DrawableStyle {
            stroke_color: self.settings.stroke_color.clone(),
            opacity: 1.0,
            ..Default::default()
        };
        self.commit(Drawable::new(style, kind));
        true
    }

    /// Close the open text entry without creating a label.
    pub fn cancel_text(&mut self) {
        if matches!(self.state, InteractionState::TextEditing { .. }) {
            self.state = InteractionState::Idle;
        }
    }

    /// Undo the last change. An in-progress drag is discarded.
    pub fn undo(&mut self) -> bool {
        self.discard_gesture();
        self.history.undo()
    }

    /// Redo the last undone change. An in-progress drag is discarded.
    pub fn redo(&mut self) -> bool {
        self.discard_gesture();
        self.history.redo()
    }

    /// Remove every drawable. Undoable.
    pub fn clear(&mut self) {
        self.discard_gesture();
        self.history.clear();
    }

    /// Export the committed drawables. The transient drawable is never
    /// included.
    pub fn export(&self, rasterizer: Option<&mut dyn Rasterizer>) -> DocumentExport {
        export_document(self.objects(), self.canvas_size(), rasterizer)
    }

    /// Drawing → Idle, committing the transient drawable if meaningful.
    fn resolve_gesture(&mut self) {
        if !matches!(self.state, InteractionState::Drawing { .. }) {
            return;
        }
        let InteractionState::Drawing { builder, .. } = std::mem::take(&mut self.state) else {
            return;
        };
        match builder.finish(&self.commit_rules()) {
            Some(drawable) => self.commit(drawable),
            None => log::debug!("Discarding drawable below minimum size"),
        }
    }

    fn discard_gesture(&mut self) {
        if matches!(self.state, InteractionState::Drawing { .. }) {
            self.state = InteractionState::Idle;
        }
    }

    fn commit(&mut self, drawable: Drawable) {
        log::debug!("Committing drawable {}", drawable.id());
        let next = self.history.present().with_appended(drawable);
        self.history.push(next);
    }
}

impl HistoryCommands for Canvas {
    fn undo(&mut self) -> bool {
        Canvas::undo(self)
    }

    fn redo(&mut self) -> bool {
        Canvas::redo(self)
    }

    fn is_text_editing(&self) -> bool {
        Canvas::is_text_editing(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::{CssColor, StrokeMode};
    use crate::input::{KeyEvent, Modifiers};
    use crate::shortcuts::KeyboardShortcuts;
    use kurbo::Vec2;
    use serde_json::json;

    fn canvas_with(tool: ToolKind) -> Canvas {
        let mut canvas = Canvas::default();
        canvas.set_tool(tool);
        canvas
    }

    fn drag(canvas: &mut Canvas, from: Point, to: Point) {
        canvas.pointer_down(from, None);
        canvas.pointer_move(to);
        canvas.pointer_up();
    }

    fn two_fingers(phase: fn(Vec<Touch>) -> TouchEvent, a: Point, b: Point) -> TouchEvent {
        phase(vec![Touch::new(a), Touch::new(b)])
    }

    fn start(touches: Vec<Touch>) -> TouchEvent {
        TouchEvent::Start { touches }
    }

    fn moved(touches: Vec<Touch>) -> TouchEvent {
        TouchEvent::Move { touches }
    }

    #[test]
    fn test_drawing_state_and_transient() {
        let mut canvas = canvas_with(ToolKind::Rectangle);
        canvas.pointer_down(Point::new(10.0, 10.0), None);
        assert!(matches!(canvas.state(), InteractionState::Drawing { tool: ToolKind::Rectangle, .. }));
        canvas.pointer_move(Point::new(40.0, 30.0));
        assert!(canvas.transient().is_some());
        assert_eq!(canvas.render_list().count(), 1);
        assert!(canvas.objects().is_empty());
        canvas.pointer_up();
        assert!(canvas.is_idle());
        assert_eq!(canvas.objects().len(), 1);
        assert!(canvas.transient().is_none());
    }

    #[test]
    fn test_rect_commit_validity() {
        let mut canvas = canvas_with(ToolKind::Rectangle);
        drag(&mut canvas, Point::new(0.0, 0.0), Point::new(3.0, 10.0));
        assert!(canvas.objects().is_empty());
        assert!(!canvas.can_undo());
        drag(&mut canvas, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(canvas.objects().len(), 1);
    }

    #[test]
    fn test_pointer_leave_resolves_gesture() {
        let mut canvas = canvas_with(ToolKind::Line);
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::ZERO,
            pressure: None,
        });
        canvas.handle_pointer(PointerEvent::Move {
            position: Point::new(100.0, 0.0),
        });
        canvas.handle_pointer(PointerEvent::Leave);
        assert!(canvas.is_idle());
        assert_eq!(canvas.objects().len(), 1);
    }

    #[test]
    fn test_text_tool_flow() {
        let mut canvas = canvas_with(ToolKind::Text);
        canvas.settings_mut().stroke_color = CssColor::new("purple");
        canvas.pointer_down(Point::new(20.0, 30.0), None);
        assert_eq!(
            canvas.state(),
            &InteractionState::TextEditing {
                anchor: Point::new(20.0, 30.0)
            }
        );
        assert!(canvas.transient().is_none());
        assert!(canvas.commit_text("hello"));
        assert!(canvas.is_idle());
        let label = &canvas.objects()[0];
        assert_eq!(label.style.stroke_color.as_str(), "purple");
        assert_eq!(
            label.kind,
            DrawableKind::TextLabel {
                x: 20.0,
                y: 30.0,
                text: "hello".to_string(),
                font_size: 18.0
            }
        );
    }

    #[test]
    fn test_blank_text_cancels() {
        let mut canvas = canvas_with(ToolKind::Text);
        canvas.pointer_down(Point::ZERO, None);
        assert!(!canvas.commit_text("   "));
        assert!(canvas.is_idle());
        assert!(canvas.objects().is_empty());

        canvas.pointer_down(Point::ZERO, None);
        canvas.cancel_text();
        assert!(canvas.is_idle());
        assert!(!canvas.commit_text("late"));
        assert!(canvas.objects().is_empty());
    }

    #[test]
    fn test_pinch_interrupts_drawing() {
        let mut canvas = canvas_with(ToolKind::Pen);
        canvas.handle_touch(start(vec![Touch::new(Point::new(0.0, 0.0))]));
        canvas.handle_touch(moved(vec![Touch::new(Point::new(0.0, 50.0))]));
        canvas.handle_touch(two_fingers(start, Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        assert!(matches!(canvas.state(), InteractionState::Pinching(_)));
        // The interrupted stroke was long enough to keep.
        assert_eq!(canvas.objects().len(), 1);

        canvas.handle_touch(two_fingers(moved, Point::new(0.0, 0.0), Point::new(200.0, 0.0)));
        assert!((canvas.viewport().scale() - 2.0).abs() < 1e-12);

        canvas.handle_touch(TouchEvent::End {
            touches: vec![Touch::new(Point::ZERO)],
        });
        assert!(canvas.is_idle());
        assert_eq!(canvas.objects().len(), 1);
    }

    #[test]
    fn test_pinch_reference_resets_between_gestures() {
        let mut canvas = canvas_with(ToolKind::Pen);
        canvas.handle_touch(two_fingers(start, Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        canvas.handle_touch(two_fingers(moved, Point::new(0.0, 0.0), Point::new(150.0, 0.0)));
        canvas.handle_touch(TouchEvent::End { touches: Vec::new() });
        canvas.handle_touch(two_fingers(start, Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        assert!((canvas.viewport().scale() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_coordinates_follow_viewport() {
        let mut canvas = canvas_with(ToolKind::Arrow);
        canvas.viewport_mut().set_scale(2.0);
        canvas.viewport_mut().pan(Vec2::new(10.0, 10.0));
        drag(&mut canvas, Point::new(10.0, 10.0), Point::new(110.0, 10.0));
        assert_eq!(
            canvas.objects()[0].kind,
            DrawableKind::Arrow {
                x: 0.0,
                y: 0.0,
                end_x: 50.0,
                end_y: 0.0
            }
        );
    }

    #[test]
    fn test_undo_discards_transient() {
        let mut canvas = canvas_with(ToolKind::Rectangle);
        drag(&mut canvas, Point::ZERO, Point::new(20.0, 20.0));
        canvas.pointer_down(Point::ZERO, None);
        canvas.pointer_move(Point::new(50.0, 50.0));
        assert!(canvas.undo());
        assert!(canvas.is_idle());
        assert!(canvas.objects().is_empty());
        canvas.pointer_up();
        assert!(canvas.objects().is_empty());
        assert!(canvas.redo());
        assert_eq!(canvas.objects().len(), 1);
    }

    #[test]
    fn test_clear_undoable() {
        let mut canvas = canvas_with(ToolKind::Circle);
        drag(&mut canvas, Point::new(50.0, 50.0), Point::new(80.0, 50.0));
        canvas.clear();
        assert!(canvas.objects().is_empty());
        assert!(canvas.undo());
        assert_eq!(canvas.objects().len(), 1);
    }

    #[test]
    fn test_set_tool_resolves_drawing() {
        let mut canvas = canvas_with(ToolKind::Highlighter);
        canvas.pointer_down(Point::ZERO, None);
        canvas.pointer_move(Point::new(30.0, 30.0));
        canvas.set_tool(ToolKind::Pen);
        assert!(canvas.is_idle());
        match &canvas.objects()[0].kind {
            DrawableKind::FreehandStroke { mode, .. } => assert_eq!(*mode, StrokeMode::Highlight),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_initial_state_not_undoable() {
        let raw = json!([{ "tool": "pen", "points": [0, 0, 10, 10] }]);
        let canvas = Canvas::from_initial_state(&raw, CanvasConfig::default());
        assert_eq!(canvas.objects().len(), 1);
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_export_excludes_transient() {
        let mut canvas = canvas_with(ToolKind::Rectangle);
        drag(&mut canvas, Point::ZERO, Point::new(20.0, 20.0));
        canvas.pointer_down(Point::ZERO, None);
        canvas.pointer_move(Point::new(60.0, 60.0));
        let doc = canvas.export(None);
        assert_eq!(doc.objects.len(), 1);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.canvas_size, CanvasSize::default());
    }

    #[test]
    fn test_history_commands_trait() {
        fn press_undo(target: &mut impl HistoryCommands) -> bool {
            target.undo()
        }
        let mut canvas = canvas_with(ToolKind::Line);
        drag(&mut canvas, Point::ZERO, Point::new(40.0, 0.0));
        assert!(press_undo(&mut canvas));
        assert!(canvas.objects().is_empty());
    }

    #[test]
    fn test_undo_shortcut_ignored_during_text_entry() {
        let mut shortcuts = KeyboardShortcuts::new();
        shortcuts.mount();
        let ctrl_z = KeyEvent::new(
            "z",
            Modifiers {
                ctrl: true,
                ..Default::default()
            },
        );

        let mut canvas = canvas_with(ToolKind::Line);
        drag(&mut canvas, Point::ZERO, Point::new(40.0, 0.0));
        canvas.set_tool(ToolKind::Text);
        canvas.pointer_down(Point::new(5.0, 5.0), None);
        assert!(canvas.is_text_editing());

        assert!(!shortcuts.handle(&ctrl_z, &mut canvas));
        assert_eq!(canvas.objects().len(), 1);
        assert!(canvas.is_text_editing());

        canvas.cancel_text();
        assert!(shortcuts.handle(&ctrl_z, &mut canvas));
        assert!(canvas.objects().is_empty());
    }
}
