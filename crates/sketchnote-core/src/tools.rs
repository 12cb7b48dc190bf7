//! Drawing tools and the in-progress object builder.

use crate::drawable::{
    CssColor, Drawable, DrawableKind, DrawableStyle, HIGHLIGHT_OPACITY, PolygonKind, StrokeMode,
};
use crate::geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pressure assumed when the device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Rectangle,
    Circle,
    Triangle,
    Diamond,
    Hexagon,
    Star,
    Line,
    Arrow,
    Text,
}

impl ToolKind {
    /// Closed shapes, the only tools a fill color applies to.
    pub fn supports_fill(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Triangle
                | ToolKind::Diamond
                | ToolKind::Hexagon
                | ToolKind::Star
        )
    }
}

/// Current tool and the style applied to new drawables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub stroke_color: CssColor,
    /// Applied to closed shapes only.
    pub fill_color: CssColor,
    /// Base stroke width before pressure and tool adjustments.
    pub stroke_width: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            stroke_color: CssColor::black(),
            fill_color: CssColor::transparent(),
            stroke_width: 3.0,
        }
    }
}

impl ToolSettings {
    /// Stroke width and opacity for a new drawable of the current tool.
    ///
    /// Pressure in `(0, 1]` scales the width by `0.5 + pressure`; anything
    /// else counts as the default pressure, a multiplier of 1. Highlighter
    /// and eraser ignore pressure and use twice the base width.
    pub fn style_for(&self, pressure: Option<f64>) -> DrawableStyle {
        let pressure = pressure
            .filter(|p| *p > 0.0 && *p <= 1.0)
            .unwrap_or(DEFAULT_PRESSURE);

        let (stroke_width, opacity) = match self.tool {
            ToolKind::Highlighter => (self.stroke_width * 2.0, HIGHLIGHT_OPACITY),
            ToolKind::Eraser => (self.stroke_width * 2.0, 1.0),
            _ => (self.stroke_width * (0.5 + pressure), 1.0),
        };

        DrawableStyle {
            stroke_color: self.stroke_color.clone(),
            stroke_width,
            opacity,
        }
    }

    fn fill(&self) -> Option<CssColor> {
        if self.tool.supports_fill() {
            self.fill_color.clone().into_fill()
        } else {
            None
        }
    }
}

/// Thresholds applied when a builder is finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitRules {
    pub simplify_tolerance: f64,
    /// Shapes must exceed this size to be kept.
    pub min_shape_size: f64,
}

impl Default for CommitRules {
    fn default() -> Self {
        Self {
            simplify_tolerance: geometry::DEFAULT_TOLERANCE,
            min_shape_size: 5.0,
        }
    }
}

/// A drawable under construction during a drag.
///
/// The builder owns its preview exclusively; [`DrawableBuilder::finish`]
/// consumes it and is the only way a committed [`Drawable`] comes out.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableBuilder {
    start: Point,
    preview: Drawable,
}

impl DrawableBuilder {
    /// Seed a builder at the first pointer position. Returns `None` for the
    /// text tool, whose labels are created on completion instead.
    pub fn begin(settings: &ToolSettings, position: Point, pressure: Option<f64>) -> Option<Self> {
        let Point { x, y } = position;
        let fill = settings.fill();
        let radial = |kind| DrawableKind::RegularPolygon {
            x,
            y,
            kind,
            radius: 0.0,
            fill: fill.clone(),
        };
        let freehand = |mode| DrawableKind::FreehandStroke {
            points: vec![x, y],
            mode,
        };

        let kind = match settings.tool {
            ToolKind::Pen => freehand(StrokeMode::Ink),
            ToolKind::Highlighter => freehand(StrokeMode::Highlight),
            ToolKind::Eraser => freehand(StrokeMode::Erase),
            ToolKind::Rectangle => DrawableKind::Rectangle {
                x,
                y,
                width: 0.0,
                height: 0.0,
                fill: fill.clone(),
            },
            ToolKind::Circle => radial(PolygonKind::Circle),
            ToolKind::Triangle => radial(PolygonKind::Triangle),
            ToolKind::Diamond => radial(PolygonKind::Diamond),
            ToolKind::Hexagon => radial(PolygonKind::Hexagon),
            ToolKind::Star => DrawableKind::Star {
                x,
                y,
                radius: 0.0,
                fill: fill.clone(),
            },
            ToolKind::Line => DrawableKind::StraightSegment {
                x,
                y,
                end_x: x,
                end_y: y,
            },
            ToolKind::Arrow => DrawableKind::Arrow {
                x,
                y,
                end_x: x,
                end_y: y,
            },
            ToolKind::Text => return None,
        };

        Some(Self {
            start: position,
            preview: Drawable::new(settings.style_for(pressure), kind),
        })
    }

    /// The transient drawable, for rendering only.
    pub fn preview(&self) -> &Drawable {
        &self.preview
    }

    /// Follow the pointer to `position`.
    pub fn update(&mut self, position: Point) {
        let start = self.start;
        match &mut self.preview.kind {
            DrawableKind::FreehandStroke { points, .. } => {
                points.extend([position.x, position.y]);
            }
            DrawableKind::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => {
                *x = start.x.min(position.x);
                *y = start.y.min(position.y);
                *width = (position.x - start.x).abs();
                *height = (position.y - start.y).abs();
            }
            DrawableKind::RegularPolygon { radius, .. } | DrawableKind::Star { radius, .. } => {
                *radius = geometry::distance(start, position);
            }
            DrawableKind::StraightSegment { end_x, end_y, .. }
            | DrawableKind::Arrow { end_x, end_y, .. } => {
                *end_x = position.x;
                *end_y = position.y;
            }
            DrawableKind::TextLabel { .. } | DrawableKind::Unrecognized { .. } => {}
        }
    }

    /// Freeze the builder into a drawable.
    ///
    /// Freehand points are simplified first. Objects too small to be
    /// intentional yield `None`.
    pub fn finish(self, rules: &CommitRules) -> Option<Drawable> {
        let mut drawable = self.preview;
        if let DrawableKind::FreehandStroke { points, .. } = &mut drawable.kind {
            if points.len() > 4 {
                *points = geometry::simplify(points, rules.simplify_tolerance);
            }
        }
        is_meaningful(&drawable.kind, rules.min_shape_size).then_some(drawable)
    }
}

/// Whether a finished object is large enough to keep.
pub fn is_meaningful(kind: &DrawableKind, min_size: f64) -> bool {
    match kind {
        DrawableKind::FreehandStroke { points, .. } => points.len() > 2,
        DrawableKind::Rectangle { width, height, .. } => *width > min_size && *height > min_size,
        DrawableKind::RegularPolygon { radius, .. } | DrawableKind::Star { radius, .. } => *radius > min_size,
        DrawableKind::StraightSegment { x, y, end_x, end_y }
        | DrawableKind::Arrow { x, y, end_x, end_y } => {
            geometry::distance(Point::new(*x, *y), Point::new(*end_x, *end_y)) > min_size
        }
        DrawableKind::TextLabel { text, .. } => !text.trim().is_empty(),
        DrawableKind::Unrecognized { .. } => false,
    }
}
