//! Drawable object model.
//!
//! A [`Drawable`] is one committed vector object on the canvas. Every
//! drawable carries an id and a [`DrawableStyle`]; the geometry lives in the
//! closed [`DrawableKind`] enum so that every dispatch site is an exhaustive
//! match.

mod path;
mod wire;

pub use wire::WireError;

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default font size for text labels.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Opacity forced onto highlighter strokes.
pub const HIGHLIGHT_OPACITY: f64 = 0.4;

/// Inner radius of a star as a fraction of its outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;

/// Number of points on a star.
pub const STAR_POINTS: usize = 5;

/// Arrowhead length and width in canvas pixels.
pub const ARROWHEAD_SIZE: f64 = 10.0;

/// Unique identifier for drawables.
///
/// Freshly generated ids are time-ordered UUIDv7 strings. Ids read from
/// stored documents are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawableId(String);

impl DrawableId {
    /// Generate a new process-unique id. Later calls sort after earlier ones.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DrawableId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DrawableId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A CSS color string ("black", "#ff6b6b", "transparent", ...).
///
/// Colors are kept in their textual form so stored documents round-trip
/// untouched; renderers parse them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssColor(String);

impl CssColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn black() -> Self {
        Self::new("black")
    }

    pub fn transparent() -> Self {
        Self::new("transparent")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this color paints nothing.
    pub fn is_transparent(&self) -> bool {
        let value = self.0.trim();
        value.is_empty() || value.eq_ignore_ascii_case("transparent")
    }

    /// Normalize a fill: transparent fills become `None`.
    pub fn into_fill(self) -> Option<CssColor> {
        (!self.is_transparent()).then_some(self)
    }
}

impl Default for CssColor {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Style shared by every drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableStyle {
    /// Stroke color. Text labels use it as their fill.
    pub stroke_color: CssColor,
    /// Stroke width, positive.
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
}

impl Default for DrawableStyle {
    fn default() -> Self {
        Self {
            stroke_color: CssColor::black(),
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// How a freehand stroke composites with prior content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrokeMode {
    #[default]
    Ink,
    Highlight,
    Erase,
}

/// Compositing operation for rendering a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Paint over prior content.
    Normal,
    /// Subtract from prior content (destination-out).
    Erase,
}

/// Regular polygon families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonKind {
    /// Dedicated circle primitive; `radius` is the circle radius.
    Circle,
    Triangle,
    Diamond,
    Hexagon,
}

impl PolygonKind {
    /// Number of sides, `None` for the circle.
    pub fn sides(self) -> Option<usize> {
        match self {
            PolygonKind::Circle => None,
            PolygonKind::Triangle => Some(3),
            PolygonKind::Diamond => Some(4),
            PolygonKind::Hexagon => Some(6),
        }
    }
}

/// Geometry of a drawable, one variant per tool family.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    FreehandStroke {
        /// Flat `[x0, y0, x1, y1, ...]` sequence.
        points: Vec<f64>,
        mode: StrokeMode,
    },
    Rectangle {
        /// Top-left corner.
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<CssColor>,
    },
    RegularPolygon {
        /// Center.
        x: f64,
        y: f64,
        kind: PolygonKind,
        radius: f64,
        fill: Option<CssColor>,
    },
    Star {
        /// Center.
        x: f64,
        y: f64,
        /// Outer radius.
        radius: f64,
        fill: Option<CssColor>,
    },
    StraightSegment {
        x: f64,
        y: f64,
        end_x: f64,
        end_y: f64,
    },
    Arrow {
        x: f64,
        y: f64,
        end_x: f64,
        end_y: f64,
    },
    TextLabel {
        /// Top-left anchor.
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
    },
    /// A stored object of a type or shape this version cannot read. Kept
    /// verbatim so it is written back on the next export; never drawn.
    Unrecognized { raw: serde_json::Value },
}

/// One committed vector object.
///
/// Once a drawable is in a history snapshot it is never mutated; edits build
/// a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "wire::StoredDrawable")]
pub struct Drawable {
    pub(crate) id: DrawableId,
    pub style: DrawableStyle,
    pub kind: DrawableKind,
}

impl Drawable {
    /// Create a drawable with a freshly generated id.
    pub fn new(style: DrawableStyle, kind: DrawableKind) -> Self {
        Self {
            id: DrawableId::generate(),
            style,
            kind,
        }
    }

    /// Reconstruct a drawable with a known id (for storage).
    pub(crate) fn reconstruct(id: DrawableId, style: DrawableStyle, kind: DrawableKind) -> Self {
        Self { id, style, kind }
    }

    pub fn id(&self) -> &DrawableId {
        &self.id
    }

    /// Fill color, only ever present on closed shapes.
    pub fn fill(&self) -> Option<&CssColor> {
        match &self.kind {
            DrawableKind::Rectangle { fill, .. }
            | DrawableKind::RegularPolygon { fill, .. }
            | DrawableKind::Star { fill, .. } => fill.as_ref(),
            DrawableKind::FreehandStroke { .. }
            | DrawableKind::StraightSegment { .. }
            | DrawableKind::Arrow { .. }
            | DrawableKind::TextLabel { .. }
            | DrawableKind::Unrecognized { .. } => None,
        }
    }

    /// Compositing operation for this drawable.
    pub fn blend(&self) -> Blend {
        match &self.kind {
            DrawableKind::FreehandStroke {
                mode: StrokeMode::Erase,
                ..
            } => Blend::Erase,
            DrawableKind::FreehandStroke { .. }
            | DrawableKind::Rectangle { .. }
            | DrawableKind::RegularPolygon { .. }
            | DrawableKind::Star { .. }
            | DrawableKind::StraightSegment { .. }
            | DrawableKind::Arrow { .. }
            | DrawableKind::TextLabel { .. }
            | DrawableKind::Unrecognized { .. } => Blend::Normal,
        }
    }

    /// Outline path for rendering. Text labels yield their layout box.
    pub fn to_path(&self) -> BezPath {
        path::outline(&self.kind)
    }

    /// Filled arrowhead, for arrows only.
    pub fn arrowhead(&self) -> Option<BezPath> {
        match self.kind {
            DrawableKind::Arrow { x, y, end_x, end_y } => {
                path::arrowhead(Point::new(x, y), Point::new(end_x, end_y), ARROWHEAD_SIZE)
            }
            _ => None,
        }
    }
}
