//! Stored JSON shape of a drawable.
//!
//! Stored notes use a flat object with a `type` discriminator per tool
//! (`line`, `highlighter`, `eraser`, `circle`, `straightLine`, ...). The
//! in-memory model groups those into tool families; this module maps
//! between the two. Objects with an `id` and a `type` that still cannot
//! be read are carried as [`DrawableKind::Unrecognized`] and written back
//! untouched.

use super::{CssColor, Drawable, DrawableId, DrawableKind, DrawableStyle, PolygonKind, StrokeMode, DEFAULT_FONT_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors converting a stored object into a [`Drawable`].
#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("unknown drawable type: {0}")]
    UnknownType(String),
    #[error("{kind} is missing required field `{field}`")]
    MissingField { kind: String, field: &'static str },
    #[error("stored drawable needs both `id` and `type`")]
    Untagged,
}

/// Serialized form: a typed object, or an unreadable one as it was stored.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub(crate) enum StoredDrawable {
    Known(WireDrawable),
    Raw(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDrawable {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl WireDrawable {
    fn fill(&self) -> Option<CssColor> {
        self.fill.clone().map(CssColor::new).and_then(CssColor::into_fill)
    }

    fn origin(&self) -> (f64, f64) {
        (self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    fn end(&self) -> (f64, f64) {
        let (x, y) = self.origin();
        (self.end_x.unwrap_or(x), self.end_y.unwrap_or(y))
    }
}

impl TryFrom<WireDrawable> for Drawable {
    type Error = WireError;

    fn try_from(wire: WireDrawable) -> Result<Self, Self::Error> {
        let (x, y) = wire.origin();
        let polygon = |kind| DrawableKind::RegularPolygon {
            x,
            y,
            kind,
            radius: wire.radius.unwrap_or(0.0),
            fill: wire.fill(),
        };
        let freehand = |mode| DrawableKind::FreehandStroke {
            points: wire.points.clone().unwrap_or_default(),
            mode,
        };

        let kind = match wire.kind.as_str() {
            "line" => freehand(StrokeMode::Ink),
            "highlighter" => freehand(StrokeMode::Highlight),
            "eraser" => freehand(StrokeMode::Erase),
            "rectangle" => DrawableKind::Rectangle {
                x,
                y,
                width: wire.width.unwrap_or(0.0),
                height: wire.height.unwrap_or(0.0),
                fill: wire.fill(),
            },
            "circle" => polygon(PolygonKind::Circle),
            "triangle" => polygon(PolygonKind::Triangle),
            "diamond" => polygon(PolygonKind::Diamond),
            "hexagon" => polygon(PolygonKind::Hexagon),
            "star" => DrawableKind::Star {
                x,
                y,
                radius: wire.radius.unwrap_or(0.0),
                fill: wire.fill(),
            },
            "straightLine" => {
                let (end_x, end_y) = wire.end();
                DrawableKind::StraightSegment { x, y, end_x, end_y }
            }
            "arrow" => {
                let (end_x, end_y) = wire.end();
                DrawableKind::Arrow { x, y, end_x, end_y }
            }
            "text" => DrawableKind::TextLabel {
                x,
                y,
                text: wire.text.clone().ok_or_else(|| WireError::MissingField {
                    kind: wire.kind.clone(),
                    field: "text",
                })?,
                font_size: wire.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            },
            other => return Err(WireError::UnknownType(other.to_string())),
        };

        let defaults = DrawableStyle::default();
        let style = DrawableStyle {
            stroke_color: wire.stroke.map(CssColor::new).unwrap_or(defaults.stroke_color),
            stroke_width: wire.stroke_width.unwrap_or(defaults.stroke_width),
            opacity: wire.opacity.unwrap_or(defaults.opacity),
        };

        Ok(Drawable::reconstruct(DrawableId::from(wire.id), style, kind))
    }
}

impl TryFrom<Value> for Drawable {
    type Error = WireError;

    /// Read a stored object. Numeric ids are kept in their decimal form.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let id = match value.get("id") {
            None | Some(Value::Null) => return Err(WireError::Untagged),
            Some(Value::String(s)) if s.is_empty() => return Err(WireError::Untagged),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        if value.get("type").is_none_or(Value::is_null) {
            return Err(WireError::Untagged);
        }

        let mut typed = value.clone();
        if let Some(object) = typed.as_object_mut() {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        let read = serde_json::from_value::<WireDrawable>(typed)
            .map_err(|e| e.to_string())
            .and_then(|wire| Drawable::try_from(wire).map_err(|e| e.to_string()));

        match read {
            Ok(drawable) => Ok(drawable),
            Err(e) => {
                log::warn!("Keeping unreadable drawable {} as stored: {}", id, e);
                Ok(Drawable::reconstruct(
                    DrawableId::from(id),
                    DrawableStyle::default(),
                    DrawableKind::Unrecognized { raw: value },
                ))
            }
        }
    }
}

impl From<Drawable> for StoredDrawable {
    fn from(drawable: Drawable) -> Self {
        let Drawable { id, style, kind } = drawable;
        let mut wire = WireDrawable {
            id: id.0,
            stroke: Some(style.stroke_color.0),
            stroke_width: Some(style.stroke_width),
            opacity: Some(style.opacity),
            ..Default::default()
        };

        let type_name = match kind {
            DrawableKind::FreehandStroke { points, mode } => {
                wire.points = Some(points);
                match mode {
                    StrokeMode::Ink => "line",
                    StrokeMode::Highlight => "highlighter",
                    StrokeMode::Erase => "eraser",
                }
            }
            DrawableKind::Rectangle {
                x,
                y,
                width,
                height,
                fill,
            } => {
                wire.set_origin(x, y);
                wire.width = Some(width);
                wire.height = Some(height);
                wire.fill = fill.map(|c| c.0);
                "rectangle"
            }
            DrawableKind::RegularPolygon {
                x,
                y,
                kind,
                radius,
                fill,
            } => {
                wire.set_origin(x, y);
                wire.radius = Some(radius);
                wire.fill = fill.map(|c| c.0);
                match kind {
                    PolygonKind::Circle => "circle",
                    PolygonKind::Triangle => "triangle",
                    PolygonKind::Diamond => "diamond",
                    PolygonKind::Hexagon => "hexagon",
                }
            }
            DrawableKind::Star { x, y, radius, fill } => {
                wire.set_origin(x, y);
                wire.radius = Some(radius);
                wire.fill = fill.map(|c| c.0);
                "star"
            }
            DrawableKind::StraightSegment { x, y, end_x, end_y } => {
                wire.set_origin(x, y);
                wire.end_x = Some(end_x);
                wire.end_y = Some(end_y);
                "straightLine"
            }
            DrawableKind::Arrow { x, y, end_x, end_y } => {
                wire.set_origin(x, y);
                wire.end_x = Some(end_x);
                wire.end_y = Some(end_y);
                "arrow"
            }
            DrawableKind::TextLabel {
                x,
                y,
                text,
                font_size,
            } => {
                wire.set_origin(x, y);
                wire.text = Some(text);
                wire.font_size = Some(font_size);
                "text"
            }
            DrawableKind::Unrecognized { raw } => return StoredDrawable::Raw(raw),
        };
        wire.kind = type_name.to_string();
        StoredDrawable::Known(wire)
    }
}

impl WireDrawable {
    fn set_origin(&mut self, x: f64, y: f64) {
        self.x = Some(x);
        self.y = Some(y);
    }
}
