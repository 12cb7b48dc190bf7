//! Loading of stored canvas state, including the legacy stroke format.
//!
//! Legacy documents are arrays of `{ tool, points, stroke, strokeWidth }`
//! without ids or type tags. They become ink or erase strokes.

use crate::drawable::{CssColor, Drawable, DrawableKind, DrawableStyle, StrokeMode};
use serde_json::Value;

const LEGACY_STROKE_WIDTH: f64 = 2.0;

/// Convert stored canvas state into drawables.
///
/// Anything that is not an array yields an empty collection. Elements that
/// already carry both `id` and `type` are read as current-format drawables
/// and keep their ids; everything else is treated as a legacy stroke and
/// gets a fresh id. Current-format elements that cannot be read are kept
/// as [`DrawableKind::Unrecognized`] so they survive the next export.
pub fn migrate(raw: &Value) -> Vec<Drawable> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            log::warn!("Ignoring initial canvas state that is not an array");
        }
        return Vec::new();
    };

    let mut legacy = 0usize;
    let drawables: Vec<Drawable> = items
        .iter()
        .filter_map(|item| {
            if is_current(item) {
                match serde_json::from_value::<Drawable>(item.clone()) {
                    Ok(drawable) => Some(drawable),
                    Err(e) => {
                        log::warn!("Dropping unreadable drawable: {}", e);
                        None
                    }
                }
            } else {
                legacy += 1;
                Some(migrate_legacy(item))
            }
        })
        .collect();

    if legacy > 0 {
        log::info!("Migrated {} legacy strokes", legacy);
    }
    drawables
}

/// Convert a stored document that may be either a bare drawable array or an
/// exported document envelope (`{ version, objects | lines, ... }`).
pub fn migrate_document(raw: &Value) -> Vec<Drawable> {
    match raw {
        Value::Object(map) => {
            let objects = map
                .get("objects")
                .filter(|v| v.is_array())
                .or_else(|| map.get("lines"));
            objects.map(migrate).unwrap_or_default()
        }
        other => migrate(other),
    }
}

/// Both fields must be present and truthy.
fn is_current(item: &Value) -> bool {
    truthy(item.get("id")) && truthy(item.get("type"))
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

fn migrate_legacy(item: &Value) -> Drawable {
    let mode = if item.get("tool").and_then(Value::as_str) == Some("eraser") {
        StrokeMode::Erase
    } else {
        StrokeMode::Ink
    };

    let stroke_color = item
        .get("stroke")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(CssColor::new)
        .unwrap_or_else(CssColor::black);

    let stroke_width = item
        .get("strokeWidth")
        .and_then(Value::as_f64)
        .filter(|w| *w > 0.0)
        .unwrap_or(LEGACY_STROKE_WIDTH);

    let points = item
        .get("points")
        .and_then(Value::as_array)
        .map(|pts| pts.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();

    Drawable::new(
        DrawableStyle {
            stroke_color,
            stroke_width,
            opacity: 1.0,
        },
        DrawableKind::FreehandStroke { points, mode },
    )
}
