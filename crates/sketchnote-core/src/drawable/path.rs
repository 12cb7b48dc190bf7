//! Outline geometry for each drawable variant.

use super::{DrawableKind, STAR_INNER_RATIO, STAR_POINTS};
use crate::geometry;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use std::f64::consts::PI;

/// Approximate glyph advance as a fraction of the font size.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

pub(super) fn outline(kind: &DrawableKind) -> BezPath {
    match kind {
        DrawableKind::FreehandStroke { points, .. } => polyline(geometry::points(points)),
        DrawableKind::Rectangle {
            x,
            y,
            width,
            height,
            ..
        } => Rect::new(*x, *y, x + width, y + height).to_path(0.1),
        DrawableKind::RegularPolygon {
            x, y, kind, radius, ..
        } => match kind.sides() {
            Some(sides) => closed(regular_polygon(Point::new(*x, *y), sides, *radius)),
            None => Circle::new(Point::new(*x, *y), *radius).to_path(0.1),
        },
        DrawableKind::Star { x, y, radius, .. } => closed(star(
            Point::new(*x, *y),
            STAR_POINTS,
            *radius,
            *radius * STAR_INNER_RATIO,
        )),
        DrawableKind::StraightSegment { x, y, end_x, end_y }
        | DrawableKind::Arrow { x, y, end_x, end_y } => {
            polyline([Point::new(*x, *y), Point::new(*end_x, *end_y)])
        }
        DrawableKind::TextLabel { .. } => bounds(kind).to_path(0.1),
        DrawableKind::Unrecognized { .. } => BezPath::new(),
    }
}

pub(super) fn bounds(kind: &DrawableKind) -> Rect {
    match kind {
        DrawableKind::FreehandStroke { points, .. } => {
            let mut iter = geometry::points(points);
            let Some(first) = iter.next() else {
                return Rect::ZERO;
            };
            iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
        }
        DrawableKind::Rectangle {
            x,
            y,
            width,
            height,
            ..
        } => Rect::new(*x, *y, x + width, y + height),
        DrawableKind::RegularPolygon { x, y, radius, .. } | DrawableKind::Star { x, y, radius, .. } => {
            Rect::new(x - radius, y - radius, x + radius, y + radius)
        }
        DrawableKind::StraightSegment { x, y, end_x, end_y }
        | DrawableKind::Arrow { x, y, end_x, end_y } => {
            Rect::from_points(Point::new(*x, *y), Point::new(*end_x, *end_y))
        }
        DrawableKind::TextLabel {
            x,
            y,
            text,
            font_size,
        } => {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            let lines = text.lines().count().max(1);
            Rect::new(
                *x,
                *y,
                x + longest as f64 * font_size * TEXT_ADVANCE_RATIO,
                y + lines as f64 * font_size,
            )
        }
        DrawableKind::Unrecognized { .. } => Rect::ZERO,
    }
}

/// Vertices of a regular polygon, first vertex straight up from the center.
pub(crate) fn regular_polygon(center: Point, sides: usize, radius: f64) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / sides as f64;
            Point::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
        })
        .collect()
}

/// Vertices of a star, alternating outer and inner radius, first tip up.
pub(crate) fn star(center: Point, tips: usize, outer: f64, inner: f64) -> Vec<Point> {
    (0..tips * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = PI * i as f64 / tips as f64;
            Point::new(center.x + r * angle.sin(), center.y - r * angle.cos())
        })
        .collect()
}

/// Triangle with its tip at `end`, pointing away from `start`.
pub(super) fn arrowhead(start: Point, end: Point, size: f64) -> Option<BezPath> {
    let dir = end - start;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return None;
    }
    let unit = dir / len;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = end - unit * size;
    let half = size / 2.0;

    let mut path = BezPath::new();
    path.move_to(end);
    path.line_to(base + normal * half);
    path.line_to(base - normal * half);
    path.close_path();
    Some(path)
}

fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.into_iter();
    if let Some(first) = iter.next() {
        path.move_to(first);
        for p in iter {
            path.line_to(p);
        }
    }
    path
}

fn closed(points: Vec<Point>) -> BezPath {
    let mut path = polyline(points);
    if !path.elements().is_empty() {
        path.close_path();
    }
    path
}
