//! Point-sequence geometry for freehand strokes.
//!
//! Stroke points are stored flat (`[x0, y0, x1, y1, ...]`), the same layout
//! used by the stored document format.

use kurbo::Point;

/// Default simplification tolerance in canvas pixels.
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Squared distance from `point` to the segment `a`→`b`.
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearest endpoint.
pub fn point_to_segment_dist_sq(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    let mut nearest = a;
    if len_sq > 0.0 {
        let t = (point - a).dot(seg) / len_sq;
        if t > 1.0 {
            nearest = b;
        } else if t > 0.0 {
            nearest = a + seg * t;
        }
    }
    (point - nearest).hypot2()
}

/// Number of complete `(x, y)` pairs in a flat coordinate sequence.
pub fn point_count(flat: &[f64]) -> usize {
    flat.len() / 2
}

/// Iterate a flat coordinate sequence as points. A dangling trailing
/// coordinate is ignored.
pub fn points(flat: &[f64]) -> impl Iterator<Item = Point> + '_ {
    flat.chunks_exact(2).map(|c| Point::new(c[0], c[1]))
}

/// First point of a flat sequence.
pub fn first_point(flat: &[f64]) -> Option<Point> {
    points(flat).next()
}

/// Last complete point of a flat sequence.
pub fn last_point(flat: &[f64]) -> Option<Point> {
    let n = point_count(flat);
    (n > 0).then(|| Point::new(flat[2 * n - 2], flat[2 * n - 1]))
}

/// Simplify a flat point sequence with Ramer-Douglas-Peucker.
///
/// Sequences of two points or fewer (four numbers or fewer) are returned as
/// is. Otherwise the first and last points are always kept, and every
/// discarded point lies within `tolerance` of the retained polyline.
pub fn simplify(flat: &[f64], tolerance: f64) -> Vec<f64> {
    if flat.len() <= 4 {
        return flat.to_vec();
    }

    let pts: Vec<Point> = points(flat).collect();
    if pts.len() < 2 {
        return flat.to_vec();
    }

    let sq_tolerance = tolerance * tolerance;
    let last = pts.len() - 1;
    let mut keep = Vec::with_capacity(pts.len());
    keep.push(0);
    simplify_step(&pts, 0, last, sq_tolerance, &mut keep);
    keep.push(last);

    keep.into_iter()
        .flat_map(|i| [pts[i].x, pts[i].y])
        .collect()
}

/// Recursive step: keep the farthest point between `first` and `last` if it
/// exceeds the tolerance, then recurse on both halves. Indices are pushed in
/// ascending order.
fn simplify_step(pts: &[Point], first: usize, last: usize, sq_tolerance: f64, keep: &mut Vec<usize>) {
    let mut max_sq_dist = sq_tolerance;
    let mut index = None;

    for (i, point) in pts.iter().enumerate().take(last).skip(first + 1) {
        let sq_dist = point_to_segment_dist_sq(*point, pts[first], pts[last]);
        if sq_dist > max_sq_dist {
            index = Some(i);
            max_sq_dist = sq_dist;
        }
    }

    if let Some(index) = index {
        if index - first > 1 {
            simplify_step(pts, first, index, sq_tolerance, keep);
        }
        keep.push(index);
        if last - index > 1 {
            simplify_step(pts, index, last, sq_tolerance, keep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .flat_map(|i| {
                let y = if i % 2 == 0 { 0.0 } else { amplitude };
                [i as f64 * 10.0, y]
            })
            .collect()
    }

    #[test]
    fn test_short_input_unchanged() {
        assert_eq!(simplify(&[], 2.0), Vec::<f64>::new());
        assert_eq!(simplify(&[1.0, 2.0], 2.0), vec![1.0, 2.0]);
        assert_eq!(simplify(&[1.0, 2.0, 3.0, 4.0], 2.0), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_collinear_collapses_to_endpoints() {
        let line: Vec<f64> = (0..=90).flat_map(|i| [10.0, 10.0 + i as f64]).collect();
        let simplified = simplify(&line, DEFAULT_TOLERANCE);
        assert_eq!(simplified, vec![10.0, 10.0, 10.0, 100.0]);
    }

    #[test]
    fn test_keeps_significant_corners() {
        let flat = vec![0.0, 0.0, 50.0, 0.0, 50.0, 50.0];
        let simplified = simplify(&flat, DEFAULT_TOLERANCE);
        assert_eq!(simplified, flat);
    }

    #[test]
    fn test_small_noise_removed() {
        let flat = zigzag(9, 0.5);
        let simplified = simplify(&flat, DEFAULT_TOLERANCE);
        assert_eq!(simplified, vec![0.0, 0.0, 80.0, 0.0]);
    }

    #[test]
    fn test_large_zigzag_kept() {
        let flat = zigzag(7, 20.0);
        let simplified = simplify(&flat, DEFAULT_TOLERANCE);
        assert_eq!(simplified, flat);
    }

    #[test]
    fn test_endpoints_always_preserved() {
        let flat: Vec<f64> = (0..40)
            .flat_map(|i| {
                let t = i as f64 * 0.3;
                [t.cos() * 40.0 + 3.0, t.sin() * 25.0 - 7.0]
            })
            .collect();
        let simplified = simplify(&flat, DEFAULT_TOLERANCE);
        assert_eq!(first_point(&simplified), first_point(&flat));
        assert_eq!(last_point(&simplified), last_point(&flat));
    }

    #[test]
    fn test_discarded_points_within_tolerance() {
        let flat: Vec<f64> = (0..60)
            .flat_map(|i| {
                let t = i as f64 * 0.15;
                [i as f64 * 3.0, (t * 2.0).sin() * 12.0]
            })
            .collect();
        let tolerance = 1.5;
        let simplified = simplify(&flat, tolerance);
        let kept: Vec<Point> = points(&simplified).collect();
        for p in points(&flat) {
            let nearest = kept
                .windows(2)
                .map(|w| point_to_segment_dist_sq(p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest.sqrt() <= tolerance + 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let flat = zigzag(25, 3.3);
        assert_eq!(simplify(&flat, 2.0), simplify(&flat, 2.0));
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist_sq(Point::new(5.0, 3.0), a, b) - 9.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist_sq(Point::new(13.0, 4.0), a, b) - 25.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist_sq(Point::new(3.0, 4.0), a, a) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_odd_length_ignores_dangling_coordinate() {
        let flat = vec![0.0, 0.0, 5.0, 0.1, 10.0, 0.0, 99.0];
        assert_eq!(simplify(&flat, 2.0), vec![0.0, 0.0, 10.0, 0.0]);
        assert_eq!(last_point(&flat), Some(Point::new(10.0, 0.0)));
    }
}
