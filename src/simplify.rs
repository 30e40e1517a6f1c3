//! Tolerance-based reduction of closed boundaries.
//!
//! The ring is cut at a pair of far-apart vertices and each half is reduced
//! with Douglas-Peucker against the chord joining its ends. The tolerance
//! grows with the perimeter.

use imageproc::geometry::approximate_polygon_dp;
use tracing::{debug, trace};

use crate::contour::{Boundary, ContourTree, MIN_BOUNDARY_POINTS};
use crate::geometry::{Point, to_imageproc};

/// Smallest tolerance ever used, in pixels.
pub const MIN_EPSILON: f64 = 1.0;
/// Tolerance as a fraction of the boundary perimeter.
pub const PERIMETER_RATIO: f64 = 0.01;

/// Rounds of the far-pair search that picks where the ring is cut.
const SPLIT_SEARCH_ROUNDS: usize = 3;

/// Tolerance for a boundary with the given perimeter.
pub fn tolerance(perimeter: f64) -> f64 {
    MIN_EPSILON.max(PERIMETER_RATIO * perimeter)
}

/// What the simplifier did to one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifyOutcome {
    /// Simplification disabled; points passed through.
    Kept,
    /// Points reduced from `from` to `to`.
    Reduced { from: usize, to: usize },
    /// Reduction would drop below three points; the original was kept.
    Collapsed { points: usize },
}

/// Totals over a whole contour tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    pub points_before: usize,
    pub points_after: usize,
    pub collapsed: usize,
}

impl SimplifyStats {
    fn record(&mut self, outcome: SimplifyOutcome) {
        match outcome {
            SimplifyOutcome::Kept => {}
            SimplifyOutcome::Reduced { from, to } => {
                self.points_before += from;
                self.points_after += to;
            }
            SimplifyOutcome::Collapsed { points } => {
                self.points_before += points;
                self.points_after += points;
                self.collapsed += 1;
            }
        }
    }
}

/// Find where to cut the ring: starting at vertex 0, jump to the farthest
/// vertex a few times. Returns the cut start, its offset to the far vertex
/// along the ring, and the squared distance between them.
fn split_points(points: &[Point]) -> (usize, usize, f64) {
    let n = points.len();
    let (mut start, mut offset, mut reach) = (0, 0, 0.0);
    for _ in 0..SPLIT_SEARCH_ROUNDS {
        start = (start + offset) % n;
        offset = 0;
        reach = 0.0;
        for k in 1..n {
            let d = points[start].distance_squared(points[(start + k) % n]);
            if d > reach {
                offset = k;
                reach = d;
            }
        }
    }
    (start, offset, reach)
}

/// Douglas-Peucker over a closed ring.
///
/// The result follows ring order and starts at the vertex chosen as the cut.
/// A ring that fits within `epsilon` of a single vertex reduces to that vertex.
pub fn douglas_peucker_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let (start, offset, reach) = split_points(points);
    if reach <= epsilon * epsilon {
        return vec![points[start]];
    }

    // rotated and closed: `ring[0] == ring[n]`
    let ring: Vec<Point> = (0..=n).map(|k| points[(start + k) % n]).collect();
    let ring = to_imageproc(&ring);
    let mut reduced = approximate_polygon_dp(&ring[..=offset], epsilon, false);
    let mut rest = approximate_polygon_dp(&ring[offset..], epsilon, false);
    reduced.pop();
    rest.pop();
    reduced.extend(rest);
    reduced.into_iter().map(Point::from).collect()
}

/// Simplify one boundary, falling back to its original points if the
/// result would not describe a closed shape.
pub fn simplify_boundary(boundary: &Boundary, enabled: bool) -> (Vec<Point>, SimplifyOutcome) {
    let points = boundary.points();
    if !enabled {
        return (points.to_vec(), SimplifyOutcome::Kept);
    }

    let epsilon = tolerance(boundary.perimeter());
    let reduced = douglas_peucker_closed(points, epsilon);
    if reduced.len() < MIN_BOUNDARY_POINTS {
        trace!(
            points = points.len(),
            reduced = reduced.len(),
            epsilon,
            "simplification collapsed, keeping original"
        );
        return (
            points.to_vec(),
            SimplifyOutcome::Collapsed {
                points: points.len(),
            },
        );
    }

    let outcome = SimplifyOutcome::Reduced {
        from: points.len(),
        to: reduced.len(),
    };
    (reduced, outcome)
}

/// Simplify every boundary of the tree in place; the hierarchy is untouched.
pub fn simplify_tree(tree: ContourTree, enabled: bool) -> (ContourTree, SimplifyStats) {
    let mut stats = SimplifyStats::default();
    let tree = tree.map_points(|_, boundary| {
        let (points, outcome) = simplify_boundary(boundary, enabled);
        stats.record(outcome);
        points
    });
    if enabled {
        debug!(
            before = stats.points_before,
            after = stats.points_after,
            collapsed = stats.collapsed,
            "boundaries simplified"
        );
    }
    (tree, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::config::ChainApproximation;
    use crate::contour::{BorderType, trace_contours};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn outer(points: Vec<Point>) -> Boundary {
        Boundary::new(points, BorderType::Outer, None, 0)
    }

    mod unit {
        use super::*;

        #[test]
        fn tolerance_has_floor_of_one_pixel() {
            assert_eq!(tolerance(0.0), 1.0);
            assert_eq!(tolerance(50.0), 1.0);
            assert!((tolerance(400.0) - 4.0).abs() < 1e-12);
        }

        #[test]
        fn collinear_points_are_removed() {
            let square = pts(&[
                (0.0, 0.0),
                (5.0, 0.0),
                (10.0, 0.0),
                (10.0, 5.0),
                (10.0, 10.0),
                (5.0, 10.0),
                (0.0, 10.0),
                (0.0, 5.0),
            ]);
            let reduced = douglas_peucker_closed(&square, 1.0);
            assert_eq!(
                reduced,
                pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            );
        }

        #[test]
        fn cut_corners_of_a_hole_are_removed() {
            let octagon = pts(&[
                (14.0, 15.0),
                (15.0, 14.0),
                (24.0, 14.0),
                (25.0, 15.0),
                (25.0, 24.0),
                (24.0, 25.0),
                (15.0, 25.0),
                (14.0, 24.0),
            ]);
            let (points, outcome) = simplify_boundary(&outer(octagon), true);
            assert_eq!(
                points,
                pts(&[(14.0, 15.0), (24.0, 14.0), (25.0, 24.0), (15.0, 25.0)])
            );
            assert_eq!(outcome, SimplifyOutcome::Reduced { from: 8, to: 4 });
        }

        #[test]
        fn sliver_collapse_reverts_to_original() {
            let sliver = pts(&[(0.0, 0.0), (10.0, 0.5), (20.0, 0.0)]);
            let (points, outcome) = simplify_boundary(&outer(sliver.clone()), true);
            assert_eq!(points, sliver);
            assert_eq!(outcome, SimplifyOutcome::Collapsed { points: 3 });
        }

        #[test]
        fn disabled_passes_through() {
            let ring = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
            let (points, outcome) = simplify_boundary(&outer(ring.clone()), false);
            assert_eq!(points, ring);
            assert_eq!(outcome, SimplifyOutcome::Kept);
        }

        #[test]
        fn cut_starts_at_far_pair() {
            // vertex 0 is not an end of the far pair, so the result is rotated
            let ring = pts(&[(5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
            let reduced = douglas_peucker_closed(&ring, 1.0);
            assert_eq!(
                reduced,
                pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            );
        }

        #[test]
        fn tiny_ring_reduces_to_one_vertex() {
            let ring = pts(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
            assert_eq!(douglas_peucker_closed(&ring, 1.0).len(), 1);
        }

        #[test]
        fn last_vertex_survives_when_it_is_a_corner() {
            // a plain polygon pass that always drops the closing vertex would lose (79, 20)
            let square = pts(&[(20.0, 20.0), (20.0, 79.0), (79.0, 79.0), (79.0, 20.0)]);
            let (points, outcome) = simplify_boundary(&outer(square.clone()), true);
            assert_eq!(points, square);
            assert_eq!(outcome, SimplifyOutcome::Reduced { from: 4, to: 4 });
        }

        #[test]
        fn short_input_is_returned_as_is() {
            let two = pts(&[(0.0, 0.0), (3.0, 3.0)]);
            assert_eq!(douglas_peucker_closed(&two, 1.0), two);
        }

        #[test]
        fn stats_count_collapses() {
            let tree = trace_contours(
                &Bitmap::from_fn(12, 12, |x, y| (2..10).contains(&x) && (2..10).contains(&y)),
                ChainApproximation::None,
            );
            let (simplified, stats) = simplify_tree(tree, true);
            assert_eq!(simplified.boundaries()[0].len(), 4);
            assert_eq!(stats.points_before, 28);
            assert_eq!(stats.points_after, 4);
            assert_eq!(stats.collapsed, 0);
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        /// Whether `points` is a subsequence of `source` read around the ring
        /// from one of the occurrences of its first point.
        fn follows_ring(source: &[Point], points: &[Point]) -> bool {
            let n = source.len();
            (0..n).filter(|&s| source[s] == points[0]).any(|s| {
                let mut around = (0..n).map(|k| source[(s + k) % n]);
                points.iter().all(|p| around.any(|q| q == *p))
            })
        }

        fn traced() -> impl Strategy<Value = ContourTree> {
            (3u32..24, 3u32..24, proptest::collection::vec(proptest::bool::ANY, 576)).prop_map(
                |(w, h, bits)| {
                    let bitmap = Bitmap::from_fn(w, h, |x, y| bits[(y * 24 + x) as usize]);
                    trace_contours(&bitmap, ChainApproximation::None)
                },
            )
        }

        proptest! {
            /// simplify_boundary: never below three points, never more points
            #[test]
            fn point_floor_holds(tree in traced()) {
                for boundary in tree.boundaries() {
                    let (points, _) = simplify_boundary(boundary, true);
                    prop_assert!(points.len() >= MIN_BOUNDARY_POINTS);
                    prop_assert!(points.len() <= boundary.len());
                }
            }

            /// simplify_boundary: kept points follow the ring order of the input
            #[test]
            fn output_follows_ring_order(tree in traced()) {
                for boundary in tree.boundaries() {
                    let (points, _) = simplify_boundary(boundary, true);
                    prop_assert!(follows_ring(boundary.points(), &points));
                }
            }

            /// simplify_tree: disabling leaves every boundary unchanged
            #[test]
            fn disabled_is_identity(tree in traced()) {
                let (same, stats) = simplify_tree(tree.clone(), false);
                prop_assert_eq!(same, tree);
                prop_assert_eq!(stats, SimplifyStats::default());
            }

            /// simplify_tree: rings stay closed after simplification
            #[test]
            fn rings_stay_closed(tree in traced()) {
                let (simplified, _) = simplify_tree(tree, true);
                for boundary in simplified.boundaries() {
                    let ring: Vec<Point> = boundary.ring().collect();
                    prop_assert_eq!(ring.first(), ring.last());
                }
            }
        }
    }
}
