/// 2-D convex hull by Andrew's monotone chain, counter-clockwise order.
///
/// Collinear points on the boundary are dropped. Fewer than 3 distinct
/// input points come back as-is (sorted, deduplicated).
pub fn convex_hull(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut sorted: Vec<[f64; 2]> = points.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<[f64; 2]> = Vec::with_capacity(sorted.len() * 2);

    // Lower chain
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // The last point repeats the first
    hull.pop();
    hull
}

/// Perimeter of a polygon given as an ordered vertex loop, wrap-around edge
/// included. Fewer than 2 vertices have no length.
pub fn polygon_perimeter(vertices: &[[f64; 2]]) -> f64 {
    if vertices.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        total += ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
    }
    total
}

/// Cross product z component of (b - a) x (c - a). Positive for a left turn.
#[inline]
fn cross(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

#[cfg(test)]
mod tests {
    use super::{convex_hull, polygon_perimeter};
    use proptest::prelude::*;

    #[test]
    fn unit_square_hull() {
        let points = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.5, 0.5],
            [0.25, 0.75],
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!((polygon_perimeter(&hull) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_collapse_to_a_segment() {
        let points: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 2.0 * i as f64]).collect();
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 2);
        // Out and back along the segment
        let expected = 2.0 * (81.0f64 + 324.0).sqrt();
        assert!((polygon_perimeter(&hull) - expected).abs() < 1e-9);
    }

    #[test]
    fn triangle_keeps_its_vertices() {
        let points = vec![[0.0, 0.0], [4.0, 0.0], [0.0, 3.0], [1.0, 1.0]];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 3);
        assert!((polygon_perimeter(&hull) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[[1.0, 2.0]]).len(), 1);
        assert_eq!(polygon_perimeter(&[]), 0.0);
        assert_eq!(polygon_perimeter(&[[1.0, 1.0]]), 0.0);

        // Duplicates of a single point collapse to it
        let hull = convex_hull(&[[3.0, 3.0], [3.0, 3.0], [3.0, 3.0]]);
        assert_eq!(hull, vec![[3.0, 3.0]]);
    }

    proptest! {
        #[test]
        fn hull_contains_all_points(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..60)
        ) {
            let pts: Vec<[f64; 2]> = points.iter().map(|&(a, b)| [a, b]).collect();
            let hull = convex_hull(&pts);
            prop_assume!(hull.len() >= 3);

            // Every input point lies on or inside the hull: no right turn
            // from any hull edge to it.
            for p in &pts {
                for i in 0..hull.len() {
                    let a = hull[i];
                    let b = hull[(i + 1) % hull.len()];
                    let cr = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
                    prop_assert!(cr >= -1e-6, "point {:?} outside edge {:?}->{:?}", p, a, b);
                }
            }
        }

        #[test]
        fn hull_perimeter_never_exceeds_input_loop(
            points in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 3..40)
        ) {
            let pts: Vec<[f64; 2]> = points.iter().map(|&(a, b)| [a, b]).collect();
            let hull = convex_hull(&pts);
            // The convex hull is the shortest closed curve enclosing the
            // points, so any polygon visiting all of them is at least as long.
            let hull_perimeter = polygon_perimeter(&hull);
            let loop_perimeter = polygon_perimeter(&pts);
            if hull.len() >= 3 && pts.len() > hull.len() {
                prop_assert!(hull_perimeter <= loop_perimeter + 1e-9);
            }
        }
    }
}
