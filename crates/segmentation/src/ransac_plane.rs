use footscan_core::PointCloud;
use rand::prelude::*;
use rand::rngs::StdRng;

/// A 3D plane model in the form `n . x + d = 0`, where `n` is a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneModel {
    pub normal: [f32; 3],
    pub d: f32,
}

impl PlaneModel {
    /// Absolute distance from a point to this plane. Assumes a unit normal.
    #[inline]
    pub fn distance_to_point(&self, point: &[f32; 3]) -> f32 {
        (self.normal[0] * point[0] + self.normal[1] * point[1] + self.normal[2] * point[2] + self.d)
            .abs()
    }
}

impl Default for PlaneModel {
    fn default() -> Self {
        Self {
            normal: [0.0, 0.0, 1.0],
            d: 0.0,
        }
    }
}

/// Fit a plane with RANSAC using a deterministic seed.
///
/// Runs the full trial schedule: `iterations` minimal 3-point samples are
/// drawn up front from a `StdRng` seeded with `seed`, each candidate is
/// scored by its inlier count under `distance_threshold`, and the
/// best-supported hypothesis over all trials wins. There is no early exit
/// and no parallel scoring, so a given `(cloud, seed)` pair always yields
/// the bit-identical model and inlier set.
pub fn ransac_plane_seeded(
    cloud: &PointCloud,
    distance_threshold: f32,
    iterations: usize,
    seed: u64,
) -> (PlaneModel, Vec<usize>) {
    let n = cloud.len();

    if n < 3 {
        return (PlaneModel::default(), Vec::new());
    }

    let points: Vec<[f32; 3]> = (0..n).map(|i| cloud.point(i)).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best_model = PlaneModel::default();
    let mut best_count = 0usize;

    for _ in 0..iterations {
        let Some((i0, i1, i2)) = sample_three_distinct(n, &mut rng) else {
            continue;
        };
        let Some(model) = fit_plane_from_three_points(&points[i0], &points[i1], &points[i2])
        else {
            continue;
        };

        let count = points
            .iter()
            .filter(|p| model.distance_to_point(p) <= distance_threshold)
            .count();

        if count > best_count {
            best_count = count;
            best_model = model;
        }
    }

    let inliers: Vec<usize> = (0..n)
        .filter(|&j| best_model.distance_to_point(&points[j]) <= distance_threshold)
        .collect();

    (best_model, inliers)
}

/// Sample 3 distinct indices in `[0, n)`.
fn sample_three_distinct(n: usize, rng: &mut StdRng) -> Option<(usize, usize, usize)> {
    if n < 3 {
        return None;
    }
    let i0 = rng.gen_range(0..n);
    let mut i1 = rng.gen_range(0..n);
    let mut attempts = 0;
    while i1 == i0 {
        if attempts > 100 {
            return None;
        }
        i1 = rng.gen_range(0..n);
        attempts += 1;
    }
    let mut i2 = rng.gen_range(0..n);
    attempts = 0;
    while i2 == i0 || i2 == i1 {
        if attempts > 100 {
            return None;
        }
        i2 = rng.gen_range(0..n);
        attempts += 1;
    }
    Some((i0, i1, i2))
}

/// Fit a plane through 3 points; `None` if they are collinear.
fn fit_plane_from_three_points(p0: &[f32; 3], p1: &[f32; 3], p2: &[f32; 3]) -> Option<PlaneModel> {
    let v1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
    let v2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];

    let nx = v1[1] * v2[2] - v1[2] * v2[1];
    let ny = v1[2] * v2[0] - v1[0] * v2[2];
    let nz = v1[0] * v2[1] - v1[1] * v2[0];

    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len < 1e-10 {
        return None;
    }

    let normal = [nx / len, ny / len, nz / len];
    let d = -(normal[0] * p0[0] + normal[1] * p0[1] + normal[2] * p0[2]);

    Some(PlaneModel { normal, d })
}
