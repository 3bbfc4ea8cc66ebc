use footscan_core::PointCloud;
use kiddo::float::distance::SquaredEuclidean;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use std::num::NonZero;

/// Spatial index over a point cloud, backing both denoising filters.
///
/// Built on kiddo's `ImmutableKdTree`: constructed once from the cloud and
/// queried read-only afterwards. Stores `u32` indices back into the cloud.
#[derive(Debug, Clone)]
pub struct KdTree {
    tree: ImmutableKdTree<f32, u32, 3, 32>,
    num_points: usize,
}

impl KdTree {
    pub fn build(cloud: &PointCloud) -> Self {
        let n = cloud.len();
        if n == 0 {
            return Self {
                tree: ImmutableKdTree::new_from_slice(&[]),
                num_points: 0,
            };
        }

        let points: Vec<[f32; 3]> = (0..n)
            .map(|i| [cloud.x[i], cloud.y[i], cloud.z[i]])
            .collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            num_points: n,
        }
    }

    pub fn len(&self) -> usize {
        self.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Mean Euclidean distance from `query` to its `k` nearest neighbours,
    /// excluding the query point itself when it is a member of the tree.
    ///
    /// This is the per-point statistic the statistical outlier filter
    /// thresholds on. `k + 1` neighbours are fetched and the closest result
    /// (the self match at distance 0) is dropped.
    ///
    /// Returns `None` if `k == 0`, the tree is empty, the query is
    /// non-finite, or no neighbour other than the query itself exists.
    pub fn mean_neighbor_distance(&self, query: &[f32; 3], k: usize) -> Option<f32> {
        if k == 0 || self.is_empty() || !query.iter().all(|v| v.is_finite()) {
            return None;
        }

        let want = NonZero::new(k + 1)?;
        let results = self.tree.nearest_n::<SquaredEuclidean>(query, want);
        if results.len() < 2 {
            return None;
        }

        // Skip the self match; average whatever non-self neighbours exist.
        let neighbors = &results[1..];
        let sum: f32 = neighbors.iter().map(|nn| nn.distance.sqrt()).sum();
        Some(sum / neighbors.len() as f32)
    }

    /// Count the points within Euclidean distance `radius` of `query`,
    /// including the query point itself when it is a member of the tree.
    ///
    /// Boundary points at exactly `radius` are counted. Returns 0 for a
    /// non-positive or non-finite radius and for non-finite queries.
    pub fn count_within_radius(&self, query: &[f32; 3], radius: f32) -> usize {
        if self.is_empty()
            || radius <= 0.0
            || !radius.is_finite()
            || !query.iter().all(|v| v.is_finite())
        {
            return 0;
        }

        let radius_sq = radius * radius;

        // kiddo's `within_unsorted` uses strict `<`; widen the query by an
        // epsilon and post-filter with `<=` so boundary points are kept.
        let query_radius_sq = radius_sq + f32::EPSILON * radius_sq.max(1.0);

        self.tree
            .within_unsorted::<SquaredEuclidean>(query, query_radius_sq)
            .into_iter()
            .filter(|nn| nn.distance <= radius_sq)
            .count()
    }
}
