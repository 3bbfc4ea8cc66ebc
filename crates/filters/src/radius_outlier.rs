use footscan_core::PointCloud;
use footscan_spatial::KdTree;

/// Remove points with fewer than `min_neighbors` points (the point itself
/// included) within `radius`.
///
/// Runs after the statistical filter in the foot pipeline to clear thin
/// strands the distance statistic misses: a strand is locally dense enough
/// to pass the kNN test but has too little support inside a fixed ball.
pub fn radius_outlier_removal(cloud: &PointCloud, radius: f32, min_neighbors: usize) -> PointCloud {
    if cloud.is_empty() {
        return PointCloud::new();
    }

    let tree = KdTree::build(cloud);
    let keep: Vec<usize> = (0..cloud.len())
        .filter(|&i| tree.count_within_radius(&cloud.point(i), radius) >= min_neighbors)
        .collect();

    cloud.select(&keep)
}

#[cfg(test)]
mod tests {
    use super::radius_outlier_removal;
    use footscan_core::PointCloud;
    use proptest::prelude::*;

    #[test]
    fn removes_isolated_point() {
        let cloud = PointCloud::from_xyz(
            vec![0.0, 0.1, 0.2, 100.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        );
        // The point at x=100 has only itself within the radius.
        let result = radius_outlier_removal(&cloud, 0.5, 2);
        assert_eq!(result.len(), 3);
        for i in 0..result.len() {
            assert!(result.x[i] < 1.0, "isolated point should have been removed");
        }
    }

    #[test]
    fn keeps_dense_run() {
        let cloud = PointCloud::from_xyz(
            vec![0.0, 0.1, 0.2, 0.3, 0.4],
            vec![0.0; 5],
            vec![0.0; 5],
        );
        let result = radius_outlier_removal(&cloud, 1.0, 2);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn empty_cloud_stays_empty() {
        let result = radius_outlier_removal(&PointCloud::new(), 1.0, 2);
        assert!(result.is_empty());
    }

    proptest! {
        #[test]
        fn never_grows_the_cloud(
            pts in prop::collection::vec(
                (-100.0f32..100.0f32, -100.0f32..100.0f32, -100.0f32..100.0f32),
                0..300
            ),
            radius in 0.01f32..10.0f32,
            min_neighbors in 1usize..10,
        ) {
            let cloud = PointCloud::from_xyz(
                pts.iter().map(|p| p.0).collect(),
                pts.iter().map(|p| p.1).collect(),
                pts.iter().map(|p| p.2).collect(),
            );
            let result = radius_outlier_removal(&cloud, radius, min_neighbors);
            prop_assert!(result.len() <= cloud.len());
        }
    }
}
