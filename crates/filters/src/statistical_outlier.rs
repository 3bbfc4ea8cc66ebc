use footscan_core::PointCloud;
use footscan_spatial::KdTree;

/// Remove points whose mean distance to their `k` nearest neighbours exceeds
/// `global_mean + std_mul * global_std` of that statistic over the cloud.
///
/// The foot pipeline runs this with a deliberately low `std_mul` (0.5): scan
/// fuzz around the foot surface is dense, so an aggressive cut loses little
/// real surface while stripping most of the speckle.
pub fn statistical_outlier_removal(cloud: &PointCloud, k: usize, std_mul: f32) -> PointCloud {
    if cloud.is_empty() || k == 0 {
        return PointCloud::new();
    }

    // A lone point has no neighbours to be judged against; keep it.
    if cloud.len() == 1 {
        return cloud.clone();
    }

    let tree = KdTree::build(cloud);

    // Mean kNN distance per point; non-finite points and points without any
    // non-self neighbour score infinity and never survive the threshold.
    let mean_dists: Vec<f32> = (0..cloud.len())
        .map(|i| {
            tree.mean_neighbor_distance(&cloud.point(i), k)
                .unwrap_or(f32::INFINITY)
        })
        .collect();

    let finite: Vec<f32> = mean_dists
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .collect();
    if finite.is_empty() {
        return PointCloud::new();
    }

    let n = finite.len() as f64;
    let global_mean = finite.iter().map(|&d| d as f64).sum::<f64>() / n;
    let variance = finite
        .iter()
        .map(|&d| (d as f64 - global_mean).powi(2))
        .sum::<f64>()
        / n;
    let threshold = (global_mean + std_mul as f64 * variance.sqrt()) as f32;

    let keep: Vec<usize> = (0..cloud.len())
        .filter(|&i| mean_dists[i] <= threshold)
        .collect();

    cloud.select(&keep)
}
