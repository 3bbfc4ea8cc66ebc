use crate::{radius_outlier_removal, statistical_outlier_removal};
use footscan_core::PointCloud;
use serde::{Deserialize, Serialize};

/// Parameters for the two-stage denoiser.
///
/// Defaults match the scanner tuning: an aggressive statistical pass
/// (k = 30, ratio 0.5) followed by a radius support pass (10 neighbours
/// within 0.02 length units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseParams {
    /// k for the statistical mean-kNN-distance filter.
    pub neighbors: usize,
    /// Standard-deviation multiplier for the statistical threshold.
    pub std_ratio: f32,
    /// Ball radius for the support filter, in the cloud's length unit.
    pub radius: f32,
    /// Minimum points (self included) within the ball.
    pub min_radius_neighbors: usize,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            neighbors: 30,
            std_ratio: 0.5,
            radius: 0.02,
            min_radius_neighbors: 10,
        }
    }
}

/// Point counts surviving each denoising stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenoiseReport {
    pub input_points: usize,
    pub after_statistical: usize,
    pub after_radius: usize,
}

/// Run the statistical filter, then the radius filter on its output.
///
/// The order is fixed: the radius pass judges support against the
/// already-thinned cloud, which is what makes it effective on strands left
/// behind by the statistical pass. Either stage may empty the cloud on
/// pathological input; that is not checked here and surfaces downstream
/// when measurement finds nothing to measure.
pub fn denoise(cloud: &PointCloud, params: &DenoiseParams) -> (PointCloud, DenoiseReport) {
    let input_points = cloud.len();

    let after_stat = statistical_outlier_removal(cloud, params.neighbors, params.std_ratio);
    let after_statistical = after_stat.len();

    let after_rad =
        radius_outlier_removal(&after_stat, params.radius, params.min_radius_neighbors);
    let after_radius = after_rad.len();

    (
        after_rad,
        DenoiseReport {
            input_points,
            after_statistical,
            after_radius,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{denoise, DenoiseParams};
    use footscan_core::PointCloud;

    /// A dense grid shaped roughly like a footprint, spacing well inside the
    /// default 0.02 support radius. The y perturbation keeps coordinates
    /// distinct, which the kd-tree's bucketed layout needs.
    fn footprint_grid() -> PointCloud {
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut z = Vec::new();
        let mut idx = 0u32;
        for ix in 0..50 {
            for iz in 0..20 {
                x.push(ix as f32 * 0.005);
                y.push(idx as f32 * 1e-6);
                z.push(iz as f32 * 0.005);
                idx += 1;
            }
        }
        PointCloud::from_xyz(x, y, z)
    }

    /// Well-separated point pairs with an exactly representable intra-pair
    /// spacing (2^-7). The y and z jitter keeps coordinates distinct for
    /// the kd-tree, and is small enough to vanish when the squared
    /// distance rounds to f32: every point's nearest-neighbour distance is
    /// the same bit pattern, so the ratio threshold is exactly stable. The
    /// ideal cloud for pinning down idempotence without float noise.
    fn paired_cloud(pairs: usize) -> PointCloud {
        let delta = 0.0078125f32; // 2^-7
        let mut x = Vec::with_capacity(pairs * 2);
        let mut y = Vec::with_capacity(pairs * 2);
        let mut z = Vec::with_capacity(pairs * 2);
        for i in 0..pairs {
            let j = (2 * i) as f32;
            x.push(i as f32);
            x.push(i as f32 + delta);
            y.push(j * 1e-6);
            y.push((j + 1.0) * 1e-6);
            z.push(j * 1e-7);
            z.push((j + 1.0) * 1e-7);
        }
        PointCloud::from_xyz(x, y, z)
    }

    #[test]
    fn strips_scatter_keeps_surface() {
        let mut cloud = footprint_grid();
        let surface_points = cloud.len();
        // A handful of isolated specks far from the surface
        for i in 0..5 {
            cloud.x.push(1.0 + i as f32);
            cloud.y.push(2.0 + i as f32);
            cloud.z.push(3.0 + i as f32);
        }

        let (clean, report) = denoise(&cloud, &DenoiseParams::default());

        assert_eq!(report.input_points, surface_points + 5);
        assert!(clean.len() <= surface_points);
        assert!(
            clean.len() > surface_points / 2,
            "denoiser destroyed the surface: {} of {} left",
            clean.len(),
            surface_points
        );
        for p in clean.iter_points() {
            assert!(p[0] < 0.5, "speck survived at {:?}", p);
        }
    }

    #[test]
    fn second_pass_removes_nothing() {
        // Pairs plus one distant speck. The first pass settles on the pairs;
        // the second pass must leave them alone.
        let mut cloud = paired_cloud(30);
        cloud.x.push(500.0);
        cloud.y.push(500.0);
        cloud.z.push(500.0);

        let params = DenoiseParams {
            neighbors: 1,
            std_ratio: 0.5,
            radius: 0.05,
            min_radius_neighbors: 2,
        };

        let (once, first) = denoise(&cloud, &params);
        assert_eq!(once.len(), 60, "speck should be gone, pairs intact");
        assert_eq!(first.input_points, 61);

        let (twice, report) = denoise(&once, &params);
        assert_eq!(
            twice.len(),
            once.len(),
            "denoising an already-denoised cloud removed {} more points",
            once.len() - twice.len()
        );
        assert_eq!(report.input_points, report.after_radius);
    }

    #[test]
    fn sparse_cloud_denoises_to_zero() {
        // Points spaced far beyond the support radius: the radius pass
        // removes everything. The denoiser reports it and moves on.
        let cloud = PointCloud::from_xyz(
            (0..20).map(|i| i as f32).collect(),
            vec![0.0; 20],
            vec![0.0; 20],
        );
        let (clean, report) = denoise(&cloud, &DenoiseParams::default());
        assert!(clean.is_empty());
        assert_eq!(report.after_radius, 0);
    }

    #[test]
    fn report_counts_are_monotonic() {
        let cloud = footprint_grid();
        let (_, report) = denoise(&cloud, &DenoiseParams::default());
        assert!(report.after_statistical <= report.input_points);
        assert!(report.after_radius <= report.after_statistical);
    }
}
