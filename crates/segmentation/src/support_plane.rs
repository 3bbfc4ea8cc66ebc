use crate::{ransac_plane_seeded, PlaneModel};
use footscan_core::PointCloud;
use serde::{Deserialize, Serialize};

/// Parameters for detecting and stripping the scan support surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneParams {
    /// Point-to-plane inlier distance, in the cloud's length unit.
    pub distance_threshold: f32,
    /// RANSAC trial count.
    pub iterations: usize,
    /// Clouds smaller than this are left untouched.
    pub min_cloud_size: usize,
    /// A winning hypothesis below this many inliers is not removed.
    pub min_inliers: usize,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            distance_threshold: 0.01,
            iterations: 1000,
            min_cloud_size: 100,
            min_inliers: 50,
        }
    }
}

/// Outcome of the support-plane stage. The skip variants are policy, not
/// errors: with no clear platform under the foot, removing the best plane
/// hypothesis would carve into the foot itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneRemoval {
    /// Plane found and stripped; the cloud was mutated.
    Removed {
        model: PlaneModel,
        removed_points: usize,
    },
    /// Cloud below `min_cloud_size`; nothing touched.
    TooFewPoints { cloud_size: usize },
    /// Best hypothesis below `min_inliers`; nothing touched.
    LowSupport { inliers: usize },
}

/// Run one RANSAC pass and strip the dominant plane from `cloud` in place.
///
/// Runs exactly once, before principal alignment: a platform left in the
/// cloud would dominate the covariance and skew the dominant-direction
/// estimate. All attribute arrays shrink in lock-step via
/// [`PointCloud::select_inverse`].
pub fn remove_support_plane(
    cloud: &mut PointCloud,
    params: &PlaneParams,
    seed: u64,
) -> PlaneRemoval {
    if cloud.len() < params.min_cloud_size {
        return PlaneRemoval::TooFewPoints {
            cloud_size: cloud.len(),
        };
    }

    let (model, inliers) =
        ransac_plane_seeded(cloud, params.distance_threshold, params.iterations, seed);

    if inliers.len() < params.min_inliers {
        return PlaneRemoval::LowSupport {
            inliers: inliers.len(),
        };
    }

    let removed_points = inliers.len();
    *cloud = cloud.select_inverse(&inliers);

    PlaneRemoval::Removed {
        model,
        removed_points,
    }
}
