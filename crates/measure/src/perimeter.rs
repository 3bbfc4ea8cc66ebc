use crate::hull::{convex_hull, polygon_perimeter};
use serde::{Deserialize, Serialize};

/// Strategy for turning a projected cross-section into a girth estimate.
pub trait PerimeterEstimator {
    /// Perimeter of the closed outline around `points`, `0.0` when the
    /// input cannot form one.
    fn estimate(&self, points: &[[f32; 2]]) -> f32;
}

/// Which [`PerimeterEstimator`] the measurement stage uses. Selected by
/// configuration only; the pipeline never falls back from one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerimeterMethod {
    #[default]
    ConvexHull,
    Sectors,
}

/// Exact perimeter of the 2-D convex hull of the projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexHullPerimeter;

impl PerimeterEstimator for ConvexHullPerimeter {
    fn estimate(&self, points: &[[f32; 2]]) -> f32 {
        let pts: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p[0] as f64, p[1] as f64])
            .collect();
        let hull = convex_hull(&pts);
        // A degenerate hull (all points collinear or coincident) is a
        // segment, not an outline; its out-and-back length is not a girth.
        if hull.len() < 3 {
            return 0.0;
        }
        polygon_perimeter(&hull) as f32
    }
}

/// Angular-sector approximation of the outline.
///
/// Points are binned into equal angular sectors around their centroid, the
/// farthest point of each non-empty sector is kept, and the survivors are
/// connected in angular order, wrap-around included. Cheaper than a hull
/// and tolerant of interior noise, but it underestimates smooth outlines
/// and can cut corners when sectors are empty; treat the result as an
/// approximation.
#[derive(Debug, Clone, Copy)]
pub struct SectorPerimeter {
    pub sectors: usize,
}

impl PerimeterEstimator for SectorPerimeter {
    fn estimate(&self, points: &[[f32; 2]]) -> f32 {
        if points.len() < 3 || self.sectors == 0 {
            return 0.0;
        }

        let n = points.len() as f64;
        let mut cu = 0.0f64;
        let mut cv = 0.0f64;
        for p in points {
            cu += p[0] as f64;
            cv += p[1] as f64;
        }
        cu /= n;
        cv /= n;

        let sector_span = std::f64::consts::TAU / self.sectors as f64;
        let mut farthest: Vec<Option<[f64; 2]>> = vec![None; self.sectors];
        let mut best_r2: Vec<f64> = vec![0.0; self.sectors];

        for p in points {
            let du = p[0] as f64 - cu;
            let dv = p[1] as f64 - cv;
            let r2 = du * du + dv * dv;
            if r2 == 0.0 {
                continue;
            }
            let angle = dv.atan2(du) + std::f64::consts::PI;
            let s = ((angle / sector_span) as usize).min(self.sectors - 1);
            if farthest[s].is_none() || r2 > best_r2[s] {
                farthest[s] = Some([p[0] as f64, p[1] as f64]);
                best_r2[s] = r2;
            }
        }

        let outline: Vec<[f64; 2]> = farthest.into_iter().flatten().collect();
        if outline.len() < 2 {
            return 0.0;
        }
        polygon_perimeter(&outline) as f32
    }
}
