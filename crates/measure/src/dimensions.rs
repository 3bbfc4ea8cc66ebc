use crate::cross_section::widest_cross_section;
use crate::perimeter::{ConvexHullPerimeter, PerimeterEstimator, PerimeterMethod, SectorPerimeter};
use footscan_core::{Colors, PointCloud};
use serde::{Deserialize, Serialize};

/// Parameters for the dimension calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureParams {
    /// Number of equal slices along the length axis.
    pub slices: usize,
    /// Widening factor for the cross-section extraction window.
    pub window_factor: f32,
    /// Angular sector count for [`PerimeterMethod::Sectors`].
    pub sectors: usize,
    pub method: PerimeterMethod,
    /// Color painted onto the measured cross-section.
    pub highlight_color: [f32; 3],
    /// Color given to the rest of the cloud when it arrives uncolored.
    pub default_color: [f32; 3],
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            slices: 50,
            window_factor: 1.5,
            sectors: 20,
            method: PerimeterMethod::default(),
            highlight_color: [1.0, 0.0, 0.0],
            default_color: [0.5, 0.5, 0.5],
        }
    }
}

/// The measured dimensions, in the cloud's native length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub foot_length: f32,
    pub foot_width: f32,
    pub circumference: f32,
    /// Size of the cloud the measurements were taken from.
    pub point_count: usize,
}

/// Measure an aligned, denoised cloud.
///
/// Length is the `x` extent and width the `z` extent of the bounding box,
/// exact on exact inputs. Circumference comes from the widest
/// cross-section via the configured [`PerimeterEstimator`]; a section of
/// fewer than 3 points yields `0.0` rather than an error. As a side
/// effect the chosen section is painted with the highlight color, giving
/// the whole cloud the default color first when it has none.
///
/// `None` only when the cloud is empty.
pub fn measure(cloud: &mut PointCloud, params: &MeasureParams) -> Option<Measurements> {
    if cloud.is_empty() {
        return None;
    }

    let bounds = cloud.aabb();
    let foot_length = bounds.extent(0);
    let foot_width = bounds.extent(2);
    let point_count = cloud.len();

    let circumference = match widest_cross_section(cloud, params.slices, params.window_factor) {
        Some(section) => {
            paint_section(cloud, &section.indices, params);
            if section.points.len() < 3 {
                0.0
            } else {
                match params.method {
                    PerimeterMethod::ConvexHull => ConvexHullPerimeter.estimate(&section.points),
                    PerimeterMethod::Sectors => SectorPerimeter {
                        sectors: params.sectors,
                    }
                    .estimate(&section.points),
                }
            }
        }
        None => 0.0,
    };

    Some(Measurements {
        foot_length,
        foot_width,
        circumference,
        point_count,
    })
}

fn paint_section(cloud: &mut PointCloud, indices: &[usize], params: &MeasureParams) {
    let n = cloud.len();
    let colors = cloud
        .colors
        .get_or_insert_with(|| Colors::uniform(params.default_color, n));
    for &i in indices {
        colors.r[i] = params.highlight_color[0];
        colors.g[i] = params.highlight_color[1];
        colors.b[i] = params.highlight_color[2];
    }
}
