use footscan_core::PointCloud;

/// The widest transverse slice of an aligned cloud: the band of points
/// around the slice of maximal `z` spread, projected onto the `(y, z)`
/// plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    /// Center of the winning slice on the length axis.
    pub slice_mid: f32,
    /// Half-width of the extraction window around `slice_mid`.
    pub half_window: f32,
    /// Cloud indices inside the window.
    pub indices: Vec<usize>,
    /// `(y, z)` projection of the windowed points, index-aligned with
    /// `indices`.
    pub points: Vec<[f32; 2]>,
}

/// Find the widest cross-section of an x-aligned cloud.
///
/// The x-range is cut into `slices` equal slices and each slice scored by
/// the `z` spread of its members. Scoring alone would make the section
/// sensitive to slice-boundary placement, so the winning slice is widened:
/// the returned band covers `|x - slice_mid| <= window_factor * slice_width / 2`.
///
/// `None` only for an empty cloud or a zero slice count. A cloud with no
/// x-extent collapses to a single slice holding every point.
pub fn widest_cross_section(
    cloud: &PointCloud,
    slices: usize,
    window_factor: f32,
) -> Option<CrossSection> {
    if cloud.is_empty() || slices == 0 {
        return None;
    }

    let bounds = cloud.aabb();
    let min_x = bounds.min[0];
    let slice_width = bounds.extent(0) / slices as f32;

    let mut z_min = vec![f32::INFINITY; slices];
    let mut z_max = vec![f32::NEG_INFINITY; slices];
    for i in 0..cloud.len() {
        let s = slice_of(cloud.x[i], min_x, slice_width, slices);
        z_min[s] = z_min[s].min(cloud.z[i]);
        z_max[s] = z_max[s].max(cloud.z[i]);
    }

    let mut widest = 0usize;
    let mut best_spread = f32::NEG_INFINITY;
    for s in 0..slices {
        if z_max[s] < z_min[s] {
            continue;
        }
        let spread = z_max[s] - z_min[s];
        if spread > best_spread {
            best_spread = spread;
            widest = s;
        }
    }

    let slice_mid = min_x + (widest as f32 + 0.5) * slice_width;
    let half_window = window_factor * slice_width / 2.0;

    let mut indices = Vec::new();
    let mut points = Vec::new();
    for i in 0..cloud.len() {
        if (cloud.x[i] - slice_mid).abs() <= half_window {
            indices.push(i);
            points.push([cloud.y[i], cloud.z[i]]);
        }
    }

    Some(CrossSection {
        slice_mid,
        half_window,
        indices,
        points,
    })
}

#[inline]
fn slice_of(x: f32, min_x: f32, slice_width: f32, slices: usize) -> usize {
    if slice_width <= 0.0 {
        return 0;
    }
    (((x - min_x) / slice_width) as usize).min(slices - 1)
}
