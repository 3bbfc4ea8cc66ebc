use footscan_core::PointCloud;
use nalgebra::{Matrix3, SymmetricEigen};

/// Outcome of the principal-axis alignment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// The cloud was rotated about `y` by `angle` radians.
    Rotated { angle: f32 },
    /// The dominant direction had no horizontal component worth rotating
    /// toward; the cloud was left untouched.
    Degenerate,
}

/// Rotate `cloud` about the vertical `y` axis so its dominant horizontal
/// direction lands on `+x`.
///
/// The dominant direction is the eigenvector of the largest eigenvalue of
/// the 3x3 position covariance, accumulated in f64. Its `y` component is
/// zeroed before computing the rotation: the foot should turn on the
/// platform, not pitch out of it. A near-vertical dominant direction
/// (projected norm below 1e-6) means there is no meaningful heading and the
/// rotation is skipped.
///
/// Normals, when present, are rotated with the positions.
pub fn align_to_principal_axis(cloud: &mut PointCloud) -> Alignment {
    if cloud.len() < 2 {
        return Alignment::Degenerate;
    }

    let Some(dominant) = dominant_direction(cloud) else {
        return Alignment::Degenerate;
    };

    // Project onto the horizontal plane and renormalize.
    let px = dominant[0];
    let pz = dominant[2];
    let norm = (px * px + pz * pz).sqrt();
    if norm < 1e-6 {
        return Alignment::Degenerate;
    }
    let px = px / norm;
    let pz = pz / norm;

    // Angle between the projected direction and +x. The cross product
    // (proj x [1,0,0]) has y component equal to pz, which fixes the turn
    // direction.
    let mut angle = px.clamp(-1.0, 1.0).acos();
    if pz < 0.0 {
        angle = -angle;
    }

    rotate_about_y(cloud, angle as f32);

    Alignment::Rotated {
        angle: angle as f32,
    }
}

/// Eigenvector of the largest eigenvalue of the position covariance, or
/// `None` when the covariance is numerically rank-zero.
fn dominant_direction(cloud: &PointCloud) -> Option<[f64; 3]> {
    let n = cloud.len() as f64;

    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    let mut cz = 0.0f64;
    for i in 0..cloud.len() {
        cx += cloud.x[i] as f64;
        cy += cloud.y[i] as f64;
        cz += cloud.z[i] as f64;
    }
    cx /= n;
    cy /= n;
    cz /= n;

    let mut c00 = 0.0f64;
    let mut c01 = 0.0f64;
    let mut c02 = 0.0f64;
    let mut c11 = 0.0f64;
    let mut c12 = 0.0f64;
    let mut c22 = 0.0f64;
    for i in 0..cloud.len() {
        let dx = cloud.x[i] as f64 - cx;
        let dy = cloud.y[i] as f64 - cy;
        let dz = cloud.z[i] as f64 - cz;
        c00 += dx * dx;
        c01 += dx * dy;
        c02 += dx * dz;
        c11 += dy * dy;
        c12 += dy * dz;
        c22 += dz * dz;
    }

    #[rustfmt::skip]
    let cov = Matrix3::new(
        c00, c01, c02,
        c01, c11, c12,
        c02, c12, c22,
    );

    let eigen = SymmetricEigen::new(cov);
    let mut largest = 0;
    for i in 1..3 {
        if eigen.eigenvalues[i] > eigen.eigenvalues[largest] {
            largest = i;
        }
    }

    if eigen.eigenvalues[largest] <= 0.0 {
        return None;
    }

    let v = eigen.eigenvectors.column(largest);
    Some([v[0], v[1], v[2]])
}

/// In-place rotation of positions and normals about the `y` axis.
fn rotate_about_y(cloud: &mut PointCloud, angle: f32) {
    let (sin, cos) = angle.sin_cos();

    for i in 0..cloud.len() {
        let x = cloud.x[i];
        let z = cloud.z[i];
        cloud.x[i] = cos * x + sin * z;
        cloud.z[i] = -sin * x + cos * z;
    }

    if let Some(normals) = cloud.normals.as_mut() {
        for i in 0..normals.nx.len() {
            let nx = normals.nx[i];
            let nz = normals.nz[i];
            normals.nx[i] = cos * nx + sin * nz;
            normals.nz[i] = -sin * nx + cos * nz;
        }
    }
}
