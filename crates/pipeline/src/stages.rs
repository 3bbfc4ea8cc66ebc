use footscan_core::PointCloud;

/// Mirror the cloud through the horizontal plane by negating `y`.
///
/// The scanner delivers clouds upside down relative to the measurement
/// frame, so this runs once, directly after loading. Normals flip with the
/// positions.
pub fn flip_vertical_axis(cloud: &mut PointCloud) {
    for y in cloud.y.iter_mut() {
        *y = -*y;
    }
    if let Some(normals) = cloud.normals.as_mut() {
        for ny in normals.ny.iter_mut() {
            *ny = -*ny;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::flip_vertical_axis;
    use footscan_core::{Normals, PointCloud};

    #[test]
    fn negates_y_and_ny_only() {
        let mut cloud = PointCloud::from_xyz(
            vec![1.0, 2.0],
            vec![3.0, -4.0],
            vec![5.0, 6.0],
        );
        cloud.normals = Some(Normals {
            nx: vec![0.1, 0.2],
            ny: vec![0.5, -0.5],
            nz: vec![0.8, 0.9],
        });

        flip_vertical_axis(&mut cloud);

        assert_eq!(cloud.x, vec![1.0, 2.0]);
        assert_eq!(cloud.y, vec![-3.0, 4.0]);
        assert_eq!(cloud.z, vec![5.0, 6.0]);
        let normals = cloud.normals.as_ref().unwrap();
        assert_eq!(normals.nx, vec![0.1, 0.2]);
        assert_eq!(normals.ny, vec![-0.5, 0.5]);
        assert_eq!(normals.nz, vec![0.8, 0.9]);
    }

    #[test]
    fn double_flip_is_identity() {
        let mut cloud = PointCloud::from_xyz(
            vec![0.0, 1.0, 2.0],
            vec![-1.5, 0.0, 2.5],
            vec![0.5, 0.5, 0.5],
        );
        let before = cloud.clone();
        flip_vertical_axis(&mut cloud);
        flip_vertical_axis(&mut cloud);
        assert_eq!(cloud, before);
    }
}
