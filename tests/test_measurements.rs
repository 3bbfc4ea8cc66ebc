use approx::assert_abs_diff_eq;
use footscan::align::{align_to_principal_axis, Alignment};
use footscan::measure::{measure, MeasureParams, PerimeterMethod};
use footscan::PointCloud;

/// A cylinder along x: rings of radius `r` in the (y, z) plane.
fn cylinder(rings: usize, per_ring: usize, r: f32) -> PointCloud {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut z = Vec::new();
    for c in 0..rings {
        for k in 0..per_ring {
            let a = k as f32 / per_ring as f32 * std::f32::consts::TAU;
            x.push(c as f32 * 0.004);
            y.push(r * a.cos());
            z.push(r * a.sin());
        }
    }
    PointCloud::from_xyz(x, y, z)
}

#[test]
fn cylinder_girth_is_two_pi_r() {
    let r = 0.045;
    let m = measure(&mut cylinder(60, 128, r), &MeasureParams::default()).unwrap();
    let girth = std::f32::consts::TAU * r;
    assert!(
        (m.circumference - girth).abs() / girth < 0.01,
        "measured {} expected {}",
        m.circumference,
        girth
    );
}

#[test]
fn box_corners_are_exact() {
    let mut cloud = PointCloud::from_xyz(
        vec![0.0, 0.28, 0.0, 0.28, 0.0, 0.28, 0.0, 0.28],
        vec![0.0, 0.0, 0.0625, 0.0625, 0.0, 0.0, 0.0625, 0.0625],
        vec![0.0, 0.0, 0.0, 0.0, 0.109375, 0.109375, 0.109375, 0.109375],
    );
    let m = measure(&mut cloud, &MeasureParams::default()).unwrap();
    assert_eq!(m.foot_length, 0.28);
    assert_eq!(m.foot_width, 0.109375);
}

#[test]
fn sector_strategy_is_a_close_approximation() {
    let r = 0.045;
    let hull = measure(&mut cylinder(60, 128, r), &MeasureParams::default())
        .unwrap()
        .circumference;
    let sectors = measure(
        &mut cylinder(60, 128, r),
        &MeasureParams {
            method: PerimeterMethod::Sectors,
            ..MeasureParams::default()
        },
    )
    .unwrap()
    .circumference;

    assert!(sectors > 0.0);
    assert!(
        (hull - sectors).abs() / hull < 0.03,
        "hull {} vs sectors {}",
        hull,
        sectors
    );
}

/// After alignment the dominant horizontal direction is the x axis, so
/// measuring a rotated cloud gives the same length as the unrotated one.
#[test]
fn alignment_restores_the_length_axis() {
    let build = |angle: f32| {
        let mut cloud = cylinder(60, 48, 0.03);
        let (sin, cos) = angle.sin_cos();
        for i in 0..cloud.len() {
            let x = cloud.x[i];
            let z = cloud.z[i];
            cloud.x[i] = cos * x - sin * z;
            cloud.z[i] = sin * x + cos * z;
        }
        cloud
    };

    let mut reference = build(0.0);
    let expected = measure(&mut reference, &MeasureParams::default())
        .unwrap()
        .foot_length;

    for angle in [0.3f32, 1.0, 2.2, -0.7] {
        let mut cloud = build(angle);
        match align_to_principal_axis(&mut cloud) {
            Alignment::Rotated { .. } => {}
            Alignment::Degenerate => panic!("cylinder reported degenerate at {}", angle),
        }
        let m = measure(&mut cloud, &MeasureParams::default()).unwrap();
        assert_abs_diff_eq!(m.foot_length, expected, epsilon = 1e-3);
    }
}

#[test]
fn collinear_cloud_has_zero_girth() {
    // All points on one line: no cross-section polygon exists
    let mut cloud = PointCloud::from_xyz(
        (0..80).map(|i| i as f32 * 0.003).collect(),
        vec![0.0; 80],
        vec![0.0; 80],
    );
    let m = measure(&mut cloud, &MeasureParams::default()).unwrap();
    assert_eq!(m.foot_width, 0.0);
    assert_eq!(m.circumference, 0.0);
}
