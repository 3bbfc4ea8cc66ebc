use std::path::Path;

use footscan_align::{align_to_principal_axis, Alignment};
use footscan_core::PointCloud;
use footscan_filters::{denoise, DenoiseReport};
use footscan_io::{read_ply, write_ply_binary, SaveError};
use footscan_measure::{measure, Measurements};
use footscan_segmentation::{remove_support_plane, PlaneRemoval};

use crate::config::PipelineConfig;
use crate::error::{DegenerateGeometry, PipelineError, Stage};
use crate::stages::flip_vertical_axis;

/// Everything a completed run produced, measurements first.
///
/// A failed write does not fail the run: `measurements` is always present
/// here, with the `save_error` attached for the caller to report.
#[derive(Debug)]
pub struct ScanOutcome {
    pub measurements: Measurements,
    pub plane: PlaneRemoval,
    pub alignment: Alignment,
    pub denoise: DenoiseReport,
    pub output_written: bool,
    pub save_error: Option<SaveError>,
}

/// Process one scan file end to end.
///
/// The stages run in a fixed order: load, flip the vertical axis, strip
/// the support plane, rotate onto the length axis, denoise, measure, and
/// write the cleaned cloud to `output`. There are no retries and no
/// parallelism inside a run; with the same input and the same
/// `config.seed` the outcome is identical every time.
pub fn process_scan(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<ScanOutcome, PipelineError> {
    let mut cloud = read_ply(input)?;
    log::info!("loaded {} points from {}", cloud.len(), input.display());

    flip_vertical_axis(&mut cloud);

    let plane = remove_support_plane(&mut cloud, &config.plane, config.seed);
    match &plane {
        PlaneRemoval::Removed { removed_points, .. } => {
            log::info!(
                "support plane removed: {} points dropped, {} remain",
                removed_points,
                cloud.len()
            );
        }
        PlaneRemoval::TooFewPoints { cloud_size } => {
            log::warn!("skipping plane removal: only {} points", cloud_size);
        }
        PlaneRemoval::LowSupport { inliers } => {
            log::warn!("skipping plane removal: best plane has {} inliers", inliers);
        }
    }
    ensure_points(&cloud, Stage::PlaneRemoval)?;

    let alignment = align_to_principal_axis(&mut cloud);
    match alignment {
        Alignment::Rotated { angle } => {
            log::info!("aligned to principal axis, rotated {:.4} rad", angle);
        }
        Alignment::Degenerate => {
            log::warn!("principal axis nearly vertical, skipping alignment");
        }
    }

    let (clean, denoise_report) = denoise(&cloud, &config.denoise);
    cloud = clean;
    log::info!(
        "denoised {} -> {} -> {} points",
        denoise_report.input_points,
        denoise_report.after_statistical,
        denoise_report.after_radius
    );
    ensure_points(&cloud, Stage::Denoise)?;

    let measurements = match measure(&mut cloud, &config.measure) {
        Some(m) => m,
        None => {
            return Err(DegenerateGeometry {
                stage: Stage::Measure,
            }
            .into())
        }
    };
    log::info!(
        "length {:.4}, width {:.4}, circumference {:.4} over {} points",
        measurements.foot_length,
        measurements.foot_width,
        measurements.circumference,
        measurements.point_count
    );

    let save_error = match write_ply_binary(output, &cloud) {
        Ok(()) => None,
        Err(e) => {
            log::error!("failed to write {}: {}", output.display(), e);
            Some(e)
        }
    };

    Ok(ScanOutcome {
        measurements,
        plane,
        alignment,
        denoise: denoise_report,
        output_written: save_error.is_none(),
        save_error,
    })
}

fn ensure_points(cloud: &PointCloud, stage: Stage) -> Result<(), DegenerateGeometry> {
    if cloud.is_empty() {
        Err(DegenerateGeometry { stage })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::process_scan;
    use crate::config::PipelineConfig;
    use crate::error::{PipelineError, Stage};
    use footscan_core::PointCloud;
    use footscan_io::write_ply;
    use footscan_segmentation::PlaneRemoval;
    use tempfile::tempdir;

    /// A synthetic scan the way the scanner sees it: a foot-shaped shell
    /// hanging below y = 0 (the pipeline flips it up) over a support
    /// platform. The foot is a surface, not a filled volume, so no plane
    /// through it can gather more support than the platform.
    fn synthetic_scan() -> PointCloud {
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut z = Vec::new();

        // Half-cylinder shell along x, 0.236 long, radius 0.04. The jitter
        // keeps every coordinate distinct, which the kd-tree's bucketed
        // layout needs on repeated ring values.
        let r = 0.04f32;
        for ix in 0..60u32 {
            for k in 0..20u32 {
                let theta = k as f32 / 19.0 * std::f32::consts::PI;
                let jitter = (ix * 20 + k) as f32 * 1e-8;
                x.push(ix as f32 * 0.004 + jitter);
                y.push(-(0.03 + r * theta.sin() + jitter));
                z.push(r * theta.cos() + jitter);
            }
        }

        // Platform on y = 0, denser than any strip of the shell
        for ix in 0..40 {
            for iz in 0..30 {
                x.push(ix as f32 * 0.01 - 0.08);
                y.push(0.0);
                z.push(iz as f32 * 0.01 - 0.15);
            }
        }

        PointCloud::from_xyz(x, y, z)
    }

    #[test]
    fn full_run_measures_and_writes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("scan.ply");
        let output = dir.path().join("clean.ply");
        write_ply(&input, &synthetic_scan()).unwrap();

        let outcome = process_scan(&input, &output, &PipelineConfig::default()).unwrap();

        assert!(matches!(outcome.plane, PlaneRemoval::Removed { .. }));
        assert!(outcome.output_written);
        assert!(outcome.save_error.is_none());
        assert!(output.exists());

        let m = outcome.measurements;
        assert!(m.foot_length > m.foot_width);
        assert!((m.foot_length - 0.236).abs() < 0.025, "length {}", m.foot_length);
        assert!(m.circumference > 0.0);
        assert_eq!(m.point_count, outcome.denoise.after_radius);
    }

    #[test]
    fn identical_runs_agree() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("scan.ply");
        write_ply(&input, &synthetic_scan()).unwrap();

        let a = process_scan(&input, &dir.path().join("a.ply"), &PipelineConfig::default())
            .unwrap();
        let b = process_scan(&input, &dir.path().join("b.ply"), &PipelineConfig::default())
            .unwrap();

        assert_eq!(a.measurements, b.measurements);
        assert_eq!(a.plane, b.plane);
        assert_eq!(a.denoise, b.denoise);

        let bytes_a = std::fs::read(dir.path().join("a.ply")).unwrap();
        let bytes_b = std::fs::read(dir.path().join("b.ply")).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn missing_input_is_a_load_error() {
        let dir = tempdir().unwrap();
        let err = process_scan(
            &dir.path().join("nope.ply"),
            &dir.path().join("out.ply"),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));
    }

    #[test]
    fn sparse_scan_dies_in_denoise() {
        // Points too far apart for the radius filter: everything is removed
        // and the error says which stage did it.
        let dir = tempdir().unwrap();
        let input = dir.path().join("sparse.ply");
        let cloud = PointCloud::from_xyz(
            (0..150).map(|i| i as f32).collect(),
            (0..150).map(|i| (i % 7) as f32 * 0.3).collect(),
            (0..150).map(|i| (i % 11) as f32 * 0.4).collect(),
        );
        write_ply(&input, &cloud).unwrap();

        let err = process_scan(
            &input,
            &dir.path().join("out.ply"),
            &PipelineConfig::default(),
        )
        .unwrap_err();

        match err {
            PipelineError::Degenerate(d) => assert_eq!(d.stage, Stage::Denoise),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unwritable_output_still_yields_measurements() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("scan.ply");
        write_ply(&input, &synthetic_scan()).unwrap();

        // Output path points into a directory that does not exist
        let outcome = process_scan(
            &input,
            &dir.path().join("missing-dir").join("out.ply"),
            &PipelineConfig::default(),
        )
        .unwrap();

        assert!(!outcome.output_written);
        assert!(outcome.save_error.is_some());
        assert!(outcome.measurements.foot_length > 0.0);
    }
}
