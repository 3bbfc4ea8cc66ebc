//! Foot measurement from raw 3D scanner point clouds.
//!
//! The pipeline loads a PLY scan, flips it into the measurement frame,
//! strips the support platform, rotates the foot onto the length axis,
//! denoises, and extracts length, width, and circumference. The member
//! crates are re-exported here so applications can depend on `footscan`
//! alone.

#![forbid(unsafe_code)]

pub use footscan_align as align;
pub use footscan_analysis as analysis;
pub use footscan_filters as filters;
pub use footscan_io as io;
pub use footscan_measure as measure;
pub use footscan_pipeline as pipeline;
pub use footscan_segmentation as segmentation;
pub use footscan_spatial as spatial;

pub use footscan_core::{Aabb, Colors, Normals, PointCloud};
pub use footscan_measure::Measurements;
pub use footscan_pipeline::{process_scan, PipelineConfig, PipelineError, ScanOutcome};
