#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod run;
pub mod stages;

pub use config::PipelineConfig;
pub use error::{DegenerateGeometry, PipelineError, Stage};
pub use run::{process_scan, ScanOutcome};
pub use stages::flip_vertical_axis;
