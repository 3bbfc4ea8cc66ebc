#![forbid(unsafe_code)]

pub mod denoise;
pub mod radius_outlier;
pub mod statistical_outlier;

pub use denoise::{denoise, DenoiseParams, DenoiseReport};
pub use radius_outlier::radius_outlier_removal;
pub use statistical_outlier::statistical_outlier_removal;
