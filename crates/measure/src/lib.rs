#![forbid(unsafe_code)]

pub mod cross_section;
pub mod dimensions;
pub mod hull;
pub mod perimeter;

pub use cross_section::{widest_cross_section, CrossSection};
pub use dimensions::{measure, MeasureParams, Measurements};
pub use perimeter::{
    ConvexHullPerimeter, PerimeterEstimator, PerimeterMethod, SectorPerimeter,
};
