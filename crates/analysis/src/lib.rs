#![forbid(unsafe_code)]

pub mod describe;
pub mod shoe_match;

pub use describe::{
    describe_with_fallback, DescriptionError, DescriptionSource, FootDescription,
    MeasurementRecord, TemplateDescriptor,
};
pub use shoe_match::{analyze_fit, FitReport, PressurePoint};
