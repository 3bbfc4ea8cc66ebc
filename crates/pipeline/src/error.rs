use footscan_io::LoadError;
use std::fmt;
use thiserror::Error;

/// Pipeline stages, in execution order. Used to name where a cloud died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    FlipAxis,
    PlaneRemoval,
    Alignment,
    Denoise,
    Measure,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::FlipAxis => "flip-axis",
            Stage::PlaneRemoval => "plane-removal",
            Stage::Alignment => "alignment",
            Stage::Denoise => "denoise",
            Stage::Measure => "measure",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A stage left zero points, so there is nothing left to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no points remain after the {stage} stage")]
pub struct DegenerateGeometry {
    pub stage: Stage,
}

/// Why a scan could not be processed. Write failures are deliberately not
/// here: by the time writing fails the measurements exist, and they are
/// returned alongside the save error instead of being discarded.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Degenerate(#[from] DegenerateGeometry),
}
