use footscan_filters::DenoiseParams;
use footscan_measure::MeasureParams;
use footscan_segmentation::PlaneParams;
use serde::{Deserialize, Serialize};

/// Everything one scan-processing run needs. Serializable so a deployment
/// can pin its tuning in a config file; `Default` is the scanner tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for the RANSAC sampler. A fixed seed makes the whole run
    /// reproducible bit for bit.
    pub seed: u64,
    pub plane: PlaneParams,
    pub denoise: DenoiseParams,
    pub measure: MeasureParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            plane: PlaneParams::default(),
            denoise: DenoiseParams::default(),
            measure: MeasureParams::default(),
        }
    }
}
