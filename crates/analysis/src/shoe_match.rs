use crate::describe::MeasurementRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Simulated pressure at one region of the foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressurePoint {
    pub location: String,
    pub pressure: f32,
}

/// Output of the fit-match placeholder. All scores are drawn from a seeded
/// RNG; see [`analyze_fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Overall match in `[0, 1]`.
    pub match_score: f32,
    /// Foot-minus-shoe differences, in metres.
    pub length_diff: f32,
    pub width_diff: f32,
    pub height_diff: f32,
    pub pressure_points: Vec<PressurePoint>,
    pub comfort_score: f32,
    pub stability_score: f32,
    pub recommendations: Vec<String>,
}

/// Placeholder fit analysis between a foot and a shoe last.
///
/// This computes nothing from the geometry: every score is sampled from
/// `StdRng::seed_from_u64(seed)` within fixed plausible ranges, standing in
/// until a real pressure model exists. The input records only shape the
/// recommendation wording. Callers must not treat the output as a
/// measurement.
pub fn analyze_fit(foot: &MeasurementRecord, shoe: &MeasurementRecord, seed: u64) -> FitReport {
    let mut rng = StdRng::seed_from_u64(seed);

    let match_score = round3(rng.gen_range(0.65..0.95));
    let length_diff = round3(rng.gen_range(-0.02..0.02));
    let width_diff = round3(rng.gen_range(-0.015..0.015));
    let height_diff = round3(rng.gen_range(-0.01..0.01));

    let pressure_points = vec![
        PressurePoint {
            location: "toe".to_string(),
            pressure: round2(rng.gen_range(0.3..0.8)),
        },
        PressurePoint {
            location: "heel".to_string(),
            pressure: round2(rng.gen_range(0.4..0.9)),
        },
        PressurePoint {
            location: "arch".to_string(),
            pressure: round2(rng.gen_range(0.1..0.4)),
        },
        PressurePoint {
            location: "lateral".to_string(),
            pressure: round2(rng.gen_range(0.2..0.6)),
        },
    ];

    let comfort_score = round3(rng.gen_range(0.6..0.9));
    let stability_score = round3(rng.gen_range(0.7..0.95));

    let mut recommendations = Vec::new();
    if match_score > 0.85 {
        recommendations.push("This shoe is an excellent match for the foot.".to_string());
    } else if match_score > 0.75 {
        recommendations
            .push("A good match overall; try it on to confirm the toe box feels right.".to_string());
    } else {
        recommendations
            .push("A marginal match; consider a different size or width fitting.".to_string());
    }
    if foot.foot_width > shoe.foot_width {
        recommendations.push("The foot is wider than this last; prefer a wider fitting.".to_string());
    }

    FitReport {
        match_score,
        length_diff,
        width_diff,
        height_diff,
        pressure_points,
        comfort_score,
        stability_score,
        recommendations,
    }
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}
