use footscan_measure::Measurements;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The measurement contract shared with downstream consumers, in
/// millimetres.
///
/// `dorsum_height_50` (instep height at 50% of foot length) and `ahi`
/// (arch height index) appear in the contract but the pipeline does not
/// compute them yet; they stay `None` rather than carrying made-up
/// numbers, and descriptions phrase around the gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub foot_length: f32,
    pub foot_width: f32,
    pub circumference: f32,
    pub dorsum_height_50: Option<f32>,
    pub ahi: Option<f32>,
    pub point_count: usize,
}

impl MeasurementRecord {
    /// Convert pipeline measurements to the record, scaling from the
    /// cloud's native unit to millimetres (`1000.0` for clouds in metres).
    pub fn from_scan(m: &Measurements, unit_to_mm: f32) -> Self {
        Self {
            foot_length: m.foot_length * unit_to_mm,
            foot_width: m.foot_width * unit_to_mm,
            circumference: m.circumference * unit_to_mm,
            dorsum_height_50: None,
            ahi: None,
            point_count: m.point_count,
        }
    }
}

/// A structured, human-readable reading of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootDescription {
    pub overview: String,
    pub shape_features: String,
    pub shoe_advice: String,
    pub health_notes: String,
    pub full_description: String,
}

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("description backend unavailable: {0}")]
    Unavailable(String),
    #[error("description backend returned malformed output: {0}")]
    Malformed(String),
}

/// Anything that can turn a record into a description. Remote generators
/// implement this; [`TemplateDescriptor`] is the local one.
pub trait DescriptionSource {
    fn describe(&self, record: &MeasurementRecord) -> Result<FootDescription, DescriptionError>;
}

/// Try `primary`, fall back to the local template when it fails. The
/// description path must never take a scan down with it.
pub fn describe_with_fallback(
    primary: &dyn DescriptionSource,
    record: &MeasurementRecord,
) -> FootDescription {
    match primary.describe(record) {
        Ok(description) => description,
        Err(e) => {
            log::warn!("description backend failed, using template: {}", e);
            TemplateDescriptor.describe_record(record)
        }
    }
}

/// Deterministic rule-based descriptions. The same record always produces
/// the same text; every branch is driven by an explicit threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDescriptor;

/// Foot length categories, in mm.
const LENGTH_LARGE: f32 = 270.0;
const LENGTH_STANDARD: f32 = 240.0;
/// Width-to-length ratio categories.
const RATIO_WIDE: f32 = 0.42;
const RATIO_STANDARD: f32 = 0.36;
/// Arch height index categories.
const AHI_HIGH: f32 = 300.0;
const AHI_STANDARD: f32 = 250.0;
/// Instep-height-to-length ratio categories, used when only the raw
/// instep height is available.
const INSTEP_RATIO_HIGH: f32 = 0.27;
const INSTEP_RATIO_STANDARD: f32 = 0.23;

impl TemplateDescriptor {
    pub fn describe_record(&self, record: &MeasurementRecord) -> FootDescription {
        let (size_category, size_advice) = if record.foot_length > LENGTH_LARGE {
            (
                "large",
                "Pick shoes with a roomy fit; cramped toe boxes will pinch a foot this long.",
            )
        } else if record.foot_length > LENGTH_STANDARD {
            (
                "standard",
                "Standard sizing charts should serve well for this foot.",
            )
        } else {
            (
                "small",
                "Favor snug-fitting shoes; loose footwear will slip on a foot this short.",
            )
        };

        let ratio = if record.foot_length > 0.0 {
            record.foot_width / record.foot_length
        } else {
            0.0
        };
        let (width_category, width_advice) = if ratio > RATIO_WIDE {
            (
                "wide",
                "A wide foot: look for E to 4E width fittings.",
            )
        } else if ratio > RATIO_STANDARD {
            (
                "standard-width",
                "A standard width: D or E fittings are appropriate.",
            )
        } else {
            (
                "narrow",
                "A narrow foot: B or C width fittings will hold the heel best.",
            )
        };

        let instep_note = instep_note(record);

        let overview = format!(
            "This is a {} sized, {} foot with a {:.1} mm girth.",
            size_category, width_category, record.circumference
        );
        let shape_features = format!(
            "Foot length {:.1} mm, width {:.1} mm ({} category). {}",
            record.foot_length, record.foot_width, size_category, instep_note
        );
        let shoe_advice = format!("{} {}", size_advice, width_advice);
        let health_notes = "Regular foot care and properly fitted shoes help keep feet \
                            healthy. See a specialist if walking is painful."
            .to_string();

        let full_description = format!(
            "Foot measurement analysis\n\
             \n\
             Overview\n{}\n\
             \n\
             Shape\n{}\n\
             \n\
             Shoe advice\n{}\n\
             \n\
             Health notes\n{}\n",
            overview, shape_features, shoe_advice, health_notes
        );

        FootDescription {
            overview,
            shape_features,
            shoe_advice,
            health_notes,
            full_description,
        }
    }
}

fn instep_note(record: &MeasurementRecord) -> String {
    if let Some(ahi) = record.ahi {
        return if ahi > AHI_HIGH {
            format!("An arch height index of {:.1} indicates a high instep; allow extra room over the midfoot.", ahi)
        } else if ahi > AHI_STANDARD {
            format!("An arch height index of {:.1} is in the standard range.", ahi)
        } else {
            format!("An arch height index of {:.1} indicates a low instep; a close-fitting upper is advisable.", ahi)
        };
    }

    if let (Some(height), true) = (record.dorsum_height_50, record.foot_length > 0.0) {
        let ratio = height / record.foot_length;
        return if ratio > INSTEP_RATIO_HIGH {
            format!("The {:.1} mm instep height is high for this length.", height)
        } else if ratio > INSTEP_RATIO_STANDARD {
            format!("The {:.1} mm instep height is typical for this length.", height)
        } else {
            format!("The {:.1} mm instep height is low for this length.", height)
        };
    }

    "Instep height was not captured in this scan.".to_string()
}

impl DescriptionSource for TemplateDescriptor {
    fn describe(&self, record: &MeasurementRecord) -> Result<FootDescription, DescriptionError> {
        Ok(self.describe_record(record))
    }
}
