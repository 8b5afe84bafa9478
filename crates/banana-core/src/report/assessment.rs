//! Plain-language interpretation of the segmented volume.
//!
//! Demo heuristics only: the tiers and analogies carry no clinical meaning.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::MM3_PER_ML;
use crate::segment::SegmentationStats;

/// Screening tier derived from the segmented volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Illustrative percentage shown next to the tier.
    pub fn percent(&self) -> f64 {
        match self {
            Self::VeryLow => 2.0,
            Self::Low => 20.0,
            Self::Moderate => 55.0,
            Self::High => 85.0,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::High => {
                "Arrange contrast-enhanced CT or MRI promptly and see a hepatobiliary or \
                 oncology specialist; multidisciplinary review and biopsy if indicated."
            }
            Self::Moderate => {
                "Book an outpatient follow-up with contrast-enhanced CT or MRI and interpret \
                 the result together with tumour markers and history."
            }
            Self::Low | Self::VeryLow => {
                "Routine follow-up, or assess together with symptoms and history; seek care \
                 promptly if anything feels wrong."
            }
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryLow => write!(f, "Very low"),
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Tier for a region of `volume_ml` made of `clean_voxels` voxels.
pub fn risk_level(volume_ml: f64, clean_voxels: usize) -> RiskLevel {
    if clean_voxels == 0 || volume_ml <= 1.0 {
        RiskLevel::VeryLow
    } else if volume_ml >= 1000.0 {
        RiskLevel::High
    } else if volume_ml >= 200.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Equal-volume sphere expressed as an everyday object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeAnalogy {
    pub label: String,
    /// Rounded to 0.1 cm.
    pub diameter_cm: f64,
    /// Rounded to 0.1 cm.
    pub radius_cm: f64,
}

/// Diameter of the sphere holding `volume_ml` (1 ml = 1 cm³) and its analogy.
pub fn size_analogy(volume_ml: f64) -> SizeAnalogy {
    if volume_ml <= 0.0 {
        return SizeAnalogy {
            label: "smaller than a grain of rice".into(),
            diameter_cm: 0.2,
            radius_cm: 0.1,
        };
    }
    let radius = (volume_ml * 3.0 / (4.0 * PI)).cbrt();
    let diameter = 2.0 * radius;
    let label = match diameter {
        d if d < 1.0 => "a grain of rice",
        d if d < 2.0 => "a soybean",
        d if d < 3.5 => "a peanut or grape",
        d if d < 4.5 => "a ping-pong ball or small walnut",
        d if d < 6.0 => "an egg",
        d if d < 8.0 => "an orange",
        _ => "a tennis ball or larger",
    };
    SizeAnalogy {
        label: label.into(),
        diameter_cm: round1(diameter),
        radius_cm: round1(radius),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Physical size and screening tier of the clean mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub voxel_volume_mm3: f64,
    pub volume_mm3: f64,
    pub volume_ml: f64,
    pub risk: RiskLevel,
    pub risk_pct: f64,
    pub size: SizeAnalogy,
    pub recommendation: String,
}

/// Scale the clean voxel count by the voxel volume and interpret it.
pub fn assess(stats: &SegmentationStats, voxel_volume_mm3: f64) -> Assessment {
    let volume_mm3 = voxel_volume_mm3 * stats.voxels_clean as f64;
    let volume_ml = volume_mm3 / MM3_PER_ML;
    let risk = risk_level(volume_ml, stats.voxels_clean);
    Assessment {
        voxel_volume_mm3,
        volume_mm3,
        volume_ml,
        risk,
        risk_pct: risk.percent(),
        size: size_analogy(volume_ml),
        recommendation: risk.recommendation().to_string(),
    }
}
