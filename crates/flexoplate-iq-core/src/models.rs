//! Core data models for the plate catalog.
//!
//! A [`PlateSpec`] describes one physical plate product: its physical
//! dimensions, processing chemistry, screening capability, compatibility
//! sets, and the UV energy constants published by the supplier. The core
//! only ever reads these records.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Plate-processing chemistry family.
///
/// Plates from different families cannot share a processing line, so this
/// is a hard compatibility constraint rather than a scored attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Solvent,
    Thermal,
    WaterWash,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessType::Solvent => "solvent",
            ProcessType::Thermal => "thermal",
            ProcessType::WaterWash => "water_wash",
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProcessType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "solvent" => Ok(ProcessType::Solvent),
            "thermal" => Ok(ProcessType::Thermal),
            "water_wash" | "water" => Ok(ProcessType::WaterWash),
            other => Err(CoreError::invalid(format!(
                "unknown process type '{}'; expected solvent, thermal, or water_wash",
                other
            ))),
        }
    }
}

/// Dot-top geometry of the printing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    FlatTop,
    RoundTop,
    Microcell,
    Textured,
}

impl SurfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceType::FlatTop => "flat_top",
            SurfaceType::RoundTop => "round_top",
            SurfaceType::Microcell => "microcell",
            SurfaceType::Textured => "textured",
        }
    }
}

impl std::str::FromStr for SurfaceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "flat_top" => Ok(SurfaceType::FlatTop),
            "round_top" => Ok(SurfaceType::RoundTop),
            "microcell" => Ok(SurfaceType::Microcell),
            "textured" => Ok(SurfaceType::Textured),
            other => Err(CoreError::invalid(format!(
                "unknown surface type '{}'; expected flat_top, round_top, microcell, or textured",
                other
            ))),
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagingType {
    Digital,
    Analog,
}

impl fmt::Display for ImagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagingType::Digital => f.write_str("digital"),
            ImagingType::Analog => f.write_str("analog"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// One plate product as stored in the catalog.
///
/// Energy values are in mJ/cm², lengths in millimetres, hardness in
/// Shore A. Every optional field may be absent; absence means "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateSpec {
    #[serde(default)]
    pub id: String,
    pub supplier_name: String,
    pub family_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub sku_code: Option<String>,

    pub thickness_mm: f64,
    #[serde(default)]
    pub hardness_shore: Option<f64>,
    pub process_type: ProcessType,
    #[serde(default)]
    pub surface_type: Option<SurfaceType>,
    #[serde(default)]
    pub imaging_type: Option<ImagingType>,

    #[serde(default)]
    pub min_lpi: Option<u32>,
    #[serde(default)]
    pub max_lpi: Option<u32>,

    #[serde(default)]
    pub ink_compatibility: BTreeSet<String>,
    #[serde(default)]
    pub applications: BTreeSet<String>,
    #[serde(default)]
    pub substrate_categories: BTreeSet<String>,

    #[serde(default)]
    pub main_exposure_energy_min_mj_cm2: Option<f64>,
    #[serde(default)]
    pub main_exposure_energy_max_mj_cm2: Option<f64>,
    #[serde(default)]
    pub back_exposure_energy_min_mj_cm2: Option<f64>,
    #[serde(default)]
    pub back_exposure_energy_max_mj_cm2: Option<f64>,
    #[serde(default)]
    pub post_exposure_energy_mj_cm2: Option<f64>,
    #[serde(default)]
    pub detack_energy_mj_cm2: Option<f64>,
    #[serde(default)]
    pub relief_recommended_mm: Option<f64>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl PlateSpec {
    /// A plate with only the required attributes set.
    pub fn new(
        id: impl Into<String>,
        supplier_name: impl Into<String>,
        family_name: impl Into<String>,
        thickness_mm: f64,
        process_type: ProcessType,
    ) -> Self {
        Self {
            id: id.into(),
            supplier_name: supplier_name.into(),
            family_name: family_name.into(),
            display_name: None,
            sku_code: None,
            thickness_mm,
            hardness_shore: None,
            process_type,
            surface_type: None,
            imaging_type: None,
            min_lpi: None,
            max_lpi: None,
            ink_compatibility: BTreeSet::new(),
            applications: BTreeSet::new(),
            substrate_categories: BTreeSet::new(),
            main_exposure_energy_min_mj_cm2: None,
            main_exposure_energy_max_mj_cm2: None,
            back_exposure_energy_min_mj_cm2: None,
            back_exposure_energy_max_mj_cm2: None,
            post_exposure_energy_mj_cm2: None,
            detack_energy_mj_cm2: None,
            relief_recommended_mm: None,
            is_active: true,
        }
    }

    /// Human-facing name: the display name when set, else the family name.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.family_name)
    }

    /// Both ends of the supported screen-ruling range, when known.
    pub fn lpi_range(&self) -> Option<(u32, u32)> {
        match (self.min_lpi, self.max_lpi) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// Check catalog invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::invalid("plate id must not be empty"));
        }
        if self.supplier_name.trim().is_empty() {
            return Err(CoreError::invalid(format!(
                "plate {}: supplier_name must not be empty",
                self.id
            )));
        }
        if !self.thickness_mm.is_finite() || self.thickness_mm <= 0.0 {
            return Err(CoreError::invalid(format!(
                "plate {}: thickness_mm must be > 0 (got {})",
                self.id, self.thickness_mm
            )));
        }
        if let Some(h) = self.hardness_shore {
            if !h.is_finite() || !(0.0..=100.0).contains(&h) {
                return Err(CoreError::invalid(format!(
                    "plate {}: hardness_shore must be within 0-100 Shore A (got {})",
                    self.id, h
                )));
            }
        }
        if let Some((lo, hi)) = self.lpi_range() {
            if lo > hi {
                return Err(CoreError::invalid(format!(
                    "plate {}: min_lpi ({}) exceeds max_lpi ({})",
                    self.id, lo, hi
                )));
            }
        }

        let energies = [
            ("main_exposure_energy_min_mj_cm2", self.main_exposure_energy_min_mj_cm2),
            ("main_exposure_energy_max_mj_cm2", self.main_exposure_energy_max_mj_cm2),
            ("back_exposure_energy_min_mj_cm2", self.back_exposure_energy_min_mj_cm2),
            ("back_exposure_energy_max_mj_cm2", self.back_exposure_energy_max_mj_cm2),
            ("post_exposure_energy_mj_cm2", self.post_exposure_energy_mj_cm2),
            ("detack_energy_mj_cm2", self.detack_energy_mj_cm2),
            ("relief_recommended_mm", self.relief_recommended_mm),
        ];
        for (field, value) in energies {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CoreError::invalid(format!(
                        "plate {}: {} must be a non-negative number (got {})",
                        self.id, field, v
                    )));
                }
            }
        }

        check_range(
            &self.id,
            "main exposure",
            self.main_exposure_energy_min_mj_cm2,
            self.main_exposure_energy_max_mj_cm2,
        )?;
        check_range(
            &self.id,
            "back exposure",
            self.back_exposure_energy_min_mj_cm2,
            self.back_exposure_energy_max_mj_cm2,
        )?;

        Ok(())
    }
}

fn check_range(id: &str, label: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(CoreError::invalid(format!(
                "plate {}: {} energy minimum ({}) exceeds maximum ({})",
                id, label, lo, hi
            )));
        }
    }
    Ok(())
}

/// Display projection of a plate used in equivalency responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateSummary {
    pub id: String,
    pub name: String,
    pub sku_code: Option<String>,
    pub supplier: String,
    pub family: String,
    pub thickness_mm: f64,
    pub hardness_shore: Option<f64>,
    pub process_type: ProcessType,
    pub surface_type: Option<SurfaceType>,
    pub imaging_type: Option<ImagingType>,
    pub min_lpi: Option<u32>,
    pub max_lpi: Option<u32>,
}

impl From<&PlateSpec> for PlateSummary {
    fn from(p: &PlateSpec) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name().to_string(),
            sku_code: p.sku_code.clone(),
            supplier: p.supplier_name.clone(),
            family: p.family_name.clone(),
            thickness_mm: p.thickness_mm,
            hardness_shore: p.hardness_shore,
            process_type: p.process_type,
            surface_type: p.surface_type,
            imaging_type: p.imaging_type,
            min_lpi: p.min_lpi,
            max_lpi: p.max_lpi,
        }
    }
}

/// One supplier in the catalog with its active plate count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierSummary {
    pub name: String,
    /// Active plates only; a supplier whose plates are all retired shows 0.
    pub plate_count: usize,
}

/// One plate family, keyed by supplier, family name and process type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilySummary {
    pub supplier: String,
    pub family: String,
    pub process_type: ProcessType,
    pub plate_count: usize,
}
