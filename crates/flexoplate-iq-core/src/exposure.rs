//! UV exposure-time calculation.
//!
//! The governing relation is `time (s) = energy (mJ/cm²) / intensity
//! (mW/cm²)`, since 1 mW·s = 1 mJ. Supplier energy ranges are converted to
//! a midpoint recommendation plus a min/max window at the effective lamp
//! intensity.
//!
//! # Algorithm
//!
//! 1. Lamp aging: `factor = max(0.5, 1 - hours / 10000)` when an age is
//!    given; `effective = measured × factor`.
//! 2. Main and back exposure: midpoint energy / effective intensity, with the
//!    range endpoints reported separately.
//! 3. Floor targeting: when the desired relief is shallower than the
//!    recommended relief, back exposure is lengthened by up to 20%.
//! 4. Post-exposure and detack: `energy / effective` independently.
//!
//! Missing energy data leaves the corresponding time unset; no default
//! energies are substituted.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::models::{PlateSpec, ProcessType};

/// Lamp hours at which output is modelled as fully degraded.
pub const LAMP_RATED_LIFE_HOURS: f64 = 10_000.0;
/// Floor on the degradation factor (50% of nominal output).
pub const MIN_DEGRADATION_FACTOR: f64 = 0.5;
/// Recommended relief as a fraction of plate thickness when unpublished.
pub const DEFAULT_RELIEF_RATIO: f64 = 0.6;
/// Maximum fractional boost applied to back exposure for floor targeting.
pub const MAX_BACK_BOOST: f64 = 0.2;

/// A supplier energy window in mJ/cm².
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
}

impl EnergyRange {
    /// Both ends must be present to form a range.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Self { min, max }),
            _ => None,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// All inputs to [`calculate_exposure`].
#[derive(Debug, Clone, Default)]
pub struct ExposureInput {
    pub main_energy: Option<EnergyRange>,
    pub back_energy: Option<EnergyRange>,
    pub post_energy_mj_cm2: Option<f64>,
    pub detack_energy_mj_cm2: Option<f64>,
    pub process_type: Option<ProcessType>,
    pub plate_thickness_mm: Option<f64>,
    pub recommended_relief_mm: Option<f64>,
    pub measured_intensity_mw_cm2: f64,
    pub lamp_age_hours: Option<f64>,
    pub target_floor_mm: Option<f64>,
}

impl ExposureInput {
    /// Take energies, chemistry and geometry from a catalog plate.
    pub fn from_plate(plate: &PlateSpec, measured_intensity_mw_cm2: f64) -> Self {
        Self {
            main_energy: EnergyRange::from_bounds(
                plate.main_exposure_energy_min_mj_cm2,
                plate.main_exposure_energy_max_mj_cm2,
            ),
            back_energy: EnergyRange::from_bounds(
                plate.back_exposure_energy_min_mj_cm2,
                plate.back_exposure_energy_max_mj_cm2,
            ),
            post_energy_mj_cm2: plate.post_exposure_energy_mj_cm2,
            detack_energy_mj_cm2: plate.detack_energy_mj_cm2,
            process_type: Some(plate.process_type),
            plate_thickness_mm: Some(plate.thickness_mm),
            recommended_relief_mm: plate.relief_recommended_mm,
            measured_intensity_mw_cm2,
            lamp_age_hours: None,
            target_floor_mm: None,
        }
    }

    pub fn with_lamp_age(mut self, hours: Option<f64>) -> Self {
        self.lamp_age_hours = hours;
        self
    }

    pub fn with_target_floor(mut self, floor_mm: Option<f64>) -> Self {
        self.target_floor_mm = floor_mm;
        self
    }

    fn validate(&self) -> Result<()> {
        let intensity = self.measured_intensity_mw_cm2;
        if !intensity.is_finite() || intensity <= 0.0 {
            return Err(CoreError::invalid(format!(
                "UV intensity must be > 0 mW/cm² (got {})",
                intensity
            )));
        }
        if let Some(age) = self.lamp_age_hours {
            if !age.is_finite() || age < 0.0 {
                return Err(CoreError::invalid(format!(
                    "lamp age must be >= 0 hours (got {})",
                    age
                )));
            }
        }
        for range in [self.main_energy, self.back_energy].into_iter().flatten() {
            if !range.min.is_finite() || !range.max.is_finite() || range.min < 0.0 || range.max < range.min {
                return Err(CoreError::invalid(format!(
                    "energy range {}-{} mJ/cm² is malformed",
                    range.min, range.max
                )));
            }
        }
        for energy in [self.post_energy_mj_cm2, self.detack_energy_mj_cm2]
            .into_iter()
            .flatten()
        {
            if !energy.is_finite() || energy < 0.0 {
                return Err(CoreError::invalid(format!(
                    "energy must be >= 0 mJ/cm² (got {})",
                    energy
                )));
            }
        }
        if let Some(thickness) = self.plate_thickness_mm {
            if !thickness.is_finite() || thickness <= 0.0 {
                return Err(CoreError::invalid(format!(
                    "plate thickness must be > 0 mm (got {})",
                    thickness
                )));
            }
        }
        if let Some(floor) = self.target_floor_mm {
            if !floor.is_finite() || floor < 0.0 {
                return Err(CoreError::invalid(format!(
                    "target floor must be >= 0 mm (got {})",
                    floor
                )));
            }
            if let Some(thickness) = self.plate_thickness_mm {
                if floor >= thickness {
                    return Err(CoreError::invalid(format!(
                        "target floor {}mm must be thinner than the {}mm plate",
                        floor, thickness
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Computed exposure times in seconds, rounded to 0.1 s.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExposureTimes {
    pub main_exposure_time_s: Option<f64>,
    pub main_exposure_range_s: Option<(f64, f64)>,
    pub back_exposure_time_s: Option<f64>,
    pub back_exposure_range_s: Option<(f64, f64)>,
    pub post_exposure_time_s: Option<f64>,
    pub detack_time_s: Option<f64>,
}

/// Output of [`calculate_exposure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureResult {
    pub exposure: ExposureTimes,
    pub degradation_factor: f64,
    pub effective_intensity_mw_cm2: f64,
    /// Multiplier applied to back exposure for floor targeting, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_adjustment_factor: Option<f64>,
    pub notes: Vec<String>,
}

/// Lamp output multiplier for a given age.
///
/// Decays linearly over [`LAMP_RATED_LIFE_HOURS`] and never drops below
/// [`MIN_DEGRADATION_FACTOR`].
pub fn degradation_factor(lamp_age_hours: Option<f64>) -> f64 {
    match lamp_age_hours {
        Some(age) if age > 0.0 => {
            (1.0 - age / LAMP_RATED_LIFE_HOURS).max(MIN_DEGRADATION_FACTOR)
        }
        _ => 1.0,
    }
}

/// Compute exposure recommendations.
pub fn calculate_exposure(input: &ExposureInput) -> Result<ExposureResult> {
    input.validate()?;

    let factor = degradation_factor(input.lamp_age_hours);
    let intensity = input.measured_intensity_mw_cm2 * factor;
    if !intensity.is_finite() || intensity <= 0.0 {
        return Err(CoreError::invalid(format!(
            "effective intensity must be > 0 mW/cm² (got {})",
            intensity
        )));
    }

    let mut notes = Vec::new();
    let mut times = ExposureTimes::default();

    if let Some(main) = input.main_energy {
        times.main_exposure_time_s = Some(round1(main.midpoint() / intensity));
        times.main_exposure_range_s = Some((round1(main.min / intensity), round1(main.max / intensity)));
        notes.push(format!(
            "Main exposure based on {:.0}-{:.0} mJ/cm²",
            main.min, main.max
        ));
    }

    let mut back_adjustment_factor = None;
    if let Some(back) = input.back_energy {
        let mut back_time = back.midpoint() / intensity;
        times.back_exposure_range_s = Some((round1(back.min / intensity), round1(back.max / intensity)));
        notes.push(format!(
            "Back exposure based on {:.0}-{:.0} mJ/cm²",
            back.min, back.max
        ));

        if let (Some(floor), Some(thickness)) = (input.target_floor_mm, input.plate_thickness_mm) {
            let target_relief = thickness - floor;
            let recommended = input
                .recommended_relief_mm
                .filter(|r| *r > 0.0)
                .unwrap_or(thickness * DEFAULT_RELIEF_RATIO);
            if target_relief < recommended {
                let adjustment = 1.0 + (recommended - target_relief) / recommended * MAX_BACK_BOOST;
                back_time *= adjustment;
                back_adjustment_factor = Some(adjustment);
                notes.push(format!(
                    "Back exposure adjusted for {}mm floor target",
                    floor
                ));
            }
        }
        times.back_exposure_time_s = Some(round1(back_time));
    }

    times.post_exposure_time_s = input.post_energy_mj_cm2.map(|e| round1(e / intensity));
    times.detack_time_s = input.detack_energy_mj_cm2.map(|e| round1(e / intensity));

    if input.lamp_age_hours.is_some_and(|age| age > 0.0) {
        notes.push(format!("Lamp degradation factor applied: {:.2}", factor));
        notes.push(format!(
            "Calculated at {:.1} mW/cm² effective intensity ({:.1} mW/cm² measured)",
            intensity, input.measured_intensity_mw_cm2
        ));
    } else {
        notes.push("No lamp age adjustment".to_string());
        notes.push(format!(
            "Calculated at {:.1} mW/cm² measured intensity",
            input.measured_intensity_mw_cm2
        ));
    }
    if input.process_type == Some(ProcessType::Thermal) {
        notes.push("Thermal plate - no solvent washout required".to_string());
    }
    notes.push("Always run a step test to verify".to_string());

    Ok(ExposureResult {
        exposure: times,
        degradation_factor: factor,
        effective_intensity_mw_cm2: intensity,
        back_adjustment_factor,
        notes,
    })
}

/// Inputs for a catalog-backed exposure calculation.
#[derive(Debug, Clone)]
pub struct ExposureRequest {
    pub plate_id: String,
    pub current_intensity_mw_cm2: f64,
    pub lamp_age_hours: Option<f64>,
    pub target_floor_mm: Option<f64>,
}

/// Plate identity echoed back with an exposure report.
#[derive(Debug, Clone, Serialize)]
pub struct ExposurePlate {
    pub id: String,
    pub name: String,
    pub supplier: String,
    pub thickness_mm: f64,
    pub process_type: ProcessType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExposureInputEcho {
    pub intensity_mw_cm2: f64,
    pub lamp_age_hours: Option<f64>,
    pub effective_intensity_mw_cm2: f64,
    pub target_floor_mm: Option<f64>,
}

/// Response shape of a catalog-backed exposure calculation.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureReport {
    pub plate: ExposurePlate,
    pub exposure: ExposureTimes,
    pub notes: Vec<String>,
    pub input: ExposureInputEcho,
}

/// Resolve a plate in the catalog and compute its exposure times.
pub async fn calculate_plate_exposure<C: Catalog + ?Sized>(
    catalog: &C,
    req: &ExposureRequest,
) -> Result<ExposureReport> {
    let plate = catalog
        .get_plate(&req.plate_id)
        .await?
        .ok_or_else(|| CoreError::plate_not_found(&req.plate_id))?;

    let input = ExposureInput::from_plate(&plate, req.current_intensity_mw_cm2)
        .with_lamp_age(req.lamp_age_hours)
        .with_target_floor(req.target_floor_mm);
    let result = calculate_exposure(&input)?;

    Ok(ExposureReport {
        plate: ExposurePlate {
            id: plate.id.clone(),
            name: plate.name().to_string(),
            supplier: plate.supplier_name.clone(),
            thickness_mm: plate.thickness_mm,
            process_type: plate.process_type,
        },
        exposure: result.exposure,
        notes: result.notes,
        input: ExposureInputEcho {
            intensity_mw_cm2: req.current_intensity_mw_cm2,
            lamp_age_hours: req.lamp_age_hours,
            effective_intensity_mw_cm2: round1(result.effective_intensity_mw_cm2),
            target_floor_mm: req.target_floor_mm,
        },
    })
}

/// Exposure time rescaled for a change in lamp intensity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledExposure {
    pub reference_time_s: f64,
    pub reference_intensity_mw_cm2: f64,
    pub current_intensity_mw_cm2: f64,
    pub scaled_time_s: f64,
    pub intensity_change_percent: f64,
}

/// Rescale a known-good exposure time to a new lamp intensity.
///
/// Delivered energy is held constant, so time scales inversely with
/// intensity.
pub fn scale_exposure_time(
    reference_time_s: f64,
    reference_intensity_mw_cm2: f64,
    current_intensity_mw_cm2: f64,
) -> Result<ScaledExposure> {
    if !reference_time_s.is_finite() || reference_time_s < 0.0 {
        return Err(CoreError::invalid(format!(
            "reference time must be >= 0 s (got {})",
            reference_time_s
        )));
    }
    for (label, value) in [
        ("reference", reference_intensity_mw_cm2),
        ("current", current_intensity_mw_cm2),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::invalid(format!(
                "{} intensity must be > 0 mW/cm² (got {})",
                label, value
            )));
        }
    }

    let scaled = reference_time_s * (reference_intensity_mw_cm2 / current_intensity_mw_cm2);
    let change = (current_intensity_mw_cm2 - reference_intensity_mw_cm2)
        / reference_intensity_mw_cm2
        * 100.0;

    Ok(ScaledExposure {
        reference_time_s,
        reference_intensity_mw_cm2,
        current_intensity_mw_cm2,
        scaled_time_s: round1(scaled),
        intensity_change_percent: round1(change),
    })
}

/// Format seconds as `m:ss` for operator display.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::InMemoryCatalog;

    fn input(intensity: f64) -> ExposureInput {
        ExposureInput {
            main_energy: Some(EnergyRange {
                min: 800.0,
                max: 1200.0,
            }),
            measured_intensity_mw_cm2: intensity,
            ..Default::default()
        }
    }

    #[test]
    fn test_main_exposure_midpoint() {
        let result = calculate_exposure(&input(20.0)).unwrap();
        assert_eq!(result.exposure.main_exposure_time_s, Some(50.0));
        assert_eq!(result.exposure.main_exposure_range_s, Some((40.0, 60.0)));
        assert_eq!(result.degradation_factor, 1.0);
        assert!(result
            .notes
            .contains(&"Main exposure based on 800-1200 mJ/cm²".to_string()));
    }

    #[test]
    fn test_degradation_factor_clamps() {
        assert_eq!(degradation_factor(None), 1.0);
        assert_eq!(degradation_factor(Some(0.0)), 1.0);
        assert!((degradation_factor(Some(2000.0)) - 0.8).abs() < 1e-12);
        assert_eq!(degradation_factor(Some(10_000.0)), 0.5);
        assert_eq!(degradation_factor(Some(20_000.0)), 0.5);
    }

    #[test]
    fn test_lamp_age_lengthens_exposure() {
        let result = calculate_exposure(&input(20.0).with_lamp_age(Some(2000.0))).unwrap();
        assert!((result.effective_intensity_mw_cm2 - 16.0).abs() < 1e-9);
        assert_eq!(result.exposure.main_exposure_time_s, Some(62.5));
        assert!(result
            .notes
            .contains(&"Lamp degradation factor applied: 0.80".to_string()));
    }

    #[test]
    fn test_back_exposure_floor_adjustment() {
        let mut inp = input(20.0);
        inp.back_energy = Some(EnergyRange {
            min: 150.0,
            max: 250.0,
        });
        inp.plate_thickness_mm = Some(1.14);
        inp.recommended_relief_mm = Some(0.6);

        let plain = calculate_exposure(&inp).unwrap();
        assert_eq!(plain.exposure.back_exposure_time_s, Some(10.0));
        assert_eq!(plain.exposure.back_exposure_range_s, Some((7.5, 12.5)));
        assert!(plain.back_adjustment_factor.is_none());

        let adjusted = calculate_exposure(&inp.clone().with_target_floor(Some(0.84))).unwrap();
        assert_eq!(adjusted.exposure.back_exposure_time_s, Some(11.0));
        assert!((adjusted.back_adjustment_factor.unwrap() - 1.1).abs() < 1e-9);
        assert!(adjusted
            .notes
            .contains(&"Back exposure adjusted for 0.84mm floor target".to_string()));

        let shallow = calculate_exposure(&inp.with_target_floor(Some(0.3))).unwrap();
        assert_eq!(shallow.exposure.back_exposure_time_s, Some(10.0));
    }

    #[test]
    fn test_back_boost_never_exceeds_cap() {
        let inp = ExposureInput {
            back_energy: Some(EnergyRange {
                min: 200.0,
                max: 200.0,
            }),
            plate_thickness_mm: Some(1.14),
            measured_intensity_mw_cm2: 20.0,
            target_floor_mm: Some(1.139),
            ..Default::default()
        };
        let result = calculate_exposure(&inp).unwrap();
        let factor = result.back_adjustment_factor.unwrap();
        assert!(factor > 1.0 && factor <= 1.0 + MAX_BACK_BOOST);
    }

    #[test]
    fn test_missing_energies_are_none() {
        let inp = ExposureInput {
            measured_intensity_mw_cm2: 18.0,
            ..Default::default()
        };
        let result = calculate_exposure(&inp).unwrap();
        assert_eq!(result.exposure, ExposureTimes::default());
    }

    #[test]
    fn test_post_and_detack() {
        let inp = ExposureInput {
            post_energy_mj_cm2: Some(1000.0),
            detack_energy_mj_cm2: Some(800.0),
            measured_intensity_mw_cm2: 20.0,
            ..Default::default()
        };
        let result = calculate_exposure(&inp).unwrap();
        assert_eq!(result.exposure.post_exposure_time_s, Some(50.0));
        assert_eq!(result.exposure.detack_time_s, Some(40.0));
        assert!(result.exposure.main_exposure_time_s.is_none());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            calculate_exposure(&input(0.0)),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(calculate_exposure(&input(-5.0)).is_err());
        assert!(calculate_exposure(&input(f64::NAN)).is_err());
        assert!(calculate_exposure(&input(20.0).with_lamp_age(Some(-1.0))).is_err());

        let mut inp = input(20.0);
        inp.plate_thickness_mm = Some(1.14);
        assert!(calculate_exposure(&inp.clone().with_target_floor(Some(1.14))).is_err());
        assert!(calculate_exposure(&inp.with_target_floor(Some(-0.1))).is_err());
    }

    #[test]
    fn test_thermal_note() {
        let mut inp = input(20.0);
        inp.process_type = Some(ProcessType::Thermal);
        let result = calculate_exposure(&inp).unwrap();
        assert!(result
            .notes
            .contains(&"Thermal plate - no solvent washout required".to_string()));
    }

    #[test]
    fn test_deterministic() {
        let inp = input(17.3).with_lamp_age(Some(1234.0));
        assert_eq!(calculate_exposure(&inp).unwrap(), calculate_exposure(&inp).unwrap());
    }

    #[test]
    fn test_scale_exposure_time() {
        let scaled = scale_exposure_time(60.0, 20.0, 15.0).unwrap();
        assert_eq!(scaled.scaled_time_s, 80.0);
        assert_eq!(scaled.intensity_change_percent, -25.0);
        assert!(scale_exposure_time(60.0, 20.0, 0.0).is_err());
        assert!(scale_exposure_time(60.0, 0.0, 20.0).is_err());
        assert!(scale_exposure_time(-1.0, 20.0, 20.0).is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125.4), "2:05");
        assert_eq!(format_duration(50.0), "0:50");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[tokio::test]
    async fn test_calculate_plate_exposure() {
        let mut plate = PlateSpec::new("p1", "DuPont", "Cyrel", 1.14, ProcessType::Solvent);
        plate.main_exposure_energy_min_mj_cm2 = Some(800.0);
        plate.main_exposure_energy_max_mj_cm2 = Some(1200.0);
        let catalog = InMemoryCatalog::from_plates(vec![plate]).unwrap();

        let req = ExposureRequest {
            plate_id: "p1".into(),
            current_intensity_mw_cm2: 20.0,
            lamp_age_hours: None,
            target_floor_mm: None,
        };
        let report = calculate_plate_exposure(&catalog, &req).await.unwrap();
        assert_eq!(report.exposure.main_exposure_time_s, Some(50.0));
        assert_eq!(report.plate.supplier, "DuPont");
        assert_eq!(report.input.effective_intensity_mw_cm2, 20.0);

        let missing = ExposureRequest {
            plate_id: "nope".into(),
            ..req
        };
        let err = calculate_plate_exposure(&catalog, &missing).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
