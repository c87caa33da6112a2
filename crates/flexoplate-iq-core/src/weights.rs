//! Scoring weights and tolerances for plate equivalency.
//!
//! Weights are a configuration value handed to every scoring call, never a
//! global. Missing keys in a config table fall back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Per-dimension weights plus the two tolerance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalencyWeights {
    pub thickness: f64,
    pub process_type: f64,
    pub hardness: f64,
    pub surface_type: f64,
    pub lpi_range: f64,
    pub application: f64,
    pub ink_compat: f64,
    /// Largest hardness difference (Shore A) that still earns credit.
    pub hardness_tolerance: f64,
    /// Largest thickness difference (mm) before a candidate is disqualified.
    pub thickness_tolerance_mm: f64,
}

impl Default for EquivalencyWeights {
    fn default() -> Self {
        Self {
            thickness: 40.0,
            process_type: 20.0,
            hardness: 15.0,
            surface_type: 10.0,
            lpi_range: 5.0,
            application: 5.0,
            ink_compat: 5.0,
            hardness_tolerance: 2.0,
            thickness_tolerance_mm: 0.05,
        }
    }
}

impl EquivalencyWeights {
    /// Sum of all dimension weights (context bonuses excluded).
    pub fn dimension_total(&self) -> f64 {
        self.thickness
            + self.process_type
            + self.hardness
            + self.surface_type
            + self.lpi_range
            + self.application
            + self.ink_compat
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("thickness", self.thickness),
            ("process_type", self.process_type),
            ("hardness", self.hardness),
            ("surface_type", self.surface_type),
            ("lpi_range", self.lpi_range),
            ("application", self.application),
            ("ink_compat", self.ink_compat),
        ];
        for (name, w) in dims {
            if !w.is_finite() || w < 0.0 {
                return Err(CoreError::invalid(format!(
                    "weight '{}' must be a non-negative number (got {})",
                    name, w
                )));
            }
        }
        if self.dimension_total() <= 0.0 {
            return Err(CoreError::invalid("at least one weight must be positive"));
        }
        if !self.hardness_tolerance.is_finite() || self.hardness_tolerance <= 0.0 {
            return Err(CoreError::invalid(format!(
                "hardness_tolerance must be > 0 (got {})",
                self.hardness_tolerance
            )));
        }
        if !self.thickness_tolerance_mm.is_finite() || self.thickness_tolerance_mm <= 0.0 {
            return Err(CoreError::invalid(format!(
                "thickness_tolerance_mm must be > 0 (got {})",
                self.thickness_tolerance_mm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        let w = EquivalencyWeights::default();
        assert!((w.dimension_total() - 100.0).abs() < 1e-9);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = EquivalencyWeights {
            hardness: -1.0,
            ..Default::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let w = EquivalencyWeights {
            thickness_tolerance_mm: 0.0,
            ..Default::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let w: EquivalencyWeights =
            serde_json::from_str(r#"{"thickness_tolerance_mm": 0.15}"#).unwrap();
        assert_eq!(w.thickness_tolerance_mm, 0.15);
        assert_eq!(w.thickness, 40.0);
    }
}
