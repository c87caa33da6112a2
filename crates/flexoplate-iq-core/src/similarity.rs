//! Pairwise plate similarity scoring.
//!
//! [`score_similarity`] compares a source plate with one candidate and
//! returns an integer score in `[0, 100]` plus human-readable match notes.
//! It is pure: no I/O, no shared state, identical inputs give identical
//! output.
//!
//! # Scoring Algorithm
//!
//! 1. Disqualify (score 0) on a process-type mismatch or a thickness
//!    difference beyond `thickness_tolerance_mm`.
//! 2. Accumulate weighted credit per dimension: thickness and hardness decay
//!    linearly to their tolerance, surface type is all-or-nothing, LPI uses
//!    interval overlap, applications and inks use Jaccard overlap.
//!    Unknown data earns neutral (half) credit instead of a penalty.
//! 3. Add fixed context bonuses for requested substrate, ink system, and
//!    application when the candidate lists them.
//! 4. Normalize: `min(100, round(100 × raw / max_possible))`, where
//!    `max_possible` is the weight sum plus [`MAX_CONTEXT_BONUS`]. The
//!    denominator is the same whether or not a context was supplied.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::PlateSpec;
use crate::weights::EquivalencyWeights;

/// Bonus when the candidate lists the requested substrate.
pub const SUBSTRATE_BONUS: f64 = 3.0;
/// Bonus when the candidate lists the requested ink system.
pub const INK_SYSTEM_BONUS: f64 = 2.0;
/// Bonus when the candidate lists the requested application.
pub const APPLICATION_BONUS: f64 = 3.0;
/// Sum of every context bonus; always part of the normalization denominator.
pub const MAX_CONTEXT_BONUS: f64 = SUBSTRATE_BONUS + INK_SYSTEM_BONUS + APPLICATION_BONUS;

/// Credit ratio for a dimension where either side is unknown.
const NEUTRAL_RATIO: f64 = 0.5;

/// Slack on the thickness disqualifier so decimal catalog values that sit
/// exactly on the tolerance are not rejected by float representation error.
const THICKNESS_EPSILON: f64 = 1e-9;

/// Optional job requirements supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub substrate: Option<String>,
    pub ink_system: Option<String>,
    pub application: Option<String>,
}

impl MatchContext {
    /// True when no criterion is named (blank strings count as unset).
    pub fn is_empty(&self) -> bool {
        requested(&self.substrate).is_none()
            && requested(&self.ink_system).is_none()
            && requested(&self.application).is_none()
    }
}

fn requested(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Consumer-facing quality bucket for a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MatchQuality {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => MatchQuality::Excellent,
            75..=89 => MatchQuality::Good,
            60..=74 => MatchQuality::Fair,
            _ => MatchQuality::Poor,
        }
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchQuality::Excellent => "Excellent",
            MatchQuality::Good => "Good",
            MatchQuality::Fair => "Fair",
            MatchQuality::Poor => "Poor",
        };
        f.write_str(s)
    }
}

/// Result of comparing one candidate against the source plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityScore {
    /// Normalized score in `[0, 100]`; 0 means disqualified.
    pub score: u8,
    pub notes: Vec<String>,
}

impl SimilarityScore {
    fn disqualified(note: String) -> Self {
        Self {
            score: 0,
            notes: vec![note],
        }
    }

    pub fn quality(&self) -> MatchQuality {
        MatchQuality::from_score(self.score)
    }

    pub fn is_disqualified(&self) -> bool {
        self.score == 0
    }
}

/// Score `candidate` as a replacement for `source`.
///
/// `weights` is expected to have passed [`EquivalencyWeights::validate`].
pub fn score_similarity(
    source: &PlateSpec,
    candidate: &PlateSpec,
    weights: &EquivalencyWeights,
    context: Option<&MatchContext>,
) -> SimilarityScore {
    if source.process_type != candidate.process_type {
        return SimilarityScore::disqualified(
            "Process type mismatch - not compatible".to_string(),
        );
    }

    let thickness_diff = (source.thickness_mm - candidate.thickness_mm).abs();
    if thickness_diff > weights.thickness_tolerance_mm + THICKNESS_EPSILON {
        return SimilarityScore::disqualified(format!(
            "Thickness difference ({:.2}mm) exceeds tolerance",
            thickness_diff
        ));
    }

    let mut notes = Vec::new();
    let mut raw = 0.0;

    raw += linear_decay(
        weights.thickness,
        thickness_diff,
        weights.thickness_tolerance_mm,
    );

    raw += weights.process_type;

    match (source.hardness_shore, candidate.hardness_shore) {
        (Some(src_h), Some(cand_h)) => {
            let diff = (src_h - cand_h).abs();
            if diff <= weights.hardness_tolerance {
                raw += linear_decay(weights.hardness, diff, weights.hardness_tolerance);
                if diff > 1.0 {
                    let direction = if cand_h > src_h { "harder" } else { "softer" };
                    notes.push(format!(
                        "Slightly {} ({:.0} Shore difference)",
                        direction, diff
                    ));
                }
            } else {
                notes.push(format!(
                    "Significant hardness difference ({:.0} Shore) - may affect ink transfer",
                    diff
                ));
            }
        }
        _ => raw += weights.hardness * NEUTRAL_RATIO,
    }

    if let (Some(src_s), Some(cand_s)) = (source.surface_type, candidate.surface_type) {
        if src_s == cand_s {
            raw += weights.surface_type;
        } else {
            notes.push(format!("Different surface type: {} vs {}", cand_s, src_s));
        }
    }

    let lpi_ratio = range_overlap(source.lpi_range(), candidate.lpi_range());
    raw += weights.lpi_range * lpi_ratio;
    if lpi_ratio < NEUTRAL_RATIO && source.lpi_range().is_some() && candidate.lpi_range().is_some()
    {
        notes.push("Limited LPI overlap - verify screen ruling compatibility".to_string());
    }

    raw += weights.application * set_overlap(&source.applications, &candidate.applications);
    raw += weights.ink_compat * set_overlap(&source.ink_compatibility, &candidate.ink_compatibility);

    let max_possible = weights.dimension_total() + MAX_CONTEXT_BONUS;
    if let Some(ctx) = context {
        if let Some(substrate) = requested(&ctx.substrate) {
            if candidate.substrate_categories.contains(substrate) {
                raw += SUBSTRATE_BONUS;
                notes.push(format!("✓ Matches substrate: {}", substrate));
            }
        }
        if let Some(ink) = requested(&ctx.ink_system) {
            if candidate.ink_compatibility.contains(ink) {
                raw += INK_SYSTEM_BONUS;
                notes.push(format!("✓ Compatible with {} inks", ink));
            }
        }
        if let Some(app) = requested(&ctx.application) {
            if candidate.applications.contains(app) {
                raw += APPLICATION_BONUS;
                notes.push(format!("✓ Suitable for {}", app));
            }
        }
    }

    SimilarityScore {
        score: normalize(raw, max_possible),
        notes,
    }
}

/// Full `weight` at zero difference, decaying linearly to 0 at `tolerance`.
fn linear_decay(weight: f64, diff: f64, tolerance: f64) -> f64 {
    if diff <= 0.0 {
        return weight;
    }
    (weight * (1.0 - diff / tolerance)).max(0.0)
}

fn normalize(raw: f64, max_possible: f64) -> u8 {
    if max_possible <= 0.0 || !raw.is_finite() {
        return 0;
    }
    (100.0 * raw / max_possible).round().clamp(0.0, 100.0) as u8
}

/// Overlap of two closed intervals as a fraction of their combined span.
///
/// Returns the neutral ratio `0.5` when either interval is unknown.
pub fn range_overlap(a: Option<(u32, u32)>, b: Option<(u32, u32)>) -> f64 {
    let ((min1, max1), (min2, max2)) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return NEUTRAL_RATIO,
    };
    let (min1, max1, min2, max2) = (min1 as f64, max1 as f64, min2 as f64, max2 as f64);

    let overlap = (max1.min(max2) - min1.max(min2)).max(0.0);
    let union_span = max1.max(max2) - min1.min(min2);
    if union_span > 0.0 {
        overlap / union_span
    } else {
        0.0
    }
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Returns the neutral ratio `0.5` when either set is empty (unknown).
pub fn set_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return NEUTRAL_RATIO;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
