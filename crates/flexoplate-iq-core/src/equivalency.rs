//! Cross-supplier plate equivalency search.
//!
//! The finder operates entirely through the [`Catalog`] trait. The calling
//! application supplies the catalog, the request, and the weights.
//!
//! # Pipeline
//!
//! 1. Validate weights and `top_n`.
//! 2. Resolve the source plate (`NotFound` if missing).
//! 3. Fetch the candidate pool: same process type, thickness within
//!    tolerance, optional supplier exclusion / targeting, ordered by
//!    closeness of thickness then supplier name.
//! 4. Score every candidate with [`score_similarity`]; drop zero scores.
//! 5. Stable sort by score descending, so ties keep pool order.
//! 6. Report the total before truncating to `top_n`.

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, CandidateFilter};
use crate::error::{CoreError, Result};
use crate::models::PlateSummary;
use crate::similarity::{score_similarity, MatchContext, MatchQuality};
use crate::weights::EquivalencyWeights;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 50;

/// All inputs for one equivalency search.
#[derive(Debug, Clone)]
pub struct EquivalencyRequest {
    pub source_plate_id: String,
    /// Case-insensitive substring of the supplier to restrict results to.
    pub target_supplier: Option<String>,
    pub context: MatchContext,
    /// Skip candidates made by the source plate's own supplier.
    pub exclude_same_supplier: bool,
    pub top_n: usize,
    /// Cap on the candidate pool fetched from the catalog.
    pub candidate_limit: usize,
}

impl EquivalencyRequest {
    pub fn new(source_plate_id: impl Into<String>) -> Self {
        Self {
            source_plate_id: source_plate_id.into(),
            target_supplier: None,
            context: MatchContext::default(),
            exclude_same_supplier: true,
            top_n: DEFAULT_TOP_N,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

/// One ranked equivalent.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalentPlate {
    #[serde(flatten)]
    pub plate: PlateSummary,
    pub similarity_score: u8,
    pub match_quality: MatchQuality,
    pub match_notes: Vec<String>,
}

/// Response shape of an equivalency search.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalencyReport {
    pub source_plate: PlateSummary,
    pub equivalents: Vec<EquivalentPlate>,
    /// Viable candidates before truncation to `top_n`.
    pub total_candidates: usize,
}

/// Find the best replacements for a plate.
///
/// Returns an empty `equivalents` list (not an error) when nothing clears
/// the disqualifiers.
pub async fn find_equivalents<C: Catalog + ?Sized>(
    catalog: &C,
    req: &EquivalencyRequest,
    weights: &EquivalencyWeights,
) -> Result<EquivalencyReport> {
    weights.validate()?;
    if req.top_n == 0 {
        return Err(CoreError::invalid("top_n must be >= 1"));
    }
    if req.candidate_limit == 0 {
        return Err(CoreError::invalid("candidate_limit must be >= 1"));
    }

    let source = catalog
        .get_plate(&req.source_plate_id)
        .await?
        .ok_or_else(|| CoreError::plate_not_found(&req.source_plate_id))?;

    let filter = CandidateFilter {
        source_id: source.id.clone(),
        process_type: source.process_type,
        thickness_mm: source.thickness_mm,
        thickness_tolerance_mm: weights.thickness_tolerance_mm,
        exclude_supplier: req
            .exclude_same_supplier
            .then(|| source.supplier_name.clone()),
        target_supplier: req
            .target_supplier
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        limit: req.candidate_limit,
    };

    let pool = catalog.candidates(&filter).await?;
    let pool_size = pool.len();
    let context = (!req.context.is_empty()).then_some(&req.context);

    let mut ranked: Vec<EquivalentPlate> = Vec::with_capacity(pool_size);
    for candidate in &pool {
        let result = score_similarity(&source, candidate, weights, context);
        if result.is_disqualified() {
            debug!(
                candidate = %candidate.id,
                reason = result.notes.first().map(String::as_str).unwrap_or(""),
                "candidate disqualified"
            );
            continue;
        }
        ranked.push(EquivalentPlate {
            plate: PlateSummary::from(candidate),
            similarity_score: result.score,
            match_quality: result.quality(),
            match_notes: result.notes,
        });
    }

    // Vec::sort_by is stable: equal scores keep pool order.
    ranked.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));

    let total_candidates = ranked.len();
    ranked.truncate(req.top_n);

    info!(
        source = %source.id,
        pool = pool_size,
        viable = total_candidates,
        returned = ranked.len(),
        "equivalency search complete"
    );

    Ok(EquivalencyReport {
        source_plate: PlateSummary::from(&source),
        equivalents: ranked,
        total_candidates,
    })
}
