//! Catalog abstraction for FlexoPlate IQ.
//!
//! The [`Catalog`] trait is the read boundary between the pure core and
//! whatever holds the plate records (in-memory fixture, file, database).
//! Equivalency search only ever talks to a catalog through this trait.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{FamilySummary, PlateSpec, ProcessType, SupplierSummary, SurfaceType};

/// Thickness window used by [`PlateFilter::thickness_mm`] lookups.
pub const THICKNESS_SEARCH_WINDOW_MM: f64 = 0.1;

/// Slack applied to the candidate thickness window, matching the scorer.
const THICKNESS_EPSILON: f64 = 1e-9;

/// Filters for browsing the catalog.
///
/// Every field is optional; an empty filter lists all active plates.
#[derive(Debug, Clone, Default)]
pub struct PlateFilter {
    /// Case-insensitive substring match on supplier name.
    pub supplier: Option<String>,
    pub process_type: Option<ProcessType>,
    pub surface_type: Option<SurfaceType>,
    /// Exact membership in the plate's application set.
    pub application: Option<String>,
    /// Plates within [`THICKNESS_SEARCH_WINDOW_MM`] of this thickness.
    pub thickness_mm: Option<f64>,
    pub min_hardness: Option<f64>,
    pub max_hardness: Option<f64>,
    /// Case-insensitive substring match on display name, SKU, or family.
    pub search: Option<String>,
    /// Maximum results; `None` returns everything.
    pub limit: Option<usize>,
}

impl PlateFilter {
    pub fn matches(&self, plate: &PlateSpec) -> bool {
        if !plate.is_active {
            return false;
        }
        if let Some(ref supplier) = self.supplier {
            if !contains_ci(&plate.supplier_name, supplier) {
                return false;
            }
        }
        if let Some(pt) = self.process_type {
            if plate.process_type != pt {
                return false;
            }
        }
        if let Some(st) = self.surface_type {
            if plate.surface_type != Some(st) {
                return false;
            }
        }
        if let Some(ref app) = self.application {
            if !plate.applications.contains(app.as_str()) {
                return false;
            }
        }
        if let Some(t) = self.thickness_mm {
            if (plate.thickness_mm - t).abs() >= THICKNESS_SEARCH_WINDOW_MM {
                return false;
            }
        }
        if self.min_hardness.is_some() || self.max_hardness.is_some() {
            let Some(h) = plate.hardness_shore else {
                return false;
            };
            if self.min_hardness.is_some_and(|min| h < min) {
                return false;
            }
            if self.max_hardness.is_some_and(|max| h > max) {
                return false;
            }
        }
        if let Some(ref q) = self.search {
            let hit = plate.display_name.as_deref().is_some_and(|n| contains_ci(n, q))
                || plate.sku_code.as_deref().is_some_and(|s| contains_ci(s, q))
                || contains_ci(&plate.family_name, q);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Listing order: supplier, family, thickness, then id.
pub fn listing_order(a: &PlateSpec, b: &PlateSpec) -> Ordering {
    a.supplier_name
        .to_lowercase()
        .cmp(&b.supplier_name.to_lowercase())
        .then_with(|| a.family_name.cmp(&b.family_name))
        .then_with(|| a.thickness_mm.total_cmp(&b.thickness_mm))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filters for the family listing.
#[derive(Debug, Clone, Default)]
pub struct FamilyFilter {
    /// Case-insensitive substring match on supplier name.
    pub supplier: Option<String>,
    pub process_type: Option<ProcessType>,
}

impl FamilyFilter {
    pub fn matches(&self, plate: &PlateSpec) -> bool {
        if let Some(ref supplier) = self.supplier {
            if !contains_ci(&plate.supplier_name, supplier) {
                return false;
            }
        }
        self.process_type.map_or(true, |pt| plate.process_type == pt)
    }
}

/// Group plates by supplier, ordered by name (case-insensitive).
///
/// Every supplier that appears in `plates` is listed; `plate_count` only
/// counts active plates.
pub fn summarize_suppliers<'a, I>(plates: I) -> Vec<SupplierSummary>
where
    I: IntoIterator<Item = &'a PlateSpec>,
{
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for plate in plates {
        let key = (plate.supplier_name.to_lowercase(), plate.supplier_name.clone());
        *counts.entry(key).or_default() += usize::from(plate.is_active);
    }
    counts
        .into_iter()
        .map(|((_, name), plate_count)| SupplierSummary { name, plate_count })
        .collect()
}

/// Group plates matching `filter` by (supplier, family, process type).
///
/// Ordered by supplier (case-insensitive), family name, then process type.
/// Families whose plates are all retired are kept with a count of 0.
pub fn summarize_families<'a, I>(plates: I, filter: &FamilyFilter) -> Vec<FamilySummary>
where
    I: IntoIterator<Item = &'a PlateSpec>,
{
    let mut counts: BTreeMap<(String, String, String, &'static str), (ProcessType, usize)> =
        BTreeMap::new();
    for plate in plates.into_iter().filter(|p| filter.matches(p)) {
        let key = (
            plate.supplier_name.to_lowercase(),
            plate.supplier_name.clone(),
            plate.family_name.clone(),
            plate.process_type.as_str(),
        );
        counts.entry(key).or_insert((plate.process_type, 0)).1 += usize::from(plate.is_active);
    }
    counts
        .into_iter()
        .map(|((_, supplier, family, _), (process_type, plate_count))| FamilySummary {
            supplier,
            family,
            process_type,
            plate_count,
        })
        .collect()
}

/// Coarse pre-filter for equivalency candidates.
///
/// Mirrors the scorer's disqualifiers so that scoring effort is only spent
/// on plates that could possibly match.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// Source plate id; never returned as its own candidate.
    pub source_id: String,
    pub process_type: ProcessType,
    pub thickness_mm: f64,
    pub thickness_tolerance_mm: f64,
    /// Skip plates whose supplier equals this name (case-insensitive).
    pub exclude_supplier: Option<String>,
    /// Keep only plates whose supplier contains this (case-insensitive).
    pub target_supplier: Option<String>,
    /// Maximum pool size after ordering.
    pub limit: usize,
}

impl CandidateFilter {
    pub fn matches(&self, plate: &PlateSpec) -> bool {
        if !plate.is_active || plate.id == self.source_id {
            return false;
        }
        if plate.process_type != self.process_type {
            return false;
        }
        if (plate.thickness_mm - self.thickness_mm).abs()
            > self.thickness_tolerance_mm + THICKNESS_EPSILON
        {
            return false;
        }
        if let Some(ref excluded) = self.exclude_supplier {
            if plate.supplier_name.eq_ignore_ascii_case(excluded) {
                return false;
            }
        }
        if let Some(ref target) = self.target_supplier {
            if !contains_ci(&plate.supplier_name, target) {
                return false;
            }
        }
        true
    }

    /// Pool order: closest thickness first, then supplier name, then id.
    ///
    /// Equal similarity scores keep this order after the stable score sort.
    pub fn order(&self, a: &PlateSpec, b: &PlateSpec) -> Ordering {
        let da = (a.thickness_mm - self.thickness_mm).abs();
        let db = (b.thickness_mm - self.thickness_mm).abs();
        da.total_cmp(&db)
            .then_with(|| a.supplier_name.cmp(&b.supplier_name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Abstract read-only plate catalog.
///
/// All operations are async (via `async-trait`) so that database-backed
/// implementations fit behind the same interface. In-memory
/// implementations return immediately-ready futures.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_plate`](Catalog::get_plate) | Resolve one plate by id |
/// | [`list_plates`](Catalog::list_plates) | Browse active plates with filters |
/// | [`candidates`](Catalog::candidates) | Ordered equivalency candidate pool |
/// | [`list_suppliers`](Catalog::list_suppliers) | Suppliers with active plate counts |
/// | [`list_families`](Catalog::list_families) | Plate families with active plate counts |
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Retrieve a plate by id, active or not.
    async fn get_plate(&self, id: &str) -> Result<Option<PlateSpec>>;

    /// List active plates matching `filter`, in [`listing_order`].
    async fn list_plates(&self, filter: &PlateFilter) -> Result<Vec<PlateSpec>>;

    /// Return the candidate pool for `filter`, ordered by
    /// [`CandidateFilter::order`] and truncated to `filter.limit`.
    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<PlateSpec>>;

    /// Suppliers present in the catalog, see [`summarize_suppliers`].
    async fn list_suppliers(&self) -> Result<Vec<SupplierSummary>>;

    /// Plate families matching `filter`, see [`summarize_families`].
    async fn list_families(&self, filter: &FamilyFilter) -> Result<Vec<FamilySummary>>;
}
