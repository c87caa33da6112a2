//! In-memory [`Catalog`] implementation.
//!
//! Backs the CLI (loaded from a JSON catalog file) and the test suites.
//! Plates live in a `HashMap` behind `std::sync::RwLock`; filtering and
//! ordering are brute force over all records.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{FamilySummary, PlateSpec, SupplierSummary};

use super::{
    listing_order, summarize_families, summarize_suppliers, CandidateFilter, Catalog,
    FamilyFilter, PlateFilter,
};

/// In-memory plate catalog.
pub struct InMemoryCatalog {
    plates: RwLock<HashMap<String, PlateSpec>>,
}

impl InMemoryCatalog {
    /// Build a catalog from validated plates, rejecting duplicate ids.
    pub fn from_plates(plates: Vec<PlateSpec>) -> crate::Result<Self> {
        let mut map = HashMap::with_capacity(plates.len());
        for plate in plates {
            plate.validate()?;
            if map.contains_key(&plate.id) {
                return Err(CoreError::invalid(format!(
                    "duplicate plate id in catalog: {}",
                    plate.id
                )));
            }
            map.insert(plate.id.clone(), plate);
        }
        Ok(Self {
            plates: RwLock::new(map),
        })
    }

    pub fn len(&self) -> usize {
        self.plates.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, PlateSpec>>> {
        self.plates
            .read()
            .map_err(|_| anyhow!("plate catalog lock poisoned"))
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_plate(&self, id: &str) -> Result<Option<PlateSpec>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list_plates(&self, filter: &PlateFilter) -> Result<Vec<PlateSpec>> {
        let plates = self.read()?;
        let mut hits: Vec<PlateSpec> = plates
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        hits.sort_by(listing_order);
        if let Some(limit) = filter.limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<PlateSpec>> {
        let plates = self.read()?;
        let mut pool: Vec<PlateSpec> = plates
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        pool.sort_by(|a, b| filter.order(a, b));
        pool.truncate(filter.limit);
        Ok(pool)
    }

    async fn list_suppliers(&self) -> Result<Vec<SupplierSummary>> {
        Ok(summarize_suppliers(self.read()?.values()))
    }

    async fn list_families(&self, filter: &FamilyFilter) -> Result<Vec<FamilySummary>> {
        Ok(summarize_families(self.read()?.values(), filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessType;

    fn plate(id: &str, supplier: &str, thickness: f64) -> PlateSpec {
        PlateSpec::new(id, supplier, "Fam", thickness, ProcessType::Solvent)
    }

    #[test]
    fn test_from_plates_rejects_duplicates() {
        let result = InMemoryCatalog::from_plates(vec![
            plate("a", "DuPont", 1.14),
            plate("a", "Flint", 1.14),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_from_plates_rejects_invalid() {
        let result = InMemoryCatalog::from_plates(vec![plate("a", "DuPont", -1.0)]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_plate() {
        let catalog = InMemoryCatalog::from_plates(vec![plate("a", "DuPont", 1.14)]).unwrap();
        assert!(catalog.get_plate("a").await.unwrap().is_some());
        assert!(catalog.get_plate("zzz").await.unwrap().is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_list_plates_sorted_and_limited() {
        let catalog = InMemoryCatalog::from_plates(vec![
            plate("c", "XSYS", 1.14),
            plate("b", "asahi", 1.70),
            plate("a", "Asahi", 1.14),
        ])
        .unwrap();
        let all = catalog.list_plates(&PlateFilter::default()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let limited = catalog
            .list_plates(&PlateFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_candidates_ordered_and_capped() {
        let catalog = InMemoryCatalog::from_plates(vec![
            plate("src", "DuPont", 1.14),
            plate("far", "Asahi", 1.18),
            plate("near", "XSYS", 1.14),
            plate("mid", "Asahi", 1.15),
        ])
        .unwrap();
        let filter = CandidateFilter {
            source_id: "src".into(),
            process_type: ProcessType::Solvent,
            thickness_mm: 1.14,
            thickness_tolerance_mm: 0.05,
            exclude_supplier: Some("DuPont".into()),
            target_supplier: None,
            limit: 2,
        };
        let pool = catalog.candidates(&filter).await.unwrap();
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn test_list_suppliers_and_families() {
        let catalog = InMemoryCatalog::from_plates(vec![
            plate("a", "XSYS", 1.14),
            plate("b", "Asahi", 1.14),
            plate("c", "Asahi", 1.70),
        ])
        .unwrap();
        let suppliers = catalog.list_suppliers().await.unwrap();
        let names: Vec<&str> = suppliers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Asahi", "XSYS"]);
        assert_eq!(suppliers[0].plate_count, 2);

        let families = catalog
            .list_families(&FamilyFilter {
                supplier: Some("xsys".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].plate_count, 1);
    }
}
