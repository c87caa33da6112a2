//! Catalog browsing: `fpiq plates list|show`, `fpiq suppliers list`, and
//! `fpiq families list`.

use anyhow::Result;
use flexoplate_iq_core::catalog::{Catalog, FamilyFilter, PlateFilter};
use flexoplate_iq_core::models::{FamilySummary, PlateSpec, PlateSummary, SupplierSummary};
use flexoplate_iq_core::CoreError;

use crate::catalog_file;
use crate::config::Config;

/// List active plates matching `filter` as summaries.
pub async fn list_plates<C: Catalog + ?Sized>(
    catalog: &C,
    filter: &PlateFilter,
) -> Result<Vec<PlateSummary>> {
    let plates = catalog.list_plates(filter).await?;
    Ok(plates.iter().map(PlateSummary::from).collect())
}

/// Resolve one plate by id.
pub async fn show_plate<C: Catalog + ?Sized>(catalog: &C, id: &str) -> Result<PlateSpec> {
    let plate = catalog
        .get_plate(id)
        .await?
        .ok_or_else(|| CoreError::plate_not_found(id))?;
    Ok(plate)
}

/// Suppliers in the catalog, ordered by name.
pub async fn list_suppliers<C: Catalog + ?Sized>(catalog: &C) -> Result<Vec<SupplierSummary>> {
    Ok(catalog.list_suppliers().await?)
}

/// Plate families matching `filter`, ordered by supplier then family.
pub async fn list_families<C: Catalog + ?Sized>(
    catalog: &C,
    filter: &FamilyFilter,
) -> Result<Vec<FamilySummary>> {
    Ok(catalog.list_families(filter).await?)
}

/// CLI entry point for `fpiq plates list`.
pub async fn run_list(config: &Config, filter: &PlateFilter, json: bool) -> Result<()> {
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let plates = list_plates(&catalog, filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plates)?);
        return Ok(());
    }

    if plates.is_empty() {
        println!("No plates found.");
        return Ok(());
    }

    println!("Found {} plate(s):", plates.len());
    for p in &plates {
        println!(
            "  {:<24} {:<12} {:<28} {:>5.2}mm  {:>6}  {:<10} {}",
            p.id,
            p.supplier,
            p.name,
            p.thickness_mm,
            p.hardness_shore
                .map(|h| format!("{:.0} ShA", h))
                .unwrap_or_else(|| "-".to_string()),
            p.process_type.as_str(),
            p.surface_type.map(|s| s.as_str()).unwrap_or("-"),
        );
    }
    Ok(())
}

/// CLI entry point for `fpiq suppliers list`.
pub async fn run_suppliers(config: &Config, json: bool) -> Result<()> {
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let suppliers = list_suppliers(&catalog).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suppliers)?);
        return Ok(());
    }

    if suppliers.is_empty() {
        println!("No suppliers found.");
        return Ok(());
    }

    println!("{:<24} {:>6}", "SUPPLIER", "PLATES");
    for s in &suppliers {
        println!("{:<24} {:>6}", s.name, s.plate_count);
    }
    Ok(())
}

/// CLI entry point for `fpiq families list`.
pub async fn run_families(config: &Config, filter: &FamilyFilter, json: bool) -> Result<()> {
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let families = list_families(&catalog, filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&families)?);
        return Ok(());
    }

    if families.is_empty() {
        println!("No families found.");
        return Ok(());
    }

    println!("{:<16} {:<24} {:<10} {:>6}", "SUPPLIER", "FAMILY", "PROCESS", "PLATES");
    for f in &families {
        println!(
            "{:<16} {:<24} {:<10} {:>6}",
            f.supplier,
            f.family,
            f.process_type.as_str(),
            f.plate_count
        );
    }
    Ok(())
}

/// CLI entry point for `fpiq plates show`.
pub async fn run_show(config: &Config, id: &str, json: bool) -> Result<()> {
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let plate = match show_plate(&catalog, id).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plate)?);
        return Ok(());
    }

    println!("--- Plate ---");
    println!("id:            {}", plate.id);
    println!("name:          {}", plate.name());
    println!("supplier:      {}", plate.supplier_name);
    println!("family:        {}", plate.family_name);
    if let Some(ref sku) = plate.sku_code {
        println!("sku:           {}", sku);
    }
    println!("thickness:     {:.2} mm", plate.thickness_mm);
    if let Some(h) = plate.hardness_shore {
        println!("hardness:      {} Shore A", h);
    }
    println!("process:       {}", plate.process_type);
    if let Some(s) = plate.surface_type {
        println!("surface:       {}", s);
    }
    if let Some((lo, hi)) = plate.lpi_range() {
        println!("lpi:           {}-{}", lo, hi);
    }
    print_set("applications:", &plate.applications);
    print_set("inks:", &plate.ink_compatibility);
    print_set("substrates:", &plate.substrate_categories);
    if !plate.is_active {
        println!("status:        discontinued");
    }

    println!();
    println!("--- Exposure energies (mJ/cm²) ---");
    print_range(
        "main:",
        plate.main_exposure_energy_min_mj_cm2,
        plate.main_exposure_energy_max_mj_cm2,
    );
    print_range(
        "back:",
        plate.back_exposure_energy_min_mj_cm2,
        plate.back_exposure_energy_max_mj_cm2,
    );
    if let Some(e) = plate.post_exposure_energy_mj_cm2 {
        println!("{:<15}{}", "post:", e);
    }
    if let Some(e) = plate.detack_energy_mj_cm2 {
        println!("{:<15}{}", "detack:", e);
    }
    if let Some(r) = plate.relief_recommended_mm {
        println!("{:<15}{} mm", "relief:", r);
    }
    Ok(())
}

fn print_set(label: &str, set: &std::collections::BTreeSet<String>) {
    if !set.is_empty() {
        let items: Vec<&str> = set.iter().map(String::as_str).collect();
        println!("{:<15}{}", label, items.join(", "));
    }
}

fn print_range(label: &str, min: Option<f64>, max: Option<f64>) {
    match (min, max) {
        (Some(lo), Some(hi)) => println!("{:<15}{}-{}", label, lo, hi),
        (Some(v), None) | (None, Some(v)) => println!("{:<15}{}", label, v),
        (None, None) => println!("{:<15}unknown", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexoplate_iq_core::catalog::memory::InMemoryCatalog;
    use flexoplate_iq_core::models::ProcessType;

    fn catalog() -> InMemoryCatalog {
        let mut retired = PlateSpec::new("old", "DuPont", "Cyrel", 1.14, ProcessType::Solvent);
        retired.is_active = false;
        InMemoryCatalog::from_plates(vec![
            PlateSpec::new("a", "DuPont", "Cyrel EASY", 1.14, ProcessType::Solvent),
            PlateSpec::new("b", "Flint", "nyloflex", 1.70, ProcessType::Solvent),
            retired,
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_skips_inactive() {
        let plates = list_plates(&catalog(), &PlateFilter::default()).await.unwrap();
        let ids: Vec<&str> = plates.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_by_thickness() {
        let filter = PlateFilter {
            thickness_mm: Some(1.7),
            ..Default::default()
        };
        let plates = list_plates(&catalog(), &filter).await.unwrap();
        assert_eq!(plates.len(), 1);
        assert_eq!(plates[0].supplier, "Flint");
    }

    #[tokio::test]
    async fn test_list_suppliers_counts_active_plates() {
        let suppliers = list_suppliers(&catalog()).await.unwrap();
        let got: Vec<(&str, usize)> = suppliers
            .iter()
            .map(|s| (s.name.as_str(), s.plate_count))
            .collect();
        assert_eq!(got, vec![("DuPont", 1), ("Flint", 1)]);
    }

    #[tokio::test]
    async fn test_list_families_keeps_retired_family() {
        let filter = FamilyFilter {
            supplier: Some("dupont".into()),
            ..Default::default()
        };
        let families = list_families(&catalog(), &filter).await.unwrap();
        let got: Vec<(&str, usize)> = families
            .iter()
            .map(|f| (f.family.as_str(), f.plate_count))
            .collect();
        assert_eq!(got, vec![("Cyrel", 0), ("Cyrel EASY", 1)]);
    }

    #[tokio::test]
    async fn test_show_resolves_inactive_and_reports_missing() {
        let cat = catalog();
        assert!(!show_plate(&cat, "old").await.unwrap().is_active);
        let err = show_plate(&cat, "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "plate not found: nope");
    }
}
