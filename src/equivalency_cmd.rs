//! `fpiq equivalents`: cross-supplier replacement search.
//!
//! Loads the catalog, builds an [`EquivalencyRequest`] from CLI flags and
//! the `[equivalency]` config table, and prints the ranked report.

use anyhow::Result;
use flexoplate_iq_core::equivalency::{find_equivalents, EquivalencyReport, EquivalencyRequest};
use flexoplate_iq_core::similarity::MatchContext;

use crate::catalog_file;
use crate::config::Config;

/// CLI-level options for one search. `None` falls back to config.
#[derive(Debug, Clone, Default)]
pub struct EquivalentsOptions {
    pub target_supplier: Option<String>,
    pub substrate: Option<String>,
    pub ink_system: Option<String>,
    pub application: Option<String>,
    pub include_same_supplier: bool,
    pub top_n: Option<usize>,
}

/// Merge CLI options over configured defaults.
pub fn build_request(config: &Config, plate_id: &str, opts: &EquivalentsOptions) -> EquivalencyRequest {
    EquivalencyRequest {
        source_plate_id: plate_id.to_string(),
        target_supplier: opts.target_supplier.clone(),
        context: MatchContext {
            substrate: opts.substrate.clone(),
            ink_system: opts.ink_system.clone(),
            application: opts.application.clone(),
        },
        exclude_same_supplier: config.equivalency.exclude_same_supplier
            && !opts.include_same_supplier,
        top_n: opts.top_n.unwrap_or(config.equivalency.top_n),
        candidate_limit: config.equivalency.candidate_limit,
    }
}

/// CLI entry point for `fpiq equivalents`.
pub async fn run_equivalents(
    config: &Config,
    plate_id: &str,
    opts: &EquivalentsOptions,
    json: bool,
) -> Result<()> {
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let req = build_request(config, plate_id, opts);

    let report = match find_equivalents(&catalog, &req, &config.equivalency.weights).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &EquivalencyReport) {
    let src = &report.source_plate;
    println!(
        "Source: {} {} ({:.2}mm, {})",
        src.supplier, src.name, src.thickness_mm, src.process_type
    );

    if report.equivalents.is_empty() {
        println!("No equivalents found.");
        return;
    }

    println!(
        "Showing {} of {} candidate(s):",
        report.equivalents.len(),
        report.total_candidates
    );
    println!();
    for (i, eq) in report.equivalents.iter().enumerate() {
        println!(
            "{}. [{:>3}] {:<9} {} {} ({:.2}mm)",
            i + 1,
            eq.similarity_score,
            eq.match_quality.to_string(),
            eq.plate.supplier,
            eq.plate.name,
            eq.plate.thickness_mm
        );
        println!("    id: {}", eq.plate.id);
        for note in &eq.match_notes {
            println!("    {}", note);
        }
    }
}
