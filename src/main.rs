//! # FlexoPlate IQ CLI (`fpiq`)
//!
//! ## Usage
//!
//! ```bash
//! fpiq --config ./config/fpiq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fpiq plates list` | Browse active plates with filters |
//! | `fpiq plates show <id>` | Full detail for one plate |
//! | `fpiq suppliers list` | Suppliers with active plate counts |
//! | `fpiq families list` | Plate families with active plate counts |
//! | `fpiq equivalents <id>` | Ranked cross-supplier replacements |
//! | `fpiq exposure calculate <id>` | Exposure times at a measured intensity |
//! | `fpiq exposure scale` | Rescale a known-good time to a new intensity |
//!
//! ## Examples
//!
//! ```bash
//! # Equivalents for a plate, printing on film with solvent inks
//! fpiq equivalents cyrel-easy-efx-114 --substrate film --ink-system solvent
//!
//! # Exposure times with an aging lamp
//! fpiq exposure calculate cyrel-easy-efx-114 --intensity 18.5 --lamp-age 1200
//!
//! # Lamp dropped from 20 to 17 mW/cm²
//! fpiq exposure scale --reference-time 600 --reference-intensity 20 --current-intensity 17
//! ```

use clap::{Parser, Subcommand};
use flexoplate_iq::equivalency_cmd::EquivalentsOptions;
use flexoplate_iq::{config, equivalency_cmd, exposure_cmd, logging, plates};
use flexoplate_iq_core::catalog::{FamilyFilter, PlateFilter};
use flexoplate_iq_core::models::{ProcessType, SurfaceType};
use std::path::PathBuf;

/// FlexoPlate IQ: plate equivalency and exposure tooling for flexo prepress.
#[derive(Parser)]
#[command(
    name = "fpiq",
    about = "FlexoPlate IQ: cross-supplier plate equivalency and UV exposure calculation",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/fpiq.toml`. Catalog location, scoring weights,
    /// and logging are read from this file.
    #[arg(long, global = true, default_value = "./config/fpiq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the plate catalog.
    Plates {
        #[command(subcommand)]
        action: PlatesAction,
    },

    /// Browse plate suppliers.
    Suppliers {
        #[command(subcommand)]
        action: SuppliersAction,
    },

    /// Browse plate families.
    Families {
        #[command(subcommand)]
        action: FamiliesAction,
    },

    /// Find equivalent plates from other suppliers.
    ///
    /// Candidates must share the source plate's process type and sit within
    /// the configured thickness tolerance. Results are ranked by similarity.
    Equivalents {
        /// Source plate id.
        id: String,

        /// Only consider suppliers whose name contains this text.
        #[arg(long)]
        target_supplier: Option<String>,

        /// Substrate being printed (e.g. film, paper, corrugated).
        #[arg(long)]
        substrate: Option<String>,

        /// Ink system in use (e.g. solvent, water, uv).
        #[arg(long)]
        ink_system: Option<String>,

        /// Print application (e.g. labels, flexible_packaging).
        #[arg(long)]
        application: Option<String>,

        /// Also consider plates from the source plate's own supplier.
        #[arg(long)]
        include_same_supplier: bool,

        /// Number of results to return (overrides config).
        #[arg(long)]
        top_n: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// UV exposure calculations.
    Exposure {
        #[command(subcommand)]
        action: ExposureAction,
    },
}

#[derive(Subcommand)]
enum PlatesAction {
    /// List active plates.
    List {
        /// Supplier name contains this text.
        #[arg(long)]
        supplier: Option<String>,

        /// Process type: solvent, thermal, or water_wash.
        #[arg(long)]
        process: Option<ProcessType>,

        /// Surface type: flat_top, round_top, microcell, or textured.
        #[arg(long)]
        surface: Option<SurfaceType>,

        /// Plates listing this application (e.g. labels).
        #[arg(long)]
        application: Option<String>,

        /// Plates within 0.1 mm of this thickness.
        #[arg(long)]
        thickness: Option<f64>,

        /// Minimum Shore A hardness.
        #[arg(long)]
        min_hardness: Option<f64>,

        /// Maximum Shore A hardness.
        #[arg(long)]
        max_hardness: Option<f64>,

        /// Name, SKU, or family contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of plates to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show one plate in full.
    Show {
        /// Plate id.
        id: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SuppliersAction {
    /// List suppliers with their active plate counts.
    List {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FamiliesAction {
    /// List plate families with their active plate counts.
    List {
        /// Supplier name contains this text.
        #[arg(long)]
        supplier: Option<String>,

        /// Process type: solvent, thermal, or water_wash.
        #[arg(long)]
        process: Option<ProcessType>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ExposureAction {
    /// Compute main, back, post, and detack times for a catalog plate.
    Calculate {
        /// Plate id.
        id: String,

        /// Measured UV intensity at the plate (mW/cm²).
        #[arg(long)]
        intensity: Option<f64>,

        /// Lamp age in hours; output is derated linearly to 50% at 10000 h.
        #[arg(long)]
        lamp_age: Option<f64>,

        /// Desired floor thickness (mm); lengthens back exposure when needed.
        #[arg(long)]
        target_floor: Option<f64>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Rescale a known-good exposure time to a new lamp intensity.
    Scale {
        /// Known-good exposure time (s).
        #[arg(long)]
        reference_time: f64,

        /// Intensity at which the reference time was established (mW/cm²).
        #[arg(long)]
        reference_intensity: f64,

        /// Current measured intensity (mW/cm²).
        #[arg(long)]
        current_intensity: f64,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Exposure {
        action:
            ExposureAction::Scale {
                reference_time,
                reference_intensity,
                current_intensity,
                json,
            },
    } = cli.command
    {
        logging::init("warn");
        return exposure_cmd::run_scale(reference_time, reference_intensity, current_intensity, json);
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.filter);

    match cli.command {
        Commands::Plates { action } => match action {
            PlatesAction::List {
                supplier,
                process,
                surface,
                application,
                thickness,
                min_hardness,
                max_hardness,
                search,
                limit,
                json,
            } => {
                let filter = PlateFilter {
                    supplier,
                    process_type: process,
                    surface_type: surface,
                    application,
                    thickness_mm: thickness,
                    min_hardness,
                    max_hardness,
                    search,
                    limit,
                };
                plates::run_list(&cfg, &filter, json).await?;
            }
            PlatesAction::Show { id, json } => {
                plates::run_show(&cfg, &id, json).await?;
            }
        },
        Commands::Suppliers { action } => match action {
            SuppliersAction::List { json } => {
                plates::run_suppliers(&cfg, json).await?;
            }
        },
        Commands::Families { action } => match action {
            FamiliesAction::List {
                supplier,
                process,
                json,
            } => {
                let filter = FamilyFilter {
                    supplier,
                    process_type: process,
                };
                plates::run_families(&cfg, &filter, json).await?;
            }
        },
        Commands::Equivalents {
            id,
            target_supplier,
            substrate,
            ink_system,
            application,
            include_same_supplier,
            top_n,
            json,
        } => {
            let opts = EquivalentsOptions {
                target_supplier,
                substrate,
                ink_system,
                application,
                include_same_supplier,
                top_n,
            };
            equivalency_cmd::run_equivalents(&cfg, &id, &opts, json).await?;
        }
        Commands::Exposure { action } => match action {
            ExposureAction::Calculate {
                id,
                intensity,
                lamp_age,
                target_floor,
                json,
            } => {
                exposure_cmd::run_calculate(&cfg, &id, intensity, lamp_age, target_floor, json)
                    .await?;
            }
            ExposureAction::Scale {
                reference_time,
                reference_intensity,
                current_intensity,
                json,
            } => {
                exposure_cmd::run_scale(reference_time, reference_intensity, current_intensity, json)?;
            }
        },
    }

    Ok(())
}
