//! `fpiq exposure calculate` and `fpiq exposure scale`.

use anyhow::{bail, Result};
use flexoplate_iq_core::exposure::{
    calculate_plate_exposure, format_duration, scale_exposure_time, ExposureReport,
    ExposureRequest, ScaledExposure,
};

use crate::catalog_file;
use crate::config::Config;

/// Pick the CLI intensity, else the configured default.
pub fn resolve_intensity(config: &Config, cli_intensity: Option<f64>) -> Result<f64> {
    match cli_intensity.or(config.exposure.default_intensity_mw_cm2) {
        Some(i) => Ok(i),
        None => bail!(
            "UV intensity is required: pass --intensity or set exposure.default_intensity_mw_cm2"
        ),
    }
}

/// CLI entry point for `fpiq exposure calculate`.
pub async fn run_calculate(
    config: &Config,
    plate_id: &str,
    intensity: Option<f64>,
    lamp_age_hours: Option<f64>,
    target_floor_mm: Option<f64>,
    json: bool,
) -> Result<()> {
    let intensity = resolve_intensity(config, intensity)?;
    let catalog = catalog_file::load_catalog(&config.catalog.path)?;
    let req = ExposureRequest {
        plate_id: plate_id.to_string(),
        current_intensity_mw_cm2: intensity,
        lamp_age_hours,
        target_floor_mm,
    };

    let report = match calculate_plate_exposure(&catalog, &req).await {
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

/// CLI entry point for `fpiq exposure scale`.
pub fn run_scale(
    reference_time_s: f64,
    reference_intensity: f64,
    current_intensity: f64,
    json: bool,
) -> Result<()> {
    let scaled = match scale_exposure_time(reference_time_s, reference_intensity, current_intensity)
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&scaled)?);
    } else {
        print_scaled(&scaled);
    }
    Ok(())
}

fn print_report(report: &ExposureReport) {
    let plate = &report.plate;
    let times = &report.exposure;
    println!(
        "Plate: {} {} ({:.2}mm, {})",
        plate.supplier, plate.name, plate.thickness_mm, plate.process_type
    );
    println!(
        "Intensity: {:.1} mW/cm² (effective {:.1})",
        report.input.intensity_mw_cm2, report.input.effective_intensity_mw_cm2
    );
    println!();

    print_time("Main exposure:", times.main_exposure_time_s, times.main_exposure_range_s);
    print_time("Back exposure:", times.back_exposure_time_s, times.back_exposure_range_s);
    print_time("Post exposure:", times.post_exposure_time_s, None);
    print_time("Detack:", times.detack_time_s, None);

    println!();
    for note in &report.notes {
        println!("  - {}", note);
    }
}

fn print_time(label: &str, time: Option<f64>, range: Option<(f64, f64)>) {
    match (time, range) {
        (Some(t), Some((lo, hi))) => println!(
            "{:<16}{:>7.1}s ({})  range {:.1}-{:.1}s",
            label,
            t,
            format_duration(t),
            lo,
            hi
        ),
        (Some(t), None) => println!("{:<16}{:>7.1}s ({})", label, t, format_duration(t)),
        (None, _) => println!("{:<16}n/a (no supplier data)", label),
    }
}

fn print_scaled(scaled: &ScaledExposure) {
    println!(
        "Reference: {:.1}s at {:.1} mW/cm²",
        scaled.reference_time_s, scaled.reference_intensity_mw_cm2
    );
    println!(
        "Current:   {:.1}s at {:.1} mW/cm² ({:+.1}% intensity)",
        scaled.scaled_time_s, scaled.current_intensity_mw_cm2, scaled.intensity_change_percent
    );
    println!("New time:  {}", format_duration(scaled.scaled_time_s));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, EquivalencyConfig, ExposureConfig, LoggingConfig};

    fn config(default_intensity: Option<f64>) -> Config {
        Config {
            catalog: CatalogConfig {
                path: "plates.json".into(),
            },
            equivalency: EquivalencyConfig::default(),
            exposure: ExposureConfig {
                default_intensity_mw_cm2: default_intensity,
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_cli_intensity_wins() {
        assert_eq!(resolve_intensity(&config(Some(18.0)), Some(20.0)).unwrap(), 20.0);
    }

    #[test]
    fn test_falls_back_to_config() {
        assert_eq!(resolve_intensity(&config(Some(18.0)), None).unwrap(), 18.0);
    }

    #[test]
    fn test_missing_intensity_is_error() {
        let err = resolve_intensity(&config(None), None).unwrap_err();
        assert!(err.to_string().contains("--intensity"));
    }
}
