//! JSON catalog file loading.
//!
//! A catalog file is either `{ "plates": [ ... ] }` or a bare array of
//! plate objects. Plates without an `id` are assigned a UUID v4. Every
//! plate is validated on load; the first bad entry aborts with its index.

use anyhow::{bail, Context, Result};
use flexoplate_iq_core::catalog::memory::InMemoryCatalog;
use flexoplate_iq_core::models::PlateSpec;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Read and validate a catalog file into an [`InMemoryCatalog`].
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let plates = parse_plates(&content)
        .with_context(|| format!("Invalid catalog file: {}", path.display()))?;
    let count = plates.len();
    let catalog = InMemoryCatalog::from_plates(plates)?;
    info!(path = %path.display(), plates = count, "catalog loaded");
    Ok(catalog)
}

/// Parse catalog JSON into validated plates with unique ids.
pub fn parse_plates(content: &str) -> Result<Vec<PlateSpec>> {
    let doc: Value = serde_json::from_str(content).with_context(|| "Failed to parse JSON")?;

    let entries = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("plates") {
            Some(Value::Array(items)) => items,
            Some(_) => bail!("\"plates\" must be an array"),
            None => bail!("expected a \"plates\" array at the top level"),
        },
        _ => bail!("catalog must be a JSON object or array"),
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut plates = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let mut plate: PlateSpec = serde_json::from_value(entry)
            .with_context(|| format!("plate #{}: malformed record", index))?;
        if plate.id.trim().is_empty() {
            plate.id = uuid::Uuid::new_v4().to_string();
        }
        plate
            .validate()
            .with_context(|| format!("plate #{}", index))?;
        if !seen.insert(plate.id.clone()) {
            bail!("plate #{}: duplicate id '{}'", index, plate.id);
        }
        plates.push(plate);
    }
    Ok(plates)
}
