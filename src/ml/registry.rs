// src/ml/registry.rs
//
// Model discovery. Blobs are named "{genre}_{variant}_{timestamp}.json"
// and the lexicographically greatest name for a genre wins, which is
// the most recent thanks to the sortable timestamp format.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClassifierError;

/// Environment override for the models directory.
pub const MODELS_DIR_ENV: &str = "HITSCORE_MODELS_DIR";

/// Resolve the models directory: explicit argument, then the
/// environment override, then the platform data directory.
pub fn resolve_models_dir(explicit: Option<&Path>) -> Result<PathBuf, ClassifierError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Ok(dir) = std::env::var(MODELS_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::data_dir()
        .map(|d| d.join("hitscore").join("models"))
        .ok_or(ClassifierError::NoModelsDir)
}

/// Most recent model blob for `key` (a genre or subcategory id).
///
/// An unreadable or empty directory reads as "no model trained yet".
pub fn latest_model_path(dir: &Path, key: &str) -> Result<PathBuf, ClassifierError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("models dir {} unreadable: {}", dir.display(), e);
            return Err(ClassifierError::NotFound(key.to_string()));
        }
    };

    let prefix = format!("{}_", key);
    let mut best: Option<String> = None;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_model_for(&name, &prefix) {
            continue;
        }
        if best.as_deref().map_or(true, |b| name.as_str() > b) {
            best = Some(name);
        }
    }

    best.map(|name| dir.join(name))
        .ok_or_else(|| ClassifierError::NotFound(key.to_string()))
}

/// After the genre prefix the name must be exactly "variant_timestamp",
/// so a "mpb" lookup never claims "mpb_indie_*" blobs.
fn is_model_for(name: &str, prefix: &str) -> bool {
    let rest = match name.strip_prefix(prefix) {
        Some(rest) => rest,
        None => return false,
    };
    let stem = match rest.strip_suffix(".json") {
        Some(stem) => stem,
        None => return false,
    };

    let parts: Vec<&str> = stem.split('_').collect();
    parts.len() == 2 && parts.iter().all(|p| !p.is_empty())
}
