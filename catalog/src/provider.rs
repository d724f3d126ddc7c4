// ═══════════════════════════════════════════════════════════════════════
// Catalog provider — army manifest and per-army data files
//
// Layout of a data directory:
//   armies.json        [{ "name": "...", "file": "gondor.json" }, ...]
//   gondor.json        { "armyName", "armyRule", "heroes", "warriors" }
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{CatalogError, CatalogResult};
use mesbg_engine::types::{ArmyData, ManifestEntry};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of army data. A failed call never affects what was loaded before.
pub trait CatalogProvider {
    /// Available armies, in display order.
    fn manifest(&self) -> CatalogResult<Vec<ManifestEntry>>;

    /// Load one army by the `file` of its manifest entry.
    fn load_army(&self, file: &str) -> CatalogResult<ArmyData>;
}

/// Reads the manifest and army files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    manifest_file: String,
}

impl DirectoryCatalog {
    pub const DEFAULT_MANIFEST: &'static str = "armies.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_manifest(root, Self::DEFAULT_MANIFEST)
    }

    pub fn with_manifest(root: impl Into<PathBuf>, manifest_file: impl Into<String>) -> Self {
        DirectoryCatalog { root: root.into(), manifest_file: manifest_file.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file relative to the data directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn manifest(&self) -> CatalogResult<Vec<ManifestEntry>> {
        let entries: Vec<ManifestEntry> = read_json(&self.resolve(&self.manifest_file))?;
        tracing::debug!(armies = entries.len(), "manifest loaded");
        Ok(entries)
    }

    fn load_army(&self, file: &str) -> CatalogResult<ArmyData> {
        let army: ArmyData = read_json(&self.resolve(file))?;
        tracing::debug!(
            file,
            heroes = army.heroes.len(),
            warriors = army.warriors.len(),
            "army file loaded"
        );
        Ok(army)
    }
}

/// Find a manifest entry by file name or, failing that, display name.
pub fn find_entry<'a>(entries: &'a [ManifestEntry], key: &str) -> CatalogResult<&'a ManifestEntry> {
    entries
        .iter()
        .find(|e| e.file == key)
        .or_else(|| entries.iter().find(|e| e.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| CatalogError::UnknownArmy(key.to_string()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })
}
