//! Test fixture loader for the JSON question banks shared by integration
//! tests and benches across the workspace.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use vigil_core::constants::{FACT_BROWSER_DETECTED, FACT_OS_DETECTED};
use vigil_core::QuestionBank;

/// Bank with every content feature the engine supports.
pub const SECURITY_HYGIENE: &str = "security_hygiene.json";
/// Bank that fails lint: duplicate IDs, a cycle, dangling references.
pub const BROKEN: &str = "broken.json";

/// Fact keys the security-hygiene bank expects from detectors.
pub const EXTERNAL_FACTS: [&str; 2] = [FACT_OS_DETECTED, FACT_BROWSER_DETECTED];

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("banks")
}

/// Absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixture_path(relative_path).exists()
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture as a [`QuestionBank`] through the production loader.
///
/// # Panics
/// Panics if the bank can't be loaded.
pub fn load_bank(relative_path: &str) -> QuestionBank {
    let path = fixture_path(relative_path);
    QuestionBank::from_path(&path)
        .unwrap_or_else(|e| panic!("Failed to load bank {}: {}", path.display(), e))
}

/// All bank fixtures, sorted by file name.
pub fn list_banks() -> Vec<PathBuf> {
    let dir = fixtures_root();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.extension()? == "json").then_some(path)
        })
        .collect();
    paths.sort();
    paths
}
