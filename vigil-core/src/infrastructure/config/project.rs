// vigil-core/src/infrastructure/config/project.rs

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const BUSINESS_RULES_FILE: &str = "business_rules.yaml";
pub const PRODUCT_CATALOG_FILE: &str = "product_catalog.yaml";

const MANIFEST_CANDIDATES: [&str; 2] = ["vigil_project.yaml", "vigil.yaml"];

// --- MANIFEST LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!("{}: {}", config_path.display(), e))
    })?;

    // Layering: VIGIL_TARGET_PATH=/tmp/out vigil run
    apply_env_overrides_with(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    MANIFEST_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
        .ok_or_else(|| {
            InfrastructureError::ConfigNotFound(format!(
                "No configuration file found in {:?}. Checked: {:?}",
                root, MANIFEST_CANDIDATES
            ))
        })
}

/// Applies `VIGIL_*` overrides read through `lookup`.
pub fn apply_env_overrides_with<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("VIGIL_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("VIGIL_DATASET_PATH") {
        info!(old = ?config.dataset_path, new = ?val, "Overriding dataset path via ENV");
        config.dataset_path = val;
    }
    if let Some(val) = lookup("VIGIL_STRICT") {
        match parse_flag(&val) {
            Some(strict) => {
                info!(strict, "Overriding governance strict mode via ENV");
                config.governance.strict = strict;
            }
            None => warn!(value = %val, "Ignoring unrecognized VIGIL_STRICT value"),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// --- SATELLITES ---

/// Loads a required satellite file (`business_rules.yaml`, `product_catalog.yaml`).
/// A missing file is `ConfigNotFound`; malformed or incomplete YAML is `ConfigError`.
#[instrument]
pub fn load_satellite<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(
            path.display().to_string(),
        ));
    }
    let content = fs::read_to_string(path)?;
    let fragment = serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", path.display(), e)))?;
    info!("  📐 Loaded {}", path.display());
    Ok(fragment)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rules::BusinessRules;
    use anyhow::Result;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn base_config() -> ProjectConfig {
        serde_yaml::from_str("name: demo\nversion: '1'").unwrap()
    }

    #[test]
    fn test_manifest_discovery_prefers_project_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("vigil.yaml"), "name: short\nversion: '1'")?;
        fs::write(dir.path().join("vigil_project.yaml"), "name: long\nversion: '1'")?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "long");
        Ok(())
    }

    #[test]
    fn test_missing_manifest_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("VIGIL_TARGET_PATH", "/tmp/out"),
            ("VIGIL_DATASET_PATH", "data/other.yaml"),
            ("VIGIL_STRICT", "TRUE"),
        ]);
        let mut config = base_config();
        apply_env_overrides_with(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.target_path, "/tmp/out");
        assert_eq!(config.dataset_path, "data/other.yaml");
        assert!(config.governance.strict);
    }

    #[test]
    fn test_unrecognized_strict_flag_is_ignored() {
        let mut config = base_config();
        config.governance.strict = true;
        apply_env_overrides_with(&mut config, |k| {
            (k == "VIGIL_STRICT").then(|| "maybe".to_string())
        });
        assert!(config.governance.strict);
    }

    #[test]
    fn test_incomplete_satellite_is_config_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(BUSINESS_RULES_FILE);
        fs::write(&path, "analysis_rules:\n  churn_risk_high_threshold: 0.7\n")?;

        let err = load_satellite::<BusinessRules>(&path).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(_)));

        let missing = load_satellite::<BusinessRules>(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }
}
