// vigil-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,

    #[serde(rename = "dataset-path", default = "default_dataset_path")]
    pub dataset_path: String,

    #[serde(rename = "config-paths", default = "default_config_paths")]
    pub config_paths: Vec<String>,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    /// Empty means "clean the target path".
    #[serde(rename = "clean-targets", default)]
    pub clean_targets: Vec<String>,

    #[serde(default)]
    pub governance: GovernanceSettings,

    #[serde(default)]
    pub narrative: NarrativeSettings,
}

impl ProjectConfig {
    /// Folder holding `business_rules.yaml` and `product_catalog.yaml`.
    pub fn config_dir(&self) -> &str {
        self.config_paths.first().map(String::as_str).unwrap_or("config")
    }

    /// Paths removed by `clean`, relative to the project root.
    pub fn targets_to_clean(&self) -> Vec<String> {
        if self.clean_targets.is_empty() {
            vec![self.target_path.clone()]
        } else {
            self.clean_targets.clone()
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GovernanceSettings {
    /// Rejected analyses fail the `run` command.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NarrativeSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "summary-max-chars", default = "default_summary_max_chars")]
    pub summary_max_chars: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl NarrativeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            summary_max_chars: default_summary_max_chars(),
            temperature: default_temperature(),
        }
    }
}

fn default_dataset_path() -> String {
    "data/customers.yaml".to_string()
}
fn default_config_paths() -> Vec<String> {
    vec!["config".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_summary_max_chars() -> usize {
    4000
}
fn default_temperature() -> f32 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_gets_defaults() -> anyhow::Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("name: demo\nversion: '1.0'\n")?;
        assert_eq!(config.dataset_path, "data/customers.yaml");
        assert_eq!(config.config_dir(), "config");
        assert_eq!(config.target_path, "target");
        assert!(config.clean_targets.is_empty());
        assert_eq!(config.targets_to_clean(), vec!["target".to_string()]);
        assert!(!config.governance.strict);
        assert_eq!(config.narrative, NarrativeSettings::default());
        assert_eq!(config.narrative.timeout(), Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn test_clean_targets_follow_custom_target_path() -> anyhow::Result<()> {
        let config: ProjectConfig =
            serde_yaml::from_str("name: demo\nversion: '1'\ntarget-path: out\n")?;
        assert_eq!(config.targets_to_clean(), vec!["out".to_string()]);

        let explicit: ProjectConfig = serde_yaml::from_str(
            "name: demo\nversion: '1'\ntarget-path: out\nclean-targets: [out, logs]\n",
        )?;
        assert_eq!(
            explicit.targets_to_clean(),
            vec!["out".to_string(), "logs".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_kebab_case_keys() -> anyhow::Result<()> {
        let yaml = r#"
name: demo
version: "2"
dataset-path: input/snapshot.yaml
config-paths: [settings]
governance:
  strict: true
narrative:
  enabled: false
  summary-max-chars: 120
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.dataset_path, "input/snapshot.yaml");
        assert_eq!(config.config_dir(), "settings");
        assert!(config.governance.strict);
        assert!(!config.narrative.enabled);
        assert_eq!(config.narrative.summary_max_chars, 120);
        assert_eq!(config.narrative.timeout_secs, 30);
        Ok(())
    }
}
