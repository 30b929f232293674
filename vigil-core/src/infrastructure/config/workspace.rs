// vigil-core/src/infrastructure/config/workspace.rs

use std::path::{Path, PathBuf};

use crate::domain::customer::Snapshot;
use crate::domain::ports::AnalysisSource;
use crate::domain::project::ProjectConfig;
use crate::domain::rules::{BusinessRules, Catalog};
use crate::error::VigilError;
use crate::infrastructure::config::dataset::load_dataset;
use crate::infrastructure::config::project::{
    BUSINESS_RULES_FILE, PRODUCT_CATALOG_FILE, load_project_config, load_satellite,
};
use crate::infrastructure::error::InfrastructureError;

/// A project directory on disk: manifest, satellite config files and dataset.
#[derive(Debug, Clone)]
pub struct ProjectWorkspace {
    root: PathBuf,
    config: ProjectConfig,
}

impl ProjectWorkspace {
    pub fn open(root: &Path) -> Result<Self, InfrastructureError> {
        let config = load_project_config(root)?;
        Ok(Self::from_config(root, config))
    }

    pub fn from_config(root: &Path, config: ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_dir(&self) -> PathBuf {
        self.resolve(self.config.config_dir())
    }

    pub fn rules_path(&self) -> PathBuf {
        self.config_dir().join(BUSINESS_RULES_FILE)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.config_dir().join(PRODUCT_CATALOG_FILE)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.config.dataset_path)
    }

    pub fn target_dir(&self) -> PathBuf {
        self.resolve(&self.config.target_path)
    }

    // Absolute paths (e.g. from VIGIL_TARGET_PATH) are taken as-is.
    fn resolve(&self, relative: &str) -> PathBuf {
        let path = Path::new(relative);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AnalysisSource for ProjectWorkspace {
    fn load_rules(&self) -> Result<BusinessRules, VigilError> {
        Ok(load_satellite(&self.rules_path())?)
    }

    fn load_catalog(&self) -> Result<Catalog, VigilError> {
        Ok(load_satellite(&self.catalog_path())?)
    }

    fn load_snapshot(&self) -> Result<Snapshot, VigilError> {
        Ok(load_dataset(&self.dataset_path())?)
    }
}
