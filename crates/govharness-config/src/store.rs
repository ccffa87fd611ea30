// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use govharness_core::{resolve_workspace_root, HarnessError};

use crate::paths::resolve_definition_path;
use crate::resolve::{resolve_effective, select_environment};
use crate::schema::{BaseConfiguration, Catalog, CatalogEntry, EffectiveConfiguration};
use crate::sources::{base_config_path, catalog_path, load_base_configuration, load_catalog};

static GLOBAL: OnceLock<HarnessData> = OnceLock::new();

/// Catalog and base configuration loaded together. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessData {
    catalog: Catalog,
    base: BaseConfiguration,
}

impl HarnessData {
    #[must_use]
    pub const fn new(catalog: Catalog, base: BaseConfiguration) -> Self {
        Self { catalog, base }
    }

    pub fn load_from_workspace(root: &Path) -> Result<Self, HarnessError> {
        let catalog = load_catalog(&catalog_path(root))?;
        let base = load_base_configuration(&base_config_path(root))?;
        Ok(Self::new(catalog, base))
    }

    /// Process-wide data for the workspace root, loaded on first successful
    /// call and never reloaded. A failed load is not cached.
    pub fn global() -> Result<&'static Self, HarnessError> {
        if let Some(data) = GLOBAL.get() {
            return Ok(data);
        }
        let loaded = Self::load_from_workspace(&resolve_workspace_root())?;
        Ok(GLOBAL.get_or_init(|| loaded))
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn base(&self) -> &BaseConfiguration {
        &self.base
    }

    pub fn entry(&self, category: &str, policy_name: &str) -> Result<&CatalogEntry, HarnessError> {
        self.catalog.entry(category, policy_name)
    }

    pub fn resolve(
        &self,
        category: &str,
        policy_name: &str,
        environment: Option<&str>,
    ) -> Result<EffectiveConfiguration, HarnessError> {
        let environment = select_environment(environment)?;
        resolve_effective(&self.catalog, &self.base, category, policy_name, environment)
    }

    pub fn resolve_path(
        &self,
        category: &str,
        policy_name: &str,
        caller_root: &Path,
    ) -> Result<PathBuf, HarnessError> {
        resolve_definition_path(self.catalog.entry(category, policy_name)?, caller_root)
    }

    pub fn required_modules(&self, group: &str) -> Result<&[String], HarnessError> {
        self.base.required_modules(group)
    }

    pub fn tags_for(&self, purpose: &str) -> Result<&[String], HarnessError> {
        self.base.tags_for(purpose)
    }
}
