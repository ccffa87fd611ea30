// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use govharness_core::HarnessError;
use serde_json::Value;
use tracing::info;

use crate::limits::{BASE_REQUIRED_SECTIONS, CATALOG_REQUIRED_SECTIONS};
use crate::naming::validate_timestamp_format;
use crate::schema::{BaseConfiguration, Catalog};

const CATALOG_PATH: &str = "configs/harness/catalog.json";
const BASE_CONFIG_PATH: &str = "configs/harness/base.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

#[must_use]
pub fn catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_PATH)
}

#[must_use]
pub fn base_config_path(root: &Path) -> PathBuf {
    root.join(BASE_CONFIG_PATH)
}

pub fn load_catalog(path: &Path) -> Result<Catalog, HarnessError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        HarnessError::MalformedCatalog(format!("read catalog failed: {}: {e}", path.display()))
    })?;
    let catalog = parse_catalog(&raw, SourceFormat::from_path(path))?;
    info!(
        path = %path.display(),
        categories = catalog.policies.len(),
        environments = catalog.environments.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub fn load_base_configuration(path: &Path) -> Result<BaseConfiguration, HarnessError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        HarnessError::MalformedConfig(format!(
            "read base configuration failed: {}: {e}",
            path.display()
        ))
    })?;
    let base = parse_base_configuration(&raw, SourceFormat::from_path(path))?;
    info!(path = %path.display(), "base configuration loaded");
    Ok(base)
}

pub fn parse_catalog(raw: &str, format: SourceFormat) -> Result<Catalog, HarnessError> {
    let value = decode_document(raw, format)
        .map_err(|e| HarnessError::MalformedCatalog(format!("parse catalog failed: {e}")))?;
    validate_catalog_shape(&value)?;

    let mut catalog: Catalog = serde_json::from_value(value)
        .map_err(|e| HarnessError::MalformedCatalog(format!("decode catalog failed: {e}")))?;

    for (category, policies) in &mut catalog.policies {
        for (name, entry) in policies.iter_mut() {
            entry.category.clone_from(category);
            entry.name.clone_from(name);
        }
    }
    for (id, overlay) in &mut catalog.environments {
        overlay.environment_id = *id;
    }
    Ok(catalog)
}

pub fn parse_base_configuration(
    raw: &str,
    format: SourceFormat,
) -> Result<BaseConfiguration, HarnessError> {
    let value = decode_document(raw, format).map_err(|e| {
        HarnessError::MalformedConfig(format!("parse base configuration failed: {e}"))
    })?;
    let obj = value.as_object().ok_or_else(|| {
        HarnessError::MalformedConfig("base configuration must be an object".to_string())
    })?;
    for section in BASE_REQUIRED_SECTIONS {
        match obj.get(section) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(HarnessError::MalformedConfig(format!(
                    "section `{section}` must be an object"
                )))
            }
            None => {
                return Err(HarnessError::MalformedConfig(format!(
                    "required section `{section}` is missing"
                )))
            }
        }
    }

    let base: BaseConfiguration = serde_json::from_value(value).map_err(|e| {
        HarnessError::MalformedConfig(format!("decode base configuration failed: {e}"))
    })?;

    if base.naming.max_name_length == 0 {
        return Err(HarnessError::MalformedConfig(
            "naming.maxNameLength must be > 0".to_string(),
        ));
    }
    validate_timestamp_format(&base.naming.timestamp_format)?;
    Ok(base)
}

fn decode_document(raw: &str, format: SourceFormat) -> Result<Value, String> {
    match format {
        SourceFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
    }
}

fn validate_catalog_shape(value: &Value) -> Result<(), HarnessError> {
    let obj = value
        .as_object()
        .ok_or_else(|| HarnessError::MalformedCatalog("catalog must be an object".to_string()))?;
    for section in CATALOG_REQUIRED_SECTIONS {
        let Some(found) = obj.get(section) else {
            return Err(HarnessError::MalformedCatalog(format!(
                "required section `{section}` is missing"
            )));
        };
        if !found.is_object() {
            return Err(HarnessError::MalformedCatalog(format!(
                "section `{section}` must be an object"
            )));
        }
    }

    if let Some(Value::Object(policies)) = obj.get("policies") {
        for (category, entries) in policies {
            if !entries.is_object() {
                return Err(HarnessError::MalformedCatalog(format!(
                    "policies.{category} must map policy names to entries"
                )));
            }
        }
    }
    Ok(())
}
