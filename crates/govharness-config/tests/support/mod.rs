// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::path::PathBuf;

use govharness_config::{
    parse_base_configuration, parse_catalog, BaseConfiguration, Catalog, HarnessData, SourceFormat,
};

pub const BASE_JSON: &str = r#"{
  "schemaVersion": "1",
  "timeouts": {"policyEvaluation": 1800, "complianceScan": 3600, "resourceCreation": 600, "remediation": 2700, "cleanup": 900},
  "behavior": {"cleanupResources": true, "verbose": false, "skipLongRunning": false, "validateScopeExists": true, "waitForCompliance": true},
  "naming": {"maxNameLength": 24, "timestampFormat": "%Y%m%d%H%M%S", "testResourcePrefix": "policytest"},
  "scope": {"targetScopeId": null, "defaultRegion": "eastus", "subscriptionId": null},
  "moduleGroups": {"core": ["Az.Accounts", "Az.Resources"], "storage": ["Az.Storage"]},
  "tagTaxonomy": {"speed": ["fast", "slow"], "scope": ["integration"]}
}"#;

pub const CATALOG_JSON: &str = r#"{
  "schemaVersion": "1",
  "policies": {
    "storage": {
      "deny-storage-account-public-access": {
        "displayName": "Deny public blob access",
        "definitionRelativePath": "policies/storage/deny-storage-account-public-access.json",
        "namePrefix": "testpolicystorage",
        "testOptions": {"compliant": "comp", "nonCompliant": "nonc", "exempted": "exmp", "sku": "Standard_LRS"}
      },
      "long-prefix": {
        "displayName": "Prefix too long for its suffix",
        "definitionRelativePath": "policies/storage/long-prefix.json",
        "namePrefix": "abcdefghijklmnopqrst",
        "testOptions": {"compliant": "compl", "nonCompliant": "nonc"}
      }
    },
    "network": {
      "deny-network-no-nsg": {
        "displayName": "Subnets require an NSG",
        "definitionRelativePath": "policies/network/../network/deny-network-no-nsg.json",
        "namePrefix": "testpolicynsg",
        "testOptions": {"compliant": "comp", "nonCompliant": "nonc", "subnetCount": 2},
        "overrides": {"timeouts": {"resourceCreation": 900, "cleanup": 1200}, "defaultRegion": "northeurope"}
      }
    },
    "tags": {
      "require-owner-tag": {
        "displayName": "Require owner tag",
        "definitionRelativePath": "policies/tags/require-owner-tag.json",
        "testOptions": {"compliant": "comp", "exempted": "exmp"}
      }
    }
  },
  "environments": {
    "dev": {"targetScopeId": "X"},
    "prod": {
      "targetScopeId": "/providers/Microsoft.Management/managementGroups/mg-prod",
      "defaultRegion": "eastus2",
      "subscriptionId": "11111111-2222-3333-4444-555555555555",
      "timeouts": {"cleanup": 300},
      "behavior": {"verbose": true}
    }
  }
}"#;

pub fn base() -> BaseConfiguration {
    parse_base_configuration(BASE_JSON, SourceFormat::Json).expect("fixture base configuration")
}

pub fn catalog() -> Catalog {
    parse_catalog(CATALOG_JSON, SourceFormat::Json).expect("fixture catalog")
}

pub fn data() -> HarnessData {
    HarnessData::new(catalog(), base())
}

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}
