//! Module manifests.
//!
//! Every module carries a `manifest/manifest.json` document declaring the
//! application package and whether the module ships code (feature) or pure
//! content (asset). Classification comes from this marker only, never from
//! naming conventions.

use serde::{Deserialize, Serialize};

/// Kind of content a module delivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    /// Installable code module.
    #[default]
    Feature,
    /// Content-only asset pack.
    Asset,
}

/// Parsed module manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Application package the module belongs to.
    pub package: String,

    /// Feature/asset classification marker.
    #[serde(default)]
    pub module_type: ModuleType,
}

impl ModuleManifest {
    /// Creates a feature-module manifest for the given package.
    pub fn feature(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module_type: ModuleType::Feature,
        }
    }

    /// Creates an asset-module manifest for the given package.
    pub fn asset(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module_type: ModuleType::Asset,
        }
    }

    /// Decodes a manifest from its JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
