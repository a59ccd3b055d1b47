//! Bundle modules.
//!
//! A module is a named, independently-deliverable content group inside a
//! bundle: an ordered map of module-relative entries plus the parsed special
//! files (manifest, native-library targeting, apex-image targeting). Special
//! files are routed to their parsed fields during construction and never
//! appear in the entry map.

use crate::bundle::dex::canonicalize_dex_names;
use crate::error::{BundleError, Result};
use crate::model::entry::{EntrySource, ModuleEntry};
use crate::model::manifest::{ModuleManifest, ModuleType};
use crate::model::path::BundlePath;
use crate::model::targeting::{Abi, Sanitizer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Module-relative path of the manifest document.
pub const MANIFEST_PATH: &str = "manifest/manifest.json";
/// Module-relative path of the native-library targeting descriptor.
pub const NATIVE_CONFIG_PATH: &str = "native.json";
/// Module-relative path of the apex-image targeting descriptor.
pub const APEX_CONFIG_PATH: &str = "apex.json";

/// Exact final suffix marking stray compiled-class artifacts.
const CLASS_FILE_SUFFIX: &str = ".class";

/// Validated module name: the top-level directory the module's entries live
/// under. Reserved top-level names never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Name of the designated base feature module.
    pub const BASE: &'static str = "base";

    /// Validates and wraps a module name (`[A-Za-z][A-Za-z0-9_]*`).
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(BundleError::InvalidModuleName { name });
        }
        Ok(Self(name))
    }

    /// The base module name.
    pub fn base() -> Self {
        Self(Self::BASE.to_string())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the designated base module.
    pub fn is_base(&self) -> bool {
        self.0 == Self::BASE
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One native directory with its targeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedNativeDirectory {
    /// Module-relative directory, e.g. `lib/x86_64`.
    pub path: String,

    /// Architecture the directory's libraries are built for.
    pub abi: Abi,

    /// Sanitizer the directory's libraries are built with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitizer: Option<Sanitizer>,
}

/// Native-library targeting descriptor (`native.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeConfig {
    /// Targeted native directories.
    #[serde(default)]
    pub directories: Vec<TargetedNativeDirectory>,
}

/// One apex image with its targeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedApexImage {
    /// Module-relative image path, e.g. `apex/x86_64.img`.
    pub path: String,

    /// Architectures the image serves; apex images are always per-ABI.
    pub multi_abi: Vec<Abi>,
}

/// Apex-image targeting descriptor (`apex.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApexConfig {
    /// Targeted apex images.
    #[serde(default)]
    pub images: Vec<TargetedApexImage>,
}

/// A named content module of a bundle.
///
/// Immutable once built; construction guarantees exactly one manifest, no
/// stray compiled-class artifacts and canonical dex naming.
#[derive(Debug, Clone)]
pub struct BundleModule {
    name: ModuleName,
    entries: BTreeMap<BundlePath, ModuleEntry>,
    manifest: ModuleManifest,
    native_config: Option<NativeConfig>,
    apex_config: Option<ApexConfig>,
}

impl BundleModule {
    /// Starts building a module with the given name.
    pub fn builder(name: ModuleName) -> BundleModuleBuilder {
        BundleModuleBuilder {
            name,
            entries: Vec::new(),
            manifest: None,
            native_config: None,
            apex_config: None,
        }
    }

    /// Returns the module name.
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Returns the ordered entry map (special files excluded).
    pub fn entries(&self) -> &BTreeMap<BundlePath, ModuleEntry> {
        &self.entries
    }

    /// Looks up one entry by module-relative path.
    pub fn entry(&self, path: &BundlePath) -> Option<&ModuleEntry> {
        self.entries.get(path)
    }

    /// Returns the parsed manifest.
    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    /// Returns the feature/asset classification.
    pub fn module_type(&self) -> ModuleType {
        self.manifest.module_type
    }

    /// Returns the native-library targeting descriptor, if present.
    pub fn native_config(&self) -> Option<&NativeConfig> {
        self.native_config.as_ref()
    }

    /// Returns the apex-image targeting descriptor, if present.
    pub fn apex_config(&self) -> Option<&ApexConfig> {
        self.apex_config.as_ref()
    }
}

/// Builder for [`BundleModule`], used by ingestion and by tests.
#[derive(Debug)]
pub struct BundleModuleBuilder {
    name: ModuleName,
    entries: Vec<ModuleEntry>,
    manifest: Option<ModuleManifest>,
    native_config: Option<NativeConfig>,
    apex_config: Option<ApexConfig>,
}

impl BundleModuleBuilder {
    /// Adds an entry by module-relative path, routing special files to their
    /// parsed fields. Entry order is preserved for non-special entries.
    pub fn add_entry(mut self, path: BundlePath, source: EntrySource) -> Result<Self> {
        if path.to_string() == MANIFEST_PATH {
            self.manifest = Some(self.decode(&path, &source)?);
        } else if path.to_string() == NATIVE_CONFIG_PATH {
            self.native_config = Some(self.decode(&path, &source)?);
        } else if path.to_string() == APEX_CONFIG_PATH {
            self.apex_config = Some(self.decode(&path, &source)?);
        } else {
            self.entries.push(ModuleEntry::new(path, source));
        }
        Ok(self)
    }

    /// Adds a plain content entry from a string path and raw bytes.
    pub fn add_file(self, path: &str, content: impl Into<bytes::Bytes>) -> Result<Self> {
        self.add_entry(BundlePath::parse(path)?, EntrySource::from_bytes(content))
    }

    /// Sets the manifest directly.
    pub fn manifest(mut self, manifest: ModuleManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Sets the native-library targeting descriptor directly.
    pub fn native_config(mut self, config: NativeConfig) -> Self {
        self.native_config = Some(config);
        self
    }

    /// Sets the apex-image targeting descriptor directly.
    pub fn apex_config(mut self, config: ApexConfig) -> Self {
        self.apex_config = Some(config);
        self
    }

    /// Finalizes the module.
    ///
    /// Fails when no manifest was provided or two entries share a path.
    /// Stray `.class` artifacts are dropped and dex entries renamed to the
    /// canonical sequence before the entry map is frozen.
    pub fn build(self) -> Result<BundleModule> {
        let manifest = self.manifest.ok_or_else(|| BundleError::MissingManifest {
            module: self.name.to_string(),
        })?;

        let kept: Vec<ModuleEntry> = self
            .entries
            .into_iter()
            .filter(|entry| {
                let stray = entry.path().name().ends_with(CLASS_FILE_SUFFIX);
                if stray {
                    log::debug!(
                        "dropping stray compiled-class artifact {}/{}",
                        self.name,
                        entry.path()
                    );
                }
                !stray
            })
            .collect();

        let mut entries = BTreeMap::new();
        for entry in canonicalize_dex_names(kept) {
            let path = entry.path().clone();
            if entries.insert(path.clone(), entry).is_some() {
                return Err(BundleError::DuplicateEntry {
                    path: path.to_string(),
                    module: self.name.to_string(),
                });
            }
        }

        Ok(BundleModule {
            name: self.name,
            entries,
            manifest,
            native_config: self.native_config,
            apex_config: self.apex_config,
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(
        &self,
        path: &BundlePath,
        source: &EntrySource,
    ) -> Result<T> {
        let bytes = source.read()?;
        serde_json::from_slice(&bytes).map_err(|source| BundleError::Json {
            path: format!("{}/{}", self.name, path),
            source,
        })
    }
}
