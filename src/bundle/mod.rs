//! Bundle ingestion.
//!
//! This module turns a flat sequence of archive entries into the validated,
//! immutable [`Bundle`] model:
//!
//! 1. Classify every entry by its first path segment into an explicit
//!    discriminated kind (module content, metadata, global config, ignored).
//! 2. Decode the global config; fail if it is absent.
//! 3. Build each module, dropping stray compiled-class artifacts, decoding
//!    special files and canonicalizing dex names.
//! 4. Partition modules into feature and asset maps from their manifest
//!    markers and validate the bundle-level invariants.
//!
//! Construction either yields a complete model or fails; no partial bundle
//! is ever exposed.

pub mod dex;
mod metadata;

pub use metadata::BundleMetadata;

use crate::error::{BundleError, Result};
use crate::model::{
    Abi, ArchiveEntry, BundleConfig, BundleModule, BundlePath, BundleType, EntrySource, ModuleName,
    ModuleType,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use zip::ZipArchive;

/// Reserved top-level directory holding namespaced metadata.
pub const METADATA_DIRECTORY: &str = "BUNDLE-METADATA";
/// Reserved top-level directory holding archive signatures; always discarded.
pub const SIGNATURE_DIRECTORY: &str = "META-INF";
/// Fixed archive path of the global bundle config.
pub const BUNDLE_CONFIG_FILE: &str = "BundleConfig.json";

/// Classification of one archive entry, decided purely from its path.
#[derive(Debug)]
enum EntryKind {
    /// The global config document.
    Config,
    /// Content of a named module.
    Module { name: String, relative: BundlePath },
    /// A namespaced metadata file.
    Metadata { namespace: String, file_name: String },
    /// Signatures and unclaimed top-level files.
    Ignored,
}

fn classify_entry(path: &BundlePath) -> Result<EntryKind> {
    let first = path.first();
    let Some(relative) = path.tail() else {
        // Top-level files: only the config is meaningful.
        return Ok(if first == BUNDLE_CONFIG_FILE {
            EntryKind::Config
        } else {
            EntryKind::Ignored
        });
    };
    match first {
        SIGNATURE_DIRECTORY => Ok(EntryKind::Ignored),
        METADATA_DIRECTORY => {
            // A namespace directory plus a file name are both required.
            let segments = relative.segments();
            if segments.len() < 2 {
                return Err(BundleError::InvalidMetadataPath {
                    path: path.to_string(),
                });
            }
            Ok(EntryKind::Metadata {
                namespace: segments[..segments.len() - 1].join("/"),
                file_name: segments[segments.len() - 1].clone(),
            })
        }
        _ => Ok(EntryKind::Module {
            name: first.to_string(),
            relative,
        }),
    }
}

/// Validated in-memory model of one bundle archive.
///
/// Built once, immutable and freely shareable afterwards; concurrent split
/// generation over its modules needs no locking.
#[derive(Debug, Clone)]
pub struct Bundle {
    config: BundleConfig,
    metadata: BundleMetadata,
    feature_modules: BTreeMap<ModuleName, BundleModule>,
    asset_modules: BTreeMap<ModuleName, BundleModule>,
}

impl Bundle {
    /// Starts building a bundle from pre-built modules (primarily for tests
    /// and programmatic construction).
    pub fn builder() -> BundleBuilder {
        BundleBuilder {
            config: BundleConfig::default(),
            metadata: BundleMetadata::default(),
            modules: Vec::new(),
        }
    }

    /// Builds the model from a zip archive on disk.
    ///
    /// Entry payloads stay in the archive and are read lazily; the archive
    /// handle is shared by every entry source of the resulting bundle.
    pub fn build_from_zip(path: &Path) -> Result<Self> {
        let archive = ZipArchive::new(File::open(path)?)?;
        let shared = Arc::new(Mutex::new(archive));

        let count = lock(&shared)?.len();
        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let (name, is_dir) = {
                let mut archive = lock(&shared)?;
                let entry = archive.by_index(index)?;
                (entry.name().to_string(), entry.is_dir())
            };
            if is_dir {
                continue;
            }
            entries.push(ArchiveEntry::new(
                BundlePath::parse(&name)?,
                EntrySource::from_archive(Arc::clone(&shared), index),
            ));
        }
        log::debug!("read {} entries from {}", entries.len(), path.display());
        Self::build_from_entries(entries)
    }

    /// Builds the model from a sequence of archive entries.
    ///
    /// This is the pure construction algorithm; the zip front end above is
    /// only one possible archive reader.
    pub fn build_from_entries(entries: Vec<ArchiveEntry>) -> Result<Self> {
        let mut config_source: Option<EntrySource> = None;
        let mut metadata = BundleMetadata::default();
        // Entry order within each module group is archive order; the dex
        // canonicalizer depends on it.
        let mut module_groups: BTreeMap<String, Vec<(BundlePath, EntrySource)>> = BTreeMap::new();

        for entry in entries {
            let (path, source) = entry.into_parts();
            match classify_entry(&path)? {
                EntryKind::Config => config_source = Some(source),
                EntryKind::Metadata {
                    namespace,
                    file_name,
                } => metadata.insert(namespace, file_name, source),
                EntryKind::Module { name, relative } => {
                    module_groups.entry(name).or_default().push((relative, source));
                }
                EntryKind::Ignored => log::debug!("ignoring archive entry {path}"),
            }
        }

        let config_source =
            config_source.ok_or(BundleError::MissingBundleConfig(BUNDLE_CONFIG_FILE))?;
        let config_bytes = config_source.read()?;
        let config = BundleConfig::from_slice(&config_bytes).map_err(|source| BundleError::Json {
            path: BUNDLE_CONFIG_FILE.to_string(),
            source,
        })?;

        let mut builder = Bundle::builder().config(config).metadata(metadata);
        for (name, group) in module_groups {
            let mut module = BundleModule::builder(ModuleName::new(name)?);
            for (path, source) in group {
                module = module.add_entry(path, source)?;
            }
            builder = builder.module(module.build()?);
        }
        builder.build()
    }

    /// Feature modules keyed by name.
    pub fn feature_modules(&self) -> &BTreeMap<ModuleName, BundleModule> {
        &self.feature_modules
    }

    /// Asset modules keyed by name.
    pub fn asset_modules(&self) -> &BTreeMap<ModuleName, BundleModule> {
        &self.asset_modules
    }

    /// Looks up a module of either kind by name.
    pub fn module(&self, name: &ModuleName) -> Option<&BundleModule> {
        self.feature_modules
            .get(name)
            .or_else(|| self.asset_modules.get(name))
    }

    /// The designated base feature module, if present.
    pub fn base_module(&self) -> Option<&BundleModule> {
        self.feature_modules.get(&ModuleName::base())
    }

    /// The global build configuration.
    pub fn bundle_config(&self) -> &BundleConfig {
        &self.config
    }

    /// The namespaced metadata table.
    pub fn bundle_metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    /// True iff the config marks this an asset-only bundle.
    pub fn is_asset_only(&self) -> bool {
        self.config.bundle_type == BundleType::AssetOnly
    }

    /// Union of every ABI referenced by any feature module's native-library
    /// targeting. Modules without native targeting contribute nothing.
    pub fn targeted_abis(&self) -> BTreeSet<Abi> {
        self.feature_modules
            .values()
            .filter_map(|module| module.native_config())
            .flat_map(|config| config.directories.iter().map(|dir| dir.abi))
            .collect()
    }

    /// The application package of the bundle.
    ///
    /// Resolved from the base feature module. Asset-only bundles have no
    /// base; their modules are validated to agree, so any asset module works.
    pub fn package_name(&self) -> Result<&str> {
        if let Some(base) = self.base_module() {
            return Ok(&base.manifest().package);
        }
        if self.is_asset_only() {
            return self
                .asset_modules
                .values()
                .next()
                .map(|module| module.manifest().package.as_str())
                .ok_or(BundleError::NoModules);
        }
        Err(BundleError::MissingBaseModule)
    }
}

/// Builder assembling a [`Bundle`] from pre-built parts.
#[derive(Debug)]
pub struct BundleBuilder {
    config: BundleConfig,
    metadata: BundleMetadata,
    modules: Vec<BundleModule>,
}

impl BundleBuilder {
    /// Sets the global config (defaults to an empty config).
    pub fn config(mut self, config: BundleConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the metadata table (defaults to empty).
    pub fn metadata(mut self, metadata: BundleMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds one module.
    pub fn module(mut self, module: BundleModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Validates the bundle-level invariants and freezes the model.
    pub fn build(self) -> Result<Bundle> {
        if self.modules.is_empty() {
            return Err(BundleError::NoModules);
        }

        if self.config.bundle_type == BundleType::AssetOnly {
            // Every module of an asset-only bundle must declare the same
            // application package; divergence is a validation error, not a
            // tie to break silently.
            let mut packages = self.modules.iter().map(|m| m.manifest().package.as_str());
            let first = packages.next().unwrap_or_default();
            if let Some(other) = packages.find(|p| *p != first) {
                return Err(BundleError::PackageNameMismatch {
                    first: first.to_string(),
                    second: other.to_string(),
                });
            }
        }

        let mut feature_modules = BTreeMap::new();
        let mut asset_modules = BTreeMap::new();
        for module in self.modules {
            let target = match module.module_type() {
                ModuleType::Feature => &mut feature_modules,
                ModuleType::Asset => &mut asset_modules,
            };
            target.insert(module.name().clone(), module);
        }
        log::debug!(
            "bundle model built: {} feature module(s), {} asset module(s), {} metadata file(s)",
            feature_modules.len(),
            asset_modules.len(),
            self.metadata.len()
        );

        Ok(Bundle {
            config: self.config,
            metadata: self.metadata,
            feature_modules,
            asset_modules,
        })
    }
}

fn lock(archive: &Arc<Mutex<ZipArchive<File>>>) -> Result<std::sync::MutexGuard<'_, ZipArchive<File>>> {
    archive
        .lock()
        .map_err(|_| BundleError::Io(std::io::Error::other("bundle archive lock poisoned")))
}
