//! Per-dimension splitter implementations.
//!
//! Each splitter keys the input's entries by one targeting dimension,
//! produces one narrowed split per observed value and keeps everything it
//! cannot attribute together in a remainder split with the input's
//! targeting. Native and apex splitters read the module's targeting
//! descriptors; resource and asset splitters read targeting embedded in the
//! path structure.

use super::pipeline::Splitter;
use super::split::ModuleSplit;
use crate::model::{
    Abi, BundleModule, BundlePath, ModuleEntry, Sanitizer, SplitTargeting,
    asset_directory_targeting, resource_density, resource_language,
};
use std::collections::{BTreeMap, BTreeSet};

/// Groups a split's entries by an optional key; unkeyed entries form the
/// remainder.
fn partition_entries<K: Ord>(
    split: &ModuleSplit,
    key: impl Fn(&ModuleEntry) -> Option<K>,
) -> (BTreeMap<K, Vec<ModuleEntry>>, Vec<ModuleEntry>) {
    let mut groups: BTreeMap<K, Vec<ModuleEntry>> = BTreeMap::new();
    let mut remainder = Vec::new();
    for entry in split.entries() {
        match key(entry) {
            Some(k) => groups.entry(k).or_default().push(entry.clone()),
            None => remainder.push(entry.clone()),
        }
    }
    (groups, remainder)
}

/// Builds the fan-out result: one narrowed split per group plus the
/// remainder under the input's own targeting. With nothing to narrow the
/// input passes through unchanged.
fn fan_out<K: Ord>(
    split: &ModuleSplit,
    groups: BTreeMap<K, Vec<ModuleEntry>>,
    remainder: Vec<ModuleEntry>,
    narrow: impl Fn(SplitTargeting, &K) -> SplitTargeting,
) -> Vec<ModuleSplit> {
    if groups.is_empty() {
        return vec![split.clone()];
    }
    let mut out = Vec::with_capacity(groups.len() + 1);
    if !remainder.is_empty() {
        out.push(split.with_entries(remainder));
    }
    for (key, entries) in groups {
        let targeting = narrow(split.targeting().clone(), &key);
        out.push(split.with_entries(entries).with_targeting(targeting));
    }
    out
}

/// Fans native libraries out by the ABI of their targeted directory.
pub struct AbiNativeLibrariesSplitter {
    directories: Vec<(BundlePath, Abi)>,
}

impl AbiNativeLibrariesSplitter {
    /// Reads the ABI mapping from the module's native config.
    pub fn new(module: &BundleModule) -> Self {
        Self {
            directories: native_directories(module, |dir| Some(dir.abi)),
        }
    }
}

impl Splitter for AbiNativeLibrariesSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| {
            self.directories
                .iter()
                .find(|(dir, _)| entry.path().starts_with(dir))
                .map(|(_, abi)| *abi)
        });
        fan_out(split, groups, remainder, |targeting, abi| {
            targeting.with_abis([*abi])
        })
    }
}

/// Separates native libraries built for a sanitizer runtime.
pub struct SanitizerNativeLibrariesSplitter {
    directories: Vec<(BundlePath, Sanitizer)>,
}

impl SanitizerNativeLibrariesSplitter {
    /// Reads the sanitizer mapping from the module's native config.
    pub fn new(module: &BundleModule) -> Self {
        Self {
            directories: native_directories(module, |dir| dir.sanitizer),
        }
    }
}

impl Splitter for SanitizerNativeLibrariesSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| {
            self.directories
                .iter()
                .find(|(dir, _)| entry.path().starts_with(dir))
                .map(|(_, sanitizer)| *sanitizer)
        });
        fan_out(split, groups, remainder, |targeting, sanitizer| {
            targeting.with_sanitizer(*sanitizer)
        })
    }
}

fn native_directories<T>(
    module: &BundleModule,
    value: impl Fn(&crate::model::TargetedNativeDirectory) -> Option<T>,
) -> Vec<(BundlePath, T)> {
    module
        .native_config()
        .map(|config| {
            config
                .directories
                .iter()
                .filter_map(|dir| {
                    let path = match BundlePath::parse(&dir.path) {
                        Ok(path) => path,
                        Err(_) => {
                            log::warn!("skipping native directory with invalid path '{}'", dir.path);
                            return None;
                        }
                    };
                    value(dir).map(|v| (path, v))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Fans resources out by the density qualifier of their directory.
pub struct ScreenDensityResourcesSplitter;

impl Splitter for ScreenDensityResourcesSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| resource_density(entry.path()));
        fan_out(split, groups, remainder, |targeting, density| {
            targeting.with_density(*density)
        })
    }
}

/// Fans resources out by the language qualifier of their directory.
pub struct LanguageResourcesSplitter;

impl Splitter for LanguageResourcesSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| resource_language(entry.path()));
        fan_out(split, groups, remainder, |targeting, language| {
            targeting.with_language(language.clone())
        })
    }
}

/// Fans assets out by `#lang_` directory tokens.
pub struct LanguageAssetsSplitter;

impl Splitter for LanguageAssetsSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| {
            asset_directory_targeting(entry.path()).language
        });
        fan_out(split, groups, remainder, |targeting, language| {
            targeting.with_language(language.clone())
        })
    }
}

/// Fans apex images out by their multi-ABI targeting.
///
/// Apex installers require per-ABI images unconditionally, so this splitter
/// runs regardless of the requested sharding dimensions.
pub struct AbiApexImagesSplitter {
    images: Vec<(BundlePath, BTreeSet<Abi>)>,
}

impl AbiApexImagesSplitter {
    /// Reads the image mapping from the module's apex config.
    pub fn new(module: &BundleModule) -> Self {
        let images = module
            .apex_config()
            .map(|config| {
                config
                    .images
                    .iter()
                    .filter_map(|image| {
                        match BundlePath::parse(&image.path) {
                            Ok(path) => Some((path, image.multi_abi.iter().copied().collect())),
                            Err(_) => {
                                log::warn!(
                                    "skipping apex image with invalid path '{}'",
                                    image.path
                                );
                                None
                            }
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { images }
    }
}

impl Splitter for AbiApexImagesSplitter {
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit> {
        let (groups, remainder) = partition_entries(split, |entry| {
            self.images
                .iter()
                .find(|(path, _)| entry.path() == path)
                .map(|(_, abis)| abis.clone())
        });
        fan_out(split, groups, remainder, |targeting, abis| {
            targeting.with_abis(abis.iter().copied())
        })
    }
}
