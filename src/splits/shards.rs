//! Shard split generation.
//!
//! [`ShardSplitter`] fans one module's content out across the requested
//! sharding dimensions and consolidates the result into the minimal,
//! invariant-satisfying split set that shard (standalone) packaging
//! consumes. Within one call the stages run in a fixed sequence: category
//! pipelines, then suffix stripping, then the same-targeting merge and the
//! final checks. Across calls there is no shared mutable state, so distinct
//! modules and dimension sets can be processed concurrently.

use super::merger::merge_same_targeting;
use super::pipeline::{Splitter, SplittingPipeline};
use super::split::{ContentCategory, ModuleSplit};
use super::splitters::{
    AbiApexImagesSplitter, AbiNativeLibrariesSplitter, LanguageAssetsSplitter,
    LanguageResourcesSplitter, SanitizerNativeLibrariesSplitter, ScreenDensityResourcesSplitter,
};
use super::stripper::strip_asset_texture_format;
use crate::error::SplitError;
use crate::model::{
    BundleConfig, BundleModule, BundlePath, DeviceSpec, OptimizationDimension, SuffixStripping,
    asset_directory_targeting, strip_asset_token,
};
use std::collections::BTreeSet;

/// Splits bundle modules into the flat split list merged into shards.
#[derive(Debug)]
pub struct ShardSplitter {
    config: BundleConfig,
    device_spec: Option<DeviceSpec>,
}

impl ShardSplitter {
    /// Creates a splitter for one bundle's config and an optional target
    /// device spec.
    ///
    /// State is passed explicitly; several bundles can be processed in one
    /// process, each with its own splitter.
    pub fn new(config: BundleConfig, device_spec: Option<DeviceSpec>) -> Self {
        Self {
            config,
            device_spec,
        }
    }

    /// Generates the split list for one module.
    ///
    /// `dimensions` is the set of sharding dimensions the caller wants
    /// honored; content along every other dimension stays in the master
    /// split. The returned list contains exactly one master split and, as a
    /// whole, exactly the module's entries.
    pub fn generate_splits(
        &self,
        module: &BundleModule,
        dimensions: &BTreeSet<OptimizationDimension>,
    ) -> Result<Vec<ModuleSplit>, SplitError> {
        let mut raw = Vec::new();
        raw.extend(
            self.native_pipeline(module, dimensions)
                .split(ModuleSplit::for_category(module, ContentCategory::NativeLibraries)),
        );
        raw.extend(
            self.resources_pipeline(dimensions)
                .split(ModuleSplit::for_category(module, ContentCategory::Resources)),
        );
        raw.extend(
            Self::apex_pipeline(module)
                .split(ModuleSplit::for_category(module, ContentCategory::Apex)),
        );
        raw.extend(
            self.assets_pipeline(dimensions)
                .split(ModuleSplit::for_category(module, ContentCategory::Assets)),
        );
        raw.push(ModuleSplit::for_category(module, ContentCategory::Dex));
        raw.push(ModuleSplit::for_category(module, ContentCategory::Other));
        log::debug!(
            "module {}: {} raw split(s) before merge",
            module.name(),
            raw.len()
        );

        let policy = self
            .config
            .suffix_stripping(OptimizationDimension::TextureCompressionFormat);
        let stripped = match policy {
            Some(policy) => strip_asset_texture_format(raw, policy)?,
            None => raw,
        };

        let merged = merge_same_targeting(stripped)?;

        let masters = merged.iter().filter(|split| split.is_master()).count();
        if masters != 1 {
            return Err(SplitError::MasterSplitCount { count: masters });
        }
        check_entry_coverage(module, &merged, policy)?;

        log::debug!("module {}: {} split(s) generated", module.name(), merged.len());
        Ok(merged)
    }

    fn native_pipeline(
        &self,
        module: &BundleModule,
        dimensions: &BTreeSet<OptimizationDimension>,
    ) -> SplittingPipeline {
        let mut splitters: Vec<Box<dyn Splitter>> = Vec::new();
        if dimensions.contains(&OptimizationDimension::Abi) {
            splitters.push(Box::new(AbiNativeLibrariesSplitter::new(module)));
        }
        splitters.push(Box::new(SanitizerNativeLibrariesSplitter::new(module)));
        SplittingPipeline::new(splitters)
    }

    fn resources_pipeline(
        &self,
        dimensions: &BTreeSet<OptimizationDimension>,
    ) -> SplittingPipeline {
        let mut splitters: Vec<Box<dyn Splitter>> = Vec::new();
        if dimensions.contains(&OptimizationDimension::ScreenDensity) {
            splitters.push(Box::new(ScreenDensityResourcesSplitter));
        }
        if dimensions.contains(&OptimizationDimension::Language) && self.should_split_by_language()
        {
            splitters.push(Box::new(LanguageResourcesSplitter));
        }
        SplittingPipeline::new(splitters)
    }

    fn assets_pipeline(&self, dimensions: &BTreeSet<OptimizationDimension>) -> SplittingPipeline {
        let mut splitters: Vec<Box<dyn Splitter>> = Vec::new();
        if dimensions.contains(&OptimizationDimension::Language) && self.should_split_by_language()
        {
            splitters.push(Box::new(LanguageAssetsSplitter));
        }
        SplittingPipeline::new(splitters)
    }

    fn apex_pipeline(module: &BundleModule) -> SplittingPipeline {
        // Apex images are split per ABI unconditionally; installers cannot
        // consume multi-ABI apex artifacts.
        SplittingPipeline::new(vec![Box::new(AbiApexImagesSplitter::new(module))])
    }

    /// Discarding locale-specific content is only safe when a concrete
    /// device's locale needs are known; otherwise all locales are retained.
    fn should_split_by_language(&self) -> bool {
        self.device_spec
            .as_ref()
            .is_some_and(|spec| !spec.supported_locales.is_empty())
    }
}

/// Verifies the generated splits cover the module's entries exactly: no
/// path lost, none duplicated. Entries discarded or rewritten by the
/// suffix-stripping policy are accounted for.
fn check_entry_coverage(
    module: &BundleModule,
    merged: &[ModuleSplit],
    policy: Option<&SuffixStripping>,
) -> Result<(), SplitError> {
    let mut expected: BTreeSet<BundlePath> = BTreeSet::new();
    for path in module.entries().keys() {
        match policy {
            None => {
                expected.insert(path.clone());
            }
            Some(policy) => match asset_directory_targeting(path).texture_suffix {
                Some(suffix) if suffix != policy.default_suffix => {}
                Some(_) if policy.enabled => {
                    expected.insert(strip_asset_token(path, "tcf"));
                }
                _ => {
                    expected.insert(path.clone());
                }
            },
        }
    }

    let mut actual: BTreeSet<BundlePath> = BTreeSet::new();
    for split in merged {
        for entry in split.entries() {
            if !actual.insert(entry.path().clone()) {
                return Err(SplitError::EntrySetMismatch {
                    path: entry.path().to_string(),
                });
            }
        }
    }

    if let Some(path) = expected.symmetric_difference(&actual).next() {
        return Err(SplitError::EntrySetMismatch {
            path: path.to_string(),
        });
    }
    Ok(())
}
