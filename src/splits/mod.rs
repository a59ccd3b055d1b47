//! Split generation for shard packaging.
//!
//! A [`ModuleSplit`] is a targeted fragment of one module's entries. The
//! [`ShardSplitter`] seeds one split per content category, fans each out
//! through a [`SplittingPipeline`] of per-dimension [`Splitter`]s, collapses
//! texture-format asset variants, and merges fragments with identical
//! targeting back together.

mod merger;
mod pipeline;
mod shards;
mod split;
mod splitters;
mod stripper;

pub use merger::merge_same_targeting;
pub use pipeline::{Splitter, SplittingPipeline};
pub use shards::ShardSplitter;
pub use split::{ContentCategory, ModuleSplit};
pub use splitters::{
    AbiApexImagesSplitter, AbiNativeLibrariesSplitter, LanguageAssetsSplitter,
    LanguageResourcesSplitter, SanitizerNativeLibrariesSplitter, ScreenDensityResourcesSplitter,
};
pub use stripper::strip_asset_texture_format;
