//! Value types of the bundle model.
//!
//! Everything here is an immutable value: archive paths, lazy entries, the
//! parsed manifest and config documents, targeting descriptors and modules.
//! Ingestion (building these from an archive) lives in [`crate::bundle`];
//! split generation over them lives in [`crate::splits`].

mod config;
mod entry;
mod manifest;
mod module;
mod path;
mod targeting;

pub use config::{
    BundleConfig, BundleType, DeviceSpec, OptimizationDimension, Optimizations,
    SplitDimensionConfig, SuffixStripping,
};
pub use entry::{ArchiveEntry, EntrySource, ModuleEntry};
pub use manifest::{ModuleManifest, ModuleType};
pub use module::{
    APEX_CONFIG_PATH, ApexConfig, BundleModule, BundleModuleBuilder, MANIFEST_PATH, ModuleName,
    NATIVE_CONFIG_PATH, NativeConfig, TargetedApexImage, TargetedNativeDirectory,
};
pub use path::BundlePath;
pub use targeting::{
    Abi, AssetDirectoryTargeting, DensityBucket, Sanitizer, SplitTargeting,
    TextureCompressionFormat, asset_directory_targeting, resource_density, resource_language,
    strip_asset_token,
};
