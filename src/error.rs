//! Error types for bundle ingestion and split generation.
//!
//! Ingestion failures ([`BundleError`]) mean the archive itself is
//! structurally unusable and no model is exposed. Split-generation failures
//! ([`SplitError`]) mean the splitter composition violated one of its own
//! post-conditions; they abort the one `generate_splits` call that hit them.

use thiserror::Error;

/// Result type alias for bundle operations
pub type Result<T, E = BundleError> = std::result::Result<T, E>;

/// Errors raised while building the bundle model from an archive.
#[derive(Error, Debug)]
pub enum BundleError {
    /// IO errors while reading archive entries
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive decoding errors
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A JSON document inside the archive failed to decode
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        /// Archive path of the offending document
        path: String,
        /// Underlying decode error
        source: serde_json::Error,
    },

    /// The global bundle config entry is absent
    #[error("bundle config file '{0}' is missing from the archive")]
    MissingBundleConfig(&'static str),

    /// A module directory carries no manifest
    #[error("module '{module}' has no manifest")]
    MissingManifest {
        /// Name of the module missing its manifest
        module: String,
    },

    /// A top-level directory name is not a legal module name
    #[error("invalid module name '{name}'")]
    InvalidModuleName {
        /// The rejected name
        name: String,
    },

    /// An archive entry path is malformed
    #[error("invalid entry path '{path}'")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// Two entries of one module resolve to the same path
    #[error("duplicate entry '{path}' in module '{module}'")]
    DuplicateEntry {
        /// Path present more than once
        path: String,
        /// Module owning the entries
        module: String,
    },

    /// A metadata file sits directly under the metadata directory
    #[error("metadata entry '{path}' is not inside a namespace directory")]
    InvalidMetadataPath {
        /// The rejected path
        path: String,
    },

    /// The archive defines no modules at all
    #[error("bundle contains no modules")]
    NoModules,

    /// Modules of an asset-only bundle disagree on the package name
    #[error("modules declare different packages: '{first}' vs '{second}'")]
    PackageNameMismatch {
        /// Package declared first
        first: String,
        /// Conflicting package
        second: String,
    },

    /// Package name requested but no base module exists
    #[error("bundle has no base module to resolve the package name from")]
    MissingBaseModule,
}

/// Internal-consistency defects detected while generating splits.
///
/// These indicate a defective splitter composition, not bad caller input,
/// and must never be downgraded to "keep processing".
#[derive(Error, Debug)]
pub enum SplitError {
    /// The merged output did not contain exactly one master split
    #[error("expected exactly one master split, got {count}")]
    MasterSplitCount {
        /// Number of master splits observed
        count: usize,
    },

    /// Two splits with identical targeting share an entry path
    #[error("duplicate entry '{path}' across splits with identical targeting")]
    DuplicateEntry {
        /// Path present in more than one split of the group
        path: String,
    },

    /// The generated splits lost or duplicated module content
    #[error("split output does not cover the module content (first divergence at '{path}')")]
    EntrySetMismatch {
        /// First path present on only one side
        path: String,
    },

    /// The configured suffix-stripping default names no known format
    #[error("unknown texture compression format suffix '{suffix}'")]
    UnknownTextureSuffix {
        /// The unrecognized suffix
        suffix: String,
    },
}
