//! App bundle ingestion and shard split generation
//!
//! This library provides the core model and pipeline for:
//! - Reading a bundle archive into validated modules, config, and metadata
//! - Canonicalizing dex entry names and excluding build leftovers
//! - Fanning module content out into targeted splits for shard packaging
//!
//! It is a library crate; packaging front ends drive it through [`Bundle`]
//! and [`ShardSplitter`].

pub mod bundle;
pub mod error;
pub mod model;
pub mod splits;

// Re-export commonly used types
pub use bundle::{Bundle, BundleMetadata};
pub use error::{BundleError, Result, SplitError};
pub use splits::{ModuleSplit, ShardSplitter};
