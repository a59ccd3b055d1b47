//! Forward-slash archive paths.
//!
//! Archive entries are addressed with `/`-separated paths regardless of the
//! host platform, so `std::path` types are the wrong tool here. [`BundlePath`]
//! keeps the parsed segment sequence and offers the small set of
//! decompositions the ingestion and splitting code needs.

use crate::error::{BundleError, Result};
use std::fmt;

/// A validated, relative, `/`-separated path inside a bundle archive.
///
/// Invariants: at least one segment, no empty segments, no `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BundlePath {
    segments: Vec<String>,
}

impl BundlePath {
    /// Parses a `/`-separated path, rejecting empty, absolute or dotted forms.
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        if path.is_empty()
            || segments
                .iter()
                .any(|s| s.is_empty() || s == "." || s == "..")
        {
            return Err(BundleError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(Self { segments })
    }

    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    /// Returns the path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the first segment.
    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    /// Returns the final path component (the file name).
    pub fn name(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Drops the first segment; `None` when the path has a single segment.
    pub fn tail(&self) -> Option<BundlePath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self::from_segments(self.segments[1..].to_vec()))
    }

    /// True when `prefix` is a strict directory prefix of this path.
    pub fn starts_with(&self, prefix: &BundlePath) -> bool {
        self.segments.len() > prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// True when the path lives under the given top-level directory.
    pub fn in_directory(&self, directory: &str) -> bool {
        self.segments.len() > 1 && self.first() == directory
    }

    /// Returns a copy with the final component replaced.
    pub fn with_name(&self, name: &str) -> BundlePath {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            *last = name.to_string();
        }
        Self::from_segments(segments)
    }

    /// Returns a copy with every segment rewritten through `f`.
    pub(crate) fn map_segments(&self, f: impl Fn(&str) -> String) -> BundlePath {
        Self::from_segments(self.segments.iter().map(|s| f(s)).collect())
    }
}

impl fmt::Display for BundlePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
