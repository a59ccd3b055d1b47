//! Namespaced bundle metadata.
//!
//! Files under the reserved `BUNDLE-METADATA/` directory are addressed by
//! (namespace, file name), where the namespace is the directory chain below
//! the reserved directory and may itself be nested
//! (`some.namespace/sub-dir`). Lookups are exact; a miss is an ordinary
//! absent result, never an error. Content is fetched lazily from the archive
//! on every read.

use crate::model::EntrySource;
use std::collections::BTreeMap;

/// Read-only metadata table of one bundle.
#[derive(Debug, Clone, Default)]
pub struct BundleMetadata {
    files: BTreeMap<(String, String), EntrySource>,
}

impl BundleMetadata {
    pub(crate) fn insert(&mut self, namespace: String, file_name: String, source: EntrySource) {
        self.files.insert((namespace, file_name), source);
    }

    /// Looks up a metadata file by exact (namespace, file name) pair.
    pub fn get(&self, namespace: &str, file_name: &str) -> Option<&EntrySource> {
        self.files
            .get(&(namespace.to_string(), file_name.to_string()))
    }

    /// Number of metadata files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the bundle carries no metadata.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
