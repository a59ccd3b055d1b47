//! Archive and module entries with lazy, repeatable payload access.

use super::path::BundlePath;
use bytes::Bytes;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::sync::{Arc, Mutex};
use zip::ZipArchive;

/// A lazy byte source backing one archive entry.
///
/// Cloning is cheap. `read` may be called any number of times and always
/// yields the same bytes, so downstream consumers can re-read merged or
/// path-rewritten entries freely.
#[derive(Clone)]
pub enum EntrySource {
    /// Bytes held in memory (test builders, synthesized entries).
    Memory(Bytes),
    /// An entry read on demand from a shared zip archive.
    Archive {
        /// Archive shared by every entry of the bundle.
        archive: Arc<Mutex<ZipArchive<File>>>,
        /// Index of the entry within the archive.
        index: usize,
    },
}

impl EntrySource {
    /// Wraps in-memory bytes as an entry source.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Memory(bytes.into())
    }

    pub(crate) fn from_archive(archive: Arc<Mutex<ZipArchive<File>>>, index: usize) -> Self {
        Self::Archive { archive, index }
    }

    /// Reads the full entry content.
    pub fn read(&self) -> io::Result<Bytes> {
        match self {
            Self::Memory(bytes) => Ok(bytes.clone()),
            Self::Archive { archive, index } => {
                let mut archive = archive
                    .lock()
                    .map_err(|_| io::Error::other("bundle archive lock poisoned"))?;
                let mut entry = archive.by_index(*index).map_err(io::Error::other)?;
                let mut buf = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl fmt::Debug for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => f.debug_tuple("Memory").field(&bytes.len()).finish(),
            Self::Archive { index, .. } => f.debug_struct("Archive").field("index", index).finish(),
        }
    }
}

/// One entry of the input archive, addressed by its full path.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    path: BundlePath,
    source: EntrySource,
}

impl ArchiveEntry {
    /// Creates an archive entry.
    pub fn new(path: BundlePath, source: EntrySource) -> Self {
        Self { path, source }
    }

    /// Returns the full archive path.
    pub fn path(&self) -> &BundlePath {
        &self.path
    }

    pub(crate) fn into_parts(self) -> (BundlePath, EntrySource) {
        (self.path, self.source)
    }
}

/// One entry of a module, addressed relative to the module directory.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    path: BundlePath,
    source: EntrySource,
}

impl ModuleEntry {
    /// Creates a module entry.
    pub fn new(path: BundlePath, source: EntrySource) -> Self {
        Self { path, source }
    }

    /// Returns the module-relative path.
    pub fn path(&self) -> &BundlePath {
        &self.path
    }

    /// Returns the lazy payload handle.
    pub fn source(&self) -> &EntrySource {
        &self.source
    }

    /// Reads the entry content.
    pub fn read(&self) -> io::Result<Bytes> {
        self.source.read()
    }

    /// Returns a copy of this entry under another path; content untouched.
    pub fn with_path(&self, path: BundlePath) -> Self {
        Self {
            path,
            source: self.source.clone(),
        }
    }
}
