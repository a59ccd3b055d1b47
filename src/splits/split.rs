//! Module splits: the unit value flowing through the splitting pipeline.

use crate::model::{BundleModule, BundlePath, ModuleEntry, ModuleName, SplitTargeting};

/// Content category a split was seeded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentCategory {
    /// Entries under `lib/`.
    NativeLibraries,
    /// Entries under `res/`.
    Resources,
    /// Entries under `apex/`.
    Apex,
    /// Entries under `assets/`.
    Assets,
    /// Entries under `dex/`.
    Dex,
    /// Everything no other category claims.
    Other,
}

impl ContentCategory {
    const CLAIMED: [ContentCategory; 5] = [
        Self::NativeLibraries,
        Self::Resources,
        Self::Apex,
        Self::Assets,
        Self::Dex,
    ];

    fn directory(self) -> Option<&'static str> {
        match self {
            Self::NativeLibraries => Some("lib"),
            Self::Resources => Some("res"),
            Self::Apex => Some("apex"),
            Self::Assets => Some("assets"),
            Self::Dex => Some("dex"),
            Self::Other => None,
        }
    }

    /// True when this category claims the given module-relative path.
    pub fn claims(self, path: &BundlePath) -> bool {
        match self.directory() {
            Some(directory) => path.in_directory(directory),
            None => !Self::CLAIMED.iter().any(|c| c.claims(path)),
        }
    }
}

/// An immutable fragment of one module's content, tagged with the device
/// configurations it applies to.
///
/// Splits are consumed and replaced as they pass through pipeline stages;
/// they are never mutated in place.
#[derive(Debug, Clone)]
pub struct ModuleSplit {
    pub(crate) module_name: ModuleName,
    pub(crate) category: ContentCategory,
    pub(crate) entries: Vec<ModuleEntry>,
    pub(crate) targeting: SplitTargeting,
    pub(crate) master: bool,
    pub(crate) split_name: Option<String>,
}

impl ModuleSplit {
    /// Seeds a universal-targeting split from one content view of a module.
    pub fn for_category(module: &BundleModule, category: ContentCategory) -> Self {
        let entries = module
            .entries()
            .values()
            .filter(|entry| category.claims(entry.path()))
            .cloned()
            .collect();
        Self {
            module_name: module.name().clone(),
            category,
            entries,
            targeting: SplitTargeting::universal(),
            master: true,
            // Delivery naming for install-time artifacts; stripped again
            // before shard output is returned.
            split_name: (!module.name().is_base()).then(|| module.name().to_string()),
        }
    }

    /// Returns the name of the module this split came from.
    pub fn module_name(&self) -> &ModuleName {
        &self.module_name
    }

    /// Returns the content category the split was seeded from.
    pub fn category(&self) -> ContentCategory {
        self.category
    }

    /// Returns the entries owned by this split.
    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    /// Returns the targeting descriptor.
    pub fn targeting(&self) -> &SplitTargeting {
        &self.targeting
    }

    /// True iff the split carries universal targeting.
    pub fn is_master(&self) -> bool {
        self.master
    }

    /// Returns the delivery split name, if still attached.
    pub fn split_name(&self) -> Option<&str> {
        self.split_name.as_deref()
    }

    /// Returns a copy holding a different entry subset.
    pub fn with_entries(&self, entries: Vec<ModuleEntry>) -> Self {
        Self {
            entries,
            ..self.clone()
        }
    }

    /// Returns a copy narrowed to the given targeting; the master flag is
    /// recomputed from it.
    pub fn with_targeting(&self, targeting: SplitTargeting) -> Self {
        Self {
            master: targeting.is_universal(),
            targeting,
            ..self.clone()
        }
    }
}
