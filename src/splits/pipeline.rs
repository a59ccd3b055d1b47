//! Splitter contract and pipeline composition.

use super::split::ModuleSplit;

/// A pure per-dimension fan-out over one split.
///
/// Contract: the union of the outputs' entries equals the input's entries,
/// and every device configuration matching the input's targeting matches
/// exactly one output (partition property). Entries a splitter cannot
/// attribute to a dimension value stay together in a remainder split that
/// keeps the input's targeting.
pub trait Splitter {
    /// Splits one fragment into several narrower-targeted fragments.
    fn split(&self, split: &ModuleSplit) -> Vec<ModuleSplit>;
}

/// An ordered list of splitters applied to one category of module content.
///
/// Order matters: later splitters subdivide fragments already narrowed by
/// earlier ones.
pub struct SplittingPipeline {
    splitters: Vec<Box<dyn Splitter>>,
}

impl SplittingPipeline {
    /// Composes a pipeline from explicitly configured splitters.
    pub fn new(splitters: Vec<Box<dyn Splitter>>) -> Self {
        Self { splitters }
    }

    /// Applies every splitter in order, fanning the seed split out.
    pub fn split(&self, seed: ModuleSplit) -> Vec<ModuleSplit> {
        let mut splits = vec![seed];
        for splitter in &self.splitters {
            splits = splits.iter().flat_map(|split| splitter.split(split)).collect();
        }
        splits
    }
}
