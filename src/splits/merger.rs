//! Same-targeting merge step.
//!
//! After the category pipelines ran, several splits can share one targeting
//! descriptor (the universal dex split and the universal "other" split, a
//! density remainder and a language remainder, ...). Merging collapses each
//! targeting group to a single split so the output is the minimal artifact
//! set. Two splits of one group sharing an entry path would mean a category
//! claimed content twice, which is a pipeline defect and surfaced immediately.

use super::split::ModuleSplit;
use crate::error::SplitError;
use crate::model::BundlePath;
use std::collections::BTreeSet;

/// Merges splits with identical targeting and strips delivery naming.
///
/// Group order follows first appearance in the input. Every output has its
/// master flag recomputed from its targeting and its split name cleared;
/// delivery naming is meaningful only for install-time multi-artifact
/// output, not for consolidated shard input.
pub fn merge_same_targeting(splits: Vec<ModuleSplit>) -> Result<Vec<ModuleSplit>, SplitError> {
    let mut merged: Vec<ModuleSplit> = Vec::new();
    let mut seen_paths: Vec<BTreeSet<BundlePath>> = Vec::new();

    for split in splits {
        let position = merged
            .iter()
            .position(|existing| existing.targeting == split.targeting);
        match position {
            Some(i) => {
                for entry in split.entries {
                    if !seen_paths[i].insert(entry.path().clone()) {
                        return Err(SplitError::DuplicateEntry {
                            path: entry.path().to_string(),
                        });
                    }
                    merged[i].entries.push(entry);
                }
            }
            None => {
                let mut paths = BTreeSet::new();
                for entry in &split.entries {
                    if !paths.insert(entry.path().clone()) {
                        return Err(SplitError::DuplicateEntry {
                            path: entry.path().to_string(),
                        });
                    }
                }
                seen_paths.push(paths);
                merged.push(split);
            }
        }
    }

    for split in &mut merged {
        split.master = split.targeting.is_universal();
        split.split_name = None;
    }
    Ok(merged)
}
