//! Texture-format suffix stripping.
//!
//! Shard/standalone artifacts cannot carry conditional per-device asset
//! sets, so multi-format asset targeting collected at bundle-build time has
//! to collapse to one concrete format before shard generation. Given the
//! configured policy, every raw split loses the asset variants targeting
//! other formats; surviving variants optionally lose their `#tcf_` token and
//! move to a split targeting the default format, while untargeted entries
//! keep the split's original targeting.

use super::split::ModuleSplit;
use crate::error::SplitError;
use crate::model::{SuffixStripping, TextureCompressionFormat, asset_directory_targeting, strip_asset_token};

/// Applies the texture-format collapse to every raw split.
///
/// Callers only invoke this when the bundle config declares a
/// suffix-stripping policy for the texture-compression-format dimension;
/// without one the raw list passes through the stage untouched.
pub fn strip_asset_texture_format(
    splits: Vec<ModuleSplit>,
    policy: &SuffixStripping,
) -> Result<Vec<ModuleSplit>, SplitError> {
    let default_format = if policy.default_suffix.is_empty() {
        None
    } else {
        Some(
            TextureCompressionFormat::from_suffix(&policy.default_suffix).ok_or_else(|| {
                SplitError::UnknownTextureSuffix {
                    suffix: policy.default_suffix.clone(),
                }
            })?,
        )
    };
    Ok(splits
        .into_iter()
        .flat_map(|split| strip_split(split, policy, default_format))
        .collect())
}

fn strip_split(
    split: ModuleSplit,
    policy: &SuffixStripping,
    default_format: Option<TextureCompressionFormat>,
) -> Vec<ModuleSplit> {
    let mut untargeted = Vec::new();
    let mut survivors = Vec::new();
    let mut saw_format_targeting = false;

    for entry in split.entries() {
        match asset_directory_targeting(entry.path()).texture_suffix {
            None => untargeted.push(entry.clone()),
            Some(suffix) => {
                saw_format_targeting = true;
                if suffix != policy.default_suffix {
                    log::debug!(
                        "discarding asset {} targeting format '{suffix}'",
                        entry.path()
                    );
                    continue;
                }
                let entry = if policy.enabled {
                    entry.with_path(strip_asset_token(entry.path(), "tcf"))
                } else {
                    entry.clone()
                };
                survivors.push(entry);
            }
        }
    }

    if !saw_format_targeting {
        return vec![split];
    }

    let mut out = Vec::with_capacity(2);
    match default_format {
        Some(format) if !survivors.is_empty() => {
            let targeting = split.targeting().clone().with_texture_format(format);
            out.push(split.with_entries(survivors).with_targeting(targeting));
            out.push(split.with_entries(untargeted));
        }
        _ => {
            // Every format variant was dropped; only untargeted content is
            // left, under the split's original targeting.
            untargeted.extend(survivors);
            out.push(split.with_entries(untargeted));
        }
    }
    out
}
