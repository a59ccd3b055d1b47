//! Dex entry naming canonicalization.
//!
//! The code loader requires dex entries named `classes.dex`, `classes2.dex`,
//! `classes3.dex`, and so on, with no suffix 1 and no gaps. Bundle producers sometimes
//! emit the off-by-one legacy sequence (`classes.dex`, `classes1.dex`,
//! `classes2.dex`, ...), so entries are renamed positionally: the i-th dex
//! entry in archive order gets the i-th canonical name unless it already
//! holds it. Only paths change; content bytes are untouched, nothing is
//! dropped or duplicated, and the pass is idempotent.

use crate::model::ModuleEntry;

const DEX_DIRECTORY: &str = "dex";
const DEX_EXTENSION: &str = ".dex";

/// Returns the i-th name (0-based) of the canonical dex sequence.
fn canonical_dex_name(index: usize) -> String {
    if index == 0 {
        "classes.dex".to_string()
    } else {
        format!("classes{}.dex", index + 1)
    }
}

fn is_dex_entry(entry: &ModuleEntry) -> bool {
    // Only files directly under dex/ participate in the canonical sequence;
    // nested paths must not consume an index.
    entry.path().in_directory(DEX_DIRECTORY)
        && entry.path().segments().len() == 2
        && entry.path().name().ends_with(DEX_EXTENSION)
}

/// Renames a module's dex entries into the canonical sequence.
///
/// Non-dex entries pass through untouched; the relative order of all entries
/// is preserved.
pub fn canonicalize_dex_names(entries: Vec<ModuleEntry>) -> Vec<ModuleEntry> {
    let mut dex_position = 0usize;
    entries
        .into_iter()
        .map(|entry| {
            if !is_dex_entry(&entry) {
                return entry;
            }
            let canonical = canonical_dex_name(dex_position);
            dex_position += 1;
            if entry.path().name() == canonical {
                entry
            } else {
                let renamed = entry.path().with_name(&canonical);
                log::debug!("renaming dex entry {} -> {}", entry.path(), renamed);
                entry.with_path(renamed)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BundlePath, EntrySource};

    fn dex_entries(names: &[&str]) -> Vec<ModuleEntry> {
        names
            .iter()
            .map(|name| {
                ModuleEntry::new(
                    BundlePath::parse(&format!("dex/{name}")).unwrap(),
                    EntrySource::from_bytes(name.as_bytes().to_vec()),
                )
            })
            .collect()
    }

    fn names(entries: &[ModuleEntry]) -> Vec<String> {
        entries.iter().map(|e| e.path().name().to_string()).collect()
    }

    #[test]
    fn renames_legacy_sequence_preserving_order() {
        let out = canonicalize_dex_names(dex_entries(&["classes.dex", "classes1.dex", "classes2.dex"]));
        assert_eq!(names(&out), ["classes.dex", "classes2.dex", "classes3.dex"]);
        // Content follows the entry, not the name.
        assert_eq!(&out[1].read().unwrap()[..], b"classes1.dex");
    }

    #[test]
    fn canonical_input_is_untouched() {
        let input = dex_entries(&["classes.dex", "classes2.dex", "classes3.dex"]);
        let once = canonicalize_dex_names(input);
        let twice = canonicalize_dex_names(once.clone());
        assert_eq!(names(&once), ["classes.dex", "classes2.dex", "classes3.dex"]);
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn arbitrary_names_fill_the_sequence() {
        let out = canonicalize_dex_names(dex_entries(&["classes1.dex", "foo.dex"]));
        assert_eq!(names(&out), ["classes.dex", "classes2.dex"]);
    }

    #[test]
    fn nested_dex_files_do_not_join_the_sequence() {
        let mut entries = dex_entries(&["classes1.dex", "classes2.dex"]);
        entries.insert(
            1,
            ModuleEntry::new(
                BundlePath::parse("dex/sub/extra.dex").unwrap(),
                EntrySource::from_bytes(&b"nested"[..]),
            ),
        );
        let out = canonicalize_dex_names(entries);
        assert_eq!(out[0].path().to_string(), "dex/classes.dex");
        // The nested file keeps its path and consumes no canonical index.
        assert_eq!(out[1].path().to_string(), "dex/sub/extra.dex");
        assert_eq!(out[2].path().to_string(), "dex/classes2.dex");
    }

    #[test]
    fn non_dex_entries_pass_through() {
        let mut entries = dex_entries(&["classes1.dex"]);
        entries.push(ModuleEntry::new(
            BundlePath::parse("assets/readme.dex.txt").unwrap(),
            EntrySource::from_bytes(&b"x"[..]),
        ));
        entries.push(ModuleEntry::new(
            BundlePath::parse("root/notes.txt").unwrap(),
            EntrySource::from_bytes(&b"y"[..]),
        ));
        let out = canonicalize_dex_names(entries);
        assert_eq!(out[0].path().to_string(), "dex/classes.dex");
        assert_eq!(out[1].path().to_string(), "assets/readme.dex.txt");
        assert_eq!(out[2].path().to_string(), "root/notes.txt");
    }
}
