//! Shared fixture helpers for the archive-level tests.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Minimal feature-module manifest document.
pub fn manifest_json(package: &str) -> Vec<u8> {
    format!(r#"{{"package": "{package}"}}"#).into_bytes()
}

/// Minimal asset-module manifest document.
pub fn asset_manifest_json(package: &str) -> Vec<u8> {
    format!(r#"{{"package": "{package}", "module_type": "asset"}}"#).into_bytes()
}

/// Writes a zip archive with the given entries, in order, into `dir`.
pub fn write_bundle_zip(dir: &TempDir, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.path().join("bundle.zip");
    let mut writer = ZipWriter::new(File::create(&path).expect("create archive file"));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start archive entry");
        writer.write_all(content).expect("write archive entry");
    }
    writer.finish().expect("finish archive");
    path
}
