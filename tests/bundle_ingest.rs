//! End-to-end ingestion tests over real zip archives.

mod common;

use bundlesplit::error::BundleError;
use bundlesplit::model::{Abi, BundlePath, ModuleName};
use bundlesplit::Bundle;
use common::{asset_manifest_json, manifest_json, write_bundle_zip};
use tempfile::TempDir;

fn entry_paths(bundle: &Bundle, module: &str) -> Vec<String> {
    bundle
        .module(&ModuleName::new(module).unwrap())
        .expect("module present")
        .entries()
        .keys()
        .map(|p| p.to_string())
        .collect()
}

#[test]
fn reads_modules_config_and_metadata() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("base/dex/classes.dex", b"dex-bytes"),
            ("base/assets/hello.txt", b"hello"),
            ("feature1/manifest/manifest.json", &manifest_json("com.test.app")),
            ("feature1/assets/extra.txt", b"extra"),
            ("BUNDLE-METADATA/com.test.tooling/version.txt", b"1.2.3"),
            ("META-INF/CERT.RSA", b"signature"),
            ("stray-top-level.txt", b"ignored"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();

    assert_eq!(bundle.feature_modules().len(), 2);
    assert!(bundle.asset_modules().is_empty());
    assert_eq!(
        entry_paths(&bundle, "base"),
        ["assets/hello.txt", "dex/classes.dex"]
    );
    assert_eq!(bundle.package_name().unwrap(), "com.test.app");
    assert!(!bundle.is_asset_only());

    // Payloads are read lazily from the archive and byte-exact.
    let base = bundle.base_module().unwrap();
    let content = base
        .entry(&BundlePath::parse("assets/hello.txt").unwrap())
        .unwrap()
        .read()
        .unwrap();
    assert_eq!(&content[..], b"hello");

    // Reserved directories never become modules.
    assert!(bundle.module(&ModuleName::new("feature1").unwrap()).is_some());
    assert_eq!(bundle.bundle_metadata().len(), 1);
}

#[test]
fn metadata_lookup_is_exact_and_supports_nested_namespaces() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("BUNDLE-METADATA/com.vendor.tool/mapping.txt", b"a -> b"),
            ("BUNDLE-METADATA/com.vendor.tool/nested/dir/blob.bin", b"\x00\x01"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    let metadata = bundle.bundle_metadata();

    let hit = metadata.get("com.vendor.tool", "mapping.txt").unwrap();
    assert_eq!(&hit.read().unwrap()[..], b"a -> b");

    let nested = metadata
        .get("com.vendor.tool/nested/dir", "blob.bin")
        .unwrap();
    assert_eq!(&nested.read().unwrap()[..], b"\x00\x01");

    assert!(metadata.get("com.vendor.tool", "blob.bin").is_none());
    assert!(metadata.get("com.vendor", "mapping.txt").is_none());
}

#[test]
fn missing_bundle_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[("base/manifest/manifest.json", &manifest_json("com.test.app")[..])],
    );

    let err = Bundle::build_from_zip(&path).unwrap_err();
    assert!(matches!(err, BundleError::MissingBundleConfig(_)));
}

#[test]
fn module_without_manifest_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/assets/hello.txt", b"hello"),
        ],
    );

    let err = Bundle::build_from_zip(&path).unwrap_err();
    assert!(matches!(err, BundleError::MissingManifest { module } if module == "base"));
}

#[test]
fn stray_class_artifacts_are_dropped_by_exact_suffix() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("base/root/Foo.class", b"bytecode"),
            ("base/root/Foo.classes", b"kept"),
            ("base/root/class.txt", b"kept"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    assert_eq!(
        entry_paths(&bundle, "base"),
        ["root/Foo.classes", "root/class.txt"]
    );
}

#[test]
fn legacy_dex_names_are_canonicalized_in_archive_order() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("base/dex/classes.dex", b"first"),
            ("base/dex/classes1.dex", b"second"),
            ("base/dex/classes2.dex", b"third"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    assert_eq!(
        entry_paths(&bundle, "base"),
        ["dex/classes.dex", "dex/classes2.dex", "dex/classes3.dex"]
    );

    // Renaming moves paths, never content.
    let base = bundle.base_module().unwrap();
    let renamed = base
        .entry(&BundlePath::parse("dex/classes2.dex").unwrap())
        .unwrap()
        .read()
        .unwrap();
    assert_eq!(&renamed[..], b"second");
}

#[test]
fn asset_modules_are_separated_from_feature_modules() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("textures/manifest/manifest.json", &asset_manifest_json("com.test.app")),
            ("textures/assets/rock.tex", b"tex"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    assert_eq!(bundle.feature_modules().len(), 1);
    assert_eq!(bundle.asset_modules().len(), 1);
    assert!(
        bundle
            .asset_modules()
            .contains_key(&ModuleName::new("textures").unwrap())
    );
}

#[test]
fn asset_only_bundle_resolves_package_without_base() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", br#"{"bundle_type": "asset_only"}"#),
            ("textures/manifest/manifest.json", &asset_manifest_json("com.test.app")),
            ("textures/assets/rock.tex", b"tex"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    assert!(bundle.is_asset_only());
    assert!(bundle.base_module().is_none());
    assert_eq!(bundle.package_name().unwrap(), "com.test.app");
}

#[test]
fn asset_only_package_divergence_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", br#"{"bundle_type": "asset_only"}"#),
            ("textures/manifest/manifest.json", &asset_manifest_json("com.test.app")),
            ("audio/manifest/manifest.json", &asset_manifest_json("com.other.app")),
        ],
    );

    let err = Bundle::build_from_zip(&path).unwrap_err();
    assert!(matches!(err, BundleError::PackageNameMismatch { .. }));
}

#[test]
fn targeted_abis_union_over_feature_modules() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            (
                "base/native.json",
                br#"{"directories": [{"path": "lib/x86_64", "abi": "x86_64"}]}"#,
            ),
            ("base/lib/x86_64/libfoo.so", b"\x7fELF"),
            ("feature1/manifest/manifest.json", &manifest_json("com.test.app")),
            (
                "feature1/native.json",
                br#"{"directories": [{"path": "lib/arm64-v8a", "abi": "arm64-v8a"}]}"#,
            ),
            ("feature1/lib/arm64-v8a/libfoo.so", b"\x7fELF"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    let abis = bundle.targeted_abis();
    assert_eq!(
        abis.into_iter().collect::<Vec<_>>(),
        [Abi::Arm64V8a, Abi::X86_64]
    );

    // Targeting descriptors are parsed out of the entry map.
    assert_eq!(entry_paths(&bundle, "base"), ["lib/x86_64/libfoo.so"]);
}

#[test]
fn targeted_abis_is_empty_without_native_configs() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("base/dex/classes.dex", b"dex"),
            ("feature1/manifest/manifest.json", &manifest_json("com.test.app")),
            ("feature1/assets/data.bin", b"data"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    assert!(bundle.targeted_abis().is_empty());
}

#[test]
fn targeted_abis_skips_modules_without_native_configs() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            (
                "base/native.json",
                br#"{"directories": [{"path": "lib/x86_64", "abi": "x86_64"}]}"#,
            ),
            ("base/lib/x86_64/libfoo.so", b"\x7fELF"),
            ("feature1/manifest/manifest.json", &manifest_json("com.test.app")),
            ("feature1/assets/data.bin", b"data"),
            ("textures/manifest/manifest.json", &asset_manifest_json("com.test.app")),
            (
                "textures/native.json",
                br#"{"directories": [{"path": "lib/arm64-v8a", "abi": "arm64-v8a"}]}"#,
            ),
            ("textures/lib/arm64-v8a/libfoo.so", b"\x7fELF"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    // Only feature modules with native targeting contribute; asset modules
    // never do.
    assert_eq!(
        bundle.targeted_abis().into_iter().collect::<Vec<_>>(),
        [Abi::X86_64]
    );
}

#[test]
fn archive_backed_reads_are_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("base/assets/hello.txt", b"hello"),
        ],
    );

    let bundle = Bundle::build_from_zip(&path).unwrap();
    let entry = bundle
        .base_module()
        .unwrap()
        .entry(&BundlePath::parse("assets/hello.txt").unwrap())
        .unwrap()
        .clone();

    let first = entry.read().unwrap();
    let second = entry.read().unwrap();
    assert_eq!(first, second);
    assert_eq!(&first[..], b"hello");
}

#[test]
fn invalid_module_directory_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("2bad/manifest/manifest.json", &manifest_json("com.test.app")[..]),
        ],
    );

    let err = Bundle::build_from_zip(&path).unwrap_err();
    assert!(matches!(err, BundleError::InvalidModuleName { name } if name == "2bad"));
}

#[test]
fn metadata_file_without_namespace_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_bundle_zip(
        &dir,
        &[
            ("BundleConfig.json", &b"{}"[..]),
            ("base/manifest/manifest.json", &manifest_json("com.test.app")),
            ("BUNDLE-METADATA/loose.txt", b"x"),
        ],
    );

    let err = Bundle::build_from_zip(&path).unwrap_err();
    assert!(matches!(err, BundleError::InvalidMetadataPath { .. }));
}
