//! Device-targeting descriptors and path-derived targeting.
//!
//! A [`SplitTargeting`] states which device configurations a split applies
//! to, with one independent optional field per dimension. The fully-empty
//! descriptor is *universal* ("master") targeting and matches every device.
//!
//! Targeting of individual entries is encoded in path structure: native
//! directories are mapped through the module's native config, resource
//! directories carry trailing qualifiers (`res/drawable-hdpi/`), and asset
//! directories carry `#key_value` tokens (`assets/tex#tcf_etc2/`). The
//! parsers for those conventions live here too.

use super::path::BundlePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Native CPU architecture.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Abi {
    /// 32-bit ARM, software float.
    #[serde(rename = "armeabi")]
    Armeabi,
    /// 32-bit ARM, hardware float.
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    /// 64-bit ARM.
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    /// 32-bit x86.
    #[serde(rename = "x86")]
    X86,
    /// 64-bit x86.
    #[serde(rename = "x86_64")]
    X86_64,
    /// 32-bit MIPS.
    #[serde(rename = "mips")]
    Mips,
    /// 64-bit MIPS.
    #[serde(rename = "mips64")]
    Mips64,
    /// 64-bit RISC-V.
    #[serde(rename = "riscv64")]
    Riscv64,
}

impl Abi {
    /// Canonical directory/config spelling of the ABI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Armeabi => "armeabi",
            Self::ArmeabiV7a => "armeabi-v7a",
            Self::Arm64V8a => "arm64-v8a",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
            Self::Riscv64 => "riscv64",
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screen-density bucket of drawable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityBucket {
    /// ~120 dpi.
    Ldpi,
    /// ~160 dpi.
    Mdpi,
    /// ~213 dpi (TV).
    Tvdpi,
    /// ~240 dpi.
    Hdpi,
    /// ~320 dpi.
    Xhdpi,
    /// ~480 dpi.
    Xxhdpi,
    /// ~640 dpi.
    Xxxhdpi,
}

impl DensityBucket {
    /// Maps a resource-directory qualifier (`hdpi`, `xxhdpi`, ...) to a bucket.
    pub fn from_qualifier(qualifier: &str) -> Option<Self> {
        Some(match qualifier {
            "ldpi" => Self::Ldpi,
            "mdpi" => Self::Mdpi,
            "tvdpi" => Self::Tvdpi,
            "hdpi" => Self::Hdpi,
            "xhdpi" => Self::Xhdpi,
            "xxhdpi" => Self::Xxhdpi,
            "xxxhdpi" => Self::Xxxhdpi,
            _ => return None,
        })
    }

    /// The directory qualifier naming this bucket.
    pub fn qualifier(self) -> &'static str {
        match self {
            Self::Ldpi => "ldpi",
            Self::Mdpi => "mdpi",
            Self::Tvdpi => "tvdpi",
            Self::Hdpi => "hdpi",
            Self::Xhdpi => "xhdpi",
            Self::Xxhdpi => "xxhdpi",
            Self::Xxxhdpi => "xxxhdpi",
        }
    }
}

impl fmt::Display for DensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualifier())
    }
}

/// Runtime sanitizer a native directory is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitizer {
    /// Hardware-assisted AddressSanitizer.
    Hwaddress,
}

/// Texture compression format of targeted asset directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureCompressionFormat {
    /// Adaptive scalable texture compression.
    Astc,
    /// ATI texture compression.
    Atc,
    /// S3 DXT1.
    Dxt1,
    /// Ericsson texture compression 1.
    Etc1,
    /// Ericsson texture compression 2.
    Etc2,
    /// Paletted textures.
    Paletted,
    /// PowerVR texture compression.
    Pvrtc,
    /// S3 texture compression.
    S3tc,
    /// ATI 3Dc.
    #[serde(rename = "3dc")]
    ThreeDc,
}

impl TextureCompressionFormat {
    /// Maps a `#tcf_` token value to a format.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "astc" => Self::Astc,
            "atc" => Self::Atc,
            "dxt1" => Self::Dxt1,
            "etc1" => Self::Etc1,
            "etc2" => Self::Etc2,
            "paletted" => Self::Paletted,
            "pvrtc" => Self::Pvrtc,
            "s3tc" => Self::S3tc,
            "3dc" => Self::ThreeDc,
            _ => return None,
        })
    }

    /// The token value naming this format.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Astc => "astc",
            Self::Atc => "atc",
            Self::Dxt1 => "dxt1",
            Self::Etc1 => "etc1",
            Self::Etc2 => "etc2",
            Self::Paletted => "paletted",
            Self::Pvrtc => "pvrtc",
            Self::S3tc => "s3tc",
            Self::ThreeDc => "3dc",
        }
    }
}

impl fmt::Display for TextureCompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Multi-dimensional targeting descriptor of one split.
///
/// Two descriptors are equal iff all fields are equal. The default value is
/// the universal descriptor matched by every device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SplitTargeting {
    abis: BTreeSet<Abi>,
    density: Option<DensityBucket>,
    languages: BTreeSet<String>,
    texture_format: Option<TextureCompressionFormat>,
    sanitizer: Option<Sanitizer>,
}

impl SplitTargeting {
    /// The universal ("master") targeting, matched by every device.
    pub fn universal() -> Self {
        Self::default()
    }

    /// True when no dimension is constrained.
    pub fn is_universal(&self) -> bool {
        self.abis.is_empty()
            && self.density.is_none()
            && self.languages.is_empty()
            && self.texture_format.is_none()
            && self.sanitizer.is_none()
    }

    /// Returns the targeted ABI set.
    pub fn abis(&self) -> &BTreeSet<Abi> {
        &self.abis
    }

    /// Returns the targeted density bucket.
    pub fn density(&self) -> Option<DensityBucket> {
        self.density
    }

    /// Returns the targeted language set.
    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    /// Returns the targeted texture compression format.
    pub fn texture_format(&self) -> Option<TextureCompressionFormat> {
        self.texture_format
    }

    /// Returns the targeted sanitizer.
    pub fn sanitizer(&self) -> Option<Sanitizer> {
        self.sanitizer
    }

    /// Narrows the descriptor to the given ABI set.
    pub fn with_abis(mut self, abis: impl IntoIterator<Item = Abi>) -> Self {
        self.abis = abis.into_iter().collect();
        self
    }

    /// Narrows the descriptor to one density bucket.
    pub fn with_density(mut self, density: DensityBucket) -> Self {
        self.density = Some(density);
        self
    }

    /// Narrows the descriptor to one language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages = BTreeSet::from([language.into()]);
        self
    }

    /// Narrows the descriptor to one texture compression format.
    pub fn with_texture_format(mut self, format: TextureCompressionFormat) -> Self {
        self.texture_format = Some(format);
        self
    }

    /// Narrows the descriptor to one sanitizer.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

/// Targeting embedded in an asset directory name via `#key_value` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDirectoryTargeting {
    /// Value of a `#lang_` token, if present on any directory segment.
    pub language: Option<String>,
    /// Raw value of a `#tcf_` token, if present on any directory segment.
    pub texture_suffix: Option<String>,
}

/// Parses `#lang_` / `#tcf_` tokens from the directory segments of a path.
///
/// The final component (the file name) never carries targeting.
pub fn asset_directory_targeting(path: &BundlePath) -> AssetDirectoryTargeting {
    let mut targeting = AssetDirectoryTargeting::default();
    let segments = path.segments();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        for token in segment.split('#').skip(1) {
            if let Some(value) = token.strip_prefix("lang_") {
                targeting.language = Some(value.to_string());
            } else if let Some(value) = token.strip_prefix("tcf_") {
                targeting.texture_suffix = Some(value.to_string());
            }
        }
    }
    targeting
}

/// Removes every `#<key>_...` token of the given key from a path.
pub fn strip_asset_token(path: &BundlePath, key: &str) -> BundlePath {
    let prefix = format!("{key}_");
    path.map_segments(|segment| {
        let mut parts = segment.split('#');
        let mut rebuilt = parts.next().unwrap_or_default().to_string();
        for token in parts {
            if !token.starts_with(&prefix) {
                rebuilt.push('#');
                rebuilt.push_str(token);
            }
        }
        rebuilt
    })
}

/// Density bucket encoded in a `res/<dir>-<qualifier>/` directory name.
pub fn resource_density(path: &BundlePath) -> Option<DensityBucket> {
    let (_, qualifier) = resource_qualifier(path)?;
    DensityBucket::from_qualifier(qualifier)
}

/// Language encoded in a `res/<dir>-<qualifier>/` directory name.
///
/// Only plain two-letter language qualifiers are recognized (`values-fr`);
/// anything resembling a density or other configuration qualifier is not a
/// language.
pub fn resource_language(path: &BundlePath) -> Option<String> {
    let (_, qualifier) = resource_qualifier(path)?;
    if qualifier.len() == 2
        && qualifier.chars().all(|c| c.is_ascii_lowercase())
        && DensityBucket::from_qualifier(qualifier).is_none()
    {
        return Some(qualifier.to_string());
    }
    None
}

fn resource_qualifier(path: &BundlePath) -> Option<(&str, &str)> {
    if !path.in_directory("res") || path.segments().len() < 3 {
        return None;
    }
    path.segments()[1].rsplit_once('-')
}
