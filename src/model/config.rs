//! Global bundle configuration.
//!
//! The archive carries a single `BundleConfig.json` at its root describing
//! the bundle type and the optimization dimensions declared at build time.
//! The shapes here mirror that document; everything is optional except what
//! serde defaults cover, so a minimal `{}` config is valid.

use serde::{Deserialize, Serialize};

/// Marker distinguishing normal bundles from asset-only bundles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleType {
    /// Regular application bundle with at least a base feature module.
    #[default]
    Default,
    /// Bundle consisting purely of asset modules.
    AssetOnly,
}

/// Dimensions along which module content may be fanned out into splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationDimension {
    /// Native-library CPU architecture.
    Abi,
    /// Screen density bucket of drawable resources.
    ScreenDensity,
    /// Language/locale of resources and assets.
    Language,
    /// Texture compression format of asset packs.
    TextureCompressionFormat,
}

/// Suffix-stripping policy for one optimization dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixStripping {
    /// Whether surviving asset paths lose their format token.
    #[serde(default)]
    pub enabled: bool,

    /// The single format value kept when collapsing multi-format assets.
    #[serde(default)]
    pub default_suffix: String,
}

/// One declared optimization dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDimensionConfig {
    /// Which dimension this declaration concerns.
    pub dimension: OptimizationDimension,

    /// Optional policy collapsing this dimension for shard output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_stripping: Option<SuffixStripping>,
}

/// Declared optimizations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimizations {
    /// Dimensions declared at bundle-build time.
    #[serde(default)]
    pub split_dimensions: Vec<SplitDimensionConfig>,
}

/// Global build configuration of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Normal vs asset-only marker.
    #[serde(default)]
    pub bundle_type: BundleType,

    /// Declared optimization dimensions.
    #[serde(default)]
    pub optimizations: Optimizations,
}

impl BundleConfig {
    /// Decodes a config from its JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Returns the suffix-stripping policy declared for a dimension, if any.
    pub fn suffix_stripping(&self, dimension: OptimizationDimension) -> Option<&SuffixStripping> {
        self.optimizations
            .split_dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .and_then(|d| d.suffix_stripping.as_ref())
    }
}

/// Locale needs of a concrete target device.
///
/// Consumed only by the language-splitting condition: without a known,
/// non-empty locale set, locale-specific content must be retained wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Locales the device requests, e.g. `["en-US", "fr"]`.
    #[serde(default)]
    pub supported_locales: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_a_valid_config() {
        let config = BundleConfig::from_slice(b"{}").unwrap();
        assert_eq!(config.bundle_type, BundleType::Default);
        assert!(config.optimizations.split_dimensions.is_empty());
    }

    #[test]
    fn decodes_dimensions_and_stripping_policy() {
        let config = BundleConfig::from_slice(
            br#"{
                "bundle_type": "asset_only",
                "optimizations": {
                    "split_dimensions": [
                        {"dimension": "ABI"},
                        {
                            "dimension": "TEXTURE_COMPRESSION_FORMAT",
                            "suffix_stripping": {"enabled": true, "default_suffix": "etc2"}
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bundle_type, BundleType::AssetOnly);
        assert!(
            config
                .suffix_stripping(OptimizationDimension::Abi)
                .is_none()
        );
        let policy = config
            .suffix_stripping(OptimizationDimension::TextureCompressionFormat)
            .unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.default_suffix, "etc2");
    }
}
