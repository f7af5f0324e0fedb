//! Configuration types deserialized from `ckt.toml`.

use serde::Deserialize;

/// Default minimum size (exclusive) of a kept pin component.
pub const DEFAULT_COMPONENT_THRESHOLD: usize = 200;

/// Default number of coarse size buckets per function group.
pub const DEFAULT_SIZE_BUCKETS: usize = 50;

/// The top-level analysis configuration parsed from `ckt.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Optional pre-filter applied to the raw tables before id assignment.
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    /// Library-cell classification settings.
    #[serde(default)]
    pub classify: ClassifyConfig,
    /// Connected-component noise filter settings.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Buffer-tree propagation settings.
    #[serde(default)]
    pub buffer_tree: BufferTreeConfig,
    /// Driver/sink feature settings.
    #[serde(default)]
    pub features: FeatureConfig,
}

/// Settings for the unconstrained-pin pre-filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreprocessConfig {
    /// Drop pins and cells with unconstrained (infinite or absent) slack.
    #[serde(default)]
    pub drop_unconstrained: bool,
}

/// Settings for library-cell size classification.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    /// Number of coarse `size_class2` buckets per function group.
    #[serde(default = "default_size_buckets")]
    pub size_buckets: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            size_buckets: DEFAULT_SIZE_BUCKETS,
        }
    }
}

fn default_size_buckets() -> usize {
    DEFAULT_SIZE_BUCKETS
}

/// Settings for the pin connectivity filter.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Components with more members than this are kept.
    #[serde(default = "default_component_threshold")]
    pub component_threshold: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            component_threshold: DEFAULT_COMPONENT_THRESHOLD,
        }
    }
}

fn default_component_threshold() -> usize {
    DEFAULT_COMPONENT_THRESHOLD
}

/// Settings for buffer-tree segmentation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BufferTreeConfig {
    /// Upper bound on propagation rounds; `0` bounds by the pin count.
    #[serde(default)]
    pub max_rounds: usize,
}

/// Settings for driver/sink feature synthesis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureConfig {
    /// Join sinks to drivers on the collapsed `net_id_rm_bt` instead of `net_id`.
    #[serde(default)]
    pub join_on_collapsed_net: bool,
}
