//! Tunable parameters for loading and both extraction strategies.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it changes:
//!
//! ```no_run
//! use dominant_colors::ExtractConfig;
//!
//! let config = ExtractConfig::from_json_str(r#"{ "strategy": { "kmeans": { "k": 3 } } }"#)?;
//! # Ok::<(), dominant_colors::ExtractError>(())
//! ```

use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Resize target used by the frequency report.
pub const FREQUENCY_SAMPLE_SIZE: u32 = 150;
/// Resize target used by k-means, smaller because clustering dominates runtime.
pub const CLUSTER_SAMPLE_SIZE: u32 = 100;
pub const DEFAULT_COLOR_COUNT: usize = 5;
pub const DEFAULT_CLUSTER_COUNT: usize = 5;
/// Length of the unfiltered hex list printed by the list-style frequency report.
pub const LIST_COLOR_COUNT: usize = 10;
/// Channel sums below this are treated as near-black.
pub const DARK_THRESHOLD: u32 = 30;
/// Channel sums above this are treated as near-white.
pub const LIGHT_THRESHOLD: u32 = 700;
/// How many ranked colours the grayscale filter looks at.
pub const FILTER_CANDIDATE_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    /// Bilinear.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// How the image is reduced before any colour work happens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub width: u32,
    pub height: u32,
    pub filter: ResizeFilter,
}

impl SampleConfig {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            filter: ResizeFilter::default(),
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::square(FREQUENCY_SAMPLE_SIZE)
    }
}

/// Near-black / near-white rejection applied to ranked colours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrayscaleFilter {
    pub dark_threshold: u32,
    pub light_threshold: u32,
    pub candidate_limit: usize,
}

impl Default for GrayscaleFilter {
    fn default() -> Self {
        Self {
            dark_threshold: DARK_THRESHOLD,
            light_threshold: LIGHT_THRESHOLD,
            candidate_limit: FILTER_CANDIDATE_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    pub count: usize,
    /// `None` disables filtering entirely.
    pub filter: Option<GrayscaleFilter>,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COLOR_COUNT,
            filter: Some(GrayscaleFilter::default()),
        }
    }
}

/// Conversion of a floating point centroid channel to a byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentroidRounding {
    #[default]
    Nearest,
    /// Drop the fractional part, bit-compatible with the older scripts.
    Truncate,
}

impl CentroidRounding {
    /// Map a channel in `[0, 1]` to a byte.
    pub fn to_byte(self, channel: f32) -> u8 {
        let scaled = (channel * 255.0).clamp(0.0, 255.0);
        match self {
            CentroidRounding::Nearest => scaled.round() as u8,
            CentroidRounding::Truncate => scaled.trunc() as u8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub k: usize,
    pub max_iterations: usize,
    pub convergence: f32,
    pub seed: u64,
    /// Independent restarts with seeds `seed..seed + runs`; the best score wins.
    pub runs: u32,
    pub rounding: CentroidRounding,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_CLUSTER_COUNT,
            max_iterations: 20,
            convergence: 1e-4,
            seed: 0,
            runs: 1,
            rounding: CentroidRounding::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Frequency(FrequencyConfig),
    #[serde(rename = "kmeans")]
    Clustering(ClusterConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Frequency(FrequencyConfig::default())
    }
}

/// Everything one extraction run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub sample: SampleConfig,
    pub strategy: Strategy,
}

impl ExtractConfig {
    /// Frequency counting over a 150x150 sample, top 5, grayscale filter on.
    pub fn frequency() -> Self {
        Self {
            sample: SampleConfig::square(FREQUENCY_SAMPLE_SIZE),
            strategy: Strategy::Frequency(FrequencyConfig::default()),
        }
    }

    /// Unfiltered top 10 over a 100x100 sample, reported as a plain hex list.
    pub fn frequency_list() -> Self {
        Self {
            sample: SampleConfig::square(CLUSTER_SAMPLE_SIZE),
            strategy: Strategy::Frequency(FrequencyConfig {
                count: LIST_COLOR_COUNT,
                filter: None,
            }),
        }
    }

    /// k-means with k = 5 over a 100x100 sample.
    pub fn clustering() -> Self {
        Self {
            sample: SampleConfig::square(CLUSTER_SAMPLE_SIZE),
            strategy: Strategy::Clustering(ClusterConfig::default()),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExtractError::Config {
            message: e.to_string(),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ExtractError::Config {
            message: e.to_string(),
        })
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::frequency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let freq = ExtractConfig::frequency();
        assert_eq!(freq.sample.width, 150);
        assert_eq!(freq.sample.height, 150);
        let Strategy::Frequency(f) = &freq.strategy else {
            panic!("expected frequency strategy");
        };
        assert_eq!(f.count, 5);
        let filter = f.filter.as_ref().unwrap();
        assert_eq!(filter.dark_threshold, 30);
        assert_eq!(filter.light_threshold, 700);
        assert_eq!(filter.candidate_limit, 100);

        let km = ExtractConfig::clustering();
        assert_eq!(km.sample.width, 100);
        let Strategy::Clustering(c) = &km.strategy else {
            panic!("expected clustering strategy");
        };
        assert_eq!(c.k, 5);
        assert_eq!(c.seed, 0);
    }

    #[test]
    fn frequency_list_is_unfiltered_top_ten() {
        let cfg = ExtractConfig::frequency_list();
        assert_eq!((cfg.sample.width, cfg.sample.height), (100, 100));
        assert_eq!(
            cfg.strategy,
            Strategy::Frequency(FrequencyConfig {
                count: 10,
                filter: None,
            })
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = ExtractConfig::from_json_str(
            r#"{ "sample": { "width": 64 }, "strategy": { "kmeans": { "k": 3, "rounding": "truncate" } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.sample.width, 64);
        assert_eq!(cfg.sample.height, FREQUENCY_SAMPLE_SIZE);
        assert_eq!(cfg.sample.filter, ResizeFilter::Triangle);
        let Strategy::Clustering(c) = cfg.strategy else {
            panic!("expected clustering strategy");
        };
        assert_eq!(c.k, 3);
        assert_eq!(c.rounding, CentroidRounding::Truncate);
        assert_eq!(c.max_iterations, 20);
    }

    #[test]
    fn json_round_trip() {
        let cfg = ExtractConfig::clustering();
        let json = cfg.to_json_string().unwrap();
        assert_eq!(ExtractConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn bad_json_is_config_error() {
        let err = ExtractConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ExtractError::Config { .. }));
    }

    #[test]
    fn rounding_modes() {
        let c = 199.7 / 255.0;
        assert_eq!(CentroidRounding::Nearest.to_byte(c), 200);
        assert_eq!(CentroidRounding::Truncate.to_byte(c), 199);
        assert_eq!(CentroidRounding::Nearest.to_byte(1.2), 255);
        assert_eq!(CentroidRounding::Truncate.to_byte(-0.1), 0);
    }
}
