//! Dominant colour estimation for a single image.
//!
//! Two strategies are available: exact-match pixel counting with a
//! near-black / near-white filter, and k-means clustering in RGB space.
//! Both work on a fixed-size downsample of the source image and report
//! colours as lowercase `#rrggbb` strings.
//!
//! ```no_run
//! use dominant_colors::{ExtractConfig, extract_colors};
//! use std::path::Path;
//!
//! let extraction = extract_colors(Path::new("photo.jpg"), &ExtractConfig::clustering())?;
//! println!("Extracted Colors: {:?}", extraction.hex_colors());
//! # Ok::<(), dominant_colors::ExtractError>(())
//! ```

use js_sys::Array;
use wasm_bindgen::prelude::*;

pub mod clustering;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod frequency;
pub mod loader;

pub use color::{ColorCandidate, Palette, Pixel, parse_hex, to_hex};
pub use config::{
    CentroidRounding, ClusterConfig, ExtractConfig, FrequencyConfig, GrayscaleFilter,
    ResizeFilter, SampleConfig, Strategy,
};
pub use error::{ExtractError, Result};
pub use extract::{
    Extraction, extract_colors, extract_colors_from_memory, extract_from_sample,
    extract_hex_or_empty, extract_hex_or_report,
};
pub use loader::{ImageSample, load_sample, load_sample_from_memory};

/// Build the default configuration for a strategy name (`"frequency"`, `"list"` or `"kmeans"`).
pub fn config_for(strategy: &str, count: usize, seed: Option<u64>) -> Result<ExtractConfig> {
    let mut config = match strategy {
        "frequency" => ExtractConfig::frequency(),
        "list" => ExtractConfig::frequency_list(),
        "kmeans" | "clustering" => ExtractConfig::clustering(),
        other => return Err(ExtractError::invalid_parameter("strategy", other)),
    };
    match &mut config.strategy {
        Strategy::Frequency(f) => f.count = count,
        Strategy::Clustering(c) => {
            c.k = count;
            if let Some(seed) = seed {
                c.seed = seed;
            }
        }
    }
    Ok(config)
}

/// Extract dominant colours from an encoded image.
///
/// Returns an array of `#rrggbb` strings, best colour first.
#[wasm_bindgen]
pub fn dominant_colors(
    input: Vec<u8>,
    strategy: &str,
    count: usize,
    seed: Option<u64>,
) -> std::result::Result<Array, JsValue> {
    let config = config_for(strategy, count, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let extraction =
        extract_colors_from_memory(&input, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let out = Array::new();
    for hex in extraction.hex_colors() {
        out.push(&JsValue::from_str(&hex));
    }
    Ok(out)
}
