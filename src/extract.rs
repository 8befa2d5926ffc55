//! Strategy dispatch and the one-shot entry points.

use std::io::Write;
use std::path::Path;

use tracing::{debug, error};

use crate::clustering;
use crate::color::{Palette, hex_colors};
use crate::config::{ExtractConfig, Strategy};
use crate::error::Result;
use crate::frequency;
use crate::loader::{ImageSample, load_sample, load_sample_from_memory};

/// Palette produced by one run, plus whether the grayscale fallback kicked in.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub palette: Palette,
    pub fell_back: bool,
}

impl Extraction {
    pub fn hex_colors(&self) -> Vec<String> {
        hex_colors(&self.palette)
    }
}

/// Reduce an already loaded sample with the configured strategy.
pub fn extract_from_sample(sample: &ImageSample, strategy: &Strategy) -> Result<Extraction> {
    let extraction = match strategy {
        Strategy::Frequency(cfg) => {
            let out = frequency::extract(sample, cfg);
            Extraction {
                palette: out.palette,
                fell_back: out.fell_back,
            }
        }
        Strategy::Clustering(cfg) => Extraction {
            palette: clustering::extract(sample, cfg)?,
            fell_back: false,
        },
    };
    debug!(colors = extraction.palette.len(), "extracted palette");
    Ok(extraction)
}

/// Load `path` and extract its dominant colours.
pub fn extract_colors(path: &Path, config: &ExtractConfig) -> Result<Extraction> {
    let sample = load_sample(path, &config.sample)?;
    extract_from_sample(&sample, &config.strategy)
}

/// Same as [`extract_colors`] for an encoded image held in memory.
pub fn extract_colors_from_memory(input: &[u8], config: &ExtractConfig) -> Result<Extraction> {
    let sample = load_sample_from_memory(input, &config.sample)?;
    extract_from_sample(&sample, &config.strategy)
}

/// Hex strings for `path`, or an empty list after printing `Error: ...` to stdout.
///
/// For one-shot script use; library callers want [`extract_colors`].
pub fn extract_hex_or_empty(path: &Path, config: &ExtractConfig) -> Vec<String> {
    extract_hex_or_report(&mut std::io::stdout().lock(), path, config)
}

/// Like [`extract_hex_or_empty`], writing the `Error: ...` line to `out`.
pub fn extract_hex_or_report<W: Write>(
    out: &mut W,
    path: &Path,
    config: &ExtractConfig,
) -> Vec<String> {
    match extract_colors(path, config) {
        Ok(extraction) => extraction.hex_colors(),
        Err(e) => {
            error!(path = %path.display(), "color extraction failed: {e}");
            if let Err(io) = writeln!(out, "Error: {e}") {
                error!("could not write error line: {io}");
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClusterConfig, FrequencyConfig};
    use palette::Srgb;

    #[test]
    fn dispatches_on_strategy() {
        let mut pixels = vec![Srgb::new(255, 0, 0); 6];
        pixels.extend(vec![Srgb::new(0, 0, 255); 4]);
        let sample = ImageSample::from_pixels(pixels);

        let freq = Strategy::Frequency(FrequencyConfig::default());
        let freq = extract_from_sample(&sample, &freq).unwrap();
        assert_eq!(freq.hex_colors(), vec!["#ff0000", "#0000ff"]);

        let k2 = Strategy::Clustering(ClusterConfig {
            k: 2,
            ..ClusterConfig::default()
        });
        let km = extract_from_sample(&sample, &k2).unwrap();
        assert_eq!(km.palette.iter().map(|c| c.count).sum::<usize>(), 10);
        assert!(!km.fell_back);
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let mut out = Vec::new();
        let path = Path::new("does/not/exist.png");
        let hex = extract_hex_or_report(&mut out, path, &ExtractConfig::default());
        assert!(hex.is_empty());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Error: failed to load image does/not/exist.png"), "{printed}");
        assert!(printed.ends_with('\n'));
        assert_eq!(printed.lines().count(), 1);
    }
}
