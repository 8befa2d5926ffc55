//! Image loading and downsampling.
//!
//! Every source image is reduced to a fixed grid before any colour work, so
//! processing cost does not depend on the input resolution.

use std::path::Path;

use image::DynamicImage;
use image::GenericImageView;
use palette::Srgb;
use tracing::debug;

use crate::color::Pixel;
use crate::config::SampleConfig;
use crate::error::{ExtractError, Result};

/// Downsampled pixels in row-major order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageSample {
    pixels: Vec<Pixel>,
}

impl ImageSample {
    pub fn from_pixels(pixels: Vec<Pixel>) -> Self {
        Self { pixels }
    }

    /// Resize `img` to the configured grid and drop any alpha channel.
    pub fn from_image(img: &DynamicImage, config: &SampleConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(ExtractError::invalid_parameter(
                "sample size",
                format!("{}x{}", config.width, config.height),
            ));
        }
        let (orig_w, orig_h) = img.dimensions();
        if orig_w == 0 || orig_h == 0 {
            return Err(ExtractError::processing("image has no pixels"));
        }

        let resized = img.resize_exact(config.width, config.height, config.filter.into());
        let pixels: Vec<Pixel> = resized
            .to_rgb8()
            .into_raw()
            .chunks_exact(3)
            .map(|c| Srgb::new(c[0], c[1], c[2]))
            .collect();

        debug!(
            orig_w,
            orig_h,
            width = config.width,
            height = config.height,
            "downsampled image"
        );
        Ok(Self { pixels })
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Open and decode `path`, then downsample it.
pub fn load_sample(path: &Path, config: &SampleConfig) -> Result<ImageSample> {
    let img = image::open(path).map_err(|source| ExtractError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "decoded image");
    ImageSample::from_image(&img, config)
}

/// Decode an encoded image held in memory, then downsample it.
pub fn load_sample_from_memory(input: &[u8], config: &SampleConfig) -> Result<ImageSample> {
    let img = image::load_from_memory(input).map_err(|source| ExtractError::Decode { source })?;
    ImageSample::from_image(&img, config)
}
