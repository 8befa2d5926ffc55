//! Dominant colours as k-means centroids in RGB space.

use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;
use tracing::debug;

use crate::color::{ColorCandidate, Palette};
use crate::config::ClusterConfig;
use crate::error::{ExtractError, Result};
use crate::loader::ImageSample;

/// Assignment indices are bytes, so this is the most clusters we can tell apart.
pub const MAX_CLUSTERS: usize = u8::MAX as usize;

/// Raw clustering result before centroids are turned into bytes.
#[derive(Clone, Debug)]
pub struct Clusters {
    pub centroids: Vec<Srgb<f32>>,
    /// Number of sample pixels assigned to each centroid.
    pub populations: Vec<usize>,
    pub score: f32,
}

/// Run k-means over the sample pixels, keeping the best of `config.runs` seeds.
pub fn cluster(sample: &ImageSample, config: &ClusterConfig) -> Result<Clusters> {
    if config.k == 0 || config.k > MAX_CLUSTERS {
        return Err(ExtractError::invalid_parameter("k", config.k));
    }
    if sample.is_empty() {
        return Err(ExtractError::processing("cannot cluster an empty sample"));
    }

    let points: Vec<Srgb<f32>> = sample.pixels().iter().map(|p| p.into_format::<f32>()).collect();

    let runs = config.runs.max(1) as u64;
    let best: Kmeans<Srgb<f32>> = (0..runs)
        .map(|i| {
            get_kmeans(
                config.k,
                config.max_iterations,
                config.convergence,
                false,
                &points,
                config.seed.wrapping_add(i),
            )
        })
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ExtractError::processing("k-means produced no result"))?;

    let mut populations = vec![0usize; best.centroids.len()];
    for &idx in &best.indices {
        let slot = populations
            .get_mut(idx as usize)
            .ok_or_else(|| ExtractError::processing(format!("cluster index {idx} out of range")))?;
        *slot += 1;
    }

    debug!(k = config.k, score = best.score, "k-means finished");
    Ok(Clusters {
        centroids: best.centroids,
        populations,
        score: best.score,
    })
}

/// One candidate per non-empty cluster, largest population first.
pub fn extract(sample: &ImageSample, config: &ClusterConfig) -> Result<Palette> {
    let clusters = cluster(sample, config)?;

    let mut palette: Palette = clusters
        .centroids
        .iter()
        .zip(&clusters.populations)
        .filter(|(_, n)| **n > 0)
        .map(|(c, &n)| {
            let r = config.rounding;
            ColorCandidate::new(
                Srgb::new(r.to_byte(c.red), r.to_byte(c.green), r.to_byte(c.blue)),
                n,
            )
        })
        .collect();
    // stable, ties keep cluster order
    palette.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Pixel;
    use crate::config::CentroidRounding;

    fn two_tone(red: usize, blue: usize) -> ImageSample {
        let mut pixels: Vec<Pixel> = vec![Srgb::new(255, 0, 0); red];
        pixels.extend(std::iter::repeat_n(Srgb::new(0, 0, 255), blue));
        ImageSample::from_pixels(pixels)
    }

    fn k(k: usize) -> ClusterConfig {
        ClusterConfig {
            k,
            ..ClusterConfig::default()
        }
    }

    #[test]
    fn separates_two_pure_colors() {
        let palette = extract(&two_tone(60, 40), &k(2)).unwrap();
        assert_eq!(
            palette,
            vec![
                ColorCandidate::new(Srgb::new(255, 0, 0), 60),
                ColorCandidate::new(Srgb::new(0, 0, 255), 40),
            ]
        );
    }

    #[test]
    fn populations_sum_to_sample_size() {
        let pixels: Vec<Pixel> = (0..400u32)
            .map(|i| Srgb::new((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8))
            .collect();
        let sample = ImageSample::from_pixels(pixels);
        for n in 1..=6 {
            let clusters = cluster(&sample, &k(n)).unwrap();
            assert_eq!(clusters.populations.iter().sum::<usize>(), sample.len());
            let palette = extract(&sample, &k(n)).unwrap();
            assert!(palette.len() <= n);
            assert_eq!(palette.iter().map(|c| c.count).sum::<usize>(), sample.len());
        }
    }

    #[test]
    fn same_seed_same_palette() {
        let pixels: Vec<Pixel> = (0..300u32)
            .map(|i| Srgb::new((i % 256) as u8, (i * 3 % 256) as u8, 90))
            .collect();
        let sample = ImageSample::from_pixels(pixels);
        let config = k(4);
        assert_eq!(extract(&sample, &config).unwrap(), extract(&sample, &config).unwrap());
    }

    #[test]
    fn multiple_runs_keep_populations_consistent() {
        let config = ClusterConfig {
            runs: 3,
            ..k(2)
        };
        let palette = extract(&two_tone(30, 70), &config).unwrap();
        assert_eq!(palette[0], ColorCandidate::new(Srgb::new(0, 0, 255), 70));
        assert_eq!(palette[1], ColorCandidate::new(Srgb::new(255, 0, 0), 30));
    }

    #[test]
    fn truncation_mode_is_applied() {
        let config = ClusterConfig {
            rounding: CentroidRounding::Truncate,
            ..k(2)
        };
        let palette = extract(&two_tone(10, 10), &config).unwrap();
        assert!(palette.iter().any(|c| c.color == Srgb::new(255, 0, 0)));
        assert!(palette.iter().any(|c| c.color == Srgb::new(0, 0, 255)));
    }

    #[test]
    fn empty_clusters_are_dropped() {
        let sample = two_tone(6000, 4000);
        for seed in 0..5 {
            let config = ClusterConfig { seed, ..k(5) };
            let palette = extract(&sample, &config).unwrap();
            assert_eq!(
                palette,
                vec![
                    ColorCandidate::new(Srgb::new(255, 0, 0), 6000),
                    ColorCandidate::new(Srgb::new(0, 0, 255), 4000),
                ],
                "seed {seed}"
            );
        }

        let solid = ImageSample::from_pixels(vec![Srgb::new(200, 30, 30); 100]);
        let palette = extract(&solid, &k(5)).unwrap();
        assert_eq!(palette, vec![ColorCandidate::new(Srgb::new(200, 30, 30), 100)]);

        assert_eq!(extract(&two_tone(1, 1), &k(5)).unwrap().len(), 2);
    }

    #[test]
    fn rejects_bad_k_and_empty_sample() {
        assert!(matches!(
            extract(&two_tone(1, 1), &k(0)),
            Err(ExtractError::InvalidParameter { .. })
        ));
        assert!(matches!(
            extract(&two_tone(1, 1), &k(256)),
            Err(ExtractError::InvalidParameter { .. })
        ));
        assert!(matches!(
            extract(&ImageSample::default(), &k(2)),
            Err(ExtractError::Processing { .. })
        ));
    }
}
