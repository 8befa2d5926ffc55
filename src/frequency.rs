//! Dominant colours by exact-match pixel counting.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::color::{ColorCandidate, Palette, channel_sum};
use crate::config::{FrequencyConfig, GrayscaleFilter};
use crate::loader::ImageSample;

#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyOutcome {
    pub palette: Palette,
    /// Set when the grayscale filter rejected every candidate and the
    /// unfiltered ranking was used instead.
    pub fell_back: bool,
}

/// Distinct pixels with their occurrence counts, most frequent first.
///
/// Equal counts keep first-seen order in the sample.
pub fn rank_colors(sample: &ImageSample) -> Vec<ColorCandidate> {
    let mut slots: HashMap<[u8; 3], usize> = HashMap::new();
    let mut ranked: Vec<ColorCandidate> = Vec::new();

    for &p in sample.pixels() {
        let key = [p.red, p.green, p.blue];
        match slots.get(&key) {
            Some(&i) => ranked[i].count += 1,
            None => {
                slots.insert(key, ranked.len());
                ranked.push(ColorCandidate::new(p, 1));
            }
        }
    }

    // stable, so ties stay in insertion order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn passes(filter: &GrayscaleFilter, c: &ColorCandidate) -> bool {
    let sum = channel_sum(c.color);
    sum >= filter.dark_threshold && sum <= filter.light_threshold
}

/// Top `count` colours, skipping near-black and near-white when a filter is set.
pub fn extract(sample: &ImageSample, config: &FrequencyConfig) -> FrequencyOutcome {
    let ranked = rank_colors(sample);
    debug!(pixels = sample.len(), distinct = ranked.len(), "counted colors");

    let unfiltered = || ranked.iter().take(config.count).copied().collect::<Palette>();

    let Some(filter) = &config.filter else {
        return FrequencyOutcome {
            palette: unfiltered(),
            fell_back: false,
        };
    };

    let palette: Palette = ranked
        .iter()
        .take(filter.candidate_limit)
        .filter(|c| passes(filter, c))
        .take(config.count)
        .copied()
        .collect();

    if palette.is_empty() && !ranked.is_empty() && config.count > 0 {
        warn!("no non-grayscale colors found, using unfiltered ranking");
        return FrequencyOutcome {
            palette: unfiltered(),
            fell_back: true,
        };
    }

    FrequencyOutcome {
        palette,
        fell_back: false,
    }
}
