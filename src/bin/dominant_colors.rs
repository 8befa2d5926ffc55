use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use dominant_colors::{
    CentroidRounding, ExtractConfig, Extraction, GrayscaleFilter, Strategy, extract_colors,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Count exact pixel occurrences, skipping near-black and near-white
    Frequency,
    /// Unfiltered top 10 by count, printed as a hex list
    List,
    /// k-means clustering in RGB space
    Kmeans,
}

/// How the palette is written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Report {
    /// Header, optional fallback notice, one `#hex (RGB: ...)` line per colour.
    Detailed,
    /// `Extracted Colors: [...]`
    List,
    Json,
}

/// Print the dominant colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Extraction strategy (ignored when --config supplies one)
    #[arg(short = 'm', long, value_enum, default_value_t = Method::Frequency)]
    strategy: Method,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of colors (frequency) or clusters (k-means)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Downsample width
    #[arg(long)]
    width: Option<u32>,

    /// Downsample height
    #[arg(long)]
    height: Option<u32>,

    /// Keep near-black and near-white colors (frequency only)
    #[arg(long, conflicts_with_all = ["dark_threshold", "light_threshold"])]
    no_filter: bool,

    /// Channel sum below which a color counts as near-black (frequency only)
    #[arg(long)]
    dark_threshold: Option<u32>,

    /// Channel sum above which a color counts as near-white (frequency only)
    #[arg(long)]
    light_threshold: Option<u32>,

    /// Print a frequency result as `Extracted Colors: [...]` (frequency only)
    #[arg(long)]
    list: bool,

    /// Random seed (k-means only)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Truncate centroids instead of rounding them (k-means only)
    #[arg(long)]
    truncate: bool,

    /// Print the hex colors as a JSON array
    #[arg(long, conflicts_with = "list")]
    json: bool,
}

impl Args {
    fn build_config(&self) -> Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => match self.strategy {
                Method::Frequency => ExtractConfig::frequency(),
                Method::List => ExtractConfig::frequency_list(),
                Method::Kmeans => ExtractConfig::clustering(),
            },
        };

        if let Some(w) = self.width {
            config.sample.width = w;
        }
        if let Some(h) = self.height {
            config.sample.height = h;
        }

        match &mut config.strategy {
            Strategy::Frequency(f) => {
                if self.seed.is_some() || self.truncate {
                    bail!("--seed and --truncate only apply to k-means");
                }
                if let Some(n) = self.count {
                    f.count = n;
                }
                if self.no_filter {
                    f.filter = None;
                } else if self.dark_threshold.is_some() || self.light_threshold.is_some() {
                    let filter = f.filter.get_or_insert_with(GrayscaleFilter::default);
                    if let Some(t) = self.dark_threshold {
                        filter.dark_threshold = t;
                    }
                    if let Some(t) = self.light_threshold {
                        filter.light_threshold = t;
                    }
                }
            }
            Strategy::Clustering(c) => {
                if self.no_filter
                    || self.list
                    || self.dark_threshold.is_some()
                    || self.light_threshold.is_some()
                {
                    bail!(
                        "--no-filter, --dark-threshold, --light-threshold and --list only apply to frequency"
                    );
                }
                if let Some(n) = self.count {
                    c.k = n;
                }
                if let Some(s) = self.seed {
                    c.seed = s;
                }
                if self.truncate {
                    c.rounding = CentroidRounding::Truncate;
                }
            }
        }
        Ok(config)
    }

    fn report_style(&self, config: &ExtractConfig) -> Report {
        if self.json {
            return Report::Json;
        }
        match config.strategy {
            Strategy::Frequency(_) if self.list || self.strategy == Method::List => Report::List,
            Strategy::Frequency(_) => Report::Detailed,
            Strategy::Clustering(_) => Report::List,
        }
    }
}

fn report<W: Write>(
    out: &mut W,
    input: &Path,
    style: Report,
    extraction: &Extraction,
) -> Result<()> {
    match style {
        Report::Json => {
            writeln!(out, "{}", serde_json::to_string(&extraction.hex_colors())?)?;
        }
        Report::Detailed => {
            writeln!(out, "Dominant colors in {}:", input.display())?;
            if extraction.fell_back {
                writeln!(out, "No non-grayscale colors found.")?;
            }
            for candidate in &extraction.palette {
                writeln!(out, "{}", candidate.describe())?;
            }
        }
        Report::List => {
            writeln!(out, "Extracted Colors: {:?}", extraction.hex_colors())?;
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = args.build_config()?;
    let extraction = extract_colors(&args.input, &config)
        .with_context(|| format!("extracting colors from {}", args.input.display()))?;
    report(
        &mut std::io::stdout().lock(),
        &args.input,
        args.report_style(&config),
        &extraction,
    )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
