use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use imgprep::dataset::{self, LabelMapping};
use imgprep::display::{self, GridOptions, GroupBy};
use imgprep::preprocess::{self, to_gray8};
use imgprep::{Augmenter, Catalogue, Dataset, Sample};

#[derive(Parser)]
#[command(name = "imgprep")]
#[command(about = "Augment, preprocess and preview labeled image datasets")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Map a class directory to a label (DIR=LABEL); only mapped directories are loaded
    #[arg(long = "label", value_name = "DIR=LABEL", value_parser = parse_label, global = true)]
    labels: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the augmentation catalogue and save every generated image
    Augment {
        /// Dataset root with one subdirectory per label
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Output root for augmented images
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Transforms to apply, in order (defaults to the full catalogue)
        #[arg(long, value_delimiter = ',')]
        transforms: Vec<String>,

        /// Seed for the noise transforms
        #[arg(long)]
        seed: Option<u64>,

        /// Preprocess the augmented images before saving
        #[arg(long)]
        preprocess: bool,

        /// Preprocessed side length in pixels
        #[arg(long, default_value_t = preprocess::DEFAULT_TARGET_SIZE.0)]
        size: u32,
    },

    /// Normalize every image to grayscale and save the result
    Preprocess {
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Output side length in pixels
        #[arg(long, default_value_t = preprocess::DEFAULT_TARGET_SIZE.0)]
        size: u32,
    },

    /// Render a preview grid with one row per group
    Display {
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Output image path (PNG)
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        #[arg(long, value_enum, default_value_t = GroupArg::Label)]
        group_by: GroupArg,

        /// Run the augmentation catalogue before rendering
        #[arg(long)]
        augment: bool,

        /// Preprocess images before rendering
        #[arg(long)]
        preprocess: bool,

        /// Only show these groups
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,

        #[arg(long, default_value_t = 5)]
        per_row: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupArg {
    Label,
    Transform,
}

impl From<GroupArg> for GroupBy {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Label => GroupBy::Label,
            GroupArg::Transform => GroupBy::Transform,
        }
    }
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(dir, label)| !dir.is_empty() && !label.is_empty())
        .map(|(dir, label)| (dir.to_string(), label.to_string()))
        .ok_or_else(|| format!("expected DIR=LABEL, got '{}'", s))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn rng_from(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn load(data_dir: &Path, mapping: &LabelMapping) -> anyhow::Result<Dataset> {
    let data = dataset::load_dataset(data_dir, mapping)
        .with_context(|| format!("Failed to read dataset at {}", data_dir.display()))?;
    if data.is_empty() {
        anyhow::bail!("No readable images found under {}", data_dir.display());
    }
    Ok(data)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let mapping = if args.labels.is_empty() {
        LabelMapping::DirectoryName
    } else {
        LabelMapping::Explicit(args.labels.into_iter().collect::<HashMap<_, _>>())
    };

    match args.command {
        Command::Augment {
            data_dir,
            out,
            transforms,
            seed,
            preprocess: normalize,
            size,
        } => {
            let data = load(&data_dir, &mapping)?;
            let catalogue = if transforms.is_empty() {
                Catalogue::standard()
            } else {
                Catalogue::from_names(&transforms)?
            };

            let augmenter = Augmenter::new()
                .with_verbose(args.verbose)
                .with_catalogue(catalogue);
            let (mut records, report) = augmenter.run(&data, &mut rng_from(seed))?;
            if normalize {
                records = preprocess::preprocess_records(&records, (size, size));
            }
            let saved = dataset::save_records(&records, &out)
                .with_context(|| format!("Failed to save augmented images to {}", out.display()))?;

            println!("\n=== Augmentation Results ===");
            println!("Source images: {}", report.sources);
            println!("Transforms: {}", augmenter.catalogue().names().join(", "));
            println!("Augmented images saved: {}", saved.len());
            if normalize {
                println!("Preprocessed to {}x{}", size, size);
            }
            if !report.skipped.is_empty() {
                println!("Skipped (image, transform) pairs: {}", report.skipped.len());
                if args.verbose {
                    for skip in &report.skipped {
                        println!("  {} on sample {}: {}", skip.transform, skip.sample_index, skip.reason);
                    }
                }
            }
        }

        Command::Preprocess { data_dir, out, size } => {
            let data = load(&data_dir, &mapping)?;
            let processed = preprocess::preprocess_dataset(&data, (size, size));
            let saved = dataset::save_preprocessed(&processed, &out)
                .with_context(|| format!("Failed to save preprocessed images to {}", out.display()))?;

            println!("\n=== Preprocessing Results ===");
            println!("Preprocessed {} of {} images to {}x{}", saved.len(), data.len(), size, size);
        }

        Command::Display {
            data_dir,
            out,
            group_by,
            augment,
            preprocess: normalize,
            categories,
            per_row,
            seed,
        } => {
            let data = load(&data_dir, &mapping)?;
            let options = GridOptions {
                per_row,
                seed,
                categories: (!categories.is_empty()).then_some(categories),
                ..Default::default()
            };
            let by = GroupBy::from(group_by);

            // Augmentation runs on the raw images; preprocessing comes last
            let grid = if augment {
                let mut records = Augmenter::new()
                    .with_verbose(args.verbose)
                    .with_catalogue(Catalogue::standard())
                    .augment(&data, &mut rng_from(Some(seed)))?;
                if normalize {
                    records = preprocess::preprocess_records(&records, preprocess::DEFAULT_TARGET_SIZE);
                }
                display::render_grid(&records, by, &options)?
            } else if normalize {
                let samples: Vec<Sample> = preprocess::preprocess_dataset(&data, preprocess::DEFAULT_TARGET_SIZE)
                    .into_iter()
                    .map(|s| Sample::new(image::DynamicImage::ImageLuma8(to_gray8(&s.image)), s.label))
                    .collect();
                display::render_grid(&samples, by, &options)?
            } else {
                display::render_grid(data.samples(), by, &options)?
            };
            display::save_grid(&grid, &out)?;

            println!("Saved preview grid ({}x{}) to {}", grid.width(), grid.height(), out.display());
        }
    }

    Ok(())
}
