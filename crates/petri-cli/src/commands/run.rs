use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use petri_core::pipeline::config::BatchConfig;
use petri_core::pipeline::{run_batch, PipelineStage, ProgressReporter};
use petri_core::plan::{ChannelConfig, ChannelPlan, FlatFieldConfig};

use crate::summary::{print_batch_result, print_batch_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Input stack files and/or directories of single-plane files
    pub inputs: Vec<PathBuf>,

    /// Batch config file (TOML); positional inputs override its input list
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated channel roles in acquisition order,
    /// e.g. "brightfield,fluorescence"
    #[arg(long)]
    pub channels: Option<String>,

    /// Channel indices to pass through uncorrected
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<usize>,

    /// Flat-field reference for a channel, as INDEX=PATH (repeatable)
    #[arg(long = "flat-field")]
    pub flat_field: Vec<String>,

    /// Fluorescence channels that keep their reference unapplied and get
    /// background subtraction only
    #[arg(long, value_delimiter = ',')]
    pub background_only: Vec<usize>,

    /// Median filter radius for the brightfield correction, in pixels
    #[arg(long, default_value = "18")]
    pub median_radius: usize,

    /// Apply a Gaussian blur with this sigma to the brightfield channel
    #[arg(long)]
    pub gaussian: Option<f32>,

    /// Override the pixel size read from the source files
    #[arg(long)]
    pub pixel_width: Option<f64>,

    /// Unit for --pixel-width
    #[arg(long, default_value = "um")]
    pub pixel_unit: String,

    /// Output directory (defaults to each unit's own directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Answer yes to confirmation prompts
    #[arg(long)]
    pub yes: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: BatchConfig = toml::from_str(&contents).context("Invalid batch config")?;
        if !args.inputs.is_empty() {
            config.inputs = args.inputs.clone();
        }
        config
    } else {
        build_config_from_args(args)?
    };

    let duplicates = config.plan.duplicate_flat_field_paths();
    if !duplicates.is_empty() && !confirm_duplicates(&duplicates, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    print_batch_summary(&config);

    let bar = ProgressBar::new(1);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { bar: bar.clone() });

    let summary = run_batch(&config, reporter)?;
    bar.finish_and_clear();

    print_batch_result(&summary);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<BatchConfig> {
    if args.inputs.is_empty() {
        bail!("No inputs given (pass files/directories or --config)");
    }
    let Some(ref channels_arg) = args.channels else {
        bail!("--channels is required without --config, e.g. --channels brightfield,fluorescence");
    };

    let mut channels = Vec::new();
    for (index, role_str) in channels_arg.split(',').enumerate() {
        channels.push(ChannelConfig {
            index,
            role: role_str.parse()?,
            process: !args.skip.contains(&index),
        });
    }

    let mut flat_fields = Vec::new();
    for spec in &args.flat_field {
        let (index_str, path) = spec
            .split_once('=')
            .with_context(|| format!("Invalid --flat-field {spec:?}, expected INDEX=PATH"))?;
        let channel: usize = index_str
            .trim()
            .parse()
            .with_context(|| format!("Invalid channel index in --flat-field {spec:?}"))?;
        flat_fields.push(FlatFieldConfig {
            channel,
            reference: Some(PathBuf::from(path.trim())),
            apply: !args.background_only.contains(&channel),
        });
    }

    let plan = ChannelPlan::new(channels, flat_fields)?;

    Ok(BatchConfig {
        inputs: args.inputs.clone(),
        output_dir: args.output_dir.clone(),
        plan,
        median_radius: args.median_radius,
        gaussian_sigma: args.gaussian,
        pixel_width: args.pixel_width,
        pixel_unit: Some(args.pixel_unit.clone()),
    })
}

/// List flat-field references shared between channels and ask before
/// continuing.
fn confirm_duplicates(duplicates: &[(PathBuf, Vec<usize>)], yes: bool) -> Result<bool> {
    println!("The following flat-field images are used for multiple channels:");
    for (path, channels) in duplicates {
        let list = channels
            .iter()
            .map(|c| (c + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {} - channels {}", path.display(), list);
    }
    if yes {
        return Ok(true);
    }

    print!("Continue with shared references? [y/N]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.set_position(self.bar.length().unwrap_or(1));
    }

    fn begin_unit(&self, name: &str, index: usize, total: usize) {
        self.bar
            .println(format!("[{}/{}] {}", index + 1, total, name));
    }
}
