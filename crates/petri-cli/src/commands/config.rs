use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use petri_core::pipeline::config::BatchConfig;
use petri_core::plan::{ChannelConfig, ChannelPlan, ChannelRole, FlatFieldConfig};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a template BatchConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = BatchConfig {
        inputs: vec![PathBuf::from("acquisition.tif")],
        output_dir: None,
        plan: ChannelPlan {
            channels: vec![
                ChannelConfig {
                    index: 0,
                    role: ChannelRole::Brightfield,
                    process: true,
                },
                ChannelConfig {
                    index: 1,
                    role: ChannelRole::Fluorescence,
                    process: true,
                },
            ],
            flat_fields: vec![FlatFieldConfig {
                channel: 1,
                reference: Some(PathBuf::from("flatfield_ch2.tif")),
                apply: true,
            }],
        },
        median_radius: 18,
        gaussian_sigma: None,
        pixel_width: None,
        pixel_unit: None,
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
