use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use petri_core::io::plane_set::discover_plane_sets;

#[derive(Args)]
pub struct ScanArgs {
    /// Directory of single-plane files following the
    /// <date>_<well>_s<site>_w<channel> naming convention
    pub dir: PathBuf,

    /// Number of channels expected per site
    #[arg(long, default_value = "2")]
    pub channels: usize,
}

pub fn run(args: &ScanArgs) -> Result<()> {
    let sets = discover_plane_sets(&args.dir, args.channels)
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;

    if sets.is_empty() {
        println!("No complete wells found in {}", args.dir.display());
        println!("(run with --verbose to see why files were skipped)");
        return Ok(());
    }

    println!("{:<20} {:>6} {:>9}", "Well", "Sites", "Channels");
    for set in &sets {
        println!("{:<20} {:>6} {:>9}", set.name, set.frames(), set.channels());
    }
    println!();
    println!("{} unit(s) ready for processing", sets.len());

    Ok(())
}
