use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use petri_core::io::stack::StackReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input acquisition stack (multi-page TIFF)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = StackReader::open(&args.file)?;
    let info = reader.info();

    println!("File:        {}", info.path.display());
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Channels:    {}", info.channels);
    if info.slices > 1 {
        println!("Z slices:    {}", info.slices);
    }
    println!("Frames:      {}", info.frames);
    println!("Bit depth:   {}", info.bit_depth);
    if info.calibration.is_calibrated() {
        println!(
            "Pixel size:  {} {}",
            info.calibration.pixel_width, info.calibration.unit
        );
    } else {
        println!("Pixel size:  uncalibrated");
    }

    let page_bytes = info.width as usize * info.height as usize * (info.bit_depth as usize / 8);
    let total_mb = (page_bytes * info.pages) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
