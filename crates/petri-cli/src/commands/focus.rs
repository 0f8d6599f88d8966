use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use petri_core::assemble::save_hyperstack;
use petri_core::focus::{focus_file_name, select_focused_slices};
use petri_core::io::stack::StackReader;

#[derive(Args)]
pub struct FocusArgs {
    /// Input z-stack acquisition (multi-page TIFF)
    pub file: PathBuf,

    /// Comma-separated 1-based in-focus slice per time frame, e.g. "3,2,4"
    #[arg(long)]
    pub slices: String,

    /// Output file (defaults to <stem>_pFocus.tif next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &FocusArgs) -> Result<()> {
    let mut slices = Vec::new();
    for token in args.slices.split(',') {
        let slice: usize = token
            .trim()
            .parse()
            .with_context(|| format!("Invalid slice index {token:?}"))?;
        if slice == 0 {
            bail!("Slice indices are 1-based");
        }
        slices.push(slice - 1);
    }

    let mut reader = StackReader::open(&args.file)?;
    let stack = select_focused_slices(&mut reader, &slices)?;

    let output = match &args.output {
        Some(path) => path.clone(),
        None => {
            let stem = args
                .file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            args.file.with_file_name(focus_file_name(stem))
        }
    };
    save_hyperstack(&stack, &output)?;

    println!(
        "Wrote {} ({} channels x {} frames)",
        output.display(),
        stack.channels,
        stack.frames
    );
    Ok(())
}
