//! Manual focus selection: collapse a z-stack to one operator-chosen
//! in-focus slice per time frame, keeping all channels.

use crate::assemble::Hyperstack;
use crate::error::{PetriError, Result};
use crate::io::stack::StackReader;

/// Suffix appended to focus-selected output filenames.
pub const FOCUS_SUFFIX: &str = "pFocus";

/// Build a channel x frame hyperstack from one chosen z-slice per frame.
///
/// `slices_per_frame` holds one zero-based slice index for every frame of
/// the source, in frame order.
pub fn select_focused_slices(
    reader: &mut StackReader,
    slices_per_frame: &[usize],
) -> Result<Hyperstack> {
    let frames = reader.frames();
    let channels = reader.channels();
    if slices_per_frame.len() != frames {
        return Err(PetriError::Config(format!(
            "{} slice choices given for {} frames",
            slices_per_frame.len(),
            frames
        )));
    }
    if let Some(&bad) = slices_per_frame.iter().find(|&&s| s >= reader.slices()) {
        return Err(PetriError::Config(format!(
            "slice {} out of range (stack has {})",
            bad + 1,
            reader.slices()
        )));
    }

    let mut planes = Vec::with_capacity(channels * frames);
    for (frame, &slice) in slices_per_frame.iter().enumerate() {
        for channel in 0..channels {
            planes.push(reader.read_plane_z(channel, slice, frame)?);
        }
    }

    Ok(Hyperstack {
        channels,
        frames,
        planes,
        calibration: reader.info().calibration.clone(),
    })
}

/// Output filename for a focus-selected stack.
pub fn focus_file_name(stem: &str) -> String {
    format!("{stem}_{FOCUS_SUFFIX}.tif")
}
