//! Reassembly of staged planes into a channel x frame hyperstack.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tiff::encoder::TiffEncoder;

use crate::error::{PetriError, Result};
use crate::io::imagej;
use crate::io::plane_io::{load_plane, write_gray16_page};
use crate::plane::{Calibration, Plane};

/// An assembled channel x frame image volume (fixed single z), planes stored
/// channel-fastest: page p = frame * channels + channel.
pub struct Hyperstack {
    pub channels: usize,
    pub frames: usize,
    pub planes: Vec<Plane>,
    pub calibration: Calibration,
}

impl Hyperstack {
    pub fn plane(&self, channel: usize, frame: usize) -> &Plane {
        &self.planes[frame * self.channels + channel]
    }
}

/// Read staged planes back in (channel, frame) order and merge them into one
/// hyperstack.
///
/// Every channel must have staged the same number of frames; the original
/// acquisition scripts silently trusted this, here it is an error. Pixel
/// size is re-read from the first staged plane of channel 0 and imposed on
/// the result, since per-plane processing is not assumed to preserve it.
pub fn assemble(staged_paths_by_channel: &[Vec<PathBuf>]) -> Result<Hyperstack> {
    let Some(first_channel) = staged_paths_by_channel.first() else {
        return Err(PetriError::EmptySequence);
    };
    if first_channel.is_empty() {
        return Err(PetriError::EmptySequence);
    }

    let channels = staged_paths_by_channel.len();
    let frames = first_channel.len();
    for (channel, paths) in staged_paths_by_channel.iter().enumerate() {
        if paths.len() != frames {
            return Err(PetriError::DimensionMismatch {
                channel,
                frames: paths.len(),
                expected: frames,
            });
        }
    }

    let mut by_channel: Vec<Vec<Plane>> = Vec::with_capacity(channels);
    let mut dims: Option<(usize, usize)> = None;
    for paths in staged_paths_by_channel {
        let mut channel_planes = Vec::with_capacity(frames);
        for path in paths {
            let plane = load_plane(path)?;
            let plane_dims = plane.data.dim();
            match dims {
                None => dims = Some(plane_dims),
                Some(expected) if expected != plane_dims => {
                    return Err(PetriError::Pipeline(format!(
                        "staged plane {} is {}x{}, expected {}x{}",
                        path.display(),
                        plane_dims.1,
                        plane_dims.0,
                        expected.1,
                        expected.0
                    )))
                }
                Some(_) => {}
            }
            channel_planes.push(plane);
        }
        by_channel.push(channel_planes);
    }

    let calibration = load_plane(&staged_paths_by_channel[0][0])?.calibration;

    // Interleave channel-fastest to match the output page order.
    let mut iters: Vec<_> = by_channel.into_iter().map(Vec::into_iter).collect();
    let mut planes = Vec::with_capacity(channels * frames);
    for _ in 0..frames {
        for iter in iters.iter_mut() {
            planes.push(iter.next().expect("frame counts verified above"));
        }
    }

    Ok(Hyperstack {
        channels,
        frames,
        planes,
        calibration,
    })
}

/// Write a hyperstack as a multi-page Gray16 TIFF. The first page carries
/// the ImageJ dimension description and resolution tags; readers take the
/// layout from there.
pub fn save_hyperstack(stack: &Hyperstack, path: &Path) -> Result<()> {
    if stack.planes.len() != stack.channels * stack.frames {
        return Err(PetriError::Pipeline(format!(
            "hyperstack holds {} planes, declared {}c x {}t",
            stack.planes.len(),
            stack.channels,
            stack.frames
        )));
    }

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let description =
        imagej::build_description(stack.channels, stack.frames, &stack.calibration.unit);

    for (i, plane) in stack.planes.iter().enumerate() {
        let (desc, cal) = if i == 0 {
            (Some(description.as_str()), Some(&stack.calibration))
        } else {
            (None, None)
        };
        write_gray16_page(&mut encoder, &plane.data, desc, cal)?;
    }
    Ok(())
}
