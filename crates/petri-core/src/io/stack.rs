use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tiff::decoder::ifd::Value;
use tiff::decoder::Decoder;
use tiff::tags::Tag;

use crate::error::{PetriError, Result};
use crate::io::imagej;
use crate::io::plane_io::{decode_current_page, read_calibration};
use crate::plane::{Calibration, Plane};

/// Metadata of an opened acquisition stack.
#[derive(Clone, Debug)]
pub struct StackInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pages: usize,
    pub channels: usize,
    pub slices: usize,
    pub frames: usize,
    pub bit_depth: u8,
    pub calibration: Calibration,
}

/// Reader for a multi-page grayscale TIFF acquisition, interpreted as an
/// ImageJ hyperstack (channel-fastest page order). Pages are decoded one at
/// a time by seeking, so memory use is one plane regardless of stack size.
pub struct StackReader {
    decoder: Decoder<BufReader<File>>,
    info: StackInfo,
}

impl StackReader {
    /// Open a stack and parse its dimension metadata.
    pub fn open(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut decoder = Decoder::new(file)?;

        let (width, height) = decoder.dimensions()?;
        let bit_depth = match decoder.colortype()? {
            tiff::ColorType::Gray(n) if n == 8 || n == 16 => n,
            other => {
                return Err(PetriError::InvalidStack(format!(
                    "unsupported color type {other:?} (expected 8- or 16-bit grayscale)"
                )))
            }
        };

        let description = match decoder.find_tag(Tag::ImageDescription)? {
            Some(Value::Ascii(desc)) => Some(desc),
            _ => None,
        };
        let calibration = read_calibration(&mut decoder).unwrap_or_default();

        let mut pages = 1;
        while decoder.more_images() {
            decoder.next_image()?;
            pages += 1;
        }
        decoder.seek_to_image(0)?;

        let layout = imagej::parse_layout(description.as_deref(), pages);
        if layout.channels == 0
            || layout.slices == 0
            || layout.channels * layout.slices * layout.frames != pages
        {
            return Err(PetriError::InvalidStack(format!(
                "declared {}c x {}z x {}t does not match {} pages",
                layout.channels, layout.slices, layout.frames, pages
            )));
        }

        let info = StackInfo {
            path: path.to_path_buf(),
            width,
            height,
            pages,
            channels: layout.channels,
            slices: layout.slices,
            frames: layout.frames,
            bit_depth,
            calibration,
        };
        Ok(Self { decoder, info })
    }

    pub fn info(&self) -> &StackInfo {
        &self.info
    }

    pub fn channels(&self) -> usize {
        self.info.channels
    }

    pub fn slices(&self) -> usize {
        self.info.slices
    }

    pub fn frames(&self) -> usize {
        self.info.frames
    }

    /// Decode the plane at (channel, frame), zero-based. Z-stacks yield
    /// their first slice; use `read_plane_z` to pick another.
    pub fn read_plane(&mut self, channel: usize, frame: usize) -> Result<Plane> {
        self.read_plane_z(channel, 0, frame)
    }

    /// Decode the plane at (channel, slice, frame), all zero-based. Pages
    /// follow ImageJ "xyczt" order: channel fastest, then slice, then frame.
    pub fn read_plane_z(&mut self, channel: usize, slice: usize, frame: usize) -> Result<Plane> {
        if channel >= self.info.channels || slice >= self.info.slices || frame >= self.info.frames
        {
            return Err(PetriError::PlaneIndexOutOfRange {
                index: (frame * self.info.slices + slice) * self.info.channels + channel,
                total: self.info.pages,
            });
        }
        let page = (frame * self.info.slices + slice) * self.info.channels + channel;
        self.decoder.seek_to_image(page)?;
        let (data, bit_depth) = decode_current_page(&mut self.decoder)?;
        Ok(Plane::new(data, bit_depth).with_calibration(self.info.calibration.clone()))
    }
}
