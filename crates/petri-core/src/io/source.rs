use std::path::{Path, PathBuf};

use crate::error::{PetriError, Result};
use crate::io::plane_io::load_plane;
use crate::io::plane_set::PlaneSet;
use crate::io::stack::StackReader;
use crate::plane::Plane;

/// One opened source of planes: either a multi-page stack file or a grouped
/// set of single-plane files. Both decode one plane at a time.
///
/// Locations (fields of view) are a property of the container format; the
/// TIFF-backed sources carry exactly one, but consumers index by location so
/// multi-position readers can slot in without touching the pipeline.
pub enum AcquisitionUnit {
    Stack(StackReader),
    Planes(PlaneSet),
}

impl AcquisitionUnit {
    pub fn open_stack(path: &Path) -> Result<Self> {
        Ok(Self::Stack(StackReader::open(path)?))
    }

    pub fn from_plane_set(set: PlaneSet) -> Self {
        Self::Planes(set)
    }

    pub fn locations(&self) -> usize {
        1
    }

    pub fn channels(&self) -> usize {
        match self {
            Self::Stack(reader) => reader.channels(),
            Self::Planes(set) => set.channels(),
        }
    }

    pub fn frames(&self) -> usize {
        match self {
            Self::Stack(reader) => reader.frames(),
            Self::Planes(set) => set.frames(),
        }
    }

    /// Directory the unit lives in; staging and default output go here.
    pub fn dir(&self) -> PathBuf {
        match self {
            Self::Stack(reader) => reader
                .info()
                .path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
            Self::Planes(set) => set.dir.clone(),
        }
    }

    /// Output filename stem for this unit.
    pub fn stem(&self) -> String {
        match self {
            Self::Stack(reader) => reader
                .info()
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
                .to_string(),
            Self::Planes(set) => set.name.clone(),
        }
    }

    pub fn read_plane(&mut self, location: usize, channel: usize, frame: usize) -> Result<Plane> {
        if location >= self.locations() {
            return Err(PetriError::PlaneIndexOutOfRange {
                index: location,
                total: self.locations(),
            });
        }
        match self {
            Self::Stack(reader) => reader.read_plane(channel, frame),
            Self::Planes(set) => {
                let path = set
                    .paths
                    .get(channel)
                    .and_then(|frames| frames.get(frame))
                    .ok_or(PetriError::PlaneIndexOutOfRange {
                        index: frame * set.channels() + channel,
                        total: set.channels() * set.frames(),
                    })?;
                load_plane(path)
            }
        }
    }
}
