use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::consts::TEMP_DIR_NAME;
use crate::error::Result;
use crate::io::plane_io::save_plane;
use crate::plane::Plane;

/// Disk-backed scratch area for corrected planes, decoupling peak memory
/// from acquisition size: each plane is written out right after correction
/// and read back only during assembly.
///
/// Files are namespaced by a per-batch random token, so re-runs or
/// concurrent batches over the same directory never collide.
pub struct StagingStore {
    dir: PathBuf,
    token: String,
}

impl StagingStore {
    /// Create (or reuse) `<unit_dir>/temp_dir/` and draw a fresh batch token.
    pub fn create(unit_dir: &Path) -> Result<Self> {
        let dir = unit_dir.join(TEMP_DIR_NAME);
        std::fs::create_dir_all(&dir)?;
        let token = Uuid::new_v4().to_string();
        debug!(token = %token, dir = %dir.display(), "Staging store ready");
        Ok(Self { dir, token })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Write one corrected plane. `frame` is 1-based in the filename,
    /// matching the acquisition software's frame numbering; `channel` and
    /// `location` are 0-based.
    pub fn stage(
        &self,
        frame: usize,
        channel: usize,
        location: usize,
        plane: &Plane,
    ) -> Result<PathBuf> {
        let path = self.dir.join(format!(
            "{}_frame{}_channel{}_Loc{}.tif",
            self.token, frame, channel, location
        ));
        save_plane(plane, &path)?;
        Ok(path)
    }

    /// Delete every staged file of this batch for the given location.
    ///
    /// Idempotent: a second call finds nothing to delete. Individual delete
    /// failures are logged and skipped so cleanup always makes as much
    /// progress as it can.
    pub fn cleanup(&self, location: usize) {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        let suffix = format!("_Loc{}.tif", location);
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&self.token) && name.ends_with(&suffix) {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    warn!(file = %entry.path().display(), error = %e, "Could not delete staged file");
                }
            }
        }
    }

    /// Remove the scratch directory if nothing is left in it. Never forced:
    /// files from other batches stay untouched.
    pub fn remove_dir_if_empty(&self) {
        let is_empty = std::fs::read_dir(&self.dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            if let Err(e) = std::fs::remove_dir(&self.dir) {
                warn!(dir = %self.dir.display(), error = %e, "Could not remove scratch directory");
            }
        }
    }
}
