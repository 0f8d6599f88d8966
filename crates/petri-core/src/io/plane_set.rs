use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::parse::parse_plane_filename;

/// One acquisition unit reconstructed from single-plane files on disk: all
/// sites of one (date, well), with sites becoming the frame axis of the
/// output hyperstack.
#[derive(Clone, Debug)]
pub struct PlaneSet {
    /// Output stem, `<date>_<well>`.
    pub name: String,
    /// Directory the planes were found in.
    pub dir: PathBuf,
    /// Sorted site labels, one per frame.
    pub sites: Vec<String>,
    /// Plane file paths, indexed `[channel][frame]`.
    pub paths: Vec<Vec<PathBuf>>,
}

impl PlaneSet {
    pub fn channels(&self) -> usize {
        self.paths.len()
    }

    pub fn frames(&self) -> usize {
        self.sites.len()
    }
}

/// Scan a directory for single-plane TIFFs following the filename convention
/// and group them into per-well units with `channels` channels each.
///
/// Files that fail to parse are logged and skipped; wells missing a channel
/// for any site are logged and dropped as a whole.
pub fn discover_plane_sets(dir: &Path, channels: usize) -> Result<Vec<PlaneSet>> {
    // (date, well) -> site -> channel -> path
    let mut wells: BTreeMap<(String, String), BTreeMap<String, BTreeMap<usize, PathBuf>>> =
        BTreeMap::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_tiff_extension(&path) {
            continue;
        }
        let meta = match parse_plane_filename(&path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unparsable file");
                continue;
            }
        };
        wells
            .entry((meta.date, meta.well))
            .or_default()
            .entry(meta.site)
            .or_default()
            .insert(meta.channel, path);
    }

    let mut sets = Vec::new();
    'wells: for ((date, well), site_map) in wells {
        let name = format!("{date}_{well}");

        let mut sites: Vec<String> = site_map.keys().cloned().collect();
        // Numeric site order where possible; "s10" sorts after "s2".
        sites.sort_by_key(|s| (s.parse::<u32>().ok(), s.clone()));

        let mut paths: Vec<Vec<PathBuf>> = vec![Vec::with_capacity(sites.len()); channels];
        for site in &sites {
            let channel_map = &site_map[site];
            for ch in 0..channels {
                let Some(path) = channel_map.get(&ch) else {
                    warn!(
                        unit = %name,
                        site = %site,
                        channel = ch,
                        "Skipping well with incomplete channel set"
                    );
                    continue 'wells;
                };
                paths[ch].push(path.clone());
            }
            if let Some(&extra) = channel_map.keys().find(|&&c| c >= channels) {
                warn!(
                    unit = %name,
                    site = %site,
                    channel = extra,
                    "Skipping well with more channels than configured"
                );
                continue 'wells;
            }
        }

        sets.push(PlaneSet {
            name,
            dir: dir.to_path_buf(),
            sites,
            paths,
        });
    }

    Ok(sets)
}

fn has_tiff_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| {
            e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff")
        })
}
