use std::path::Path;

use crate::error::{PetriError, Result};

/// Acquisition metadata encoded in a plate-reader filename.
///
/// The convention is `<date>_<well>_s<site>_w<channel>[_...].tif`, e.g.
/// `240101_B02_s1_w1.tif`. Channel tokens are 1-based on disk and converted
/// to 0-based indices here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaneMeta {
    pub date: String,
    pub well: String,
    pub site: String,
    pub channel: usize,
}

/// Parse acquisition metadata out of a single-plane filename.
///
/// Trailing tokens beyond the fourth are ignored, matching the acquisition
/// software which appends thumbnail markers there.
pub fn parse_plane_filename(path: &Path) -> Result<PlaneMeta> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| parse_error(&name, "not a valid file name"))?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 4 {
        return Err(parse_error(
            &name,
            &format!("expected 4 '_'-separated tokens, found {}", parts.len()),
        ));
    }

    let site = parts[2]
        .strip_prefix('s')
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| parse_error(&name, "site token must look like s<N>"))?;

    let channel_1based: usize = parts[3]
        .strip_prefix('w')
        .and_then(|rest| rest.parse().ok())
        .ok_or_else(|| parse_error(&name, "channel token must look like w<N>"))?;
    if channel_1based == 0 {
        return Err(parse_error(&name, "channel token w0 is out of range"));
    }

    Ok(PlaneMeta {
        date: parts[0].to_string(),
        well: parts[1].to_string(),
        site: site.to_string(),
        channel: channel_1based - 1,
    })
}

fn parse_error(name: &str, reason: &str) -> PetriError {
    PetriError::Parse {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
