//! ImageJ-style TIFF metadata: a newline-separated key=value block in the
//! ImageDescription tag of the first page, plus X/Y resolution rationals
//! encoding pixels-per-unit.

use std::collections::HashMap;

use crate::plane::Calibration;

/// Dimension metadata carried in an ImageJ description block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackLayout {
    pub channels: usize,
    pub slices: usize,
    pub frames: usize,
}

/// Build the description block for a hyperstack with the given dimensions.
pub fn build_description(channels: usize, frames: usize, unit: &str) -> String {
    format!(
        "ImageJ=1.54f\nimages={}\nchannels={}\nslices=1\nframes={}\nhyperstack=true\nmode=grayscale\nunit={}\n",
        channels * frames,
        channels,
        frames,
        unit
    )
}

/// Description block for a single staged plane.
pub fn build_plane_description(unit: &str) -> String {
    format!("ImageJ=1.54f\nimages=1\nunit={}\n", unit)
}

fn parse_fields(description: &str) -> HashMap<&str, &str> {
    description
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect()
}

/// Extract channel/slice/frame counts from a description block, given the
/// total page count of the file. Missing keys fall back to a single-channel
/// interpretation where every page is one frame.
pub fn parse_layout(description: Option<&str>, pages: usize) -> StackLayout {
    let fields = description.map(parse_fields).unwrap_or_default();
    let get = |key: &str| fields.get(key).and_then(|v| v.parse::<usize>().ok());

    StackLayout {
        channels: get("channels").unwrap_or(1),
        slices: get("slices").unwrap_or(1),
        frames: get("frames").unwrap_or_else(|| {
            let channels = get("channels").unwrap_or(1).max(1);
            pages / channels
        }),
    }
}

/// Extract the calibration unit name from a description block.
pub fn parse_unit(description: &str) -> Option<String> {
    parse_fields(description).get("unit").map(|u| u.to_string())
}

/// Encode a pixel width as a pixels-per-unit resolution rational (n, d).
pub fn resolution_rational(calibration: &Calibration) -> (u32, u32) {
    // XResolution = 1 / pixel_width, stored as n/d with micro precision.
    let n = (1_000_000.0 / calibration.pixel_width).round();
    (n.clamp(1.0, u32::MAX as f64) as u32, 1_000_000)
}

/// Decode a resolution rational back into a pixel width.
pub fn pixel_width_from_rational(n: u32, d: u32) -> Option<f64> {
    if n == 0 || d == 0 {
        return None;
    }
    Some(d as f64 / n as f64)
}
