use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MEDIAN_RADIUS;
use crate::plan::ChannelPlan;

/// Full description of one preprocessing batch.
///
/// Inputs may be stack files (one unit each) or directories of single-plane
/// files following the filename convention (one unit per well).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    pub inputs: Vec<PathBuf>,

    /// Where outputs are written; defaults to each unit's own directory.
    pub output_dir: Option<PathBuf>,

    pub plan: ChannelPlan,

    /// Median filter radius for brightfield correction, in pixels.
    #[serde(default = "default_median_radius")]
    pub median_radius: usize,

    /// Sigma for the optional Gaussian blur of the brightfield channel.
    /// None disables the blur.
    #[serde(default)]
    pub gaussian_sigma: Option<f32>,

    /// Override the pixel size read from the source files. Required for
    /// plane-set inputs whose files carry no calibration.
    #[serde(default)]
    pub pixel_width: Option<f64>,

    /// Unit name for `pixel_width`, e.g. "um".
    #[serde(default)]
    pub pixel_unit: Option<String>,
}

fn default_median_radius() -> usize {
    DEFAULT_MEDIAN_RADIUS
}
