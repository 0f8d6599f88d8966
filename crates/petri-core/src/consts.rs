/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Lower edge of the fixed brightfield display window. The median-subtracted
/// difference is mapped from [WINDOW_MIN, WINDOW_MAX] onto the full 16-bit
/// range; the window is an empirically chosen contrast band and changing it
/// breaks output parity with previously processed batches.
pub const BRIGHTFIELD_WINDOW_MIN: f32 = -7500.0;

/// Upper edge of the fixed brightfield display window.
pub const BRIGHTFIELD_WINDOW_MAX: f32 = 10_000.0;

/// Flat-field corrected planes are clamped to the 12-bit camera range.
pub const FLAT_FIELD_CLAMP_MAX: f32 = 4095.0;

/// Maximum value representable in a 16-bit plane.
pub const U16_MAX_F: f32 = 65_535.0;

/// Default median filter radius for brightfield correction, in pixels.
/// Roughly 2 um at the 40x acquisition settings the defaults assume.
pub const DEFAULT_MEDIAN_RADIUS: usize = 18;

/// Physical rolling-ball radius for fluorescence background subtraction, in
/// calibration units (1 um). The pixel radius is derived per unit from the
/// pixel size.
pub const ROLLING_BALL_PHYSICAL_RADIUS: f64 = 1.0;

/// Default sigma for the optional brightfield Gaussian blur.
pub const DEFAULT_GAUSSIAN_SIGMA: f32 = 1.0;

/// Name of the per-unit scratch directory holding staged planes.
pub const TEMP_DIR_NAME: &str = "temp_dir";

/// Suffix appended to output filenames for corrected hyperstacks.
pub const PROCESSED_SUFFIX: &str = "FlatFieldCorr";

/// Additional suffix when the Gaussian blur option is enabled.
pub const GAUSSIAN_SUFFIX: &str = "GBlur";
