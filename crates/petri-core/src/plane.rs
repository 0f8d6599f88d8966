use ndarray::Array2;

/// Spatial calibration of a plane. A single scalar pixel width applies to
/// both axes (square pixels).
#[derive(Clone, Debug, PartialEq)]
pub struct Calibration {
    /// Physical width of one pixel, in `unit`s.
    pub pixel_width: f64,
    /// Unit name, e.g. "um".
    pub unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            unit: "pixel".to_string(),
        }
    }
}

impl Calibration {
    pub fn new(pixel_width: f64, unit: impl Into<String>) -> Self {
        Self {
            pixel_width,
            unit: unit.into(),
        }
    }

    /// Whether this carries real physical scaling (anything but the default).
    pub fn is_calibrated(&self) -> bool {
        self.unit != "pixel"
    }
}

/// A single grayscale image plane at one (channel, frame, location)
/// coordinate. Pixel values are raw intensity counts stored as f32 --
/// deliberately NOT normalized, because the correction windows
/// (brightfield rescale, flat-field clamp) are defined in count space.
#[derive(Clone, Debug)]
pub struct Plane {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub bit_depth: u8,
    /// Pixel size metadata, propagated to staged and output files.
    pub calibration: Calibration,
}

impl Plane {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            bit_depth,
            calibration: Calibration::default(),
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Mean intensity over all pixels. Zero for an empty plane.
    pub fn mean(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / n as f64
    }
}
