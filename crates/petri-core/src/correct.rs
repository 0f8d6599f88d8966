//! Per-plane corrections. Each function is a pure transform of
//! (plane, parameters) -> plane; no shared state, safe to apply in any
//! order across (channel, frame, location).

use crate::consts::{
    BRIGHTFIELD_WINDOW_MAX, BRIGHTFIELD_WINDOW_MIN, FLAT_FIELD_CLAMP_MAX,
    ROLLING_BALL_PHYSICAL_RADIUS, U16_MAX_F,
};
use crate::error::{PetriError, Result};
use crate::filters::gaussian_blur::gaussian_blur;
use crate::filters::median::median_filter;
use crate::filters::rolling_ball::subtract_background;
use crate::plane::Plane;

/// Brightfield shading correction: subtract a median-smoothed copy, then map
/// the floating-point difference through the fixed display window
/// [-7500, 10000] onto the full 16-bit range.
///
/// Brightfield illumination varies slowly across the field, so subtracting a
/// locally smoothed copy removes shading while keeping cell-boundary detail.
/// The window is a fixed contrast band, not derived from the data.
pub fn brightfield(plane: &Plane, median_radius: usize) -> Plane {
    let smoothed = median_filter(&plane.data, median_radius);
    let mut diff = &plane.data - &smoothed;

    let span = BRIGHTFIELD_WINDOW_MAX - BRIGHTFIELD_WINDOW_MIN;
    diff.mapv_inplace(|v| {
        ((v - BRIGHTFIELD_WINDOW_MIN) / span * U16_MAX_F)
            .clamp(0.0, U16_MAX_F)
            .round()
    });

    Plane::new(diff, 16).with_calibration(plane.calibration.clone())
}

/// Fluorescence background subtraction with a rolling ball of fixed physical
/// radius (1 um), so the pixel radius follows the magnification.
pub fn fluorescence(plane: &Plane, pixel_width: f64) -> Plane {
    let radius = rolling_ball_radius(pixel_width);
    let corrected = subtract_background(&plane.data, radius);
    Plane::new(corrected, plane.bit_depth).with_calibration(plane.calibration.clone())
}

/// Rolling-ball pixel radius equivalent to 1 um at the given pixel size.
pub fn rolling_ball_radius(pixel_width: f64) -> usize {
    (ROLLING_BALL_PHYSICAL_RADIUS / pixel_width).round().max(1.0) as usize
}

/// Flat-field (illumination) correction: divide by the reference plane,
/// rescale by the reference mean to restore the original intensity scale,
/// clamp to the 12-bit camera range, narrow to 16-bit.
///
/// A zero reference pixel saturates to the clamp maximum rather than
/// poisoning the plane with non-finite values.
pub fn flat_field(plane: &Plane, reference: &Plane) -> Result<Plane> {
    if plane.data.dim() != reference.data.dim() {
        return Err(PetriError::FlatField(format!(
            "reference is {}x{} but plane is {}x{}",
            reference.width(),
            reference.height(),
            plane.width(),
            plane.height()
        )));
    }

    let mean = reference.mean() as f32;
    let mut corrected = plane.data.clone();
    corrected.zip_mut_with(&reference.data, |p, &r| {
        *p = if r == 0.0 {
            FLAT_FIELD_CLAMP_MAX
        } else {
            (*p / r * mean).clamp(0.0, FLAT_FIELD_CLAMP_MAX).round()
        };
    });

    Ok(Plane::new(corrected, 16).with_calibration(plane.calibration.clone()))
}

/// Optional post-correction Gaussian blur for the brightfield channel.
pub fn gaussian(plane: &Plane, sigma: f32) -> Plane {
    let blurred = gaussian_blur(&plane.data, sigma);
    Plane::new(blurred, plane.bit_depth).with_calibration(plane.calibration.clone())
}
