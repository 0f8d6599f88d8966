use approx::assert_abs_diff_eq;
use ndarray::Array2;

use petri_core::filters::gaussian_blur::gaussian_blur;
use petri_core::filters::median::median_filter;
use petri_core::filters::rolling_ball::{rolling_ball_background, subtract_background};

#[test]
fn test_median_constant_plane_unchanged() {
    let data = Array2::<f32>::from_elem((9, 9), 42.0);
    let filtered = median_filter(&data, 2);
    assert_eq!(filtered, data);
}

#[test]
fn test_median_removes_impulse() {
    let mut data = Array2::<f32>::zeros((9, 9));
    data[[4, 4]] = 1000.0;
    let filtered = median_filter(&data, 1);
    assert_eq!(filtered[[4, 4]], 0.0);
}

#[test]
fn test_median_radius_zero_is_identity() {
    let data = Array2::from_shape_fn((5, 7), |(r, c)| (r * 7 + c) as f32);
    assert_eq!(median_filter(&data, 0), data);
}

#[test]
fn test_gaussian_uniform_plane_unchanged() {
    let data = Array2::<f32>::from_elem((12, 12), 100.0);
    let blurred = gaussian_blur(&data, 1.5);
    for &v in blurred.iter() {
        assert_abs_diff_eq!(v, 100.0, epsilon = 1e-3);
    }
}

#[test]
fn test_gaussian_zero_sigma_is_identity() {
    let data = Array2::from_shape_fn((6, 6), |(r, c)| (r + c) as f32);
    assert_eq!(gaussian_blur(&data, 0.0), data);
}

#[test]
fn test_gaussian_spreads_impulse() {
    let mut data = Array2::<f32>::zeros((11, 11));
    data[[5, 5]] = 100.0;
    let blurred = gaussian_blur(&data, 1.0);
    assert!(blurred[[5, 5]] < 100.0);
    assert!(blurred[[5, 4]] > 0.0);
    // Total intensity preserved away from edges.
    let total: f32 = blurred.iter().sum();
    assert_abs_diff_eq!(total, 100.0, epsilon = 1e-2);
}

#[test]
fn test_rolling_ball_flat_background_is_exact() {
    let data = Array2::<f32>::from_elem((15, 15), 50.0);
    let background = rolling_ball_background(&data, 3);
    for &v in background.iter() {
        assert_abs_diff_eq!(v, 50.0, epsilon = 1e-4);
    }
    let subtracted = subtract_background(&data, 3);
    for &v in subtracted.iter() {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-4);
    }
}

#[test]
fn test_rolling_ball_preserves_narrow_peak() {
    let mut data = Array2::<f32>::from_elem((15, 15), 10.0);
    data[[7, 7]] = 110.0;
    let subtracted = subtract_background(&data, 3);
    // The ball cannot enter a single-pixel peak, so the peak survives.
    assert!(subtracted[[7, 7]] > 90.0);
    assert_abs_diff_eq!(subtracted[[0, 0]], 0.0, epsilon = 1e-4);
}

#[test]
fn test_subtract_background_never_negative() {
    let data = Array2::from_shape_fn((10, 10), |(r, c)| ((r * 13 + c * 7) % 50) as f32);
    let subtracted = subtract_background(&data, 2);
    assert!(subtracted.iter().all(|&v| v >= 0.0));
}
