use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Estimate a smooth illumination background by rolling a ball of the given
/// pixel radius under the intensity surface: a grayscale opening with a
/// ball-shaped structuring element (erosion by the ball followed by
/// dilation). The ball never enters peaks narrower than its radius, so
/// foreground objects survive the subtraction.
pub fn rolling_ball_background(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let ball = ball_offsets(radius);
    let eroded = transform(data, &ball, erode_at);
    transform(&eroded, &ball, dilate_at)
}

/// Subtract the rolling-ball background, clamping the result at zero.
pub fn subtract_background(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let background = rolling_ball_background(data, radius);
    let mut result = data - &background;
    result.mapv_inplace(|v| v.max(0.0));
    result
}

/// Offsets and ball heights within the structuring element:
/// z = sqrt(r*r - dx*dx - dy*dy) for dx*dx + dy*dy <= r*r.
fn ball_offsets(radius: usize) -> Vec<(isize, isize, f32)> {
    let r = radius as isize;
    let r2 = (r * r) as f32;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 <= r2 {
                offsets.push((dy, dx, (r2 - d2).sqrt()));
            }
        }
    }
    offsets
}

fn erode_at(data: &Array2<f32>, row: usize, col: usize, ball: &[(isize, isize, f32)]) -> f32 {
    let (h, w) = data.dim();
    let mut min = f32::INFINITY;
    for &(dy, dx, z) in ball {
        let r = (row as isize + dy).clamp(0, h as isize - 1) as usize;
        let c = (col as isize + dx).clamp(0, w as isize - 1) as usize;
        min = min.min(data[[r, c]] - z);
    }
    min
}

fn dilate_at(data: &Array2<f32>, row: usize, col: usize, ball: &[(isize, isize, f32)]) -> f32 {
    let (h, w) = data.dim();
    let mut max = f32::NEG_INFINITY;
    for &(dy, dx, z) in ball {
        let r = (row as isize + dy).clamp(0, h as isize - 1) as usize;
        let c = (col as isize + dx).clamp(0, w as isize - 1) as usize;
        max = max.max(data[[r, c]] + z);
    }
    max
}

fn transform(
    data: &Array2<f32>,
    ball: &[(isize, isize, f32)],
    op: fn(&Array2<f32>, usize, usize, &[(isize, isize, f32)]) -> f32,
) -> Array2<f32> {
    let (h, w) = data.dim();

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| op(data, row, col, ball)).collect())
            .collect();

        let mut result = Array2::<f32>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        let mut result = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = op(data, row, col, ball);
            }
        }
        result
    }
}
