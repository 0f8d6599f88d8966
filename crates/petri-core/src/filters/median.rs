use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Apply a median filter with a circular kernel of the given pixel radius.
///
/// At the image border only in-bounds pixels contribute, so the window
/// shrinks instead of replicating edge values. Radius 0 returns a copy.
/// Parallelizes at the row level for images >= 256x256.
pub fn median_filter(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    if radius == 0 {
        return data.clone();
    }

    let offsets = kernel_offsets(radius);
    let (h, w) = data.dim();

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut window = Vec::with_capacity(offsets.len());
                (0..w)
                    .map(|col| median_at(data, row, col, &offsets, &mut window))
                    .collect()
            })
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
        let mut window = Vec::with_capacity(offsets.len());
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = median_at(data, row, col, &offsets, &mut window);
            }
        }
        result
    }
}

/// Offsets of a filled circle of the given radius, dx*dx + dy*dy <= r*r.
fn kernel_offsets(radius: usize) -> Vec<(isize, isize)> {
    let r = radius as isize;
    let r2 = r * r;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                offsets.push((dy, dx));
            }
        }
    }
    offsets
}

fn median_at(
    data: &Array2<f32>,
    row: usize,
    col: usize,
    offsets: &[(isize, isize)],
    window: &mut Vec<f32>,
) -> f32 {
    let (h, w) = data.dim();
    window.clear();
    for &(dy, dx) in offsets {
        let r = row as isize + dy;
        let c = col as isize + dx;
        if r >= 0 && r < h as isize && c >= 0 && c < w as isize {
            window.push(data[[r as usize, c as usize]]);
        }
    }
    compute_median(window)
}

/// Median via `select_nth_unstable` for O(n) without a full sort.
fn compute_median(values: &mut [f32]) -> f32 {
    let n = values.len();
    if n == 1 {
        values[0]
    } else if n % 2 == 1 {
        let mid = n / 2;
        *values
            .select_nth_unstable_by(mid, |a, b| a.total_cmp(b))
            .1
    } else {
        let mid = n / 2;
        values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        values[..mid].select_nth_unstable_by(mid - 1, |a, b| a.total_cmp(b));
        (values[mid - 1] + values[mid]) / 2.0
    }
}
