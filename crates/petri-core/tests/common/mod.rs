use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::Array2;
use tiff::encoder::colortype::Gray16;
use tiff::encoder::{Rational, TiffEncoder};
use tiff::tags::Tag;

use petri_core::plane::{Calibration, Plane};

/// Build a plane from a per-pixel function, calibrated in microns.
pub fn make_plane(
    width: usize,
    height: usize,
    pixel_width: f64,
    f: impl Fn(usize, usize) -> f32,
) -> Plane {
    let data = Array2::from_shape_fn((height, width), |(row, col)| f(row, col));
    Plane::new(data, 16).with_calibration(Calibration::new(pixel_width, "um"))
}

/// Build a plane where every pixel has the same value.
pub fn uniform_plane(width: usize, height: usize, value: f32) -> Plane {
    make_plane(width, height, 1.0, |_, _| value)
}

/// Hand-build a multi-page Gray16 TIFF with an ImageJ hyperstack description,
/// independent of the crate's own writer. Page p holds
/// (frame = p / channels, channel = p % channels); each pixel carries
/// `value_fn(channel, frame)`.
pub fn write_hyperstack_tiff(
    path: &Path,
    channels: usize,
    frames: usize,
    width: usize,
    height: usize,
    pixel_width: f64,
    value_fn: impl Fn(usize, usize) -> u16,
) {
    write_z_hyperstack_tiff(path, channels, 1, frames, width, height, pixel_width, |c, _, t| {
        value_fn(c, t)
    });
}

/// Z-aware variant: page order is channel-fastest, then slice, then frame;
/// each pixel carries `value_fn(channel, slice, frame)`.
#[allow(clippy::too_many_arguments)]
pub fn write_z_hyperstack_tiff(
    path: &Path,
    channels: usize,
    slices: usize,
    frames: usize,
    width: usize,
    height: usize,
    pixel_width: f64,
    value_fn: impl Fn(usize, usize, usize) -> u16,
) {
    let file = BufWriter::new(File::create(path).expect("create test stack"));
    let mut encoder = TiffEncoder::new(file).expect("tiff encoder");

    for page in 0..channels * slices * frames {
        let channel = page % channels;
        let slice = (page / channels) % slices;
        let frame = page / (channels * slices);
        let pixels = vec![value_fn(channel, slice, frame); width * height];

        let mut image = encoder
            .new_image::<Gray16>(width as u32, height as u32)
            .expect("new page");
        if page == 0 {
            let description = format!(
                "ImageJ=1.54f\nimages={}\nchannels={}\nslices={}\nframes={}\nhyperstack=true\nunit=um\n",
                channels * slices * frames,
                channels,
                slices,
                frames
            );
            image
                .encoder()
                .write_tag(Tag::ImageDescription, description.as_str())
                .expect("description tag");
            let n = (1_000_000.0 / pixel_width).round() as u32;
            image
                .encoder()
                .write_tag(Tag::XResolution, Rational { n, d: 1_000_000 })
                .expect("x resolution tag");
            image
                .encoder()
                .write_tag(Tag::YResolution, Rational { n, d: 1_000_000 })
                .expect("y resolution tag");
            image
                .encoder()
                .write_tag(Tag::ResolutionUnit, 1u16)
                .expect("resolution unit tag");
        }
        image.write_data(&pixels).expect("write page");
    }
}
