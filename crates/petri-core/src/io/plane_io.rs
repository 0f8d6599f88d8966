use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray16;
use tiff::encoder::{Rational, TiffEncoder};
use tiff::tags::{ResolutionUnit, Tag};

use crate::error::{PetriError, Result};
use crate::io::imagej;
use crate::plane::{Calibration, Plane};

/// Save a plane as a single-page 16-bit grayscale TIFF with calibration
/// embedded as ImageJ-style metadata.
pub fn save_plane(plane: &Plane, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let description = imagej::build_plane_description(&plane.calibration.unit);
    write_gray16_page(
        &mut encoder,
        &plane.data,
        Some(&description),
        Some(&plane.calibration),
    )?;
    Ok(())
}

/// Append one Gray16 page to an open encoder, optionally tagging it with a
/// description block and resolution rationals.
pub(crate) fn write_gray16_page<W: Write + Seek>(
    encoder: &mut TiffEncoder<W>,
    data: &Array2<f32>,
    description: Option<&str>,
    calibration: Option<&Calibration>,
) -> Result<()> {
    let (h, w) = data.dim();
    let pixels: Vec<u16> = data
        .iter()
        .map(|&v| v.clamp(0.0, 65_535.0) as u16)
        .collect();

    let mut image = encoder.new_image::<Gray16>(w as u32, h as u32)?;
    if let Some(desc) = description {
        image.encoder().write_tag(Tag::ImageDescription, desc)?;
    }
    if let Some(cal) = calibration {
        let (n, d) = imagej::resolution_rational(cal);
        // ResolutionUnit "none": the real unit lives in the description.
        image.resolution_unit(ResolutionUnit::None);
        image.x_resolution(Rational { n, d });
        image.y_resolution(Rational { n, d });
    }
    image.write_data(&pixels)?;
    Ok(())
}

/// Load a single-page TIFF plane written by `save_plane`, restoring its
/// calibration from the embedded metadata.
pub fn load_plane(path: &Path) -> Result<Plane> {
    let file = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(file)?;
    let calibration = read_calibration(&mut decoder).unwrap_or_default();
    let (data, bit_depth) = decode_current_page(&mut decoder)?;
    Ok(Plane::new(data, bit_depth).with_calibration(calibration))
}

/// Decode the page the decoder currently points at into raw-count f32 data.
pub(crate) fn decode_current_page<R: std::io::Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Result<(Array2<f32>, u8)> {
    let (w, h) = decoder.dimensions()?;
    let (w, h) = (w as usize, h as usize);

    let (buf, bit_depth) = match decoder.read_image()? {
        DecodingResult::U8(buf) => (buf.into_iter().map(|v| v as f32).collect::<Vec<_>>(), 8),
        DecodingResult::U16(buf) => (buf.into_iter().map(|v| v as f32).collect::<Vec<_>>(), 16),
        _ => {
            return Err(PetriError::InvalidStack(
                "only 8-bit and 16-bit grayscale pages are supported".into(),
            ))
        }
    };

    if buf.len() != w * h {
        return Err(PetriError::InvalidStack(format!(
            "page data has {} samples, expected {}x{}",
            buf.len(),
            w,
            h
        )));
    }

    let data = Array2::from_shape_vec((h, w), buf).expect("pixel buffer matches dimensions");
    Ok((data, bit_depth))
}

/// Read pixel size and unit from the tags of the current page, if present.
pub(crate) fn read_calibration<R: std::io::Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Option<Calibration> {
    let pixel_width = match decoder.find_tag(Tag::XResolution).ok()? {
        Some(Value::Rational(n, d)) => imagej::pixel_width_from_rational(n, d)?,
        _ => return None,
    };
    let unit = match decoder.find_tag(Tag::ImageDescription).ok()? {
        Some(Value::Ascii(desc)) => imagej::parse_unit(&desc)?,
        _ => return None,
    };
    Some(Calibration::new(pixel_width, unit))
}

/// Load a flat-field reference image, widened to 16-bit grayscale. Any
/// format the `image` crate decodes is accepted.
pub fn load_reference(path: &Path) -> Result<Plane> {
    let img = image::open(path).map_err(|e| {
        PetriError::FlatField(format!(
            "cannot open reference image {}: {}",
            path.display(),
            e
        ))
    })?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let buf: Vec<f32> = gray.into_raw().into_iter().map(|v| v as f32).collect();
    let data =
        Array2::from_shape_vec((h as usize, w as usize), buf).expect("pixel buffer matches dimensions");
    Ok(Plane::new(data, 16))
}
