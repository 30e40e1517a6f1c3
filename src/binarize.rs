use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, Luma};
use imageproc::contrast::{ThresholdType, threshold as ip_threshold};

use crate::bitmap::Bitmap;
use crate::{VectraceError, VectraceResult};

/// Read and decode a raster from disk.
pub fn load_image(path: &Path) -> VectraceResult<DynamicImage> {
    if !path.exists() {
        return Err(VectraceError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| VectraceError::invalid_image(format!("{}: {e}", path.display())))?;
    Ok(image)
}

/// Decode a raster held in memory.
pub fn decode_image(bytes: &[u8]) -> VectraceResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| VectraceError::invalid_image(e.to_string()))
}

/// BT.601 luma with round-to-nearest.
fn bt601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 299 + g as u32 * 587 + b as u32 * 114;
    ((weighted + 500) / 1000) as u8
}

/// Reduce any supported pixel format to a single 8-bit luminance channel.
///
/// Alpha is ignored. Deep formats not handled explicitly go through their
/// 8-bit RGB conversion first.
pub fn luminance(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(gray_alpha) => {
            GrayImage::from_fn(gray_alpha.width(), gray_alpha.height(), |x, y| {
                Luma([gray_alpha.get_pixel(x, y)[0]])
            })
        }
        DynamicImage::ImageLuma16(gray) => GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let v = gray.get_pixel(x, y)[0] as u32;
            Luma([((v * 255 + 32_767) / 65_535) as u8])
        }),
        DynamicImage::ImageRgb8(rgb) => GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let px = rgb.get_pixel(x, y);
            Luma([bt601(px[0], px[1], px[2])])
        }),
        DynamicImage::ImageRgba8(rgba) => GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let px = rgba.get_pixel(x, y);
            Luma([bt601(px[0], px[1], px[2])])
        }),
        other => luminance(&DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

/// Threshold a luminance image into a bitmap.
///
/// Foreground iff `luma > threshold`, or `luma <= threshold` when `invert` is set.
pub fn binarize_luma(gray: &GrayImage, threshold: u8, invert: bool) -> Bitmap {
    let threshold_type = if invert {
        ThresholdType::BinaryInverted
    } else {
        ThresholdType::Binary
    };
    Bitmap::from_mask(ip_threshold(gray, threshold, threshold_type))
}

/// Convert an arbitrary raster into a two-level bitmap.
pub fn binarize(image: &DynamicImage, threshold: u8, invert: bool) -> VectraceResult<Bitmap> {
    if image.width() == 0 || image.height() == 0 {
        return Err(VectraceError::invalid_image(format!(
            "raster has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }
    let gray = luminance(image);
    Ok(binarize_luma(&gray, threshold, invert))
}
