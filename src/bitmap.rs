use std::path::Path;

use image::{GrayImage, Luma};

use crate::VectraceResult;

/// Pixel value used for foreground in the backing image.
pub const FOREGROUND: u8 = 255;
/// Pixel value used for background in the backing image.
pub const BACKGROUND: u8 = 0;

/// A two-level raster: every pixel is either foreground or background.
///
/// Backed by a [`GrayImage`] whose pixels are always [`FOREGROUND`] or
/// [`BACKGROUND`], so it can be handed to `imageproc` operations and saved
/// as a PNG without conversion. Origin is top-left, y grows downward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: GrayImage,
}

impl Bitmap {
    /// Create an all-background bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Build a bitmap by evaluating `is_foreground` at every pixel.
    pub fn from_fn(width: u32, height: u32, mut is_foreground: impl FnMut(u32, u32) -> bool) -> Self {
        let image = GrayImage::from_fn(width, height, |x, y| {
            Luma([if is_foreground(x, y) {
                FOREGROUND
            } else {
                BACKGROUND
            }])
        });
        Self { image }
    }

    /// Wrap a grayscale mask, treating every non-zero pixel as foreground.
    pub fn from_mask(mut mask: GrayImage) -> Self {
        for px in mask.pixels_mut() {
            if px[0] != BACKGROUND {
                px[0] = FOREGROUND;
            }
        }
        Self { image: mask }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// True if the bitmap has zero area.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the pixel at `(x, y)` is foreground. Out-of-range pixels are background.
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|px| px[0] != BACKGROUND)
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|px| px[0] != BACKGROUND).count()
    }

    /// Get a reference to the backing 0/255 image.
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Consume the bitmap and return the backing 0/255 image.
    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Save the bitmap as a black/white image at the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> VectraceResult<()> {
        self.image.save(path)?;
        Ok(())
    }
}
