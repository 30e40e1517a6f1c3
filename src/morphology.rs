//! Morphological clean-up of a bitmap before tracing.
//!
//! The structuring element is the 3x3 square (L-infinity ball of radius 1).
//! Pixels outside the image never erode the foreground.

use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::bitmap::Bitmap;
use crate::config::TraceSettings;

/// Radius of the square structuring element.
const STRUCTURING_RADIUS: u8 = 1;

/// A single morphological step applied to a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingStep {
    /// Dilate then erode: fills gaps narrower than the structuring element.
    Close,
    /// Erode then dilate: removes specks smaller than the structuring element.
    Open,
}

impl SmoothingStep {
    pub fn apply(&self, input: &Bitmap) -> Bitmap {
        if input.is_empty() {
            return input.clone();
        }
        let image = input.as_image();
        let out = match self {
            SmoothingStep::Close => close(image, Norm::LInf, STRUCTURING_RADIUS),
            SmoothingStep::Open => open(image, Norm::LInf, STRUCTURING_RADIUS),
        };
        Bitmap::from_mask(out)
    }
}

/// Run a list of steps against the provided bitmap, returning the transformed bitmap.
pub fn apply_steps(source: &Bitmap, steps: &[SmoothingStep]) -> Bitmap {
    let mut current = source.clone();
    for step in steps {
        current = step.apply(&current);
    }
    current
}

/// Produce the step sequence requested by the settings.
pub fn steps_from_settings(settings: &TraceSettings) -> Vec<SmoothingStep> {
    if settings.smooth {
        vec![SmoothingStep::Close, SmoothingStep::Open]
    } else {
        Vec::new()
    }
}

/// Closing followed by opening.
pub fn smooth(bitmap: &Bitmap) -> Bitmap {
    apply_steps(bitmap, &[SmoothingStep::Close, SmoothingStep::Open])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: u32, from: u32, to: u32) -> Bitmap {
        Bitmap::from_fn(size, size, |x, y| {
            (from..to).contains(&x) && (from..to).contains(&y)
        })
    }

    mod unit {
        use super::*;

        #[test]
        fn open_removes_single_pixel_speck() {
            let bitmap = Bitmap::from_fn(5, 5, |x, y| x == 2 && y == 2);
            let out = SmoothingStep::Open.apply(&bitmap);
            assert_eq!(out.foreground_count(), 0);
        }

        #[test]
        fn close_fills_single_pixel_hole() {
            let bitmap = Bitmap::from_fn(5, 5, |x, y| !(x == 2 && y == 2));
            let out = SmoothingStep::Close.apply(&bitmap);
            assert!(out.is_foreground(2, 2));
            assert_eq!(out.foreground_count(), 25);
        }

        #[test]
        fn smooth_keeps_solid_square() {
            let bitmap = square(20, 5, 15);
            assert_eq!(smooth(&bitmap), bitmap);
        }

        #[test]
        fn smooth_removes_speck_and_fills_pinhole() {
            // 10x10 block with a pinhole, plus a lone speck far away
            let bitmap = Bitmap::from_fn(30, 30, |x, y| {
                let in_block = (5..15).contains(&x) && (5..15).contains(&y);
                let pinhole = x == 9 && y == 9;
                let speck = x == 25 && y == 25;
                (in_block && !pinhole) || speck
            });
            let out = smooth(&bitmap);
            assert!(out.is_foreground(9, 9));
            assert!(!out.is_foreground(25, 25));
            assert_eq!(out, square(30, 5, 15));
        }

        #[test]
        fn image_border_does_not_erode() {
            let bitmap = Bitmap::from_fn(6, 4, |_, _| true);
            assert_eq!(smooth(&bitmap).foreground_count(), 24);
        }

        #[test]
        fn empty_bitmap_passes_through() {
            let bitmap = Bitmap::new(0, 0);
            assert_eq!(smooth(&bitmap), bitmap);
        }

        #[test]
        fn disabled_settings_yield_no_steps() {
            let settings = TraceSettings::default().with_smooth(false);
            assert!(steps_from_settings(&settings).is_empty());
            let bitmap = Bitmap::from_fn(4, 4, |x, _| x == 1);
            assert_eq!(apply_steps(&bitmap, &steps_from_settings(&settings)), bitmap);
        }

        #[test]
        fn enabled_settings_close_then_open() {
            let steps = steps_from_settings(&TraceSettings::default());
            assert_eq!(steps, vec![SmoothingStep::Close, SmoothingStep::Open]);
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// smooth: dimensions never change
            #[test]
            fn preserves_dimensions(
                w in 1u32..16,
                h in 1u32..16,
                bits in proptest::collection::vec(proptest::bool::ANY, 256)
            ) {
                let bitmap = Bitmap::from_fn(w, h, |x, y| bits[(y * 16 + x) as usize]);
                let out = smooth(&bitmap);
                prop_assert_eq!(out.dimensions(), (w, h));
            }
        }
    }
}
