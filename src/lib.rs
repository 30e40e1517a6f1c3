pub mod binarize;
pub mod bitmap;
pub mod compose;
pub mod config;
pub mod contour;
pub mod document;
pub mod error;
pub mod geometry;
pub mod morphology;
pub mod simplify;
pub mod vectorizer;

pub use bitmap::Bitmap;
pub use compose::{CompoundPath, FillRule};
pub use config::{ChainApproximation, DEFAULT_THRESHOLD, TraceSettings};
pub use document::{TraceStatus, VectorDocument};
pub use error::{VectraceError, VectraceResult};
pub use geometry::Point;
pub use vectorizer::BitmapVectorizer;
pub use vectorizer::svg::{SvgVectorizer, TraceOptions, TraceStats, TracedDocument, trace_to_document};

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info_span};

use crate::binarize::{binarize, load_image};
use crate::morphology::{SmoothingStep, apply_steps, steps_from_settings};

/// Entry point for configuring and running raster vectorization.
#[derive(Debug, Clone, Default)]
pub struct Vectrace {
    settings: TraceSettings,
}

impl Vectrace {
    pub fn new(settings: TraceSettings) -> Self {
        Self { settings }
    }

    /// Set the binarization cutoff.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.settings.threshold = threshold;
        self
    }

    /// Treat dark pixels as foreground.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.settings.invert = invert;
        self
    }

    /// Enable or disable boundary simplification.
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.settings.simplify = simplify;
        self
    }

    /// Enable or disable morphological smoothing.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.settings.smooth = smooth;
        self
    }

    /// Set the chain approximation used by the contour tracer.
    pub fn with_approximation(mut self, approximation: ChainApproximation) -> Self {
        self.settings.approximation = approximation;
        self
    }

    pub fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    /// Load and binarize a single image, returning a handle to the unsmoothed bitmap.
    pub fn for_image(&self, image_path: impl AsRef<Path>) -> VectraceResult<BitmapHandle> {
        let image_path = image_path.as_ref();
        let _span = info_span!("image", path = %image_path.display()).entered();
        let image = load_image(image_path)?;
        self.for_dynamic_image(&image)
    }

    /// Binarize an already decoded image.
    pub fn for_dynamic_image(&self, image: &DynamicImage) -> VectraceResult<BitmapHandle> {
        let bitmap = binarize(image, self.settings.threshold, self.settings.invert)?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            foreground = bitmap.foreground_count(),
            threshold = self.settings.threshold,
            invert = self.settings.invert,
            "image binarized"
        );
        Ok(BitmapHandle::new(bitmap, self.settings.clone()))
    }

    /// Run the whole pipeline on an image file.
    pub fn vectorize(&self, image_path: impl AsRef<Path>) -> VectraceResult<TracedDocument> {
        self.for_image(image_path)?.processed().to_document()
    }
}

/// Run the whole pipeline on a decoded image.
pub fn vectorize_image(image: &DynamicImage, settings: &TraceSettings) -> VectraceResult<TracedDocument> {
    Vectrace::new(settings.clone())
        .for_dynamic_image(image)?
        .processed()
        .to_document()
}

/// Builder-style handle over a binarized bitmap with pending smoothing steps.
#[derive(Debug, Clone)]
pub struct BitmapHandle {
    bitmap: Bitmap,
    settings: TraceSettings,
    operations: Vec<SmoothingStep>,
}

impl BitmapHandle {
    fn new(bitmap: Bitmap, settings: TraceSettings) -> Self {
        Self {
            bitmap,
            settings,
            operations: Vec::new(),
        }
    }

    /// Get a reference to the current bitmap.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Save the current bitmap to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> VectraceResult<()> {
        self.bitmap.save(path)
    }

    /// Add a closing step to the processing pipeline.
    pub fn close(mut self) -> Self {
        self.operations.push(SmoothingStep::Close);
        self
    }

    /// Add an opening step to the processing pipeline.
    pub fn open(mut self) -> Self {
        self.operations.push(SmoothingStep::Open);
        self
    }

    /// Apply the accumulated steps, or the smoothing the settings ask for
    /// when none were added.
    pub fn processed(self) -> Self {
        let ops = if self.operations.is_empty() {
            steps_from_settings(&self.settings)
        } else {
            self.operations
        };
        let bitmap = apply_steps(&self.bitmap, &ops);
        debug!(steps = ops.len(), foreground = bitmap.foreground_count(), "bitmap processed");
        Self::new(bitmap, self.settings)
    }

    /// Trace the current bitmap using the specified vectorizer and options.
    pub fn trace<V>(&self, vectorizer: &V, options: &V::Options) -> VectraceResult<V::Output>
    where
        V: BitmapVectorizer,
    {
        vectorizer.vectorize(&self.bitmap, options)
    }

    /// Trace the current bitmap into a vector document with the handle's settings.
    pub fn to_document(&self) -> VectraceResult<TracedDocument> {
        self.trace(&SvgVectorizer, &TraceOptions::from(&self.settings))
    }
}
