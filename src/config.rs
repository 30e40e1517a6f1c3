/// Default binarization cutoff.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// How many border pixels the contour tracer keeps for each boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainApproximation {
    /// Keep every traced border pixel.
    None,
    /// Keep only the end points of horizontal, vertical and diagonal runs.
    #[default]
    Simple,
}

/// The full configuration surface of a trace run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSettings {
    /// Binarization cutoff; a pixel is foreground iff its luminance is above it.
    pub threshold: u8,
    /// Flip polarity: foreground iff luminance is at or below the cutoff.
    pub invert: bool,
    /// Reduce boundary point counts with a perimeter-proportional tolerance.
    pub simplify: bool,
    /// Run a 3x3 closing then opening on the bitmap before tracing.
    pub smooth: bool,
    /// Point retention policy of the contour tracer.
    pub approximation: ChainApproximation,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            invert: false,
            simplify: true,
            smooth: true,
            approximation: ChainApproximation::default(),
        }
    }
}

impl TraceSettings {
    /// Set the binarization cutoff.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set whether polarity is inverted.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Enable or disable polyline simplification.
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Enable or disable morphological smoothing.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Set the chain approximation used while tracing.
    pub fn with_approximation(mut self, approximation: ChainApproximation) -> Self {
        self.approximation = approximation;
        self
    }
}
