use tracing::{debug, info_span};

use crate::bitmap::Bitmap;
use crate::compose::compose;
use crate::config::{ChainApproximation, TraceSettings};
use crate::contour::trace_contours;
use crate::document::VectorDocument;
use crate::simplify::simplify_tree;
use crate::{VectraceError, VectraceResult};

use super::BitmapVectorizer;

/// Options for turning an already binarized bitmap into paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    pub approximation: ChainApproximation,
    pub simplify: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self::from(&TraceSettings::default())
    }
}

impl From<&TraceSettings> for TraceOptions {
    fn from(settings: &TraceSettings) -> Self {
        Self {
            approximation: settings.approximation,
            simplify: settings.simplify,
        }
    }
}

/// Counters gathered across one vectorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Boundaries kept by the tracer, outer and holes.
    pub boundaries: usize,
    /// Borders dropped for having fewer than three points.
    pub discarded: usize,
    /// Boundaries whose simplification was reverted.
    pub collapsed: usize,
    /// Boundaries nested too deep to be emitted.
    pub dropped_nested: usize,
}

/// A vector document together with the counters of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedDocument {
    pub document: VectorDocument,
    pub stats: TraceStats,
}

/// Contour tracing, simplification and composition into an SVG document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgVectorizer;

impl BitmapVectorizer for SvgVectorizer {
    type Options = TraceOptions;
    type Output = TracedDocument;

    fn vectorize(&self, bitmap: &Bitmap, options: &Self::Options) -> VectraceResult<Self::Output> {
        trace_to_document(bitmap, options)
    }
}

/// Trace a bitmap into a [`VectorDocument`] sized like the bitmap.
pub fn trace_to_document(bitmap: &Bitmap, options: &TraceOptions) -> VectraceResult<TracedDocument> {
    if bitmap.is_empty() {
        return Err(VectraceError::invalid_image(format!(
            "bitmap has zero area ({}x{})",
            bitmap.width(),
            bitmap.height()
        )));
    }
    let (width, height) = bitmap.dimensions();
    let _span = info_span!("vectorize", width, height).entered();

    let tree = trace_contours(bitmap, options.approximation);
    let boundaries = tree.len();
    let discarded = tree.discarded();
    let (tree, simplify_stats) = simplify_tree(tree, options.simplify);
    let composition = compose(&tree);

    let stats = TraceStats {
        boundaries,
        discarded,
        collapsed: simplify_stats.collapsed,
        dropped_nested: composition.dropped_nested,
    };
    debug!(?stats, paths = composition.paths.len(), "vectorization finished");

    Ok(TracedDocument {
        document: VectorDocument::new(width, height, composition.paths),
        stats,
    })
}
