use std::fmt;
use std::fs;
use std::path::Path;

use crate::VectraceResult;
use crate::compose::CompoundPath;

/// Decimal places written for every coordinate.
pub const COORDINATE_PRECISION: usize = 2;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const SHAPE_CLASS: &str = "shape";

/// Whether a trace found anything to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    /// At least one compound path was produced.
    Traced { paths: usize, boundaries: usize },
    /// No boundary survived; the document is valid but has no paths.
    Empty,
}

/// The final vector output: canvas size plus compound paths in order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    width: u32,
    height: u32,
    paths: Vec<CompoundPath>,
}

impl VectorDocument {
    pub fn new(width: u32, height: u32, paths: Vec<CompoundPath>) -> Self {
        Self {
            width,
            height,
            paths,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn paths(&self) -> &[CompoundPath] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of boundaries drawn, outer and holes together.
    pub fn boundary_count(&self) -> usize {
        self.paths.iter().map(CompoundPath::boundary_count).sum()
    }

    pub fn status(&self) -> TraceStatus {
        if self.paths.is_empty() {
            TraceStatus::Empty
        } else {
            TraceStatus::Traced {
                paths: self.paths.len(),
                boundaries: self.boundary_count(),
            }
        }
    }

    /// Serialize to an SVG string.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    /// Write the SVG to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> VectraceResult<()> {
        fs::write(path, self.to_svg())?;
        Ok(())
    }
}

/// Path geometry of one compound path: every ring as `M`, `L`..., `Z`.
#[derive(Debug, Clone, Copy)]
pub struct PathData<'a>(pub &'a CompoundPath);

impl fmt::Display for PathData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for ring in self.0.rings() {
            for (i, p) in ring.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                write!(
                    f,
                    "{separator}{command} {:.prec$} {:.prec$}",
                    p.x,
                    p.y,
                    prec = COORDINATE_PRECISION
                )?;
                separator = " ";
            }
            if !ring.is_empty() {
                f.write_str(" Z")?;
            }
        }
        Ok(())
    }
}

/// Path data string for one compound path.
pub fn path_data(path: &CompoundPath) -> String {
    PathData(path).to_string()
}

impl fmt::Display for VectorDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            f,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{SVG_NAMESPACE}">"#,
            w = self.width,
            h = self.height,
        )?;
        writeln!(f, "  <defs>")?;
        writeln!(f, "    <style>")?;
        writeln!(f, "      .{SHAPE_CLASS} {{ fill: black; stroke: none; }}")?;
        writeln!(f, "    </style>")?;
        writeln!(f, "  </defs>")?;
        for path in &self.paths {
            writeln!(
                f,
                r#"  <path d="{}" class="{SHAPE_CLASS}" fill-rule="{}"/>"#,
                PathData(path),
                path.fill_rule()
            )?;
        }
        write!(f, "</svg>")
    }
}
