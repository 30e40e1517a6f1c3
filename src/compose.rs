use std::fmt;

use tracing::debug;

use crate::contour::ContourTree;
use crate::geometry::Point;

/// Rule deciding which regions enclosed by a compound path are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// SVG attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outer boundary plus its direct holes, drawn as a single path.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundPath {
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
    fill_rule: FillRule,
}

impl CompoundPath {
    /// Holes render as background only under even-odd, so any hole selects it.
    pub fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let fill_rule = if holes.is_empty() {
            FillRule::NonZero
        } else {
            FillRule::EvenOdd
        };
        Self {
            outer,
            holes,
            fill_rule,
        }
    }

    pub fn outer(&self) -> &[Point] {
        &self.outer
    }

    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Outer ring first, then holes in discovery order.
    pub fn rings(&self) -> impl Iterator<Item = &[Point]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Number of boundaries in this path.
    pub fn boundary_count(&self) -> usize {
        1 + self.holes.len()
    }
}

/// Composer output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub paths: Vec<CompoundPath>,
    /// Boundaries nested two or more levels deep, which no path includes.
    pub dropped_nested: usize,
}

/// Group every outer boundary with its direct children.
///
/// Only one level is folded in: a hole's own children (islands inside holes
/// and anything deeper) are not emitted.
pub fn compose(tree: &ContourTree) -> Composition {
    let paths: Vec<CompoundPath> = tree
        .roots()
        .filter_map(|root| {
            let outer = tree.get(root)?.points().to_vec();
            let holes = tree
                .children(root)
                .iter()
                .filter_map(|&child| tree.get(child))
                .map(|hole| hole.points().to_vec())
                .collect();
            Some(CompoundPath::new(outer, holes))
        })
        .collect();

    let dropped_nested = tree.boundaries().iter().filter(|b| b.depth() >= 2).count();
    if dropped_nested > 0 {
        debug!(dropped_nested, "nested boundaries below the first hole level are not emitted");
    }

    Composition {
        paths,
        dropped_nested,
    }
}
