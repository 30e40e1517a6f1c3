//! Border following with a containment hierarchy.
//!
//! Implements the topological border following of Suzuki and Abe (1985):
//! a single raster scan over a zero-padded label grid discovers every outer
//! border (foreground seen from background) and hole border (background
//! enclosed by foreground), traces it with 8-connectivity, and decides its
//! parent from the last border crossed on the current row. Foreground is
//! 8-connected, background 4-connected.
//!
//! Boundaries are reported in discovery order, which is the row-major order
//! of their first pixel, so the output is fully determined by the bitmap.

use imageproc::geometry::arc_length;
use ndarray::Array2;
use tracing::{debug, trace};

use crate::bitmap::Bitmap;
use crate::config::ChainApproximation;
use crate::geometry::{Point, to_imageproc};

/// Index of a boundary inside its [`ContourTree`].
pub type BoundaryId = usize;

/// Minimum number of points for a boundary to describe a closed shape.
pub const MIN_BOUNDARY_POINTS: usize = 3;

/// Topological kind of a traced border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    /// Separates a foreground component from the background around it.
    Outer,
    /// Separates a foreground component from background it encloses.
    Hole,
}

/// A closed polyline separating foreground from background.
///
/// Points are stored once each; the ring is implicitly closed back to the
/// first point (see [`Boundary::ring`]). The parent link is fixed when the
/// boundary is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    points: Vec<Point>,
    border_type: BorderType,
    parent: Option<BoundaryId>,
    depth: usize,
}

impl Boundary {
    pub fn new(
        points: Vec<Point>,
        border_type: BorderType,
        parent: Option<BoundaryId>,
        depth: usize,
    ) -> Self {
        Self {
            points,
            border_type,
            parent,
            depth,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn border_type(&self) -> BorderType {
        self.border_type
    }

    /// The boundary immediately enclosing this one.
    pub fn parent(&self) -> Option<BoundaryId> {
        self.parent
    }

    /// Nesting level: 0 for outer boundaries, 1 for their holes, and so on.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// An outer boundary has no enclosing parent.
    pub fn is_outer(&self) -> bool {
        self.parent.is_none()
    }

    /// Every boundary with a parent is a hole of that parent.
    pub fn is_hole(&self) -> bool {
        self.parent.is_some()
    }

    /// The closed ring: all points followed by the first point again.
    pub fn ring(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().chain(self.points.first()).copied()
    }

    /// Length of the closed ring, including the closing segment.
    pub fn perimeter(&self) -> f64 {
        arc_length(&to_imageproc(&self.points), true)
    }

    /// Same boundary and hierarchy position with a new point sequence.
    pub(crate) fn with_points(&self, points: Vec<Point>) -> Self {
        Self {
            points,
            border_type: self.border_type,
            parent: self.parent,
            depth: self.depth,
        }
    }
}

/// Every traced boundary plus the parent/child forest over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourTree {
    boundaries: Vec<Boundary>,
    children: Vec<Vec<BoundaryId>>,
    discarded: usize,
}

impl ContourTree {
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn get(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(id)
    }

    /// All boundaries in discovery order.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoundaryId, &Boundary)> {
        self.boundaries.iter().enumerate()
    }

    /// Outer boundaries in discovery order.
    pub fn roots(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.iter().filter(|(_, b)| b.is_outer()).map(|(id, _)| id)
    }

    /// Direct children of `id` in discovery order.
    pub fn children(&self, id: BoundaryId) -> &[BoundaryId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of traced borders dropped for having fewer than three points.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Replace every boundary's point sequence, keeping the hierarchy intact.
    pub fn map_points(mut self, mut f: impl FnMut(BoundaryId, &Boundary) -> Vec<Point>) -> Self {
        for (id, boundary) in self.boundaries.iter_mut().enumerate() {
            let points = f(id, boundary);
            *boundary = boundary.with_points(points);
        }
        self
    }
}

/// Neighbour offsets in clockwise order on screen, starting east.
const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const EAST: usize = 0;

/// Label of the virtual frame around the image.
const FRAME: i32 = 1;

fn direction_of(from: (usize, usize), to: (usize, usize)) -> usize {
    let dx = to.0 as isize - from.0 as isize;
    let dy = to.1 as isize - from.1 as isize;
    DIRECTIONS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(EAST)
}

fn step(p: (usize, usize), direction: usize) -> (usize, usize) {
    let (dx, dy) = DIRECTIONS[direction];
    (
        p.0.wrapping_add_signed(dx),
        p.1.wrapping_add_signed(dy),
    )
}

/// A border as found by the scan, before degenerate ones are dropped.
struct RawBorder {
    border_type: BorderType,
    parent: Option<usize>,
    pixels: Vec<(usize, usize)>,
}

/// Label grid with a one-pixel zero frame; `grid[[y, x]]` holds pixel `(x - 1, y - 1)`.
fn label_grid(bitmap: &Bitmap) -> Array2<i32> {
    let (w, h) = (bitmap.width() as usize, bitmap.height() as usize);
    let mut grid = Array2::<i32>::zeros((h + 2, w + 2));
    for (x, y, px) in bitmap.as_image().enumerate_pixels() {
        if px[0] != 0 {
            grid[[y as usize + 1, x as usize + 1]] = 1;
        }
    }
    grid
}

/// Follow one border starting at `start`, entering from the zero pixel `from`.
/// Marks traced pixels with `nbd` (or `-nbd` where the right neighbour is
/// background) and returns the border pixels in tracing order.
fn follow_border(
    grid: &mut Array2<i32>,
    start: (usize, usize),
    from: (usize, usize),
    nbd: i32,
) -> Vec<(usize, usize)> {
    let at = |p: (usize, usize)| [p.1, p.0];

    let entry = direction_of(start, from);
    let first = (0..8)
        .map(|k| step(start, (entry + k) % 8))
        .find(|&p| grid[at(p)] != 0);

    let Some(first) = first else {
        grid[at(start)] = -nbd;
        return vec![start];
    };

    let mut pixels = Vec::new();
    let mut previous = first;
    let mut current = start;
    loop {
        let back = direction_of(current, previous);
        let mut east_is_background = false;
        let mut next = previous;
        for k in 1..=8 {
            let direction = (back + 8 - k) % 8;
            let candidate = step(current, direction);
            if grid[at(candidate)] != 0 {
                next = candidate;
                break;
            }
            if direction == EAST {
                east_is_background = true;
            }
        }

        if east_is_background {
            grid[at(current)] = -nbd;
        } else if grid[at(current)] == 1 {
            grid[at(current)] = nbd;
        }
        pixels.push(current);

        if next == start && current == first {
            break;
        }
        previous = current;
        current = next;
    }
    pixels
}

/// Keep only pixels where the outgoing step direction changes. The first
/// pixel is always kept.
fn approximate_simple(pixels: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let n = pixels.len();
    if n < 2 {
        return pixels.to_vec();
    }
    let mut kept = Vec::new();
    let mut last_direction = None;
    for (i, &p) in pixels.iter().enumerate() {
        let direction = direction_of(p, pixels[(i + 1) % n]);
        if last_direction != Some(direction) {
            kept.push(p);
            last_direction = Some(direction);
        }
    }
    kept
}

fn scan_borders(grid: &mut Array2<i32>) -> Vec<RawBorder> {
    let (rows, cols) = grid.dim();
    let mut borders: Vec<RawBorder> = Vec::new();
    let mut nbd = FRAME;

    for y in 1..rows - 1 {
        let mut lnbd = FRAME;
        for x in 1..cols - 1 {
            let f = grid[[y, x]];
            let start_kind = if f == 1 && grid[[y, x - 1]] == 0 {
                Some((BorderType::Outer, (x - 1, y)))
            } else if f >= 1 && grid[[y, x + 1]] == 0 {
                if f > 1 {
                    lnbd = f;
                }
                Some((BorderType::Hole, (x + 1, y)))
            } else {
                None
            };

            if let Some((border_type, from)) = start_kind {
                nbd += 1;
                let last = (lnbd != FRAME).then(|| (lnbd - 2) as usize);
                let (last_is_hole, last_parent) = match last {
                    Some(i) => (borders[i].border_type == BorderType::Hole, borders[i].parent),
                    None => (true, None),
                };
                let parent = match (border_type, last_is_hole) {
                    (BorderType::Outer, true) | (BorderType::Hole, false) => last,
                    (BorderType::Outer, false) | (BorderType::Hole, true) => last_parent,
                };
                let pixels = follow_border(grid, (x, y), from, nbd);
                trace!(
                    id = borders.len(),
                    ?border_type,
                    ?parent,
                    pixels = pixels.len(),
                    "border traced"
                );
                borders.push(RawBorder {
                    border_type,
                    parent,
                    pixels,
                });
            }

            let f = grid[[y, x]];
            if f != 0 && f != 1 {
                lnbd = f.abs();
            }
        }
    }
    borders
}

/// Extract every boundary of `bitmap` together with its containment hierarchy.
///
/// Borders with fewer than [`MIN_BOUNDARY_POINTS`] points after chain
/// approximation are dropped; their children, if any, are attached to the
/// nearest surviving ancestor. An all-background bitmap yields an empty tree.
pub fn trace_contours(bitmap: &Bitmap, approximation: ChainApproximation) -> ContourTree {
    if bitmap.is_empty() {
        return ContourTree::default();
    }

    let mut grid = label_grid(bitmap);
    let raw = scan_borders(&mut grid);

    let mut remap: Vec<Option<BoundaryId>> = Vec::with_capacity(raw.len());
    let mut tree = ContourTree::default();

    for (index, border) in raw.iter().enumerate() {
        let pixels = match approximation {
            ChainApproximation::None => border.pixels.clone(),
            ChainApproximation::Simple => approximate_simple(&border.pixels),
        };

        if pixels.len() < MIN_BOUNDARY_POINTS {
            trace!(index, points = pixels.len(), "degenerate border discarded");
            tree.discarded += 1;
            remap.push(None);
            continue;
        }

        // parents precede children in discovery order, so `remap` already covers them
        let mut ancestor = border.parent;
        let parent = loop {
            match ancestor {
                Some(a) => match remap[a] {
                    Some(id) => break Some(id),
                    None => ancestor = raw[a].parent,
                },
                None => break None,
            }
        };
        let depth = parent.map_or(0, |p| tree.boundaries[p].depth + 1);
        let points = pixels
            .into_iter()
            .map(|(gx, gy)| Point::pixel(gx - 1, gy - 1))
            .collect();

        let id = tree.boundaries.len();
        tree.boundaries
            .push(Boundary::new(points, border.border_type, parent, depth));
        tree.children.push(Vec::new());
        if let Some(p) = parent {
            tree.children[p].push(id);
        }
        remap.push(Some(id));
    }

    debug!(
        traced = raw.len(),
        kept = tree.len(),
        discarded = tree.discarded,
        "contour tracing finished"
    );
    tree
}
