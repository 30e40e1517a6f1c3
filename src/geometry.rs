use imageproc::point::Point as IpPoint;

/// A point in image space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at the center of pixel `(x, y)`.
    pub fn pixel(x: usize, y: usize) -> Self {
        Self::new(x as f64, y as f64)
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }
}

impl From<Point> for IpPoint<f64> {
    fn from(p: Point) -> Self {
        IpPoint::new(p.x, p.y)
    }
}

impl From<IpPoint<f64>> for Point {
    fn from(p: IpPoint<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Convert a polyline for use with `imageproc::geometry`.
pub fn to_imageproc(points: &[Point]) -> Vec<IpPoint<f64>> {
    points.iter().copied().map(IpPoint::from).collect()
}
