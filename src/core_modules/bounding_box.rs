// THEORY:
// The `BoundingBox` is the output unit of the spatial grouping layer. It is the
// summary of one connected sprite: the smallest axis-aligned rectangle that
// covers every pixel of that sprite, and nothing else is kept.
//
// Key architectural principles:
// 1.  **Half-Open Extent**: A box covers `x1 <= x < x2` and `y1 <= y < y2`. Width
//     and height are plain subtractions and a box can be used directly to crop
//     or to restrict quantization.
// 2.  **Stateless Data Container**: Like `Color`, the box is "dumb". It does not
//     know which image it came from; the consumer checks it against an extent.

/// A simple struct to represent a 2D point on the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// A half-open, axis-aligned rectangle of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Smallest box covering a single pixel.
    pub fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, point.x.saturating_add(1), point.y.saturating_add(1))
    }

    /// Grows the box so that it also covers `point`.
    pub fn include(&mut self, point: Point) {
        self.x1 = self.x1.min(point.x);
        self.y1 = self.y1.min(point.y);
        self.x2 = self.x2.max(point.x.saturating_add(1));
        self.y2 = self.y2.max(point.y.saturating_add(1));
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x < self.x2 && point.y >= self.y1 && point.y < self.y2
    }

    /// True when the box is well-formed and lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2 && self.x2 <= width && self.y2 <= height
    }

    /// Returns the box as the `(x1, y1, x2, y2)` tuple collaborators exchange.
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}
