// THEORY:
// The `ForegroundMask` is the binary view of the sheet the labeler works on: a
// pixel is foreground when its RGB triple differs from the background color in
// at least one channel. Alpha plays no part; a fully transparent pixel with a
// non-background color is still foreground.

use crate::core_modules::bounding_box::Point;
use crate::core_modules::pixel::pixel::Color;
use crate::core_modules::raster::Raster;

/// A row-major grid of foreground flags with the dimensions of its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ForegroundMask {
    pub fn from_raster(raster: &Raster, background: Color) -> Self {
        Self {
            width: raster.width(),
            height: raster.height(),
            cells: raster.colors().map(|color| color != background).collect(),
        }
    }

    /// Builds a mask directly from flags, mainly for exercising the labeler.
    /// Returns `None` if `cells` does not hold `width * height` entries.
    pub fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub fn is_foreground(&self, point: Point) -> bool {
        point.x < self.width
            && point.y < self.height
            && self.cells[point.y as usize * self.width as usize + point.x as usize]
    }

    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}
