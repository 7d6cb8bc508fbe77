// THEORY:
// The `ComponentLabeler` is the engine of the spatial grouping layer. It takes the
// binary `ForegroundMask` and partitions its foreground pixels into maximal
// connected groups, each with a numeric label and a bounding box.
//
// Key architectural principles & algorithm steps:
// 1.  **Seeding in Scan Order**: The mask is scanned row by row, left to right.
//     The first unlabeled foreground pixel found becomes the seed of a new
//     component. Label `n` is therefore always the component whose top-left-most
//     pixel (in row-major order) comes `n`-th, which makes output order
//     reproducible.
// 2.  **Region Growing**: From each seed a depth-first flood fill claims every
//     reachable foreground pixel. Only the four direct neighbors count by default;
//     sprites touching at a corner stay separate.
// 3.  **Data Aggregation**: The bounding box is grown while the flood fill runs,
//     so no second pass over the label grid is needed.
// 4.  **Stateless Utility**: The labeler keeps nothing between calls.

use crate::core_modules::bounding_box::{BoundingBox, Point};
use crate::core_modules::foreground_mask::ForegroundMask;

/// Which neighbors count as adjacent when growing a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Left, right, up and down only.
    #[default]
    Four,
    /// The four direct neighbors plus the diagonals.
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i64, i64)] {
        const FOUR: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        const EIGHT: [(i64, i64); 8] = [
            (0, 1),
            (0, -1),
            (1, 0),
            (-1, 0),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        match self {
            Connectivity::Four => &FOUR,
            Connectivity::Eight => &EIGHT,
        }
    }
}

/// The result of labeling: a label per pixel and a box per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    pub width: u32,
    pub height: u32,
    /// Row-major labels; 0 is background, `n >= 1` is component `n`.
    pub labels: Vec<u32>,
    /// `boxes[n - 1]` bounds component `n`.
    pub boxes: Vec<BoundingBox>,
}

impl LabelGrid {
    pub fn component_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn label_at(&self, point: Point) -> Option<u32> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }
        Some(self.labels[point.y as usize * self.width as usize + point.x as usize])
    }
}

pub mod component_labeler {
    use super::*;

    /// Labels every connected foreground region of `mask`.
    pub fn label_components(mask: &ForegroundMask, connectivity: Connectivity) -> LabelGrid {
        let width = mask.width();
        let height = mask.height();
        let mut labels = vec![0u32; width as usize * height as usize];
        let mut boxes: Vec<BoundingBox> = Vec::new();
        let mut stack: Vec<Point> = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let seed = Point { x, y };
                let index = y as usize * width as usize + x as usize;
                if labels[index] != 0 || !mask.cells()[index] {
                    continue;
                }

                let label = boxes.len() as u32 + 1;
                labels[index] = label;
                stack.push(seed);
                let bbox = grow_component(mask, connectivity, label, &mut labels, &mut stack, seed);
                boxes.push(bbox);
            }
        }

        LabelGrid {
            width,
            height,
            labels,
            boxes,
        }
    }

    /// Drains `stack`, claiming every reachable foreground pixel for `label`.
    fn grow_component(
        mask: &ForegroundMask,
        connectivity: Connectivity,
        label: u32,
        labels: &mut [u32],
        stack: &mut Vec<Point>,
        seed: Point,
    ) -> BoundingBox {
        let width = mask.width() as i64;
        let height = mask.height() as i64;
        let mut bbox = BoundingBox::from_point(seed);

        while let Some(current) = stack.pop() {
            bbox.include(current);

            for (dx, dy) in connectivity.offsets() {
                let nx = current.x as i64 + dx;
                let ny = current.y as i64 + dy;
                if nx < 0 || nx >= width || ny < 0 || ny >= height {
                    continue;
                }

                let index = ny as usize * width as usize + nx as usize;
                if labels[index] == 0 && mask.cells()[index] {
                    labels[index] = label;
                    stack.push(Point {
                        x: nx as u32,
                        y: ny as u32,
                    });
                }
            }
        }

        bbox
    }
}
