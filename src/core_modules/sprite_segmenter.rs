// THEORY:
// The `SpriteSegmenter` orchestrates the whole spatial layer. It does not analyze
// anything itself; it runs the stages in order and filters the result:
//
//   Raster -> dominant background -> ForegroundMask -> LabelGrid -> boxes
//
// Components whose box is `min_extent` pixels or less in either dimension are
// dropped as noise (anti-aliasing specks, stray pixels). A uniform image or a
// sheet with only specks yields an empty list; that is a normal outcome.

use log::{debug, warn};

use crate::core_modules::background::dominant_color;
use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::component_labeler::component_labeler::label_components;
use crate::core_modules::component_labeler::{Connectivity, LabelGrid};
use crate::core_modules::foreground_mask::ForegroundMask;
use crate::core_modules::pixel::pixel::Color;
use crate::core_modules::raster::Raster;

/// Default noise threshold: boxes must be wider and taller than this.
pub const DEFAULT_MIN_EXTENT: u32 = 4;

/// Tunable behavior of the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// A component is kept only if its box is strictly wider and strictly taller
    /// than this many pixels.
    pub min_extent: u32,
    pub connectivity: Connectivity,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_extent: DEFAULT_MIN_EXTENT,
            connectivity: Connectivity::Four,
        }
    }
}

/// Every intermediate stage of one segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub background: Color,
    pub mask: ForegroundMask,
    pub labels: LabelGrid,
    /// Boxes that passed the size filter, in ascending label order.
    pub sprites: Vec<BoundingBox>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteSegmenter {
    config: SegmenterConfig,
}

impl SpriteSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Runs all stages and keeps their outputs.
    pub fn segment(&self, image: &Raster) -> Segmentation {
        // A Raster always has at least one pixel; the fallback is never taken.
        let background = dominant_color(image.colors()).unwrap_or_default();
        debug!("background color: {:?}", background);

        let mask = ForegroundMask::from_raster(image, background);
        let labels = label_components(&mask, self.config.connectivity);
        debug!(
            "{} foreground pixels in {} components",
            mask.foreground_count(),
            labels.component_count()
        );

        let sprites: Vec<BoundingBox> = labels
            .boxes
            .iter()
            .copied()
            .filter(|bbox| self.keeps(bbox))
            .collect();

        let discarded = labels.component_count() - sprites.len();
        if discarded > 0 {
            debug!(
                "discarded {} components at or below {}px",
                discarded, self.config.min_extent
            );
        }
        if sprites.is_empty() {
            warn!(
                "no sprites found in {}x{} image",
                image.width(),
                image.height()
            );
        }

        Segmentation {
            background,
            mask,
            labels,
            sprites,
        }
    }

    /// Bounding boxes of every sprite, in first-pixel scan order.
    pub fn segment_sprites(&self, image: &Raster) -> Vec<BoundingBox> {
        self.segment(image).sprites
    }

    fn keeps(&self, bbox: &BoundingBox) -> bool {
        bbox.width() > self.config.min_extent && bbox.height() > self.config.min_extent
    }
}
