// THEORY:
// This file is the main entry point for the `sprite_quant` library crate. It
// defines the public API exposed to external collaborators (sprite-sheet tools,
// asset converters, editors) that own file I/O and presentation.
//
// The surface is deliberately small:
// - `segment_sprites`: find the bounding box of every sprite on a sheet.
// - `quantize_image`: map a sheet (or only its sprite regions) onto a palette.
// - `nearest_palette_color`: the single-color lookup both are built on.
// The free functions use the reference NES palette and default settings; the
// `SheetPipeline`, `ParallelPipeline`, `SpriteSegmenter` and `PaletteQuantizer`
// types take any `Palette` and configuration.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

use std::sync::OnceLock;

pub use crate::core_modules::bounding_box::{BoundingBox, Point};
pub use crate::core_modules::component_labeler::Connectivity;
pub use crate::core_modules::palette::{NES_PALETTE, Palette};
pub use crate::core_modules::palette_quantizer::PaletteQuantizer;
pub use crate::core_modules::pixel::pixel::Color;
pub use crate::core_modules::raster::{PixelLayout, Raster};
pub use crate::core_modules::sprite_segmenter::{SegmenterConfig, Segmentation, SpriteSegmenter};
pub use crate::error::{EngineError, Result};
pub use crate::parallel_pipeline::ParallelPipeline;
pub use crate::pipeline::{PipelineConfig, SheetPipeline, SheetReport};

/// Nearest entry of the reference NES palette.
pub fn nearest_palette_color(color: Color) -> Color {
    reference_quantizer().nearest(color)
}

/// Quantizes `image` onto the reference NES palette, optionally only inside
/// `regions`.
pub fn quantize_image(image: &Raster, regions: Option<&[BoundingBox]>) -> Result<Raster> {
    reference_quantizer().quantize_image(image, regions)
}

/// Sprite boxes found with the default segmenter settings.
pub fn segment_sprites(image: &Raster) -> Vec<BoundingBox> {
    SpriteSegmenter::default().segment_sprites(image)
}

static REFERENCE_QUANTIZER: OnceLock<PaletteQuantizer> = OnceLock::new();

fn reference_quantizer() -> &'static PaletteQuantizer {
    REFERENCE_QUANTIZER.get_or_init(PaletteQuantizer::default)
}
