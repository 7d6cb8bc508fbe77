// THEORY:
// The `pipeline` module is the top-level API for the engine. It wires the two
// independent components together in the order a sprite-sheet tool uses them:
// detect sprites, quantize the sheet, then cut each sprite out of both the
// original and the quantized sheet.
//
// The pipeline owns no image state. Every call takes a `Raster` and returns a
// fresh `SheetReport`; loading, saving and displaying images are the caller's
// business.

use log::info;

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::component_labeler::Connectivity;
use crate::core_modules::palette::Palette;
use crate::core_modules::palette_quantizer::PaletteQuantizer;
use crate::core_modules::pixel::pixel::Color;
use crate::core_modules::raster::Raster;
use crate::core_modules::sprite_segmenter::{SegmenterConfig, SpriteSegmenter};
use crate::error::Result;

pub const MIN_EXTENT_VAR: &str = "SPRITE_MIN_EXTENT";
pub const CONNECTIVITY_VAR: &str = "SPRITE_CONNECTIVITY";
pub const WORKERS_VAR: &str = "SPRITE_WORKERS";

/// Configuration for the pipelines, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub segmenter: SegmenterConfig,
    pub palette: Palette,
    /// Number of row bands the parallel pipeline splits an image into.
    pub worker_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            palette: Palette::nes(),
            worker_count: num_cpus::get().max(1),
        }
    }
}

impl PipelineConfig {
    /// Reads overrides from `SPRITE_MIN_EXTENT`, `SPRITE_CONNECTIVITY` (`4` or
    /// `8`) and `SPRITE_WORKERS`. Missing or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(min_extent) = lookup(MIN_EXTENT_VAR).and_then(|v| v.trim().parse().ok()) {
            config.segmenter.min_extent = min_extent;
        }
        match lookup(CONNECTIVITY_VAR).as_deref().map(str::trim) {
            Some("4") => config.segmenter.connectivity = Connectivity::Four,
            Some("8") => config.segmenter.connectivity = Connectivity::Eight,
            _ => {}
        }
        if let Some(workers) = lookup(WORKERS_VAR)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|workers| *workers > 0)
        {
            config.worker_count = workers;
        }

        config
    }
}

/// Everything the pipeline derives from one sprite sheet.
#[derive(Debug, Clone)]
pub struct SheetReport {
    pub background: Color,
    /// Detected sprite boxes in scan order.
    pub sprites: Vec<BoundingBox>,
    /// The whole sheet mapped onto the palette.
    pub quantized_sheet: Raster,
    /// `original_sprites[i]` is the crop of `sprites[i]` from the input.
    pub original_sprites: Vec<Raster>,
    /// `quantized_sprites[i]` is the crop of `sprites[i]` from `quantized_sheet`.
    pub quantized_sprites: Vec<Raster>,
}

/// The main, top-level struct for the engine.
#[derive(Debug, Clone)]
pub struct SheetPipeline {
    segmenter: SpriteSegmenter,
    quantizer: PaletteQuantizer,
}

impl SheetPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            segmenter: SpriteSegmenter::new(config.segmenter),
            quantizer: PaletteQuantizer::new(config.palette),
        }
    }

    pub fn segmenter(&self) -> &SpriteSegmenter {
        &self.segmenter
    }

    pub fn quantizer(&self) -> &PaletteQuantizer {
        &self.quantizer
    }

    pub fn process(&self, sheet: &Raster) -> Result<SheetReport> {
        // Stage 1: Spatial Grouping
        let segmentation = self.segmenter.segment(sheet);

        // Stage 2: Palette Mapping
        let quantized_sheet = self.quantizer.quantize_image(sheet, None)?;

        // Stage 3: Sprite Extraction
        let original_sprites = crop_all(sheet, &segmentation.sprites)?;
        let quantized_sprites = crop_all(&quantized_sheet, &segmentation.sprites)?;

        info!(
            "processed {}x{} sheet: {} sprites",
            sheet.width(),
            sheet.height(),
            segmentation.sprites.len()
        );

        Ok(SheetReport {
            background: segmentation.background,
            sprites: segmentation.sprites,
            quantized_sheet,
            original_sprites,
            quantized_sprites,
        })
    }

    /// Quantizes only the pixels inside `sprites`, leaving the rest of the sheet
    /// byte-identical.
    pub fn quantize_sprites(&self, sheet: &Raster, sprites: &[BoundingBox]) -> Result<Raster> {
        self.quantizer.quantize_image(sheet, Some(sprites))
    }
}

impl Default for SheetPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Crops every box out of `image`, in order.
pub fn crop_all(image: &Raster, boxes: &[BoundingBox]) -> Result<Vec<Raster>> {
    boxes.iter().map(|bbox| image.crop(bbox)).collect()
}
