// THEORY:
// The `parallel_pipeline` runs the same work as `SheetPipeline` on tokio's
// blocking pool so async callers stay responsive and large sheets use every core.
//
// Quantization splits the image into horizontal row bands. Each band is quantized
// on its own blocking task into its own buffer, and the buffers are stitched back
// in band order. A pixel's output depends only on that pixel, so the result is
// bit-identical to the sequential path for any band count.
//
// Segmentation stays a single task: labeling needs a global scan order. It runs
// concurrently with quantization of the full sheet.

use std::ops::Range;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info};

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::palette_quantizer::PaletteQuantizer;
use crate::core_modules::raster::Raster;
use crate::core_modules::sprite_segmenter::{Segmentation, SpriteSegmenter};
use crate::error::{EngineError, Result};
use crate::pipeline::{PipelineConfig, SheetReport, crop_all};

/// Splits `height` rows into at most `bands` contiguous, non-empty ranges.
pub fn band_ranges(height: u32, bands: usize) -> Vec<Range<u32>> {
    let bands = bands.clamp(1, height.max(1) as usize) as u32;
    let rows_per_band = height.div_ceil(bands).max(1);
    (0..height)
        .step_by(rows_per_band as usize)
        .map(|start| start..start.saturating_add(rows_per_band).min(height))
        .collect()
}

fn worker_error(error: tokio::task::JoinError) -> EngineError {
    EngineError::Worker(error.to_string())
}

pub struct ParallelPipeline {
    segmenter: SpriteSegmenter,
    quantizer: Arc<PaletteQuantizer>,
    worker_count: usize,
}

impl ParallelPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            segmenter: SpriteSegmenter::new(config.segmenter),
            quantizer: Arc::new(PaletteQuantizer::new(config.palette)),
            worker_count: config.worker_count.max(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs segmentation on the blocking pool.
    pub async fn segment(&self, image: Arc<Raster>) -> Result<Segmentation> {
        let segmenter = self.segmenter;
        tokio::task::spawn_blocking(move || segmenter.segment(&image))
            .await
            .map_err(worker_error)
    }

    pub async fn segment_sprites(&self, image: Arc<Raster>) -> Result<Vec<BoundingBox>> {
        Ok(self.segment(image).await?.sprites)
    }

    /// Band-parallel equivalent of `PaletteQuantizer::quantize_image`.
    pub async fn quantize_image(
        &self,
        image: Arc<Raster>,
        regions: Option<Vec<BoundingBox>>,
    ) -> Result<Raster> {
        let regions: Option<Arc<[BoundingBox]>> = self
            .quantizer
            .validate_regions(&image, regions.as_deref())?
            .map(Arc::from);

        let bands = band_ranges(image.height(), self.worker_count);
        debug!(
            "quantizing {}x{} image in {} bands",
            image.width(),
            image.height(),
            bands.len()
        );

        let tasks = bands.into_iter().map(|rows| {
            let image = Arc::clone(&image);
            let quantizer = Arc::clone(&self.quantizer);
            let regions = regions.clone();
            tokio::task::spawn_blocking(move || {
                let stride = image.stride();
                let start = rows.start as usize * stride;
                let end = rows.end as usize * stride;
                let mut band = image.as_bytes()[start..end].to_vec();
                quantizer.quantize_band(&image, rows, regions.as_deref(), &mut band);
                band
            })
        });

        let mut data = Vec::with_capacity(image.as_bytes().len());
        for band in join_all(tasks).await {
            data.extend_from_slice(&band.map_err(worker_error)?);
        }

        Raster::new(image.width(), image.height(), image.layout(), data)
    }

    /// Async equivalent of `SheetPipeline::process`.
    pub async fn process(&self, sheet: Arc<Raster>) -> Result<SheetReport> {
        let (segmentation, quantized_sheet) = futures::join!(
            self.segment(Arc::clone(&sheet)),
            self.quantize_image(Arc::clone(&sheet), None)
        );
        let segmentation = segmentation?;
        let quantized_sheet = quantized_sheet?;

        let original_sprites = crop_all(&sheet, &segmentation.sprites)?;
        let quantized_sprites = crop_all(&quantized_sheet, &segmentation.sprites)?;

        info!(
            "processed {}x{} sheet on {} workers: {} sprites",
            sheet.width(),
            sheet.height(),
            self.worker_count,
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
}
