// Example runner for the `sprite_quant` library. It builds a small sprite sheet
// in memory, runs both pipelines over it and logs what they find. Real tools
// decode their sheet with the `image` crate and hand it over as a `Raster`.

use std::sync::Arc;

use log::info;
use sprite_quant::{
    BoundingBox, Color, ParallelPipeline, PipelineConfig, PixelLayout, Raster, SheetPipeline,
};

fn demo_sheet() -> sprite_quant::Result<Raster> {
    let mut sheet = Raster::filled(64, 32, PixelLayout::Rgba, Color::new(255, 0, 255))?;
    sheet.fill_box(&BoundingBox::new(2, 2, 14, 18), Color::new(201, 48, 37))?;
    sheet.fill_box(&BoundingBox::new(5, 5, 11, 9), Color::new(250, 236, 180))?;
    sheet.fill_box(&BoundingBox::new(20, 4, 36, 20), Color::new(34, 90, 200))?;
    sheet.fill_box(&BoundingBox::new(42, 10, 60, 28), Color::new(60, 170, 60))?;
    // Anti-aliasing speck, too small to count as a sprite.
    sheet.fill_box(&BoundingBox::new(38, 28, 40, 30), Color::new(90, 90, 90))?;
    Ok(sheet)
}

#[tokio::main]
async fn main() -> sprite_quant::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env();
    info!(
        "min extent {}px, {:?} connectivity, {} workers",
        config.segmenter.min_extent, config.segmenter.connectivity, config.worker_count
    );

    let sheet = demo_sheet()?;
    let report = SheetPipeline::new(config.clone()).process(&sheet)?;
    info!("background {:?}", report.background);
    for (index, (bbox, sprite)) in report.sprites.iter().zip(&report.quantized_sprites).enumerate() {
        info!(
            "sprite {:03}: {:?} -> {}x{}, top-left {:?}",
            index + 1,
            bbox.as_tuple(),
            sprite.width(),
            sprite.height(),
            sprite.color_at(0, 0)
        );
    }

    let parallel = ParallelPipeline::new(config)
        .process(Arc::new(sheet))
        .await?;
    info!(
        "parallel run agrees with sequential run: {}",
        parallel.sprites == report.sprites && parallel.quantized_sheet == report.quantized_sheet
    );

    Ok(())
}
