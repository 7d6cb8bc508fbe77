// THEORY:
// The `PaletteQuantizer` is the color remapping layer. It replaces pixel colors
// with their nearest palette entry, either across the whole image or only inside
// a set of regions (usually the boxes found by the `SpriteSegmenter`).
//
// Key architectural principles:
// 1.  **Pure Function of the Pixel**: The replacement for a pixel depends only on
//     its RGB triple and the palette. Overlapping regions, band splits and caches
//     therefore cannot change the output.
// 2.  **Copy Semantics**: The source `Raster` is borrowed immutably; the result is
//     a new image. Alpha bytes are copied through untouched.
// 3.  **Row Bands**: Work is expressed over a contiguous range of rows writing
//     into that range's slice of the output buffer. The sequential path is one
//     band covering the whole image; the parallel pipeline hands out many bands.
// 4.  **Per-Call Cache**: Sprite sheets use few distinct colors, so each band
//     memoizes color -> palette entry. The cache stores results of `nearest`, so
//     the lowest-index tie-break is preserved.

use std::collections::HashMap;
use std::ops::Range;

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::palette::Palette;
use crate::core_modules::pixel::pixel::{Byte, Color};
use crate::core_modules::raster::Raster;
use crate::error::Result;

/// Maps colors onto a fixed palette.
#[derive(Debug, Clone, Default)]
pub struct PaletteQuantizer {
    palette: Palette,
}

impl PaletteQuantizer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The palette entry closest to `color` (lowest index on ties).
    pub fn nearest(&self, color: Color) -> Color {
        self.palette.nearest(color)
    }

    pub fn nearest_index(&self, color: Color) -> usize {
        self.palette.nearest_index(color)
    }

    /// Returns a copy of `image` with pixels replaced by their nearest palette
    /// entry. With `None` or an empty slice every pixel is replaced; otherwise
    /// only pixels inside at least one region are. Any region outside the image
    /// fails with `OutOfBounds`.
    pub fn quantize_image(&self, image: &Raster, regions: Option<&[BoundingBox]>) -> Result<Raster> {
        let regions = self.validate_regions(image, regions)?;
        let mut output = image.clone();
        self.quantize_band(image, 0..image.height(), regions, output.as_bytes_mut());
        Ok(output)
    }

    /// Checks every region against `image`. An empty region list collapses to
    /// `None` (quantize everything).
    pub(crate) fn validate_regions<'r>(
        &self,
        image: &Raster,
        regions: Option<&'r [BoundingBox]>,
    ) -> Result<Option<&'r [BoundingBox]>> {
        match regions {
            Some(regions) if !regions.is_empty() => {
                for bbox in regions {
                    image.check_region(bbox)?;
                }
                Ok(Some(regions))
            }
            _ => Ok(None),
        }
    }

    /// Quantizes `rows` of `source` into `band`, which must be the byte slice of
    /// exactly those rows in the output image. Regions must already be validated.
    pub(crate) fn quantize_band(
        &self,
        source: &Raster,
        rows: Range<u32>,
        regions: Option<&[BoundingBox]>,
        band: &mut [Byte],
    ) {
        let channels = source.channels();
        let stride = source.stride();
        let band_start = rows.start as usize * stride;
        let input = &source.as_bytes()[band_start..band_start + band.len()];

        let mut cache: HashMap<Color, Color> = HashMap::new();
        let mut remap = |input_pixel: &[Byte], output_pixel: &mut [Byte]| {
            let color = Color::from_pixel_bytes(input_pixel);
            let target = *cache
                .entry(color)
                .or_insert_with(|| self.palette.nearest(color));
            target.write_to(output_pixel);
        };

        let Some(regions) = regions else {
            for (input_pixel, output_pixel) in input
                .chunks_exact(channels)
                .zip(band.chunks_exact_mut(channels))
            {
                remap(input_pixel, output_pixel);
            }
            return;
        };

        // Coverage for one row, rebuilt per row from the boxes that span it.
        let mut covered = vec![false; source.width() as usize];
        for (row_index, y) in rows.enumerate() {
            covered.fill(false);
            let mut any = false;
            for bbox in regions.iter().filter(|b| b.y1 <= y && y < b.y2) {
                covered[bbox.x1 as usize..bbox.x2 as usize].fill(true);
                any |= !bbox.is_empty();
            }
            if !any {
                continue;
            }

            let row = row_index * stride..(row_index + 1) * stride;
            let input_row = &input[row.clone()];
            let output_row = &mut band[row];
            for ((input_pixel, output_pixel), _) in input_row
                .chunks_exact(channels)
                .zip(output_row.chunks_exact_mut(channels))
                .zip(covered.iter())
                .filter(|(_, covered)| **covered)
            {
                remap(input_pixel, output_pixel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::palette::NES_PALETTE;
    use crate::core_modules::raster::PixelLayout;
    use crate::error::EngineError;

    fn gradient(width: u32, height: u32, layout: PixelLayout) -> Raster {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8]);
                if layout == PixelLayout::Rgba {
                    data.push((x * 7 + y) as u8);
                }
            }
        }
        Raster::new(width, height, layout, data).unwrap()
    }

    #[test]
    fn unrestricted_quantization_matches_per_pixel_nearest() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(13, 9, PixelLayout::Rgba);
        let output = quantizer.quantize_image(&image, None).unwrap();

        for y in 0..image.height() {
            for x in 0..image.width() {
                let expected = quantizer.nearest(image.color_at(x, y).unwrap());
                assert_eq!(output.color_at(x, y), Some(expected));
                assert_eq!(output.alpha_at(x, y), image.alpha_at(x, y));
            }
        }
    }

    #[test]
    fn empty_region_list_quantizes_everything() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(6, 5, PixelLayout::Rgb);
        assert_eq!(
            quantizer.quantize_image(&image, Some(&[][..])).unwrap(),
            quantizer.quantize_image(&image, None).unwrap()
        );
    }

    #[test]
    fn regions_leave_outside_pixels_untouched() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(12, 10, PixelLayout::Rgba);
        let regions = [BoundingBox::new(1, 1, 5, 4), BoundingBox::new(3, 2, 9, 8)];
        let output = quantizer.quantize_image(&image, Some(&regions[..])).unwrap();

        for y in 0..image.height() {
            for x in 0..image.width() {
                let point = crate::core_modules::bounding_box::Point { x, y };
                let original = image.color_at(x, y).unwrap();
                let expected = if regions.iter().any(|b| b.contains(point)) {
                    quantizer.nearest(original)
                } else {
                    original
                };
                assert_eq!(output.color_at(x, y), Some(expected), "pixel ({x}, {y})");
                assert_eq!(output.alpha_at(x, y), image.alpha_at(x, y));
            }
        }
    }

    #[test]
    fn source_image_is_not_mutated() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(4, 4, PixelLayout::Rgb);
        let before = image.clone();
        let _ = quantizer.quantize_image(&image, None).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn region_outside_image_fails() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(8, 8, PixelLayout::Rgb);
        let bbox = BoundingBox::new(4, 4, 9, 6);
        assert_eq!(
            quantizer.quantize_image(&image, Some(&[BoundingBox::new(0, 0, 2, 2), bbox][..])),
            Err(EngineError::OutOfBounds { bbox, width: 8, height: 8 })
        );
    }

    #[test]
    fn zero_area_region_covers_nothing() {
        let quantizer = PaletteQuantizer::default();
        let image = gradient(5, 5, PixelLayout::Rgba);
        let flat = [BoundingBox::new(2, 1, 2, 4), BoundingBox::new(0, 3, 5, 3)];
        assert_eq!(quantizer.quantize_image(&image, Some(&flat[..])).unwrap(), image);
    }

    #[test]
    fn palette_only_image_is_unchanged() {
        let quantizer = PaletteQuantizer::default();
        // Skip the duplicate blacks so every color maps onto itself.
        let distinct: Vec<Color> = NES_PALETTE
            .iter()
            .enumerate()
            .filter(|(index, color)| quantizer.nearest_index(**color) == *index)
            .map(|(_, color)| *color)
            .collect();
        let data: Vec<u8> = distinct.iter().flat_map(|c| c.as_array()).collect();
        let image = Raster::new(distinct.len() as u32, 1, PixelLayout::Rgb, data).unwrap();

        assert_eq!(quantizer.quantize_image(&image, None).unwrap(), image);
    }

    #[test]
    fn custom_palette_is_honored() {
        let palette = Palette::new(vec![Color::new(0, 0, 0), Color::new(255, 255, 255)]).unwrap();
        let quantizer = PaletteQuantizer::new(palette);
        let image = Raster::new(2, 1, PixelLayout::Rgb, vec![100, 100, 100, 200, 180, 190]).unwrap();
        let output = quantizer.quantize_image(&image, None).unwrap();
        assert_eq!(output.as_bytes(), &[0, 0, 0, 255, 255, 255]);
    }
}
