// THEORY:
// The `Raster` is the in-memory image every operation consumes and produces. It
// is a flat, row-major byte buffer with a known pixel layout (RGB or RGBA) and a
// guaranteed non-zero size.
//
// Key architectural principles:
// 1.  **Validated at the Boundary**: A `Raster` can only be built with a width
//     and height of at least one and a buffer of exactly the right length. Every
//     downstream layer can index without re-checking dimensions.
// 2.  **Alpha is Cargo**: The alpha byte (when present) is stored and copied but
//     never read by the segmenter or the quantizer.
// 3.  **No Codecs**: Conversions to and from `image` buffers are in-memory only.
//     Decoding files and choosing formats belongs to the caller.

use crate::core_modules::bounding_box::{BoundingBox, Point};
use crate::core_modules::pixel::pixel::{Byte, Color};
use crate::error::{EngineError, Result};

/// Byte layout of a single pixel in a `Raster`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// An owned, row-major RGB(A) image with non-zero dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<Byte>,
}

impl Raster {
    /// Wraps an existing buffer. Fails with `InvalidImage` on a zero dimension or
    /// a buffer whose length is not `width * height * channels`.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<Byte>) -> Result<Self> {
        let expected = Self::buffer_len(width, height, layout)?;
        if data.len() != expected {
            return Err(EngineError::InvalidImage { width, height });
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Creates an image filled with one color. RGBA images are fully opaque.
    pub fn filled(width: u32, height: u32, layout: PixelLayout, color: Color) -> Result<Self> {
        let len = Self::buffer_len(width, height, layout)?;
        let pixel: Vec<Byte> = match layout {
            PixelLayout::Rgb => color.as_array().to_vec(),
            PixelLayout::Rgba => vec![color.red, color.green, color.blue, u8::MAX],
        };
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect();
        Self::new(width, height, layout, data)
    }

    /// Byte length of a `width` x `height` buffer, or `InvalidImage` when a
    /// dimension is zero or the size does not fit in memory.
    fn buffer_len(width: u32, height: u32, layout: PixelLayout) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidImage { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(layout.channels()))
            .ok_or(EngineError::InvalidImage { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn as_bytes(&self) -> &[Byte] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [Byte] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<Byte> {
        self.data
    }

    /// Byte length of one row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// Iterates the RGB color of every pixel in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.data.chunks_exact(self.channels()).map(Color::from_pixel_bytes)
    }

    /// The RGB color at `(x, y)`, or `None` outside the image.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        Some(Color::from_pixel_bytes(&self.data[offset..]))
    }

    /// The alpha byte at `(x, y)`; RGB images report fully opaque.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<Byte> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.layout {
            PixelLayout::Rgb => Some(u8::MAX),
            PixelLayout::Rgba => Some(self.data[self.offset(x, y) + 3]),
        }
    }

    /// Overwrites the RGB channels at `(x, y)`, keeping alpha.
    pub fn set_color(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::OutOfBounds {
                bbox: BoundingBox::from_point(Point { x, y }),
                width: self.width,
                height: self.height,
            });
        }
        let offset = self.offset(x, y);
        color.write_to(&mut self.data[offset..]);
        Ok(())
    }

    /// Paints every pixel of `bbox` with `color`, keeping alpha.
    pub fn fill_box(&mut self, bbox: &BoundingBox, color: Color) -> Result<()> {
        self.check_region(bbox)?;
        for y in bbox.y1..bbox.y2 {
            for x in bbox.x1..bbox.x2 {
                let offset = self.offset(x, y);
                color.write_to(&mut self.data[offset..]);
            }
        }
        Ok(())
    }

    /// Copies the pixels of `bbox` into a new image with the same layout.
    pub fn crop(&self, bbox: &BoundingBox) -> Result<Raster> {
        self.check_region(bbox)?;
        if bbox.is_empty() {
            return Err(EngineError::InvalidImage {
                width: bbox.width(),
                height: bbox.height(),
            });
        }

        let row_bytes = bbox.width() as usize * self.channels();
        let mut data = Vec::with_capacity(row_bytes * bbox.height() as usize);
        for y in bbox.y1..bbox.y2 {
            let start = self.offset(bbox.x1, y);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Raster::new(bbox.width(), bbox.height(), self.layout, data)
    }

    /// Fails with `OutOfBounds` unless `bbox` lies inside this image.
    pub fn check_region(&self, bbox: &BoundingBox) -> Result<()> {
        if bbox.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                bbox: *bbox,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Converts to an `image` RGBA buffer; RGB sources become fully opaque.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let offset = self.offset(x, y);
            let color = Color::from_pixel_bytes(&self.data[offset..]);
            let alpha = match self.layout {
                PixelLayout::Rgb => u8::MAX,
                PixelLayout::Rgba => self.data[offset + 3],
            };
            image::Rgba([color.red, color.green, color.blue, alpha])
        })
    }

    /// Converts to an `image` RGB buffer, dropping alpha.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let offset = self.offset(x, y);
            image::Rgb(Color::from_pixel_bytes(&self.data[offset..]).as_array())
        })
    }
}

impl TryFrom<image::RgbaImage> for Raster {
    type Error = EngineError;

    fn try_from(buffer: image::RgbaImage) -> Result<Self> {
        let (width, height) = buffer.dimensions();
        Raster::new(width, height, PixelLayout::Rgba, buffer.into_raw())
    }
}

impl TryFrom<image::RgbImage> for Raster {
    type Error = EngineError;

    fn try_from(buffer: image::RgbImage) -> Result<Self> {
        let (width, height) = buffer.dimensions();
        Raster::new(width, height, PixelLayout::Rgb, buffer.into_raw())
    }
}

impl TryFrom<&image::DynamicImage> for Raster {
    type Error = EngineError;

    fn try_from(image: &image::DynamicImage) -> Result<Self> {
        Raster::try_from(image.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions_and_short_buffers() {
        assert_eq!(
            Raster::new(0, 4, PixelLayout::Rgb, vec![]),
            Err(EngineError::InvalidImage { width: 0, height: 4 })
        );
        assert_eq!(
            Raster::new(2, 2, PixelLayout::Rgba, vec![0; 15]),
            Err(EngineError::InvalidImage { width: 2, height: 2 })
        );
        assert!(Raster::new(2, 2, PixelLayout::Rgba, vec![0; 16]).is_ok());
    }

    #[test]
    fn filled_rgba_is_opaque() {
        let raster = Raster::filled(3, 2, PixelLayout::Rgba, Color::new(1, 2, 3)).unwrap();
        assert_eq!(raster.as_bytes().len(), 24);
        assert_eq!(raster.color_at(2, 1), Some(Color::new(1, 2, 3)));
        assert_eq!(raster.alpha_at(2, 1), Some(255));
        assert_eq!(raster.color_at(3, 1), None);
    }

    #[test]
    fn oversized_fill_is_invalid() {
        assert_eq!(
            Raster::filled(u32::MAX, u32::MAX, PixelLayout::Rgba, Color::default()),
            Err(EngineError::InvalidImage { width: u32::MAX, height: u32::MAX })
        );
        assert_eq!(
            Raster::filled(0, 3, PixelLayout::Rgb, Color::default()),
            Err(EngineError::InvalidImage { width: 0, height: 3 })
        );
    }

    #[test]
    fn set_color_outside_image_is_out_of_bounds() {
        let mut raster = Raster::filled(4, 4, PixelLayout::Rgb, Color::default()).unwrap();
        assert_eq!(
            raster.set_color(u32::MAX, 0, Color::new(1, 1, 1)),
            Err(EngineError::OutOfBounds {
                bbox: BoundingBox::new(u32::MAX, 0, u32::MAX, 1),
                width: 4,
                height: 4,
            })
        );
        assert_eq!(
            raster.set_color(1, 4, Color::new(1, 1, 1)),
            Err(EngineError::OutOfBounds {
                bbox: BoundingBox::new(1, 4, 2, 5),
                width: 4,
                height: 4,
            })
        );
    }

    #[test]
    fn crop_copies_exact_region() {
        let mut raster = Raster::filled(6, 6, PixelLayout::Rgb, Color::new(0, 0, 0)).unwrap();
        raster.set_color(2, 3, Color::new(9, 9, 9)).unwrap();
        let crop = raster.crop(&BoundingBox::new(2, 2, 5, 4)).unwrap();
        assert_eq!((crop.width(), crop.height()), (3, 2));
        assert_eq!(crop.color_at(0, 1), Some(Color::new(9, 9, 9)));
        assert_eq!(crop.color_at(1, 1), Some(Color::new(0, 0, 0)));
    }

    #[test]
    fn crop_outside_image_is_out_of_bounds() {
        let raster = Raster::filled(4, 4, PixelLayout::Rgb, Color::default()).unwrap();
        let bbox = BoundingBox::new(2, 2, 5, 4);
        assert_eq!(
            raster.crop(&bbox),
            Err(EngineError::OutOfBounds { bbox, width: 4, height: 4 })
        );
    }

    #[test]
    fn image_buffer_round_trip_keeps_alpha() {
        let mut buffer = image::RgbaImage::new(2, 1);
        buffer.put_pixel(1, 0, image::Rgba([10, 20, 30, 40]));
        let raster = Raster::try_from(buffer.clone()).unwrap();
        assert_eq!(raster.alpha_at(1, 0), Some(40));
        assert_eq!(raster.to_rgba_image(), buffer);
        assert_eq!(raster.to_rgb_image().get_pixel(1, 0), &image::Rgb([10, 20, 30]));
    }

    #[test]
    fn dynamic_image_converts_to_opaque_rgba() {
        let mut buffer = image::RgbImage::new(2, 2);
        buffer.put_pixel(0, 1, image::Rgb([7, 8, 9]));
        let raster = Raster::try_from(&image::DynamicImage::ImageRgb8(buffer)).unwrap();
        assert_eq!(raster.layout(), PixelLayout::Rgba);
        assert_eq!(raster.color_at(0, 1), Some(Color::new(7, 8, 9)));
        assert_eq!(raster.alpha_at(0, 1), Some(255));
        assert_eq!(raster.alpha_at(1, 0), Some(255));
    }

    #[test]
    fn empty_image_buffer_is_invalid() {
        let buffer = image::RgbaImage::new(0, 0);
        assert_eq!(
            Raster::try_from(buffer),
            Err(EngineError::InvalidImage { width: 0, height: 0 })
        );
    }
}
