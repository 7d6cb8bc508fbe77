pub mod background;
pub mod bounding_box;
pub mod component_labeler;
pub mod foreground_mask;
pub mod palette;
pub mod palette_quantizer;
pub mod pixel;
pub mod raster;
pub mod sprite_segmenter;
