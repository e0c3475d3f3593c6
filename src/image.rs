mod color;
mod load;
mod meta;
mod raster;
mod source;

pub use color::apply_color_filter;
pub use load::{decode_image_from_bytes, decode_image_from_path};
pub use meta::{ImageMeta, human_readable_bytes};
pub use raster::draw_transformed;
pub use source::SourceImage;
