pub mod color;
pub mod color_palette;
