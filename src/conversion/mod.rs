pub mod box_conversion;
pub mod label_files;
pub mod polygon_conversion;
