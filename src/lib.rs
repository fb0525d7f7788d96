//! Detection record sets, color palettes and box annotation.
//!
//! A batch of detections is held as a [`Detections`] record set. [`BoxAnnotator`] draws it onto
//! an `image::RgbImage`, coloring each detection from a [`ColorPalette`] by class id, or by
//! position when the batch carries no class ids.

pub mod annotations;
pub mod annotators;
pub mod config;
pub mod conversion;
pub mod drawing;
pub mod error;
pub mod image_utils;

pub use annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
pub use annotations::detection::Detection;
pub use annotations::detections::Detections;
pub use annotations::point::Point;
pub use annotators::box_annotator::{AnnotationReport, BoxAnnotator};
pub use config::AnnotatorConfig;
pub use drawing::drawing_backend::{DrawingBackend, TextStyle};
pub use drawing::imageproc_backend::ImageprocBackend;
pub use error::{Result, VisionError};
pub use image_utils::color::Color;
pub use image_utils::color_palette::{ColorInput, ColorPalette};
