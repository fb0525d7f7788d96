pub mod bounding_box;
pub mod detection;
pub mod detections;
pub mod point;
