use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::point::Point;

/// A detection is one object out of a `Detections` batch.
///
/// Every attribute is read from the same row of the batch's parallel arrays. Attributes the
/// batch doesn't carry are `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub polygon: Option<Vec<Point>>,
    pub confidence: Option<f64>,
    pub class_id: Option<i64>,
    pub tracker_id: Option<i64>,
    pub object_length: Option<f64>,
    pub object_area: Option<f64>,
}

impl BoundingBoxGeometry for Detection {
    fn left(&self) -> f64 {
        self.bounding_box.left()
    }

    fn top(&self) -> f64 {
        self.bounding_box.top()
    }

    fn right(&self) -> f64 {
        self.bounding_box.right()
    }

    fn bottom(&self) -> f64 {
        self.bounding_box.bottom()
    }
}
