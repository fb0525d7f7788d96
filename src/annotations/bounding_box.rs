use crate::conversion::box_conversion::corner_to_center_form;
use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};

/// A struct representing a bounding box.
///
/// A bounding box is the smallest axis-aligned rectangle that contains an object in an image.
/// It is stored in corner form: the left and top edges, then the right and bottom edges.
///
/// This project uses the standard convention of the left side of the image being x=0 and the top
/// of the image being y=0.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        if left > right {
            Err(VisionError::InvalidBox(format!(
                "value for left > value for right ({} > {}).",
                left, right
            )))
        } else if top > bottom {
            Err(VisionError::InvalidBox(format!(
                "value for top > value for bottom ({} > {}).",
                top, bottom
            )))
        } else {
            Ok(BoundingBox { left, top, right, bottom })
        }
    }

    /// Builds a box without checking the corner order.
    ///
    /// Detector output is taken as-is; consumers that need ordered corners should use `new`.
    pub fn from_xyxy((left, top, right, bottom): (f64, f64, f64, f64)) -> Self {
        BoundingBox { left, top, right, bottom }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }
}

/// Read access to the geometry of anything that carries a bounding box.
pub trait BoundingBoxGeometry {
    fn left(&self) -> f64;
    fn top(&self) -> f64;
    fn right(&self) -> f64;
    fn bottom(&self) -> f64;

    fn width(&self) -> f64 {
        self.right() - self.left()
    }

    fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }

    fn center(&self) -> (f64, f64) {
        let (cx, cy, _, _) = corner_to_center_form(self.as_xyxy());
        (cx, cy)
    }

    fn as_xyxy(&self) -> (f64, f64, f64, f64) {
        (self.left(), self.top(), self.right(), self.bottom())
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f64 {
        self.left
    }

    fn top(&self) -> f64 {
        self.top
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn bottom(&self) -> f64 {
        self.bottom
    }
}
