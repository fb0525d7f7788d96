use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::annotations::point::Point;
use crate::conversion::polygon_conversion::polygon_to_box;
use crate::error::{Result, VisionError};
use ndarray::{Array1, Array2, Axis};

/// A batch of detections stored column by column.
///
/// `boxes` always has one `(x1, y1, x2, y2)` row per detection. The other attributes are
/// optional, but when present they hold exactly one entry per detection; the `with_*`
/// constructors reject anything else.
///
/// A batch is never changed after it is built. `select` and `filter` return independent copies.
///
/// Equality compares every attribute on its own: two batches are equal when their boxes are
/// equal and each optional attribute is either missing from both or equal in both.
#[derive(Clone, Debug, PartialEq)]
pub struct Detections {
    boxes: Array2<f64>,
    polygons: Option<Vec<Vec<Point>>>,
    confidence: Option<Array1<f64>>,
    class_id: Option<Array1<i64>>,
    tracker_id: Option<Array1<i64>>,
    object_length: Option<Array1<f64>>,
    object_area: Option<Array1<f64>>,
}

fn check_len(attribute: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(VisionError::LengthMismatch { attribute, expected, found });
    }
    Ok(())
}

impl Detections {
    pub fn new(boxes: Array2<f64>) -> Result<Self> {
        if boxes.ncols() != 4 {
            return Err(VisionError::InvalidBoxShape(boxes.ncols()));
        }
        Ok(Detections {
            boxes,
            polygons: None,
            confidence: None,
            class_id: None,
            tracker_id: None,
            object_length: None,
            object_area: None,
        })
    }

    pub fn empty() -> Self {
        Detections::from_boxes(Vec::new())
    }

    pub fn from_boxes(boxes: Vec<[f64; 4]>) -> Self {
        let boxes = Array2::from(boxes);
        Detections {
            boxes,
            polygons: None,
            confidence: None,
            class_id: None,
            tracker_id: None,
            object_length: None,
            object_area: None,
        }
    }

    /// Builds a batch whose boxes enclose the given polygons.
    pub fn from_polygons(polygons: Vec<Vec<Point>>, class_ids: Option<Vec<i64>>) -> Result<Self> {
        let boxes = polygons
            .iter()
            .map(|polygon| {
                polygon_to_box(polygon).map(|(x1, y1, x2, y2)| [x1, y1, x2, y2])
            })
            .collect::<Result<Vec<[f64; 4]>>>()?;
        let detections = Detections::from_boxes(boxes).with_polygons(polygons)?;
        match class_ids {
            Some(class_ids) => detections.with_class_id(class_ids),
            None => Ok(detections),
        }
    }

    pub fn with_polygons(mut self, polygons: Vec<Vec<Point>>) -> Result<Self> {
        check_len("polygons", self.len(), polygons.len())?;
        self.polygons = Some(polygons);
        Ok(self)
    }

    pub fn with_confidence(mut self, confidence: impl Into<Array1<f64>>) -> Result<Self> {
        let confidence = confidence.into();
        check_len("confidence", self.len(), confidence.len())?;
        self.confidence = Some(confidence);
        Ok(self)
    }

    pub fn with_class_id(mut self, class_id: impl Into<Array1<i64>>) -> Result<Self> {
        let class_id = class_id.into();
        check_len("class_id", self.len(), class_id.len())?;
        self.class_id = Some(class_id);
        Ok(self)
    }

    pub fn with_tracker_id(mut self, tracker_id: impl Into<Array1<i64>>) -> Result<Self> {
        let tracker_id = tracker_id.into();
        check_len("tracker_id", self.len(), tracker_id.len())?;
        self.tracker_id = Some(tracker_id);
        Ok(self)
    }

    pub fn with_object_length(mut self, object_length: impl Into<Array1<f64>>) -> Result<Self> {
        let object_length = object_length.into();
        check_len("object_length", self.len(), object_length.len())?;
        self.object_length = Some(object_length);
        Ok(self)
    }

    pub fn with_object_area(mut self, object_area: impl Into<Array1<f64>>) -> Result<Self> {
        let object_area = object_area.into();
        check_len("object_area", self.len(), object_area.len())?;
        self.object_area = Some(object_area);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.boxes.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn boxes(&self) -> &Array2<f64> {
        &self.boxes
    }

    pub fn polygons(&self) -> Option<&[Vec<Point>]> {
        self.polygons.as_deref()
    }

    pub fn confidence(&self) -> Option<&Array1<f64>> {
        self.confidence.as_ref()
    }

    pub fn class_id(&self) -> Option<&Array1<i64>> {
        self.class_id.as_ref()
    }

    pub fn tracker_id(&self) -> Option<&Array1<i64>> {
        self.tracker_id.as_ref()
    }

    pub fn object_length(&self) -> Option<&Array1<f64>> {
        self.object_length.as_ref()
    }

    pub fn object_area(&self) -> Option<&Array1<f64>> {
        self.object_area.as_ref()
    }

    pub fn get(&self, index: usize) -> Result<Detection> {
        self.check_index(index)?;
        Ok(self.record(index))
    }

    /// Copies the rows at `indices`, in that order, into a new batch.
    ///
    /// Indices may repeat. Attributes missing from `self` stay missing.
    pub fn select(&self, indices: &[usize]) -> Result<Detections> {
        for &index in indices {
            self.check_index(index)?;
        }
        Ok(Detections {
            boxes: self.boxes.select(Axis(0), indices),
            polygons: self
                .polygons
                .as_ref()
                .map(|polygons| indices.iter().map(|&i| polygons[i].clone()).collect()),
            confidence: self.confidence.as_ref().map(|a| a.select(Axis(0), indices)),
            class_id: self.class_id.as_ref().map(|a| a.select(Axis(0), indices)),
            tracker_id: self.tracker_id.as_ref().map(|a| a.select(Axis(0), indices)),
            object_length: self.object_length.as_ref().map(|a| a.select(Axis(0), indices)),
            object_area: self.object_area.as_ref().map(|a| a.select(Axis(0), indices)),
        })
    }

    /// Keeps the rows whose entry in `mask` is true.
    pub fn filter(&self, mask: &[bool]) -> Result<Detections> {
        check_len("mask", self.len(), mask.len())?;
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(index, keep)| keep.then_some(index))
            .collect();
        self.select(&indices)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { detections: self, next: 0 }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(VisionError::IndexOutOfRange {
                index: index as i64,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn record(&self, index: usize) -> Detection {
        let row = self.boxes.row(index);
        Detection {
            bounding_box: BoundingBox::from_xyxy((row[0], row[1], row[2], row[3])),
            polygon: self.polygons.as_ref().map(|p| p[index].clone()),
            confidence: self.confidence.as_ref().map(|a| a[index]),
            class_id: self.class_id.as_ref().map(|a| a[index]),
            tracker_id: self.tracker_id.as_ref().map(|a| a[index]),
            object_length: self.object_length.as_ref().map(|a| a[index]),
            object_area: self.object_area.as_ref().map(|a| a[index]),
        }
    }
}

/// Iterator over the records of a `Detections` batch.
pub struct Iter<'a> {
    detections: &'a Detections,
    next: usize,
}

impl Iterator for Iter<'_> {
    type Item = Detection;

    fn next(&mut self) -> Option<Detection> {
        if self.next >= self.detections.len() {
            return None;
        }
        let detection = self.detections.record(self.next);
        self.next += 1;
        Some(detection)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.detections.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Detections {
    type Item = Detection;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
