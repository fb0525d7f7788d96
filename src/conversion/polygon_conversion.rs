use crate::annotations::point::Point;
use crate::conversion::box_conversion::{Xyxy, check_scale};
use crate::error::{Result, VisionError};
use itertools::Itertools;

/// The smallest axis-aligned box containing every vertex.
pub fn polygon_to_box(vertices: &[Point]) -> Result<Xyxy> {
    let (first, rest) = vertices.split_first().ok_or(VisionError::EmptyPolygon)?;
    Ok(rest.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(x1, y1, x2, y2), p| (x1.min(p.x), y1.min(p.y), x2.max(p.x), y2.max(p.y)),
    ))
}

/// The four corners of a box, clockwise from the top-left.
pub fn box_to_polygon((x1, y1, x2, y2): Xyxy) -> Vec<Point> {
    vec![
        Point::new(x1, y1),
        Point::new(x2, y1),
        Point::new(x2, y2),
        Point::new(x1, y2),
    ]
}

fn pair_up(flat: &[f64]) -> Result<impl Iterator<Item = (f64, f64)> + '_> {
    if flat.len() % 2 != 0 {
        return Err(VisionError::OddCoordinateCount(flat.len()));
    }
    Ok(flat.iter().copied().tuples())
}

/// Turns a flat `[x1, y1, x2, y2, ...]` pixel sequence into normalized vertices.
///
/// `scale` is `(height, width)`.
pub fn pixel_to_normalized_vertices(flat_xy: &[f64], scale: (u32, u32)) -> Result<Vec<Point>> {
    check_scale(scale)?;
    let (height, width) = (scale.0 as f64, scale.1 as f64);
    Ok(pair_up(flat_xy)?
        .map(|(x, y)| Point::new(x / width, y / height))
        .collect())
}

/// Turns a flat normalized sequence back into pixel vertices, rounded to whole pixels.
pub fn normalized_to_pixel_vertices(
    flat_xyn: &[f64],
    scale: (u32, u32),
) -> Result<Vec<(i64, i64)>> {
    check_scale(scale)?;
    let (height, width) = (scale.0 as f64, scale.1 as f64);
    Ok(pair_up(flat_xyn)?
        .map(|(x, y)| ((x * width).round() as i64, (y * height).round() as i64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_to_box_encloses_all_vertices() {
        let rectangle = [
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 4.0),
            Point::new(1.0, 4.0),
        ];
        assert_eq!(polygon_to_box(&rectangle).unwrap(), (1.0, 1.0, 3.0, 4.0));

        let star = [
            Point::new(5.0, 0.0),
            Point::new(6.5, 3.5),
            Point::new(10.0, 4.0),
            Point::new(7.0, 6.5),
            Point::new(8.0, 10.0),
            Point::new(5.0, 8.0),
            Point::new(2.0, 10.0),
            Point::new(3.0, 6.5),
            Point::new(0.0, 4.0),
        ];
        assert_eq!(polygon_to_box(&star).unwrap(), (0.0, 0.0, 10.0, 10.0));
        assert_eq!(polygon_to_box(&[Point::new(2.0, 3.0)]).unwrap(), (2.0, 3.0, 2.0, 3.0));
    }

    #[test]
    fn empty_polygon_is_an_error() {
        assert!(matches!(polygon_to_box(&[]), Err(VisionError::EmptyPolygon)));
    }

    #[test]
    fn box_to_polygon_and_back() {
        let bbox = (1.0, 2.0, 5.0, 9.0);
        let polygon = box_to_polygon(bbox);
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon[1], Point::new(5.0, 2.0));
        assert_eq!(polygon_to_box(&polygon).unwrap(), bbox);
    }

    #[test]
    fn flat_vertices_are_paired_and_scaled() {
        let normalized =
            pixel_to_normalized_vertices(&[50.0, 25.0, 100.0, 75.0, 0.0, 100.0], (100, 200))
                .unwrap();
        assert_eq!(
            normalized,
            vec![Point::new(0.25, 0.25), Point::new(0.5, 0.75), Point::new(0.0, 1.0)]
        );

        let pixels =
            normalized_to_pixel_vertices(&[0.25, 0.25, 0.5, 0.75, 0.0, 1.0], (100, 200)).unwrap();
        assert_eq!(pixels, vec![(50, 25), (100, 75), (0, 100)]);
    }

    #[test]
    fn odd_length_sequences_are_rejected() {
        assert!(matches!(
            pixel_to_normalized_vertices(&[1.0, 2.0, 3.0], (10, 10)),
            Err(VisionError::OddCoordinateCount(3))
        ));
        assert!(normalized_to_pixel_vertices(&[0.5], (10, 10)).is_err());
    }
}
