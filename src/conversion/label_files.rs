use crate::annotations::detections::Detections;
use crate::annotations::point::Point;
use crate::error::{Result, VisionError};
use itertools::Itertools;
use log::warn;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A numeric token from a label file.
///
/// Values that are whole numbers are kept as `Int` so that writing them back produces `3`
/// rather than `3.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelValue {
    Int(i64),
    Float(f64),
}

impl LabelValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            LabelValue::Int(v) => *v as f64,
            LabelValue::Float(v) => *v,
        }
    }

    fn parse(token: &str, line: usize) -> Result<Self> {
        let value: f64 = token.parse().map_err(|_| VisionError::MalformedLabelLine {
            line,
            reason: format!("'{}' is not a number", token),
        })?;
        Ok(LabelValue::from(value))
    }
}

impl From<f64> for LabelValue {
    fn from(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            LabelValue::Int(value as i64)
        } else {
            LabelValue::Float(value)
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Int(v) => write!(f, "{}", v),
            LabelValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One `classId x1 y1 x2 y2` line.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxLabel {
    pub class_id: i64,
    pub coords: [LabelValue; 4],
}

impl BoxLabel {
    pub fn as_xyxy(&self) -> (f64, f64, f64, f64) {
        let [x1, y1, x2, y2] = self.coords.map(|v| v.as_f64());
        (x1, y1, x2, y2)
    }
}

/// One `classId x1 y1 x2 y2 x3 y3 ...` line.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonLabel {
    pub class_id: i64,
    pub vertices: Vec<Point>,
}

fn parse_class_id(token: &str, line: usize) -> Result<i64> {
    match LabelValue::parse(token, line)? {
        LabelValue::Int(class_id) => Ok(class_id),
        LabelValue::Float(_) => Err(VisionError::MalformedLabelLine {
            line,
            reason: format!("class id '{}' is not a whole number", token),
        }),
    }
}

/// Opens `filepath` for reading, or returns `None` after logging a warning if it doesn't exist.
fn open_if_present(filepath: &Path) -> Result<Option<BufReader<File>>> {
    match File::open(filepath) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("{}", VisionError::MissingFile(filepath.to_path_buf()));
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Yields `(line number, tokens)` for every non-blank line. Line numbers start at 1.
fn tokenized_lines(reader: impl BufRead) -> impl Iterator<Item = Result<(usize, Vec<String>)>> {
    reader
        .lines()
        .enumerate()
        .map(|(index, line)| -> Result<(usize, Vec<String>)> {
            let line = line?;
            let tokens = line.split_whitespace().map(str::to_string).collect::<Vec<_>>();
            Ok((index + 1, tokens))
        })
        .filter(|entry| !matches!(entry, Ok((_, tokens)) if tokens.is_empty()))
}

/// Reads a box label file. A missing file is logged and read as empty.
pub fn boxes_from_txt_file(filepath: &Path) -> Result<Vec<BoxLabel>> {
    let Some(reader) = open_if_present(filepath)? else {
        return Ok(Vec::new());
    };
    let mut labels = Vec::new();
    for entry in tokenized_lines(reader) {
        let (line, tokens) = entry?;
        if tokens.len() != 5 {
            return Err(VisionError::MalformedLabelLine {
                line,
                reason: format!("expected 5 values, found {}", tokens.len()),
            });
        }
        let class_id = parse_class_id(&tokens[0], line)?;
        let coords = [
            LabelValue::parse(&tokens[1], line)?,
            LabelValue::parse(&tokens[2], line)?,
            LabelValue::parse(&tokens[3], line)?,
            LabelValue::parse(&tokens[4], line)?,
        ];
        labels.push(BoxLabel { class_id, coords });
    }
    Ok(labels)
}

/// Reads a polygon label file. A missing file is logged and read as empty.
pub fn polygons_from_txt_file(filepath: &Path) -> Result<Vec<PolygonLabel>> {
    let Some(reader) = open_if_present(filepath)? else {
        return Ok(Vec::new());
    };
    let mut labels = Vec::new();
    for entry in tokenized_lines(reader) {
        let (line, tokens) = entry?;
        let coordinate_count = tokens.len() - 1;
        if coordinate_count == 0 || coordinate_count % 2 != 0 {
            return Err(VisionError::MalformedLabelLine {
                line,
                reason: format!(
                    "expected an even, non-zero number of coordinates, found {}",
                    coordinate_count
                ),
            });
        }
        let class_id = parse_class_id(&tokens[0], line)?;
        let vertices = tokens[1..]
            .iter()
            .tuples()
            .map(|(x, y)| {
                Ok(Point::new(
                    LabelValue::parse(x, line)?.as_f64(),
                    LabelValue::parse(y, line)?.as_f64(),
                ))
            })
            .collect::<Result<Vec<Point>>>()?;
        labels.push(PolygonLabel { class_id, vertices });
    }
    Ok(labels)
}

pub fn write_boxes_to_txt_file(filepath: &Path, labels: &[BoxLabel]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(filepath)?);
    for label in labels {
        writeln!(writer, "{} {}", label.class_id, label.coords.iter().join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_polygons_to_txt_file(filepath: &Path, labels: &[PolygonLabel]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(filepath)?);
    for label in labels {
        let coords = label
            .vertices
            .iter()
            .flat_map(|p| [LabelValue::from(p.x), LabelValue::from(p.y)])
            .join(" ");
        writeln!(writer, "{} {}", label.class_id, coords)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a file with the class names into a vector so that class ids can be given meaning.
pub fn read_class_names(filepath: &Path) -> Result<Vec<String>> {
    let names = BufReader::new(File::open(filepath)?)
        .lines()
        .collect::<io::Result<Vec<String>>>()?;
    Ok(names.into_iter().map(|name| name.trim_end().to_string()).collect())
}

/// A batch holding one box and class id per label.
pub fn detections_from_box_labels(labels: &[BoxLabel]) -> Result<Detections> {
    let boxes = labels
        .iter()
        .map(|label| {
            let (x1, y1, x2, y2) = label.as_xyxy();
            [x1, y1, x2, y2]
        })
        .collect();
    let class_ids: Vec<i64> = labels.iter().map(|label| label.class_id).collect();
    Detections::from_boxes(boxes).with_class_id(class_ids)
}

/// A batch holding each polygon, its enclosing box and its class id.
pub fn detections_from_polygon_labels(labels: Vec<PolygonLabel>) -> Result<Detections> {
    let (class_ids, polygons): (Vec<i64>, Vec<Vec<Point>>) = labels
        .into_iter()
        .map(|label| (label.class_id, label.vertices))
        .unzip();
    Detections::from_polygons(polygons, Some(class_ids))
}

/// Display labels for a batch, looked up by class id.
///
/// Records without a class id, or whose id has no name, are labeled with the id itself or
/// left blank.
pub fn labels_from_class_names(detections: &Detections, class_names: &[String]) -> Vec<String> {
    detections
        .iter()
        .map(|detection| match detection.class_id {
            Some(class_id) => usize::try_from(class_id)
                .ok()
                .and_then(|i| class_names.get(i))
                .cloned()
                .unwrap_or_else(|| class_id.to_string()),
            None => String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("visionnest_{}_{}.txt", name, std::process::id()))
    }

    #[test]
    fn label_values_keep_whole_numbers_as_integers() {
        assert_eq!(LabelValue::from(3.0), LabelValue::Int(3));
        assert_eq!(LabelValue::from(-2.0), LabelValue::Int(-2));
        assert_eq!(LabelValue::from(0.25), LabelValue::Float(0.25));
        assert_eq!(LabelValue::Int(3).to_string(), "3");
        assert_eq!(LabelValue::Float(0.25).to_string(), "0.25");
        assert_eq!(LabelValue::parse("4.0", 1).unwrap(), LabelValue::Int(4));
    }

    #[test]
    fn box_file_round_trip() {
        let path = temp_path("boxes_round_trip");
        fs::write(&path, "0 10.0 20 30.5 40\n\n2 0.1 0.2 0.3 0.4\n").unwrap();

        let labels = boxes_from_txt_file(&path).unwrap();
        assert_eq!(
            labels,
            vec![
                BoxLabel {
                    class_id: 0,
                    coords: [
                        LabelValue::Int(10),
                        LabelValue::Int(20),
                        LabelValue::Float(30.5),
                        LabelValue::Int(40),
                    ],
                },
                BoxLabel {
                    class_id: 2,
                    coords: [
                        LabelValue::Float(0.1),
                        LabelValue::Float(0.2),
                        LabelValue::Float(0.3),
                        LabelValue::Float(0.4),
                    ],
                },
            ]
        );

        write_boxes_to_txt_file(&path, &labels).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "0 10 20 30.5 40\n2 0.1 0.2 0.3 0.4\n"
        );
        assert_eq!(boxes_from_txt_file(&path).unwrap(), labels);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn polygon_file_round_trip() {
        let path = temp_path("polygons_round_trip");
        fs::write(&path, "1 1 1 3.0 1 3 4.5 1 4\n").unwrap();

        let labels = polygons_from_txt_file(&path).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].class_id, 1);
        assert_eq!(
            labels[0].vertices,
            vec![
                Point::new(1.0, 1.0),
                Point::new(3.0, 1.0),
                Point::new(3.0, 4.5),
                Point::new(1.0, 4.0),
            ]
        );

        write_polygons_to_txt_file(&path, &labels).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1 1 1 3 1 3 4.5 1 4\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_files_read_as_empty() {
        let path = temp_path("does_not_exist");
        assert!(boxes_from_txt_file(&path).unwrap().is_empty());
        assert!(polygons_from_txt_file(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_report_their_line_number() {
        let path = temp_path("malformed");
        fs::write(&path, "0 1 2 3 4\n0 1 2 3\n").unwrap();
        assert!(matches!(
            boxes_from_txt_file(&path),
            Err(VisionError::MalformedLabelLine { line: 2, .. })
        ));

        fs::write(&path, "0 1 2 x 4\n").unwrap();
        assert!(matches!(
            boxes_from_txt_file(&path),
            Err(VisionError::MalformedLabelLine { line: 1, .. })
        ));

        fs::write(&path, "1.5 1 2 3 4\n").unwrap();
        assert!(boxes_from_txt_file(&path).is_err());

        fs::write(&path, "0 1 2 3\n").unwrap();
        assert!(matches!(
            polygons_from_txt_file(&path),
            Err(VisionError::MalformedLabelLine { line: 1, .. })
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn labels_become_detections() {
        let boxes = vec![
            BoxLabel { class_id: 4, coords: [1.0, 2.0, 3.0, 4.0].map(LabelValue::from) },
            BoxLabel { class_id: 0, coords: [0.5, 0.5, 1.5, 2.5].map(LabelValue::from) },
        ];
        let detections = detections_from_box_labels(&boxes).unwrap();
        assert_eq!(detections.boxes(), &array![[1.0, 2.0, 3.0, 4.0], [0.5, 0.5, 1.5, 2.5]]);
        assert_eq!(detections.class_id(), Some(&array![4, 0]));

        let polygons = vec![PolygonLabel {
            class_id: 9,
            vertices: vec![Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(3.0, 4.0)],
        }];
        let detections = detections_from_polygon_labels(polygons).unwrap();
        assert_eq!(detections.boxes(), &array![[1.0, 1.0, 3.0, 4.0]]);
        assert_eq!(detections.polygons().unwrap()[0].len(), 3);
    }

    #[test]
    fn class_names_label_detections() {
        let path = temp_path("class_names");
        fs::write(&path, "person\nbicycle\ncar\n").unwrap();
        let names = read_class_names(&path).unwrap();
        assert_eq!(names, vec!["person", "bicycle", "car"]);
        fs::remove_file(&path).unwrap();

        let detections = Detections::from_boxes(vec![[0.0; 4]; 3])
            .with_class_id(vec![2, 0, 17])
            .unwrap();
        assert_eq!(labels_from_class_names(&detections, &names), vec!["car", "person", "17"]);
        assert_eq!(
            labels_from_class_names(&Detections::from_boxes(vec![[0.0; 4]]), &names),
            vec![""]
        );
    }
}
