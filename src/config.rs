use crate::drawing::imageproc_backend::DEFAULT_LABEL_CLEARANCE;
use crate::error::Result;
use crate::image_utils::color::Color;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings for a `BoxAnnotator`. Every field is optional in the JSON form.
///
/// ```json
/// { "line_width": 3, "font_size": 18.0, "text_color": "#ffffff", "label_clearance": 3 }
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Outline width in pixels. Computed from the image size when absent.
    pub line_width: Option<u32>,
    /// Label glyph height in pixels. Derived from the line width when absent.
    pub font_size: Option<f32>,
    /// Hex code of the label text color.
    pub text_color: String,
    /// Minimum room above a box, in pixels, for its label to be drawn above it.
    pub label_clearance: i32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig {
            line_width: None,
            font_size: None,
            text_color: Color::BLACK.to_hex(),
            label_clearance: DEFAULT_LABEL_CLEARANCE,
        }
    }
}

impl AnnotatorConfig {
    pub fn from_json_file(filepath: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(filepath)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn text_color(&self) -> Result<Color> {
        Color::from_hex(&self.text_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisionError;

    #[test]
    fn missing_fields_take_defaults() {
        let config = AnnotatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnnotatorConfig::default());
        assert_eq!(config.text_color().unwrap(), Color::BLACK);
        assert_eq!(config.label_clearance, 3);
    }

    #[test]
    fn fields_are_read() {
        let config = AnnotatorConfig::from_json_str(
            r##"{"line_width": 4, "font_size": 16.5, "text_color": "#FFFFFF"}"##,
        )
        .unwrap();
        assert_eq!(config.line_width, Some(4));
        assert_eq!(config.font_size, Some(16.5));
        assert_eq!(config.text_color().unwrap(), Color::WHITE);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            AnnotatorConfig::from_json_str(r#"{"line_width": "wide"}"#),
            Err(VisionError::Config(_))
        ));
        let config = AnnotatorConfig::from_json_str(r#"{"text_color": "red"}"#).unwrap();
        assert!(matches!(config.text_color(), Err(VisionError::InvalidColorFormat(_))));
    }

    #[test]
    fn reads_from_a_file() {
        let path = std::env::temp_dir()
            .join(format!("visionnest_annotator_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"line_width": 2}"#).unwrap();
        let config = AnnotatorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.line_width, Some(2));
        std::fs::remove_file(&path).unwrap();
    }
}
