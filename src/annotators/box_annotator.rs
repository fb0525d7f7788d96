use crate::annotations::bounding_box::BoundingBoxGeometry;
use crate::annotations::detection::Detection;
use crate::annotations::detections::Detections;
use crate::config::AnnotatorConfig;
use crate::drawing::drawing_backend::{DrawingBackend, TextStyle};
use crate::drawing::imageproc_backend::ImageprocBackend;
use crate::error::{Result, VisionError};
use crate::image_utils::color::Color;
use crate::image_utils::color_palette::{ColorInput, ColorPalette};
use image::RgbImage;
use log::{error, warn};

/// Number of channels in an `RgbImage`.
const RGB_CHANNELS: u32 = 3;

/// Outline width for an image of this size when none is configured.
///
/// The mean of height, width and channel count, scaled by 0.003, with a floor of 2 pixels.
pub fn default_line_width(image: &RgbImage) -> u32 {
    let (width, height) = image.dimensions();
    line_width_for(width, height)
}

fn line_width_for(width: u32, height: u32) -> u32 {
    let mean = (f64::from(height) + f64::from(width) + f64::from(RGB_CHANNELS)) / 3.0;
    ((mean * 0.003).round() as u32).max(2)
}

/// Counts from one `annotate_all` pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnnotationReport {
    pub drawn: usize,
    pub skipped: usize,
}

/// Draws detection boxes and their labels onto an image.
///
/// The annotator borrows the image mutably for as long as it lives, so a single annotator is
/// the only writer while a pass is in progress. Colors come from the caller when given, and
/// otherwise from `palette`, indexed by class id, or by position when the batch has no class
/// ids.
pub struct BoxAnnotator<'a, B: DrawingBackend = ImageprocBackend> {
    image: &'a mut RgbImage,
    backend: B,
    palette: ColorPalette,
    line_width: u32,
    font_size: Option<f32>,
    text_color: Color,
}

impl<'a> BoxAnnotator<'a, ImageprocBackend> {
    pub fn new(image: &'a mut RgbImage, line_width: Option<u32>, font_size: Option<f32>) -> Self {
        BoxAnnotator::with_backend(image, ImageprocBackend::new(), line_width, font_size)
    }

    pub fn from_config(image: &'a mut RgbImage, config: &AnnotatorConfig) -> Result<Self> {
        let backend = ImageprocBackend::new().with_label_clearance(config.label_clearance);
        let text_color = config.text_color()?;
        Ok(BoxAnnotator::with_backend(image, backend, config.line_width, config.font_size)
            .with_text_color(text_color))
    }
}

impl<'a, B: DrawingBackend> BoxAnnotator<'a, B> {
    pub fn with_backend(
        image: &'a mut RgbImage,
        backend: B,
        line_width: Option<u32>,
        font_size: Option<f32>,
    ) -> Self {
        let line_width = line_width.unwrap_or_else(|| default_line_width(image));
        BoxAnnotator {
            image,
            backend,
            palette: ColorPalette::new(),
            line_width,
            font_size,
            text_color: Color::BLACK,
        }
    }

    /// Replaces the palette used for detections without a caller-supplied color.
    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_text_color(mut self, text_color: Color) -> Self {
        self.text_color = text_color;
        self
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn image(&self) -> &RgbImage {
        &*self.image
    }

    /// Draws one box outline and, if `label` isn't empty, its label.
    ///
    /// The label is drawn on a background of the box color, at the box's top-left corner. Corners
    /// are clipped to at most one line width outside the image before they reach the backend.
    pub fn draw_box(
        &mut self,
        bbox: &impl BoundingBoxGeometry,
        label: &str,
        color: impl Into<ColorInput>,
        text_color: Option<ColorInput>,
    ) -> Result<()> {
        let color = color.into().resolve()?;
        let text_color = match text_color {
            Some(text_color) => text_color.resolve()?,
            None => self.text_color,
        };
        let (x1, y1, x2, y2) = bbox.as_xyxy();
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(VisionError::MalformedBox(x1, y1, x2, y2));
        }
        let (width, height) = self.image.dimensions();
        let margin = f64::from(self.line_width.max(1));
        let clip_x = |x: f64| x.clamp(-margin, f64::from(width) - 1.0 + margin) as i32;
        let clip_y = |y: f64| y.clamp(-margin, f64::from(height) - 1.0 + margin) as i32;
        let top_left = (clip_x(x1), clip_y(y1));
        let bottom_right = (clip_x(x2), clip_y(y2));

        self.backend
            .draw_rectangle(self.image, top_left, bottom_right, color, self.line_width, false)?;
        if !label.is_empty() {
            let style = TextStyle {
                color: text_color,
                line_width: self.line_width,
                font_size: self.font_size,
                background: Some(color),
            };
            self.backend.put_text(self.image, top_left, label, &style)?;
        }
        Ok(())
    }

    /// Draws every detection in the batch.
    ///
    /// Detection `i` is drawn in `colors[i]` when the caller supplies one that resolves, and
    /// otherwise in the palette color for its class id (or for `i` if the batch has no class
    /// ids). It is labeled with `labels[i]` when present.
    ///
    /// Short `colors` or `labels` lists are logged and the missing entries fall back as above. A
    /// detection that fails to draw is logged and skipped; the rest of the batch is still drawn.
    pub fn annotate_all(
        &mut self,
        detections: &Detections,
        labels: Option<&[String]>,
        colors: Option<&[ColorInput]>,
        text_color: Option<ColorInput>,
    ) -> AnnotationReport {
        if let Some(colors) = colors {
            if colors.len() < detections.len() {
                warn!(
                    "{} colors were provided for {} detections, falling back to the palette \
                     for the rest",
                    colors.len(),
                    detections.len()
                );
            }
        }
        if let Some(labels) = labels {
            if labels.len() < detections.len() {
                warn!(
                    "{} labels were provided for {} detections, the rest are left unlabeled",
                    labels.len(),
                    detections.len()
                );
            }
        }
        let override_colors: Vec<Option<Color>> = colors
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                entry
                    .resolve()
                    .inspect_err(|err| warn!("ignoring caller color: {}", err))
                    .ok()
            })
            .collect();
        let text_color = match text_color.map(|entry| entry.resolve()) {
            Some(Ok(text_color)) => text_color,
            Some(Err(err)) => {
                warn!("ignoring text color: {}", err);
                self.text_color
            }
            None => self.text_color,
        };

        let mut report = AnnotationReport::default();
        for (index, detection) in detections.iter().enumerate() {
            let label = labels
                .and_then(|labels| labels.get(index))
                .map(String::as_str)
                .unwrap_or("");
            let outcome = self
                .resolve_color(index, &detection, &override_colors)
                .and_then(|color| {
                    self.draw_box(&detection, label, color, Some(text_color.into()))
                });
            match outcome {
                Ok(()) => report.drawn += 1,
                Err(err) => {
                    error!("skipping detection {}: {}", index, err);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    fn resolve_color(
        &self,
        index: usize,
        detection: &Detection,
        override_colors: &[Option<Color>],
    ) -> Result<Color> {
        if let Some(color) = override_colors.get(index).copied().flatten() {
            return Ok(color);
        }
        let key = detection.class_id.unwrap_or(index as i64);
        self.palette.get_color_by_index(key)
    }
}
