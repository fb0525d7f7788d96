use crate::drawing::drawing_backend::{DrawingBackend, TextStyle, label_placement};
use crate::error::{Result, VisionError};
use crate::image_utils::color::Color;
use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::debug;

/// Glyph height per unit of line width when no font size is given.
const GLYPH_HEIGHT_PER_LINE_WIDTH: f32 = 11.0;

/// Average glyph advance as a fraction of its height, used to size labels without a font.
const ESTIMATED_ADVANCE_RATIO: f32 = 0.6;

pub const DEFAULT_LABEL_CLEARANCE: i32 = 3;

/// Draws onto an `RgbImage` with `imageproc`.
///
/// Text needs a font. Without one, labels still get their background rectangle, sized from an
/// estimate of the text width, but no glyphs.
#[derive(Clone, Debug)]
pub struct ImageprocBackend {
    font: Option<FontArc>,
    label_clearance: i32,
}

impl Default for ImageprocBackend {
    fn default() -> Self {
        ImageprocBackend::new()
    }
}

impl ImageprocBackend {
    pub fn new() -> Self {
        ImageprocBackend { font: None, label_clearance: DEFAULT_LABEL_CLEARANCE }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Loads a TrueType or OpenType font from its raw bytes.
    pub fn with_font_bytes(self, font_data: Vec<u8>) -> Result<Self> {
        let font =
            FontArc::try_from_vec(font_data).map_err(|err| VisionError::InvalidFont(err.to_string()))?;
        Ok(self.with_font(font))
    }

    pub fn with_label_clearance(mut self, label_clearance: i32) -> Self {
        self.label_clearance = label_clearance;
        self
    }

    fn measure(&self, scale: PxScale, text: &str) -> (u32, u32) {
        match &self.font {
            Some(font) => text_size(scale, font, text),
            None => {
                let advance = scale.x * ESTIMATED_ADVANCE_RATIO;
                let width = (advance * text.chars().count() as f32).ceil() as u32;
                (width, scale.y.ceil() as u32)
            }
        }
    }
}

/// Moves `point` to at most `margin` pixels outside `image`, so extents stay small.
fn clip_to_image(image: &RgbImage, point: (i32, i32), margin: u32) -> (i32, i32) {
    let (width, height) = image.dimensions();
    let margin = i64::from(margin.max(1));
    let clip = |v: i32, len: u32| {
        let upper = (i64::from(len) - 1 + margin).min(i64::from(i32::MAX));
        i64::from(v).clamp((-margin).max(i64::from(i32::MIN)), upper) as i32
    };
    (clip(point.0, width), clip(point.1, height))
}

impl DrawingBackend for ImageprocBackend {
    fn draw_rectangle(
        &self,
        image: &mut RgbImage,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
        thickness: u32,
        filled: bool,
    ) -> Result<()> {
        let (top_left, bottom_right) = (
            clip_to_image(image, top_left, thickness),
            clip_to_image(image, bottom_right, thickness),
        );
        let (x1, x2) = (top_left.0.min(bottom_right.0), top_left.0.max(bottom_right.0));
        let (y1, y2) = (top_left.1.min(bottom_right.1), top_left.1.max(bottom_right.1));
        let rgb: Rgb<u8> = color.into();
        let width = i64::from(x2) - i64::from(x1) + 1;
        let height = i64::from(y2) - i64::from(y1) + 1;
        let extent = |len: i64| u32::try_from(len).unwrap_or(u32::MAX);

        if filled {
            draw_filled_rect_mut(image, Rect::at(x1, y1).of_size(extent(width), extent(height)), rgb);
            return Ok(());
        }
        for inset in 0..i64::from(thickness.max(1)) {
            let inner_width = width - 2 * inset;
            let inner_height = height - 2 * inset;
            if inner_width <= 0 || inner_height <= 0 {
                break;
            }
            // inset < width / 2, so the shifted corner stays within x1..=x2.
            let (left, top) = ((i64::from(x1) + inset) as i32, (i64::from(y1) + inset) as i32);
            draw_hollow_rect_mut(
                image,
                Rect::at(left, top).of_size(extent(inner_width), extent(inner_height)),
                rgb,
            );
        }
        Ok(())
    }

    fn put_text(
        &self,
        image: &mut RgbImage,
        anchor: (i32, i32),
        text: &str,
        style: &TextStyle,
    ) -> Result<()> {
        let glyph_height = style
            .font_size
            .unwrap_or(GLYPH_HEIGHT_PER_LINE_WIDTH * style.line_width.max(1) as f32);
        let scale = PxScale::from(glyph_height);
        let placement = label_placement(anchor, self.measure(scale, text), self.label_clearance);

        if let Some(background) = style.background {
            self.draw_rectangle(
                image,
                placement.background_top_left,
                placement.background_bottom_right,
                background,
                1,
                true,
            )?;
        }
        match &self.font {
            Some(font) => {
                let (width, height) = image.dimensions();
                let (x, y) = clip_to_image(image, placement.text_origin, width.max(height));
                draw_text_mut(image, style.color.into(), x, y, scale, font, text);
            }
            None => debug!("no font loaded, drawing only the background of label '{}'", text),
        }
        Ok(())
    }
}
