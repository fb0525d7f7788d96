use crate::error::Result;
use crate::image_utils::color::Color;
use image::RgbImage;

/// How a label is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub line_width: u32,
    /// Glyph height in pixels. Backends pick a size from `line_width` when this is `None`.
    pub font_size: Option<f32>,
    /// Filled rectangle drawn behind the text.
    pub background: Option<Color>,
}

/// Defines the drawing primitives the annotators are built on.
///
/// The annotators only decide what goes where and in which color. Putting pixels on the image is
/// left to an implementation of this trait, so rendering can be swapped out, or recorded in tests,
/// without touching the annotation logic.
pub trait DrawingBackend {
    /// Draws the rectangle spanning `top_left` to `bottom_right`, both corners inclusive.
    ///
    /// The outline is `thickness` pixels wide and grows inwards from the corners. `filled`
    /// ignores the thickness and paints the whole rectangle.
    fn draw_rectangle(
        &self,
        image: &mut RgbImage,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
        thickness: u32,
        filled: bool,
    ) -> Result<()>;

    /// Draws `text` next to `anchor`, above it when there is room and below it otherwise.
    fn put_text(
        &self,
        image: &mut RgbImage,
        anchor: (i32, i32),
        text: &str,
        style: &TextStyle,
    ) -> Result<()>;
}

/// Where a label and its background go relative to the anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub background_top_left: (i32, i32),
    pub background_bottom_right: (i32, i32),
    /// Top-left corner of the text itself.
    pub text_origin: (i32, i32),
    pub outside: bool,
}

/// Places a label of `text_size` (width, height) at `anchor`.
///
/// The label sits above the anchor when at least `clearance` pixels remain between the top of
/// the text and the top of the image, otherwise below it.
pub fn label_placement(anchor: (i32, i32), text_size: (u32, u32), clearance: i32) -> LabelPlacement {
    let (x, y) = anchor;
    let w = i32::try_from(text_size.0).unwrap_or(i32::MAX);
    let h = i32::try_from(text_size.1).unwrap_or(i32::MAX);
    let outside = y.saturating_sub(h) >= clearance;
    if outside {
        let top = y.saturating_sub(h).saturating_sub(clearance);
        LabelPlacement {
            background_top_left: (x, top),
            background_bottom_right: (x.saturating_add(w), y),
            text_origin: (x, top.saturating_add(1)),
            outside,
        }
    } else {
        LabelPlacement {
            background_top_left: (x, y),
            background_bottom_right: (
                x.saturating_add(w),
                y.saturating_add(h).saturating_add(clearance),
            ),
            text_origin: (x, y.saturating_add(1)),
            outside,
        }
    }
}
