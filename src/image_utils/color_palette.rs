use crate::error::{Result, VisionError};
use crate::image_utils::color::Color;
use rand::Rng;
use rand::seq::IndexedRandom;

/// The palette every `ColorPalette::new()` starts from.
pub static DEFAULT_PALETTE: [(u8, u8, u8); 45] = [
    (255, 0, 0), (0, 255, 0), (0, 0, 255),
    (255, 255, 0), (0, 255, 255), (255, 0, 255),
    (128, 128, 128), (163, 81, 251), (255, 64, 64),
    (255, 161, 160), (255, 118, 51), (255, 182, 51),
    (209, 212, 53), (76, 251, 18), (148, 207, 26),
    (64, 222, 138), (27, 150, 64), (0, 214, 193),
    (46, 156, 170), (0, 196, 255), (54, 71, 151),
    (102, 117, 255), (0, 25, 239), (134, 58, 255),
    (83, 0, 135), (205, 58, 255), (255, 151, 202),
    (255, 57, 201), (255, 0, 0), (230, 25, 75),
    (60, 180, 75), (255, 225, 25), (0, 130, 200),
    (245, 130, 49), (145, 30, 180), (70, 240, 240),
    (240, 50, 230), (210, 245, 60), (250, 190, 190),
    (0, 128, 128), (230, 190, 255), (170, 110, 40),
    (255, 250, 200), (128, 0, 0), (170, 255, 195),
];

/// Any of the shapes a caller may hand over where a color is expected.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorInput {
    Rgb(u8, u8, u8),
    Hex(String),
    Resolved(Color),
}

impl ColorInput {
    pub fn resolve(&self) -> Result<Color> {
        match self {
            ColorInput::Rgb(r, g, b) => Ok(Color::new(*r, *g, *b)),
            ColorInput::Hex(code) => Color::from_hex(code),
            ColorInput::Resolved(color) => Ok(*color),
        }
    }
}

impl From<Color> for ColorInput {
    fn from(color: Color) -> Self {
        ColorInput::Resolved(color)
    }
}

impl From<(u8, u8, u8)> for ColorInput {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorInput::Rgb(r, g, b)
    }
}

impl From<&str> for ColorInput {
    fn from(code: &str) -> Self {
        ColorInput::Hex(code.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(code: String) -> Self {
        ColorInput::Hex(code)
    }
}

fn resolve_all<I>(entries: I) -> Result<Vec<Color>>
where
    I: IntoIterator,
    I::Item: Into<ColorInput>,
{
    entries.into_iter().map(|entry| entry.into().resolve()).collect()
}

/// An ordered, indexable collection of colors.
///
/// Detections are colored by looking up their class id (or their position in the batch) in a
/// palette, so the same class always gets the same color across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette::new()
    }
}

impl ColorPalette {
    /// A palette holding the default colors.
    pub fn new() -> Self {
        ColorPalette { colors: DEFAULT_PALETTE.iter().copied().map(Color::from).collect() }
    }

    pub fn empty() -> Self {
        ColorPalette { colors: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Appends one color.
    pub fn add_color(&mut self, entry: impl Into<ColorInput>) -> Result<()> {
        self.colors.push(entry.into().resolve()?);
        Ok(())
    }

    /// Appends every entry in order. Nothing is added if any entry fails to resolve.
    pub fn add_palette<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<ColorInput>,
    {
        let colors = resolve_all(entries)?;
        self.colors.extend(colors);
        Ok(())
    }

    /// Puts `entries` in front of the existing colors.
    ///
    /// The entries take indices `0..k` and every existing color moves up by `k`. If any entry
    /// fails to resolve the palette is left untouched.
    pub fn override_color<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<ColorInput>,
    {
        let overriding = resolve_all(entries)?;
        self.colors.splice(0..0, overriding);
        Ok(())
    }

    pub fn get_color_by_index(&self, index: i64) -> Result<Color> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
            .ok_or(VisionError::IndexOutOfRange { index, len: self.colors.len() })
    }

    pub fn random_color(&self) -> Option<Color> {
        self.random_color_with(&mut rand::rng())
    }

    pub fn random_color_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Color> {
        self.colors.choose(rng).copied()
    }
}
