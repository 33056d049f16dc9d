use crate::core::Font;

/// Average glyph advance relative to the font size for proportional sans fonts.
const AVERAGE_ADVANCE_RATIO: f64 = 0.55;
const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Headless estimate of the rendered width of `text` in points.
///
/// Layout runs before any backend exists, so label packing uses this instead
/// of real glyph metrics.
#[must_use]
pub fn estimate_text_width(text: &str, font: &Font) -> f64 {
    text.chars().count() as f64 * font.size * AVERAGE_ADVANCE_RATIO
}

#[must_use]
pub fn estimate_text_height(font: &Font) -> f64 {
    font.size * LINE_HEIGHT_RATIO
}
