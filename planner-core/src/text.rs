//! Text measurement.
//!
//! Text items are sized by the host's font engine. The engine only needs the
//! advance width and the ascent/descent of a string, so measurement is a small
//! trait the host can back with its own renderer. [`ApproxTextMeasure`] is a
//! deterministic fallback for headless use and tests.

/// Font size in pixels per unit of a text item's width multiplier.
pub const FONT_SCALE: f64 = 5.0;

/// Measured extents of a string at a given font size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the glyphs.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the glyphs.
    pub descent: f64,
}

/// Source of text metrics.
pub trait TextMeasure {
    /// Measure `text` rendered at `font_px` pixels.
    fn measure(&self, text: &str, font_px: f64) -> TextMetrics;
}

/// Fixed-ratio approximation of a sans-serif face.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    /// Average advance per character, as a fraction of the font size.
    pub advance: f64,
    /// Ascent as a fraction of the font size.
    pub ascent: f64,
    /// Descent as a fraction of the font size.
    pub descent: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            ascent: 0.75,
            descent: 0.2,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_px: f64) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * font_px * self.advance,
            ascent: font_px * self.ascent,
            descent: font_px * self.descent,
        }
    }
}

/// CSS font shorthand for a text item with the given width multiplier.
#[must_use]
pub fn font_for(scale: f64) -> String {
    format!("{}px Arial", scale * FONT_SCALE)
}
