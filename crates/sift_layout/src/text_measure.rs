//! Text measurement for layout
//!
//! Widgets size text-bearing elements (chips, labels) through the
//! [`TextMeasurer`] trait. Without a registered measurer the width is
//! estimated from the UTF-16 length.

use std::sync::{Arc, PoisonError, RwLock};

/// Average glyph advance as a fraction of the font size
pub const DEFAULT_CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Text measurement result
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

/// Trait for measuring text dimensions
pub trait TextMeasurer: Send + Sync {
    /// Measure a single line of text at `font_size`
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics;
}

/// Length estimate: `utf16_units * factor * font_size`
///
/// Counts UTF-16 code units, so an emoji outside the Basic Multilingual
/// Plane counts twice.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedTextMeasurer {
    pub char_width_factor: f32,
    pub line_height: f32,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: DEFAULT_CHAR_WIDTH_FACTOR,
            line_height: 1.2,
        }
    }
}

impl EstimatedTextMeasurer {
    pub fn new(char_width_factor: f32) -> Self {
        Self {
            char_width_factor,
            ..Self::default()
        }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        let units = text.encode_utf16().count() as f32;
        TextMetrics {
            width: units * self.char_width_factor * font_size,
            height: font_size * self.line_height,
        }
    }
}

static TEXT_MEASURER: RwLock<Option<Arc<dyn TextMeasurer>>> = RwLock::new(None);

/// Set the global text measurer
///
/// Call this at app initialization with a measurer backed by real font
/// metrics.
pub fn set_text_measurer(measurer: Arc<dyn TextMeasurer>) {
    let mut guard = TEXT_MEASURER.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(measurer);
}

/// Clear the global text measurer
pub fn clear_text_measurer() {
    let mut guard = TEXT_MEASURER.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

/// Measure text using the global measurer, or fall back to estimation
pub fn measure_text(text: &str, font_size: f32) -> TextMetrics {
    let guard = TEXT_MEASURER.read().unwrap_or_else(PoisonError::into_inner);
    match guard.as_ref() {
        Some(measurer) => measurer.measure(text, font_size),
        None => EstimatedTextMeasurer::default().measure(text, font_size),
    }
}
