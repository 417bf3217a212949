//! Overflow-aware chip layout
//!
//! Selected options are packed left to right as chips until the next one
//! would overflow the available width. The remainder collapses into a
//! "+K more" summary chip. If the summary itself does not fit after the
//! accepted chips, the last accepted chip is evicted into the summary.
//! At most one chip is evicted, so very narrow widths can still overflow
//! by up to the summary's own width.

use std::fmt;
use std::sync::Arc;

use sift_layout::text_measure::{measure_text, TextMeasurer};

/// Chip label font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Horizontal padding on each side of a chip label
pub const DEFAULT_CHIP_PADDING: f32 = 16.0;

/// Label of the overflow summary chip
pub fn summary_label(count: usize) -> String {
    format!("+{count} more")
}

/// Sizing rules for chips
#[derive(Clone)]
pub struct ChipMetrics {
    pub font_size: f32,
    pub padding: f32,
    /// Falls back to the process-wide measurer when unset
    measurer: Option<Arc<dyn TextMeasurer>>,
}

impl fmt::Debug for ChipMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChipMetrics")
            .field("font_size", &self.font_size)
            .field("padding", &self.padding)
            .field("measurer", &self.measurer.is_some())
            .finish()
    }
}

impl Default for ChipMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE, DEFAULT_CHIP_PADDING)
    }
}

impl ChipMetrics {
    pub fn new(font_size: f32, padding: f32) -> Self {
        Self {
            font_size,
            padding,
            measurer: None,
        }
    }

    /// Measure labels with `measurer` instead of the global one
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    /// Width of the label text alone
    pub fn text_width(&self, text: &str) -> f32 {
        match &self.measurer {
            Some(measurer) => measurer.measure(text, self.font_size).width,
            None => measure_text(text, self.font_size).width,
        }
    }

    /// Width of a chip showing `text`, padding included
    pub fn chip_width(&self, text: &str) -> f32 {
        self.text_width(text) + 2.0 * self.padding
    }
}

/// One rendered chip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChipSlot {
    /// Position in the selection
    pub index: usize,
    pub width: f32,
}

/// The "+K more" chip
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryChip {
    /// Selected options not shown as chips
    pub count: usize,
    pub label: String,
    pub width: f32,
}

/// Result of packing the selection into the available width
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChipLayout {
    /// Chips for a prefix of the selection, left to right
    pub chips: Vec<ChipSlot>,
    pub summary: Option<SummaryChip>,
}

impl ChipLayout {
    /// Total width of chips and summary
    pub fn rendered_width(&self) -> f32 {
        let chips: f32 = self.chips.iter().map(|c| c.width).sum();
        chips + self.summary.as_ref().map_or(0.0, |s| s.width)
    }

    /// Number of selected options represented, as chips or in the summary
    pub fn represented(&self) -> usize {
        self.chips.len() + self.summary.as_ref().map_or(0, |s| s.count)
    }
}

/// Greedily pack `selection` into `available` pixels
///
/// With no measured width every selected option gets a chip.
pub fn layout_chips(selection: &[String], available: Option<f32>, metrics: &ChipMetrics) -> ChipLayout {
    let mut chips: Vec<ChipSlot> = Vec::with_capacity(selection.len());
    let mut total = 0.0;

    for (index, item) in selection.iter().enumerate() {
        let width = metrics.chip_width(item);

        if let Some(available) = available {
            if total + width > available {
                let mut count = selection.len() - chips.len();
                let mut summary_width = metrics.chip_width(&summary_label(count));

                if total + summary_width > available {
                    if let Some(evicted) = chips.pop() {
                        total -= evicted.width;
                        count += 1;
                        summary_width = metrics.chip_width(&summary_label(count));
                    }
                }

                return ChipLayout {
                    chips,
                    summary: Some(SummaryChip {
                        count,
                        label: summary_label(count),
                        width: summary_width,
                    }),
                };
            }
        }

        total += width;
        chips.push(ChipSlot { index, width });
    }

    ChipLayout {
        chips,
        summary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sift_layout::text_measure::EstimatedTextMeasurer;

    fn metrics() -> ChipMetrics {
        ChipMetrics::default().with_measurer(Arc::new(EstimatedTextMeasurer::default()))
    }

    fn sel(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Widths at 14px with 16px padding: 8.4 per UTF-16 unit + 32
    // "Strawberry 🍓" 141.2, "Banana 🍌" 107.6, "Apple 🍎" 99.2, "+N more" 90.8
    fn three() -> Vec<String> {
        sel(&["Strawberry 🍓", "Banana 🍌", "Apple 🍎"])
    }

    #[test]
    fn test_chip_width_formula() {
        let m = metrics();
        assert!((m.chip_width("Kiwi 🥝") - (7.0 * 0.6 * 14.0 + 32.0)).abs() < 1e-3);
    }

    #[test]
    fn test_everything_fits() {
        // 348 in total
        let layout = layout_chips(&three(), Some(360.0), &metrics());
        assert_eq!(layout.chips.len(), 3);
        assert_eq!(layout.summary, None);
    }

    #[test]
    fn test_emoji_labels_overflow_at_330() {
        // Emoji take two units each, so the three chips need 348
        let layout = layout_chips(&three(), Some(330.0), &metrics());
        assert_eq!(layout.chips.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0]);
        let summary = layout.summary.expect("summary chip");
        assert_eq!(summary.label, "+2 more");
        assert!((layout.chips[0].width - 141.2).abs() < 1e-3);
    }

    #[test]
    fn test_summary_evicts_last_chip() {
        // Strawberry + Banana fit (248.8), Apple does not, and 248.8 + summary > 300
        let layout = layout_chips(&three(), Some(300.0), &metrics());
        assert_eq!(layout.chips.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0]);
        let summary = layout.summary.expect("summary chip");
        assert_eq!(summary.label, "+2 more");
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_summary_without_eviction() {
        let layout = layout_chips(&three(), Some(100.0), &metrics());
        assert!(layout.chips.is_empty());
        assert_eq!(layout.summary.map(|s| s.count), Some(3));
    }

    #[test]
    fn test_nothing_to_evict() {
        // Neither the first chip nor the summary fits
        let layout = layout_chips(&three(), Some(50.0), &metrics());
        assert!(layout.chips.is_empty());
        let summary = layout.summary.expect("summary chip");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.label, "+3 more");
    }

    #[test]
    fn test_unmeasured_renders_all() {
        let layout = layout_chips(&three(), None, &metrics());
        assert_eq!(layout.chips.len(), 3);
        assert!(layout.summary.is_none());
    }

    proptest! {
        #[test]
        fn test_overflow_bounds(
            labels in prop::collection::vec("[a-z]{1,12}", 0..12),
            available in 0.0f32..600.0,
        ) {
            let m = metrics();
            let layout = layout_chips(&labels, Some(available), &m);

            let chips_width: f32 = layout.chips.iter().map(|c| c.width).sum();
            let all_width: f32 = labels.iter().map(|l| m.chip_width(l)).sum();

            // Chips are a prefix and always fit
            for (i, chip) in layout.chips.iter().enumerate() {
                prop_assert_eq!(chip.index, i);
            }
            prop_assert!(chips_width <= available + 1e-3);

            // Summary exactly when the whole selection does not fit
            prop_assert_eq!(layout.summary.is_some(), all_width > available);
            prop_assert_eq!(layout.represented(), labels.len());

            // Overshoot is bounded by one chip (the summary)
            if let Some(summary) = &layout.summary {
                prop_assert!(layout.rendered_width() <= available + summary.width + 1e-3);
            }
        }
    }
}
