//! What the dropdown shows, independent of element geometry
//!
//! The same view model drives element building and the serializable
//! [`DropdownSnapshot`] the demo prints.

use serde::Serialize;

use super::pagination::Pagination;
use super::search::{filter_options, SearchState};
use super::selection::is_option_disabled;

/// Trigger height used when the host slot does not say otherwise
pub const TRIGGER_HEIGHT: f32 = 40.0;
/// Inset of chips inside the trigger
pub const TRIGGER_INSET: f32 = 4.0;
/// Space reserved at the right of the trigger for the corner icon
pub const CORNER_WIDTH: f32 = 32.0;
/// Vertical gap between trigger and panel
pub const PANEL_GAP: f32 = 4.0;
pub const SEARCH_HEIGHT: f32 = 36.0;
pub const ROW_HEIGHT: f32 = 32.0;

pub const SEARCH_PLACEHOLDER: &str = "Search";
pub const NO_RESULTS_LABEL: &str = "No results found";
pub const LOAD_MORE_LABEL: &str = "See More";

/// Icon in the trigger's right corner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerIcon {
    /// Clears the whole selection
    Clear,
    Chevron,
}

/// The clear icon replaces the chevron while hovered with a selection
pub fn corner_icon(hovered: bool, selection: &[String]) -> CornerIcon {
    if hovered && !selection.is_empty() {
        CornerIcon::Clear
    } else {
        CornerIcon::Chevron
    }
}

/// One checkbox row in the panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionRow {
    pub label: String,
    pub selected: bool,
    pub disabled: bool,
}

/// Options listed in the panel
///
/// An applied query filters the whole set and ignores the window.
pub fn displayed_options<'a>(
    options: &'a [String],
    pagination: &Pagination,
    search: &SearchState,
) -> Vec<&'a String> {
    if search.is_filtering() {
        filter_options(options, &search.applied)
    } else {
        pagination.materialized(options).iter().collect()
    }
}

/// Checkbox rows for the displayed options
pub fn option_rows(displayed: &[&String], selection: &[String], multiple: bool) -> Vec<OptionRow> {
    displayed
        .iter()
        .map(|option| OptionRow {
            label: (*option).clone(),
            selected: selection.contains(*option),
            disabled: is_option_disabled(selection, option.as_str(), multiple),
        })
        .collect()
}

/// "See More" is offered only for the unfiltered view with options left
pub fn shows_load_more(pagination: &Pagination, search: &SearchState) -> bool {
    !search.is_filtering() && !pagination.is_exhausted()
}

/// Serializable picture of a dropdown
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DropdownSnapshot {
    pub key: String,
    pub open: bool,
    pub hovered: bool,
    pub multiple: bool,
    pub searchable: bool,
    /// Shown only while nothing is selected
    pub placeholder: Option<String>,
    pub selection: Vec<String>,
    /// Labels of the chips in the trigger
    pub chips: Vec<String>,
    /// "+K more" label, when the chips overflow
    pub summary: Option<String>,
    pub corner: CornerIcon,
    pub search_text: String,
    pub applied_query: String,
    /// Panel rows; empty while closed
    pub options: Vec<OptionRow>,
    pub no_results: bool,
    pub load_more: bool,
    /// Options materialized by pagination so far
    pub materialized: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn test_unfiltered_view_uses_window() {
        let opts = options(250);
        let mut p = Pagination::new(opts.len(), 100);
        let search = SearchState::default();
        assert!(displayed_options(&opts, &p, &search).is_empty());

        p.load_next();
        assert_eq!(displayed_options(&opts, &p, &search).len(), 100);
        assert!(shows_load_more(&p, &search));
    }

    #[test]
    fn test_query_ignores_window() {
        let opts = options(250);
        let p = Pagination::new(opts.len(), 100);
        let search = SearchState::default().with_typed("option 24").applied();

        // "option 24" and "option 240" to "option 249", none materialized yet
        let shown = displayed_options(&opts, &p, &search);
        assert_eq!(shown.len(), 11);
        assert!(!shows_load_more(&p, &search));
    }

    #[test]
    fn test_rows_mark_disabled_in_single_mode() {
        let opts = vec!["Apple".to_string(), "Banana".to_string(), "Cherry".to_string()];
        let shown: Vec<&String> = opts.iter().collect();
        let selection = vec!["Apple".to_string()];

        let rows = option_rows(&shown, &selection, false);
        assert!(rows[0].selected && !rows[0].disabled);
        assert!(!rows[1].selected && rows[1].disabled);
        assert!(rows[2].disabled);

        let rows = option_rows(&shown, &selection, true);
        assert!(rows.iter().all(|r| !r.disabled));
    }

    #[test]
    fn test_corner_icon() {
        let picked = vec!["Kiwi".to_string()];
        assert_eq!(corner_icon(true, &picked), CornerIcon::Clear);
        assert_eq!(corner_icon(false, &picked), CornerIcon::Chevron);
        assert_eq!(corner_icon(true, &[]), CornerIcon::Chevron);
    }
}
