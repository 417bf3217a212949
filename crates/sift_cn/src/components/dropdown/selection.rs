//! Selection transforms
//!
//! Every function takes the committed selection and returns the next one,
//! so they compose under functional state updates. Selection order is
//! insertion order.

/// Result of a toggle request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Single-select already holds a different option
    Rejected,
}

impl ToggleOutcome {
    /// Whether the selection changed
    pub fn changed(self) -> bool {
        !matches!(self, ToggleOutcome::Rejected)
    }
}

/// Whether `option` is shown disabled
///
/// In single-select mode every unselected option is disabled once
/// something is selected. Multi-select never disables.
pub fn is_option_disabled(selection: &[String], option: &str, multiple: bool) -> bool {
    !multiple && !selection.is_empty() && !selection.iter().any(|s| s == option)
}

/// Select `option` if absent, deselect it if present
///
/// Single-select never replaces the current pick: the request is rejected
/// and the selection returned unchanged.
pub fn toggle(mut selection: Vec<String>, option: &str, multiple: bool) -> (Vec<String>, ToggleOutcome) {
    if selection.iter().any(|s| s == option) {
        selection.retain(|s| s != option);
        return (selection, ToggleOutcome::Removed);
    }
    if is_option_disabled(&selection, option, multiple) {
        return (selection, ToggleOutcome::Rejected);
    }
    selection.push(option.to_string());
    (selection, ToggleOutcome::Added)
}

/// Remove `option`. Returns `None` when it was not selected.
pub fn remove(selection: &[String], option: &str) -> Option<Vec<String>> {
    if !selection.iter().any(|s| s == option) {
        return None;
    }
    Some(selection.iter().filter(|s| *s != option).cloned().collect())
}
